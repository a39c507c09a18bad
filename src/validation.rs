use regex::Regex;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("domain is empty")]
    Empty,
    #[error("domain needs at least two labels (e.g. example.com)")]
    SingleLabel,
    #[error("label '{0}' too long (max 63 characters)")]
    TooLong(String),
    #[error("label '{0}' contains invalid characters (only a-z, 0-9, and '-' allowed)")]
    InvalidCharacters(String),
    #[error("label '{0}' must not start or end with '-'")]
    LeadingOrTrailingHyphen(String),
}

lazy_static::lazy_static! {
    /// Only lowercase letters, digits and '-'
    static ref LABEL_RE: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// Trailing-dot form used for every zone-name comparison and creation.
pub fn normalize(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

/// Strip one trailing dot, the form resolvers and the registrar report.
pub fn denormalize(domain: &str) -> &str {
    domain.strip_suffix('.').unwrap_or(domain)
}

fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.is_empty() {
        return Err(ValidationError::Empty);
    }
    if label.len() > 63 {
        return Err(ValidationError::TooLong(label.to_string()));
    }
    if !LABEL_RE.is_match(label) {
        return Err(ValidationError::InvalidCharacters(label.to_string()));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(ValidationError::LeadingOrTrailingHyphen(label.to_string()));
    }
    Ok(())
}

/// Validate an operator-supplied domain and return it lowercased, without
/// trailing dot.
pub fn validate_domain(domain: &str) -> Result<String, ValidationError> {
    let d = denormalize(domain.trim()).to_ascii_lowercase();
    if d.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !d.contains('.') {
        return Err(ValidationError::SingleLabel);
    }
    for label in d.split('.') {
        validate_label(label)?;
    }
    Ok(d)
}

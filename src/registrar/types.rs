use serde::{Deserialize, Serialize};

/// A pending cross-account domain transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub password: String,
    pub operation_id: String,
}

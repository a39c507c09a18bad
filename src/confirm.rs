//! Operator confirmation before destructive steps.
use std::io::BufRead;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> anyhow::Result<bool>;
}

/// Asks on the terminal. Anything but `y`/`yes` (including EOF) is a no.
///
/// The read runs on a blocking thread that cannot be interrupted; callers
/// that race the prompt against Ctrl-C must exit the process rather than
/// wait for the runtime to shut down.
pub struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> anyhow::Result<bool> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("{prompt} [y/N]: ").as_bytes()).await?;
        stderr.flush().await?;

        let line = tokio::task::spawn_blocking(|| read_answer(std::io::stdin().lock()))
            .await
            .context("confirmation prompt was dropped")??;
        Ok(is_yes(&line))
    }
}

fn read_answer(mut reader: impl BufRead) -> std::io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

/// Used for `--yes`.
pub struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> anyhow::Result<bool> {
        Ok(true)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        for yes in ["y", "Y\n", " yes ", "YES\r\n"] {
            assert!(is_yes(yes), "{yes:?}");
        }
        for no in ["", "\n", "n", "no", "yep", "sure"] {
            assert!(!is_yes(no), "{no:?}");
        }
    }

    #[test]
    fn reads_a_single_line_and_treats_eof_as_no() {
        let answer = read_answer(std::io::Cursor::new("yes\nignored\n")).unwrap();
        assert_eq!(answer, "yes\n");
        assert!(is_yes(&answer));

        let eof = read_answer(std::io::empty()).unwrap();
        assert!(!is_yes(&eof));
    }
}

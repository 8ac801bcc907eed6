//! Error types for slicefix-edit.
//!
//! Two classes of failure map to distinct exit codes:
//! - Policy blocks (exit code 2): a file changed since the check, or the span no longer holds
//!   the specifier the finding was computed for.
//! - Runtime errors (exit code 1): I/O errors, unreadable reports.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("policy block: {0}")]
    PolicyBlock(#[from] PolicyBlockError),

    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

/// Policy block errors that should result in exit code 2.
#[derive(Debug, Error)]
pub enum PolicyBlockError {
    /// One or more files failed their preconditions; their fixes were not applied.
    #[error("precondition mismatch: {message}")]
    PreconditionMismatch { message: String },
}

impl EditError {
    pub fn is_policy_block(&self) -> bool {
        matches!(self, EditError::PolicyBlock(_))
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::PolicyBlock(_) => 2,
            EditError::Runtime(_) => 1,
        }
    }
}

pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::{EditError, PolicyBlockError};

    #[test]
    fn policy_block_reports_exit_code_2() {
        let err = EditError::from(PolicyBlockError::PreconditionMismatch {
            message: "src/a.ts changed".to_string(),
        });
        assert!(err.is_policy_block());
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("policy block"));
        assert!(err.to_string().contains("src/a.ts changed"));
    }

    #[test]
    fn runtime_error_reports_exit_code_1() {
        let err = EditError::from(anyhow::anyhow!("boom"));
        assert!(!err.is_policy_block());
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("runtime error"));
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// A git process that could not be started or exited non-zero.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("git {command} failed ({}): {stderr}", exit_code_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("failed to launch git: {0}")]
    Spawn(#[from] std::io::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum RebaseError {
    /// `rebase <ref>` failed; usually a conflict the user resolves by hand.
    #[error("Failed to merge in the changes.")]
    MergeFailed(#[source] CommandError),

    /// continue/skip/abort failures pass through untouched.
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("an interactive rebase is already waiting on its editor in {}", .0.display())]
    EditSessionOpen(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn failure() -> CommandError {
        CommandError::Failed {
            command: "rebase main".to_string(),
            code: Some(1),
            stderr: "CONFLICT (content): Merge conflict in a.txt".to_string(),
        }
    }

    #[test]
    fn test_merge_failed_keeps_cause() {
        let err = RebaseError::MergeFailed(failure());
        assert_eq!(err.to_string(), "Failed to merge in the changes.");
        let cause = err.source().expect("cause");
        assert!(cause.to_string().contains("Merge conflict in a.txt"));
    }

    #[test]
    fn test_command_error_is_transparent() {
        let err = RebaseError::from(failure());
        assert_eq!(err.to_string(), failure().to_string());
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_signal_label() {
        let err = CommandError::Failed {
            command: "rebase --interactive main".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}

use super::GitAdapter;
use crate::domain::error::CommandError;
use crate::domain::models::{GitInvocation, Repository};
use crate::infrastructure::sequence_editor::{handoff_dir, HANDOFF_ENV};
use tracing::{debug, info, warn};

// ":" is git's built-in no-op editor; nothing here can host a commit message editor.
const NOOP_EDITOR: &str = ":";

impl GitAdapter {
    pub(crate) async fn run_impl(
        &self,
        repo: &Repository,
        invocation: GitInvocation,
    ) -> Result<(), CommandError> {
        let mut cmd = self.command(repo.root());
        cmd.args(&invocation.args).env("GIT_EDITOR", NOOP_EDITOR);

        if let Some(redirect) = &invocation.editor {
            match &self.sequence_editor {
                Some(editor) => {
                    debug!(variable = %redirect.variable, %editor, "Redirecting editor");
                    cmd.env(&redirect.variable, editor)
                        .env(HANDOFF_ENV, handoff_dir(repo));
                }
                None => warn!(
                    variable = %redirect.variable,
                    "No sequence editor configured; git will use its default"
                ),
            }
        }

        info!(repo = %repo.root().display(), command = %invocation, "Running git");
        let output = cmd.output().await?;

        if output.status.success() {
            debug!(command = %invocation, "git succeeded");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        // Conflict reports from the merge backend land on stdout.
        let diagnostic = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };

        warn!(
            command = %invocation,
            code = ?output.status.code(),
            "git failed"
        );
        Err(CommandError::Failed {
            command: invocation.to_string(),
            code: output.status.code(),
            stderr: diagnostic,
        })
    }
}

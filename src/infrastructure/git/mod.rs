use crate::domain::error::CommandError;
use crate::domain::models::{GitInvocation, RepoSnapshot, Repository};
use crate::domain::vcs::{CommandRunner, RefCatalog, RepositoryProbe};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;

pub mod ops;
pub mod refs;
pub mod repo;

pub struct GitAdapter {
    pub(crate) git_binary: String,
    pub(crate) sequence_editor: Option<String>,
}

impl GitAdapter {
    pub fn new(git_binary: impl Into<String>) -> Self {
        Self {
            git_binary: git_binary.into(),
            sequence_editor: None,
        }
    }

    /// Command line git should run instead of the user's sequence editor.
    pub fn with_sequence_editor(mut self, command: impl Into<String>) -> Self {
        self.sequence_editor = Some(command.into());
        self
    }

    pub(crate) fn command(&self, dir: &Path) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.git_binary);
        cmd.current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        cmd
    }

    /// Runs a read-only git query and returns trimmed stdout.
    pub(crate) async fn query(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self
            .command(dir)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to execute '{} {}'", self.git_binary, args.join(" ")))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()))
        }
    }

    /// Like `query`, but a non-zero exit is reported as `None`.
    pub(crate) async fn query_optional(&self, dir: &Path, args: &[&str]) -> Result<Option<String>> {
        let output = self
            .command(dir)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to execute '{} {}'", self.git_binary, args.join(" ")))?;
        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
        } else {
            Ok(None)
        }
    }

    pub async fn check_version(&self) -> Result<String> {
        let version = self
            .query(Path::new("."), &["--version"])
            .await
            .with_context(|| {
                format!(
                    "Failed to execute '{} --version'. Is git installed and in your PATH?",
                    self.git_binary
                )
            })?;
        Ok(version)
    }
}

#[async_trait]
impl RepositoryProbe for GitAdapter {
    async fn probe(&self, repo: &Repository) -> Result<RepoSnapshot> {
        self.probe_impl(repo).await
    }
}

#[async_trait]
impl CommandRunner for GitAdapter {
    async fn run(
        &self,
        repo: &Repository,
        invocation: GitInvocation,
    ) -> std::result::Result<(), CommandError> {
        self.run_impl(repo, invocation).await
    }
}

#[async_trait]
impl RefCatalog for GitAdapter {
    async fn list_refs(&self, repo: &Repository) -> Result<Vec<String>> {
        self.list_refs_impl(repo).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::GitAdapter;
    use crate::domain::models::Repository;
    use std::path::Path;
    use std::process::Command;

    pub(crate) fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .status()
            .expect("git should be installed");
        assert!(status.success(), "git {args:?} failed");
    }

    /// A fresh repository on branch `main` with one commit.
    pub(crate) async fn init_repo(dir: &Path) -> Repository {
        git(dir, &["init", "-q"]);
        git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        std::fs::write(dir.join("README.md"), "hello\n").unwrap();
        git(dir, &["add", "README.md"]);
        git(
            dir,
            &["-c", "commit.gpgsign=false", "commit", "-q", "-m", "initial"],
        );
        GitAdapter::new("git").discover(dir).await.unwrap()
    }
}

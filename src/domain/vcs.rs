use crate::domain::error::CommandError;
use crate::domain::models::{GitInvocation, RepoSnapshot, Repository};
use anyhow::Result;
use async_trait::async_trait;

// Reads rebase state and HEAD tracking info
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryProbe: Send + Sync {
    async fn probe(&self, repo: &Repository) -> Result<RepoSnapshot>;
}

// Runs git; with an editor redirect the call only returns once the editor is done
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        repo: &Repository,
        invocation: GitInvocation,
    ) -> std::result::Result<(), CommandError>;
}

// Asks the user for a target ref. Ok(None) means they backed out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefChooser: Send + Sync {
    async fn choose_ref(&self, repo: &Repository, prompt: &str) -> Result<Option<String>>;
}

// Host side of the sequence editor. Closing is idempotent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EditSurface: Send + Sync {
    async fn close(&self, repo: &Repository) -> Result<()>;
}

// Candidate targets for the ref prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefCatalog: Send + Sync {
    async fn list_refs(&self, repo: &Repository) -> Result<Vec<String>>;
}

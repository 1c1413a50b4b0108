use crate::domain::models::{RebaseStatus, RepoSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderState {
    pub repo_text: String,
    pub branch_text: String,
    pub status_text: String,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            repo_text: " no repo ".to_string(),
            branch_text: " (detached) ".to_string(),
            status_text: " Loading... ".to_string(),
        }
    }
}

impl HeaderState {
    pub fn from_snapshot(repo_name: &str, snapshot: &RepoSnapshot) -> Self {
        let status_text = match &snapshot.status {
            RebaseStatus::Absent => " idle ".to_string(),
            RebaseStatus::InProgress { original_head } => format!(" rebasing {original_head} "),
        };
        Self {
            repo_text: format!(" {repo_name} "),
            branch_text: format!(" {} ", snapshot.head.name),
            status_text,
        }
    }
}

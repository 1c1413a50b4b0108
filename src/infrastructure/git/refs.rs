use super::GitAdapter;
use crate::domain::models::Repository;
use anyhow::{Context, Result};

impl GitAdapter {
    /// Local branches, then remote branches, then tags.
    pub(crate) async fn list_refs_impl(&self, repo: &Repository) -> Result<Vec<String>> {
        let output = self
            .query(
                repo.root(),
                &[
                    "for-each-ref",
                    "--format=%(refname)",
                    "refs/heads",
                    "refs/remotes",
                    "refs/tags",
                ],
            )
            .await
            .context("Failed to list refs")?;
        Ok(order_refs(output.lines()))
    }
}

pub(crate) fn order_refs<'a>(full_names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut heads = Vec::new();
    let mut remotes = Vec::new();
    let mut tags = Vec::new();

    for name in full_names.map(str::trim).filter(|n| !n.is_empty()) {
        if let Some(short) = name.strip_prefix("refs/heads/") {
            heads.push(short.to_string());
        } else if let Some(short) = name.strip_prefix("refs/remotes/") {
            // origin/HEAD is a symref, not a useful target
            if !short.ends_with("/HEAD") {
                remotes.push(short.to_string());
            }
        } else if let Some(short) = name.strip_prefix("refs/tags/") {
            tags.push(short.to_string());
        }
    }

    heads.into_iter().chain(remotes).chain(tags).collect()
}

use super::GitAdapter;
use crate::domain::models::{HeadRef, RebaseStatus, RemoteBranch, RepoSnapshot, Repository};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const TRACKING_FORMAT: &str =
    "--format=%(push:remotename)%00%(push:short)%00%(upstream:remotename)%00%(upstream:short)";

impl GitAdapter {
    /// Resolves the working tree and git dir that contain `path`.
    pub async fn discover(&self, path: &Path) -> Result<Repository> {
        let output = self
            .query(path, &["rev-parse", "--show-toplevel", "--absolute-git-dir"])
            .await
            .with_context(|| format!("{} is not inside a git working tree", path.display()))?;
        let mut lines = output.lines();
        let root = lines
            .next()
            .ok_or_else(|| anyhow!("git rev-parse returned no toplevel"))?;
        let git_dir = lines
            .next()
            .ok_or_else(|| anyhow!("git rev-parse returned no git dir"))?;
        Ok(Repository::new(PathBuf::from(root), PathBuf::from(git_dir)))
    }

    pub(crate) async fn probe_impl(&self, repo: &Repository) -> Result<RepoSnapshot> {
        let status = read_rebase_status(repo.git_dir())?;
        let head = self.head_ref(repo).await?;
        debug!(repo = %repo.root().display(), ?status, head = %head.name, "Probed repository");
        Ok(RepoSnapshot { status, head })
    }

    async fn head_ref(&self, repo: &Repository) -> Result<HeadRef> {
        let branch = self
            .query_optional(repo.root(), &["symbolic-ref", "--short", "-q", "HEAD"])
            .await?
            .filter(|name| !name.is_empty());

        let Some(branch) = branch else {
            let name = self
                .query_optional(repo.root(), &["rev-parse", "--short", "HEAD"])
                .await?
                .unwrap_or_else(|| "HEAD".to_string());
            return Ok(HeadRef {
                name,
                ..HeadRef::default()
            });
        };

        let full_ref = format!("refs/heads/{branch}");
        let tracking = self
            .query(repo.root(), &["for-each-ref", TRACKING_FORMAT, &full_ref])
            .await
            .with_context(|| format!("Failed to read tracking info for {branch}"))?;
        let (push_remote, upstream) = parse_tracking(&tracking);

        Ok(HeadRef {
            name: branch,
            push_remote,
            upstream,
        })
    }
}

pub(crate) fn read_rebase_status(git_dir: &Path) -> Result<RebaseStatus> {
    let merge_dir = git_dir.join("rebase-merge");
    let apply_dir = git_dir.join("rebase-apply");

    let state_dir = if merge_dir.is_dir() {
        merge_dir
    } else if apply_dir.is_dir() && !apply_dir.join("applying").exists() {
        // rebase-apply/applying belongs to `git am`
        apply_dir
    } else {
        return Ok(RebaseStatus::Absent);
    };

    let head_name_path = state_dir.join("head-name");
    let original_head = match std::fs::read_to_string(&head_name_path) {
        Ok(contents) => parse_head_name(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => "detached HEAD".to_string(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", head_name_path.display()))
        }
    };
    Ok(RebaseStatus::InProgress { original_head })
}

pub(crate) fn parse_head_name(contents: &str) -> String {
    let name = contents.trim();
    name.strip_prefix("refs/heads/").unwrap_or(name).to_string()
}

/// Parses one line of `TRACKING_FORMAT` into (push, upstream).
pub(crate) fn parse_tracking(line: &str) -> (Option<RemoteBranch>, Option<RemoteBranch>) {
    let fields: Vec<&str> = line.trim_end_matches('\n').split('\0').collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or("");
    (
        remote_branch(field(0), field(1)),
        remote_branch(field(2), field(3)),
    )
}

// Local upstreams (remote ".") have no `<remote>/` prefix and are skipped.
fn remote_branch(remote: &str, short: &str) -> Option<RemoteBranch> {
    if remote.is_empty() || remote == "." {
        return None;
    }
    let name = short.strip_prefix(remote)?.strip_prefix('/')?;
    if name.is_empty() {
        return None;
    }
    Some(RemoteBranch {
        remote: remote.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::testing::{git, init_repo};
    use super::*;

    #[test]
    fn test_parse_head_name() {
        assert_eq!(parse_head_name("refs/heads/feature/login\n"), "feature/login");
        assert_eq!(parse_head_name("detached HEAD\n"), "detached HEAD");
    }

    #[test]
    fn test_parse_tracking_both() {
        let (push, upstream) = parse_tracking("origin\0origin/topic\0upstream\0upstream/main");
        assert_eq!(push.unwrap().to_string(), "origin/topic");
        let upstream = upstream.unwrap();
        assert_eq!(upstream.remote, "upstream");
        assert_eq!(upstream.name, "main");
    }

    #[test]
    fn test_parse_tracking_remote_with_slash() {
        let (push, upstream) = parse_tracking("team/fork\0team/fork/topic\0\0");
        let push = push.unwrap();
        assert_eq!(push.remote, "team/fork");
        assert_eq!(push.name, "topic");
        assert!(upstream.is_none());
    }

    #[test]
    fn test_parse_tracking_none_and_local() {
        assert_eq!(parse_tracking(""), (None, None));
        assert_eq!(parse_tracking("\0\0.\0main"), (None, None));
    }

    #[test]
    fn test_read_rebase_status() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let git_dir = dir.path();
        assert_eq!(read_rebase_status(git_dir)?, RebaseStatus::Absent);

        std::fs::create_dir_all(git_dir.join("rebase-apply"))?;
        std::fs::write(git_dir.join("rebase-apply").join("applying"), "")?;
        assert_eq!(read_rebase_status(git_dir)?, RebaseStatus::Absent);

        std::fs::create_dir_all(git_dir.join("rebase-merge"))?;
        std::fs::write(
            git_dir.join("rebase-merge").join("head-name"),
            "refs/heads/topic\n",
        )?;
        assert_eq!(
            read_rebase_status(git_dir)?,
            RebaseStatus::InProgress {
                original_head: "topic".to_string()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_fresh_repository() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = init_repo(dir.path()).await;
        let snapshot = GitAdapter::new("git").probe_impl(&repo).await?;
        assert_eq!(snapshot.status, RebaseStatus::Absent);
        assert_eq!(snapshot.head.name, "main");
        assert!(snapshot.head.push_remote.is_none());
        assert!(snapshot.head.upstream.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_reads_upstream() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = init_repo(dir.path()).await;
        git(dir.path(), &["remote", "add", "origin", "https://example.invalid/app.git"]);
        git(dir.path(), &["update-ref", "refs/remotes/origin/main", "HEAD"]);
        git(dir.path(), &["branch", "--set-upstream-to=origin/main", "main"]);

        let snapshot = GitAdapter::new("git").probe_impl(&repo).await?;
        let upstream = snapshot.head.upstream.expect("upstream");
        assert_eq!(upstream.to_string(), "origin/main");
        Ok(())
    }

    #[tokio::test]
    async fn test_discover_from_subdirectory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = init_repo(dir.path()).await;
        let nested = dir.path().join("src");
        std::fs::create_dir_all(&nested)?;
        let found = GitAdapter::new("git").discover(&nested).await?;
        assert_eq!(found.root, repo.root);
        assert!(found.git_dir.ends_with(".git"));
        Ok(())
    }
}

//! File handshake between `git rebase --interactive` and the host UI.
//!
//! git runs `grebase sequence-editor <todo>` as its sequence editor. That
//! helper drops a `request` file into `<git-dir>/grebase/` naming the todo
//! file, then blocks until the host answers with either a `done` marker
//! (the todo was saved) or an `abort` marker (the editor was closed without
//! saving). The helper's exit code is what git sees as the editor result.

use crate::domain::models::Repository;
use crate::domain::vcs::EditSurface;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use notify::{RecursiveMode, Watcher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const HANDOFF_ENV: &str = "GREBASE_HANDOFF_DIR";

const REQUEST: &str = "request";
const DONE: &str = "done";
const ABORT: &str = "abort";

pub fn handoff_dir(repo: &Repository) -> PathBuf {
    repo.git_dir().join("grebase")
}

/// Value for `GIT_SEQUENCE_EDITOR` that re-enters this binary in helper mode.
pub fn editor_command(exe: &Path) -> String {
    format!(
        "{} sequence-editor",
        shell_words::quote(&exe.to_string_lossy())
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub todo_path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperOutcome {
    Saved,
    Aborted,
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

fn write_marker(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let tmp = dir.join(format!("{name}.tmp"));
    std::fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, dir.join(name))
        .with_context(|| format!("Failed to publish {name} in {}", dir.display()))
}

/// Resolves once `ready` holds, re-checking whenever `dir` changes.
async fn wait_until(dir: &Path, ready: impl Fn() -> bool) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(1);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if res.is_ok() {
            let _ = tx.try_send(());
        }
    })
    .context("Failed to create handoff watcher")?;
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    // Checked after the watch starts so an earlier marker is not missed.
    while !ready() {
        if rx.recv().await.is_none() {
            return Err(anyhow!("Watcher on {} stopped", dir.display()));
        }
    }
    Ok(())
}

/// Helper side. Announces `todo` and waits for the host's answer.
pub async fn run_helper(todo: &Path, handoff: &Path) -> Result<HelperOutcome> {
    std::fs::create_dir_all(handoff)
        .with_context(|| format!("Failed to create {}", handoff.display()))?;
    remove_if_present(&handoff.join(DONE))?;
    remove_if_present(&handoff.join(ABORT))?;

    let todo = std::fs::canonicalize(todo)
        .with_context(|| format!("Failed to resolve {}", todo.display()))?;
    write_marker(handoff, REQUEST, &todo.to_string_lossy())?;
    info!(todo = %todo.display(), "Waiting for the host to edit the rebase todo");

    let (done, abort) = (handoff.join(DONE), handoff.join(ABORT));
    wait_until(handoff, || done.exists() || abort.exists()).await?;
    let outcome = if done.exists() {
        HelperOutcome::Saved
    } else {
        HelperOutcome::Aborted
    };

    remove_if_present(&handoff.join(DONE))?;
    remove_if_present(&handoff.join(ABORT))?;
    remove_if_present(&handoff.join(REQUEST))?;
    debug!(?outcome, "Sequence editor handoff finished");
    Ok(outcome)
}

/// Host side of the handshake.
pub struct SequenceEditorBridge {
    ack_timeout: Duration,
}

impl Default for SequenceEditorBridge {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl SequenceEditorBridge {
    pub fn new(ack_timeout: Duration) -> Self {
        Self { ack_timeout }
    }

    /// The todo named by an outstanding request. The todo lives in git's
    /// rebase state directory, so a request whose todo is gone was left by a
    /// helper that died with its rebase and is cleared here.
    fn live_request(&self, repo: &Repository) -> Result<Option<PathBuf>> {
        let dir = handoff_dir(repo);
        let request = dir.join(REQUEST);
        let todo_path = match std::fs::read_to_string(&request) {
            Ok(path) => PathBuf::from(path.trim()),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", request.display()))
            }
        };
        if todo_path.exists() {
            return Ok(Some(todo_path));
        }

        warn!(todo = %todo_path.display(), "Discarding stale sequence editor request");
        remove_if_present(&request)?;
        remove_if_present(&dir.join(DONE))?;
        remove_if_present(&dir.join(ABORT))?;
        Ok(None)
    }

    /// The todo git is currently waiting on, if any.
    pub fn pending(&self, repo: &Repository) -> Result<Option<PendingEdit>> {
        let Some(todo_path) = self.live_request(repo)? else {
            return Ok(None);
        };
        let contents = std::fs::read_to_string(&todo_path)
            .with_context(|| format!("Failed to read rebase todo {}", todo_path.display()))?;
        Ok(Some(PendingEdit {
            todo_path,
            contents,
        }))
    }

    /// Saves the edited todo and lets git carry on.
    pub fn complete(&self, repo: &Repository, edit: &PendingEdit, contents: &str) -> Result<()> {
        if self.live_request(repo)?.is_none() {
            return Err(anyhow!("git is no longer waiting on {}", edit.todo_path.display()));
        }
        let dir = handoff_dir(repo);
        let mut contents = contents.to_string();
        if !contents.ends_with('\n') {
            contents.push('\n');
        }
        std::fs::write(&edit.todo_path, contents)
            .with_context(|| format!("Failed to write {}", edit.todo_path.display()))?;
        write_marker(&dir, DONE, "")?;
        info!(todo = %edit.todo_path.display(), "Handed edited todo back to git");
        Ok(())
    }

    async fn close_impl(&self, repo: &Repository) -> Result<()> {
        if self.live_request(repo)?.is_none() {
            debug!(repo = %repo.root().display(), "No open edit surface to close");
            return Ok(());
        }

        let dir = handoff_dir(repo);
        let request = dir.join(REQUEST);
        write_marker(&dir, ABORT, "")?;
        info!(repo = %repo.root().display(), "Closing edit surface");

        // The helper removes the request once it has seen the marker.
        match tokio::time::timeout(self.ack_timeout, wait_until(&dir, || !request.exists())).await {
            Ok(watched) => watched,
            Err(_) => {
                warn!(repo = %repo.root().display(), "Sequence editor did not acknowledge close");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl EditSurface for SequenceEditorBridge {
    async fn close(&self, repo: &Repository) -> Result<()> {
        self.close_impl(repo).await
    }
}

use crate::domain::error::RebaseError;
use crate::domain::menu::ControlCommand;
use crate::domain::models::{EditorRedirect, GitInvocation, Repository};
use crate::domain::vcs::{CommandRunner, EditSurface, RefChooser};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub const REBASE_PROMPT: &str = "Rebase";

struct OpenEdit {
    id: u64,
    command: String,
    released: watch::Receiver<()>,
}

type OpenEdits = Arc<Mutex<HashMap<PathBuf, OpenEdit>>>;

fn lock(edits: &OpenEdits) -> MutexGuard<'_, HashMap<PathBuf, OpenEdit>> {
    edits.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Proof that an edit surface is open for one repository. Dropping it
/// removes the entry and wakes anyone waiting in `abort`.
struct EditHandle {
    edits: OpenEdits,
    key: PathBuf,
    id: u64,
    _release: watch::Sender<()>,
}

impl Drop for EditHandle {
    fn drop(&mut self) {
        let mut edits = lock(&self.edits);
        if edits.get(&self.key).is_some_and(|open| open.id == self.id) {
            edits.remove(&self.key);
        }
        debug!(repo = %self.key.display(), id = self.id, "Edit handle released");
    }
}

/// Interactive rebases that are waiting on the sequence editor, one per repository.
pub struct InteractiveRebaseSession {
    runner: Arc<dyn CommandRunner>,
    chooser: Arc<dyn RefChooser>,
    surface: Arc<dyn EditSurface>,
    edits: OpenEdits,
    next_id: AtomicU64,
    abort_grace: Duration,
}

impl InteractiveRebaseSession {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        chooser: Arc<dyn RefChooser>,
        surface: Arc<dyn EditSurface>,
        abort_grace: Duration,
    ) -> Self {
        Self {
            runner,
            chooser,
            surface,
            edits: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            abort_grace,
        }
    }

    pub fn is_open(&self, repo: &Repository) -> bool {
        lock(&self.edits).contains_key(repo.root())
    }

    /// Prompts for a target and runs `rebase --interactive` against it.
    ///
    /// Returns the chosen ref, or `None` when the prompt was cancelled and
    /// nothing was run. The future stays pending while the editor is open.
    pub async fn start(&self, repo: &Repository) -> Result<Option<String>, RebaseError> {
        self.ensure_closed(repo)?;

        let Some(target) = self.chooser.choose_ref(repo, REBASE_PROMPT).await? else {
            debug!(repo = %repo.root().display(), "Interactive rebase cancelled at ref prompt");
            return Ok(None);
        };

        let invocation = GitInvocation::new(["rebase", "--interactive", target.as_str()])
            .with_editor(EditorRedirect::sequence_editor());
        self.run_with_surface(repo, invocation).await?;
        Ok(Some(target))
    }

    /// `rebase --edit-todo` goes through the same sequence editor as `start`.
    pub async fn edit_todo(&self, repo: &Repository) -> Result<(), RebaseError> {
        self.ensure_closed(repo)?;
        let invocation = ControlCommand::EditTodo
            .invocation()
            .with_editor(EditorRedirect::sequence_editor());
        self.run_with_surface(repo, invocation).await
    }

    /// Closes the edit surface, lets the pending git process wind down, then
    /// issues `rebase --abort`. The abort is never sent while the editor is
    /// still holding the interactive process.
    pub async fn abort(&self, repo: &Repository) -> Result<(), RebaseError> {
        let pending = lock(&self.edits)
            .get(repo.root())
            .map(|open| (open.command.clone(), open.released.clone()));

        self.surface.close(repo).await?;

        if let Some((command, mut released)) = pending {
            info!(repo = %repo.root().display(), %command, "Closed open edit surface before abort");
            // Err means the handle's sender is gone, which is the release we wait for.
            if tokio::time::timeout(self.abort_grace, released.changed())
                .await
                .is_err()
            {
                warn!(
                    repo = %repo.root().display(),
                    grace_ms = self.abort_grace.as_millis() as u64,
                    "Interactive rebase did not exit after its editor was closed"
                );
            }
        }

        info!(repo = %repo.root().display(), "Aborting rebase");
        self.runner
            .run(repo, ControlCommand::Abort.invocation())
            .await?;
        Ok(())
    }

    fn ensure_closed(&self, repo: &Repository) -> Result<(), RebaseError> {
        if self.is_open(repo) {
            return Err(RebaseError::EditSessionOpen(repo.root().to_path_buf()));
        }
        Ok(())
    }

    fn open(&self, repo: &Repository, command: String) -> Result<EditHandle, RebaseError> {
        let key = repo.root().to_path_buf();
        let mut edits = lock(&self.edits);
        if edits.contains_key(&key) {
            return Err(RebaseError::EditSessionOpen(key));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = watch::channel(());
        edits.insert(
            key.clone(),
            OpenEdit {
                id,
                command,
                released: rx,
            },
        );
        debug!(repo = %key.display(), id, "Edit handle opened");

        Ok(EditHandle {
            edits: self.edits.clone(),
            key,
            id,
            _release: tx,
        })
    }

    async fn run_with_surface(
        &self,
        repo: &Repository,
        invocation: GitInvocation,
    ) -> Result<(), RebaseError> {
        let handle = self.open(repo, invocation.to_string())?;
        info!(repo = %repo.root().display(), command = %invocation, "Waiting on sequence editor");
        let result = self.runner.run(repo, invocation).await;
        drop(handle);
        result.map_err(RebaseError::from)
    }
}

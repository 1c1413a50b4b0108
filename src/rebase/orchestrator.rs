use super::session::{InteractiveRebaseSession, REBASE_PROMPT};
use crate::domain::error::RebaseError;
use crate::domain::menu::{build_menu, ControlCommand, Menu, MenuAction, MenuOptions};
use crate::domain::models::{GitInvocation, RebaseStatus, RepoSnapshot, Repository};
use crate::domain::vcs::{CommandRunner, EditSurface, RefChooser, RepositoryProbe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    Direct(String),
    Prompt,
}

/// What happened after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The ref prompt was dismissed; git was never called.
    Cancelled,
    /// A command ran; this is the rebase status probed right after it.
    Finished(RebaseStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebaseSettings {
    pub menu: MenuOptions,
    pub abort_grace: Duration,
}

impl Default for RebaseSettings {
    fn default() -> Self {
        Self {
            menu: MenuOptions::default(),
            abort_grace: Duration::from_secs(2),
        }
    }
}

pub struct RebaseOrchestrator {
    probe: Arc<dyn RepositoryProbe>,
    runner: Arc<dyn CommandRunner>,
    chooser: Arc<dyn RefChooser>,
    session: InteractiveRebaseSession,
    menu_options: MenuOptions,
}

impl RebaseOrchestrator {
    pub fn new(
        probe: Arc<dyn RepositoryProbe>,
        runner: Arc<dyn CommandRunner>,
        chooser: Arc<dyn RefChooser>,
        surface: Arc<dyn EditSurface>,
        settings: RebaseSettings,
    ) -> Self {
        let session = InteractiveRebaseSession::new(
            runner.clone(),
            chooser.clone(),
            surface,
            settings.abort_grace,
        );
        Self {
            probe,
            runner,
            chooser,
            session,
            menu_options: settings.menu,
        }
    }

    pub fn session(&self) -> &InteractiveRebaseSession {
        &self.session
    }

    pub async fn snapshot(&self, repo: &Repository) -> Result<RepoSnapshot, RebaseError> {
        Ok(self.probe.probe(repo).await?)
    }

    pub async fn present_menu(&self, repo: &Repository) -> Result<Menu, RebaseError> {
        let snapshot = self.snapshot(repo).await?;
        Ok(self.menu_for(&snapshot))
    }

    pub fn menu_for(&self, snapshot: &RepoSnapshot) -> Menu {
        build_menu(&snapshot.status, &snapshot.head, self.menu_options)
    }

    pub async fn execute(
        &self,
        repo: &Repository,
        action: &MenuAction,
    ) -> Result<Outcome, RebaseError> {
        debug!(repo = %repo.root().display(), ?action, "Executing rebase action");
        match action {
            MenuAction::OntoPushRemote(target) | MenuAction::OntoUpstream(target) => {
                self.rebase_onto(repo, RefTarget::Direct(target.clone()))
                    .await
            }
            MenuAction::OntoElsewhere => self.rebase_onto(repo, RefTarget::Prompt).await,
            MenuAction::Interactively => self.rebase_interactively(repo).await,
            MenuAction::Continue => self.control(repo, ControlCommand::Continue).await,
            MenuAction::Skip => self.control(repo, ControlCommand::Skip).await,
            MenuAction::EditTodo => self.control(repo, ControlCommand::EditTodo).await,
            MenuAction::Abort => self.control(repo, ControlCommand::Abort).await,
        }
    }

    /// `git rebase <ref>`. Failures become [`RebaseError::MergeFailed`].
    pub async fn rebase_onto(
        &self,
        repo: &Repository,
        target: RefTarget,
    ) -> Result<Outcome, RebaseError> {
        let target = match target {
            RefTarget::Direct(target) => target,
            RefTarget::Prompt => match self.chooser.choose_ref(repo, REBASE_PROMPT).await? {
                Some(target) => target,
                None => {
                    debug!(repo = %repo.root().display(), "Rebase cancelled at ref prompt");
                    return Ok(Outcome::Cancelled);
                }
            },
        };

        info!(repo = %repo.root().display(), %target, "Rebasing");
        self.runner
            .run(repo, GitInvocation::new(["rebase", target.as_str()]))
            .await
            .map_err(RebaseError::MergeFailed)?;
        self.observe(repo).await
    }

    pub async fn rebase_interactively(&self, repo: &Repository) -> Result<Outcome, RebaseError> {
        match self.session.start(repo).await? {
            Some(_) => self.observe(repo).await,
            None => Ok(Outcome::Cancelled),
        }
    }

    /// continue/skip/abort. Errors from git are returned as they are.
    pub async fn control(
        &self,
        repo: &Repository,
        command: ControlCommand,
    ) -> Result<Outcome, RebaseError> {
        match command {
            ControlCommand::Abort => self.session.abort(repo).await?,
            ControlCommand::EditTodo => self.session.edit_todo(repo).await?,
            ControlCommand::Continue | ControlCommand::Skip => {
                if self.session.is_open(repo) {
                    return Err(RebaseError::EditSessionOpen(repo.root().to_path_buf()));
                }
                info!(repo = %repo.root().display(), flag = command.flag(), "Rebase control");
                self.runner.run(repo, command.invocation()).await?;
            }
        }
        self.observe(repo).await
    }

    async fn observe(&self, repo: &Repository) -> Result<Outcome, RebaseError> {
        let snapshot = self.snapshot(repo).await?;
        debug!(repo = %repo.root().display(), status = ?snapshot.status, "Rebase status after command");
        Ok(Outcome::Finished(snapshot.status))
    }
}

use crate::app::chooser::PromptRefChooser;
use crate::app::{action::Action, command::Command};
use crate::domain::error::RebaseError;
use crate::domain::menu::{ControlCommand, MenuAction};
use crate::domain::models::{RebaseStatus, Repository};
use crate::infrastructure::sequence_editor::SequenceEditorBridge;
use crate::rebase::{Outcome, RebaseOrchestrator};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Everything the command handler needs to reach git.
#[derive(Clone)]
pub struct Services {
    pub repo: Repository,
    pub orchestrator: Arc<RebaseOrchestrator>,
    pub chooser: Arc<PromptRefChooser>,
    pub bridge: Arc<SequenceEditorBridge>,
}

pub fn handle_command(command: Command, services: &Services, tx: mpsc::Sender<Action>) -> Result<()> {
    let Services {
        repo,
        orchestrator,
        chooser,
        bridge,
    } = services.clone();

    match command {
        Command::LoadSnapshot => {
            tokio::spawn(async move {
                match orchestrator.snapshot(&repo).await {
                    Ok(snapshot) => {
                        let menu = orchestrator.menu_for(&snapshot);
                        let _ = tx
                            .send(Action::SnapshotLoaded(Box::new(snapshot), menu))
                            .await;
                    }
                    Err(e) => {
                        let _ = tx
                            .send(Action::ErrorOccurred(format!(
                                "Failed to read repository state: {}",
                                error_chain(&e)
                            )))
                            .await;
                    }
                }
            });
        }
        Command::Execute(action) => {
            tokio::spawn(async move {
                run_operation(tx, menu_start_message(&action), move || async move {
                    let outcome = orchestrator.execute(&repo, &action).await?;
                    Ok(describe_outcome(&action, &outcome))
                })
                .await;
            });
        }
        Command::StartInteractive(action) => {
            tokio::spawn(async move {
                let result = match orchestrator.execute(&repo, &action).await {
                    Ok(outcome) => Ok(describe_outcome(&action, &outcome)),
                    Err(e) => Err(error_chain(&e)),
                };
                let _ = tx.send(Action::InteractiveFinished(result)).await;
            });
        }
        Command::AnswerRefPrompt(choice) => {
            chooser.answer(choice);
        }
        Command::LoadPendingEdit => {
            tokio::spawn(async move {
                match bridge.pending(&repo) {
                    Ok(Some(pending)) => {
                        let _ = tx.send(Action::EditSurfaceOpened(pending)).await;
                    }
                    Ok(None) => debug!("Handoff directory changed with no pending request"),
                    Err(e) => {
                        let _ = tx
                            .send(Action::ErrorOccurred(format!(
                                "Failed to open rebase todo: {e:#}"
                            )))
                            .await;
                    }
                }
            });
        }
        Command::CompleteEdit(pending, contents) => {
            tokio::spawn(async move {
                if let Err(e) = bridge.complete(&repo, &pending, &contents) {
                    error!(error = %e, "Failed to hand todo back to git");
                    let _ = tx
                        .send(Action::ErrorOccurred(format!(
                            "Failed to save rebase todo: {e:#}"
                        )))
                        .await;
                }
            });
        }
        Command::AbortInteractive => {
            tokio::spawn(async move {
                run_operation(tx, "Aborting rebase...".to_string(), move || async move {
                    abort_interactive(&orchestrator, &repo).await
                })
                .await;
            });
        }
    }
    Ok(())
}

/// Once its sequence editor exits non-zero git removes `rebase-merge` on its
/// own, so the `rebase --abort` issued after closing the editor may find
/// nothing left to abort. That failure counts as aborted when the repository
/// is no longer rebasing.
async fn abort_interactive(
    orchestrator: &RebaseOrchestrator,
    repo: &Repository,
) -> Result<String, RebaseError> {
    match orchestrator.control(repo, ControlCommand::Abort).await {
        Ok(outcome) => Ok(describe_outcome(&MenuAction::Abort, &outcome)),
        Err(RebaseError::Command(e)) => {
            let snapshot = orchestrator.snapshot(repo).await?;
            if snapshot.status.is_in_progress() {
                return Err(RebaseError::Command(e));
            }
            debug!(error = %e, "git already dropped the interactive rebase");
            Ok(describe_outcome(
                &MenuAction::Abort,
                &Outcome::Finished(snapshot.status),
            ))
        }
        Err(e) => Err(e),
    }
}

pub fn menu_start_message(action: &MenuAction) -> String {
    match action {
        MenuAction::OntoPushRemote(target) | MenuAction::OntoUpstream(target) => {
            format!("Rebasing onto {target}...")
        }
        MenuAction::OntoElsewhere => "Rebasing...".to_string(),
        MenuAction::Interactively => "Interactive rebase...".to_string(),
        MenuAction::Continue => "Continuing rebase...".to_string(),
        MenuAction::Skip => "Skipping commit...".to_string(),
        MenuAction::EditTodo => "Editing rebase todo...".to_string(),
        MenuAction::Abort => "Aborting rebase...".to_string(),
    }
}

pub fn describe_outcome(action: &MenuAction, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Cancelled => "Rebase cancelled".to_string(),
        Outcome::Finished(RebaseStatus::Absent) => match action {
            MenuAction::Abort => "Rebase aborted".to_string(),
            _ => "Rebase finished".to_string(),
        },
        Outcome::Finished(RebaseStatus::InProgress { original_head }) => match action {
            MenuAction::EditTodo => "Rebase todo updated".to_string(),
            _ => format!("Rebase of {original_head} stopped; resolve and continue"),
        },
    }
}

/// Joins an error and its sources, skipping sources whose text is
/// already part of the message.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

async fn run_operation<F, Fut>(tx: mpsc::Sender<Action>, start_msg: String, action: F)
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<String, RebaseError>> + Send,
{
    let _ = tx.send(Action::OperationStarted(start_msg)).await;
    match action().await {
        Ok(msg) => {
            let _ = tx.send(Action::OperationCompleted(Ok(msg))).await;
        }
        Err(e) => {
            let _ = tx
                .send(Action::OperationCompleted(Err(error_chain(&e))))
                .await;
        }
    }
}

use crate::app::action::Action;
use crate::app::state::RefPrompt;
use crate::domain::models::Repository;
use crate::domain::vcs::{RefCatalog, RefChooser};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Routes ref prompts from the orchestrator to the TUI and waits for the
/// user's answer. Only one prompt is outstanding at a time.
pub struct PromptRefChooser {
    catalog: Arc<dyn RefCatalog>,
    tx: mpsc::Sender<Action>,
    pending: Mutex<Option<oneshot::Sender<Option<String>>>>,
}

impl PromptRefChooser {
    pub fn new(catalog: Arc<dyn RefCatalog>, tx: mpsc::Sender<Action>) -> Self {
        Self {
            catalog,
            tx,
            pending: Mutex::new(None),
        }
    }

    /// Delivers the user's choice. `None` cancels the prompt.
    pub fn answer(&self, choice: Option<String>) {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(sender) => {
                if sender.send(choice).is_err() {
                    debug!("Ref prompt answered after the requester went away");
                }
            }
            None => warn!("Ref prompt answered with no prompt outstanding"),
        }
    }
}

#[async_trait]
impl RefChooser for PromptRefChooser {
    async fn choose_ref(&self, repo: &Repository, prompt: &str) -> Result<Option<String>> {
        let candidates = match self.catalog.list_refs(repo).await {
            Ok(refs) => refs,
            Err(e) => {
                // Free-form input still works without candidates.
                warn!(error = %e, "Could not list refs for prompt");
                Vec::new()
            }
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if pending.is_some() {
                return Err(anyhow!("A ref prompt is already open"));
            }
            *pending = Some(reply_tx);
        }

        let opened = Action::RefPromptOpened(RefPrompt {
            prompt: prompt.to_string(),
            candidates,
        });
        if self.tx.send(opened).await.is_err() {
            self.pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            return Err(anyhow!("The UI is no longer running"));
        }

        // A dropped sender means the UI went away; treat it as cancelled.
        Ok(reply_rx.await.unwrap_or(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vcs::MockRefCatalog;

    fn repo() -> Repository {
        Repository::new("/work/app", "/work/app/.git")
    }

    fn catalog(refs: Vec<&'static str>) -> Arc<dyn RefCatalog> {
        let mut catalog = MockRefCatalog::new();
        catalog
            .expect_list_refs()
            .returning(move |_| Ok(refs.iter().map(|r| r.to_string()).collect()));
        Arc::new(catalog)
    }

    #[tokio::test]
    async fn test_prompt_round_trip() {
        let (tx, mut rx) = mpsc::channel(4);
        let chooser = Arc::new(PromptRefChooser::new(catalog(vec!["main", "origin/main"]), tx));

        let task = tokio::spawn({
            let chooser = chooser.clone();
            async move { chooser.choose_ref(&repo(), "Rebase").await }
        });

        match rx.recv().await {
            Some(Action::RefPromptOpened(prompt)) => {
                assert_eq!(prompt.prompt, "Rebase");
                assert_eq!(prompt.candidates, vec!["main", "origin/main"]);
            }
            other => panic!("unexpected action: {other:?}"),
        }
        chooser.answer(Some("origin/main".to_string()));
        assert_eq!(task.await.unwrap().unwrap().as_deref(), Some("origin/main"));
    }

    #[tokio::test]
    async fn test_prompt_cancelled() {
        let (tx, mut rx) = mpsc::channel(4);
        let chooser = Arc::new(PromptRefChooser::new(catalog(vec![]), tx));
        let task = tokio::spawn({
            let chooser = chooser.clone();
            async move { chooser.choose_ref(&repo(), "Rebase").await }
        });
        assert!(rx.recv().await.is_some());
        chooser.answer(None);
        assert_eq!(task.await.unwrap().unwrap(), None);
    }

    #[tokio::test]
    async fn test_catalog_failure_still_prompts() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut failing = MockRefCatalog::new();
        failing
            .expect_list_refs()
            .returning(|_| Err(anyhow!("not a git repository")));
        let chooser = Arc::new(PromptRefChooser::new(Arc::new(failing), tx));
        let task = tokio::spawn({
            let chooser = chooser.clone();
            async move { chooser.choose_ref(&repo(), "Rebase").await }
        });
        match rx.recv().await {
            Some(Action::RefPromptOpened(prompt)) => assert!(prompt.candidates.is_empty()),
            other => panic!("unexpected action: {other:?}"),
        }
        chooser.answer(Some("HEAD~2".to_string()));
        assert_eq!(task.await.unwrap().unwrap().as_deref(), Some("HEAD~2"));
    }

    #[tokio::test]
    async fn test_ui_gone_fails_prompt() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let chooser = PromptRefChooser::new(catalog(vec!["main"]), tx);
        assert!(chooser.choose_ref(&repo(), "Rebase").await.is_err());
        assert!(chooser.pending.lock().unwrap().is_none());
    }
}

use super::*;
use crate::app::action::Action;
use crate::app::chooser::PromptRefChooser;
use crate::app::command::Command;
use crate::app::state::{AppMode, AppState};
use crate::domain::error::CommandError;
use crate::domain::menu::MenuAction;
use crate::domain::models::{HeadRef, RebaseStatus, RemoteBranch, RepoSnapshot, Repository};
use crate::domain::vcs::{MockCommandRunner, MockEditSurface, MockRefCatalog, MockRepositoryProbe};
use crate::infrastructure::sequence_editor::SequenceEditorBridge;
use crate::rebase::{RebaseOrchestrator, RebaseSettings};
use crossterm::event::{Event, KeyCode, KeyModifiers};
use rand::{Rng, SeedableRng};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

fn snapshot() -> RepoSnapshot {
    RepoSnapshot {
        status: RebaseStatus::Absent,
        head: HeadRef {
            name: "topic".to_string(),
            push_remote: None,
            upstream: Some(RemoteBranch {
                remote: "origin".to_string(),
                name: "main".to_string(),
            }),
        },
    }
}

fn probe_ok() -> MockRepositoryProbe {
    let mut probe = MockRepositoryProbe::new();
    probe.expect_probe().returning(|_| Ok(snapshot()));
    probe
}

fn services(
    root: &Path,
    probe: MockRepositoryProbe,
    runner: MockCommandRunner,
    tx: mpsc::Sender<Action>,
) -> Services {
    let repo = Repository::new(root, root.join(".git"));
    let mut catalog = MockRefCatalog::new();
    catalog
        .expect_list_refs()
        .returning(|_| Ok(vec!["main".to_string(), "origin/main".to_string()]));
    let mut surface = MockEditSurface::new();
    surface.expect_close().returning(|_| Ok(()));

    let chooser = Arc::new(PromptRefChooser::new(Arc::new(catalog), tx));
    let orchestrator = RebaseOrchestrator::new(
        Arc::new(probe),
        Arc::new(runner),
        chooser.clone(),
        Arc::new(surface),
        RebaseSettings::default(),
    );
    Services {
        repo,
        orchestrator: Arc::new(orchestrator),
        chooser,
        bridge: Arc::new(SequenceEditorBridge::default()),
    }
}

#[tokio::test]
async fn test_load_snapshot_error() {
    let mut probe = MockRepositoryProbe::new();
    probe
        .expect_probe()
        .returning(|_| Err(anyhow::anyhow!("not a git repository")));
    let (tx, mut rx) = mpsc::channel(4);
    let services = services(Path::new("/work/app"), probe, MockCommandRunner::new(), tx.clone());

    handle_command(Command::LoadSnapshot, &services, tx).unwrap();

    match rx.recv().await.unwrap() {
        Action::ErrorOccurred(msg) => {
            assert!(msg.starts_with("Failed to read repository state"));
            assert!(msg.contains("not a git repository"));
        }
        other => panic!("Expected Action::ErrorOccurred, got {other:?}"),
    }
}

#[tokio::test]
async fn test_execute_rebase_onto_upstream() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|_, invocation| invocation.args == vec!["rebase", "origin/main"])
        .times(1)
        .returning(|_, _| Ok(()));
    let (tx, mut rx) = mpsc::channel(4);
    let services = services(Path::new("/work/app"), probe_ok(), runner, tx.clone());

    let action = MenuAction::OntoUpstream("origin/main".to_string());
    handle_command(Command::Execute(action), &services, tx).unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        Action::OperationStarted("Rebasing onto origin/main...".to_string())
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        Action::OperationCompleted(Ok("Rebase finished".to_string()))
    );
}

#[tokio::test]
async fn test_full_command_error_to_state() {
    let mut runner = MockCommandRunner::new();
    runner.expect_run().returning(|_, invocation| {
        Err(CommandError::Failed {
            command: invocation.to_string(),
            code: Some(1),
            stderr: "CONFLICT (content): Merge conflict in README".to_string(),
        })
    });
    let (tx, mut rx) = mpsc::channel(4);
    let services = services(Path::new("/work/app"), probe_ok(), runner, tx.clone());
    let mut state = AppState::new("app");

    handle_command(
        Command::Execute(MenuAction::OntoUpstream("origin/main".to_string())),
        &services,
        tx,
    )
    .unwrap();

    // 1. First action: OperationStarted
    let action1 = rx.recv().await.unwrap();
    crate::app::reducer::update(&mut state, action1);
    assert_eq!(state.mode, AppMode::Loading);

    // 2. Second action: OperationCompleted(Err)
    let action2 = rx.recv().await.unwrap();
    let cmd = crate::app::reducer::update(&mut state, action2);
    assert_eq!(cmd, Some(Command::LoadSnapshot));
    assert_eq!(state.mode, AppMode::Menu);
    let error = state.last_error.as_ref().unwrap();
    assert!(error.message.starts_with("Failed to merge in the changes."));
    assert!(error.message.contains("Merge conflict in README"));
    assert!(!error.suggestions.is_empty());
}

#[tokio::test]
async fn test_elsewhere_prompts_through_ui() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|_, invocation| invocation.args == vec!["rebase", "main"])
        .times(1)
        .returning(|_, _| Ok(()));
    let (tx, mut rx) = mpsc::channel(4);
    let services = services(Path::new("/work/app"), probe_ok(), runner, tx.clone());

    handle_command(Command::Execute(MenuAction::OntoElsewhere), &services, tx.clone()).unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        Action::OperationStarted("Rebasing...".to_string())
    );
    match rx.recv().await.unwrap() {
        Action::RefPromptOpened(prompt) => {
            assert_eq!(prompt.prompt, "Rebase");
            assert_eq!(prompt.candidates, vec!["main", "origin/main"]);
        }
        other => panic!("Expected Action::RefPromptOpened, got {other:?}"),
    }

    handle_command(
        Command::AnswerRefPrompt(Some("main".to_string())),
        &services,
        tx,
    )
    .unwrap();
    assert_eq!(
        rx.recv().await.unwrap(),
        Action::OperationCompleted(Ok("Rebase finished".to_string()))
    );
}

#[tokio::test]
async fn test_pending_edit_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let handoff = dir.path().join(".git").join("grebase");
    std::fs::create_dir_all(&handoff).unwrap();
    let todo = dir.path().join(".git").join("git-rebase-todo");
    std::fs::write(&todo, "pick a1b2c3 first\n").unwrap();
    std::fs::write(handoff.join("request"), todo.to_string_lossy().as_bytes()).unwrap();

    let (tx, mut rx) = mpsc::channel(4);
    let services = services(dir.path(), probe_ok(), MockCommandRunner::new(), tx.clone());

    handle_command(Command::LoadPendingEdit, &services, tx.clone()).unwrap();
    let pending = match rx.recv().await.unwrap() {
        Action::EditSurfaceOpened(pending) => pending,
        other => panic!("Expected Action::EditSurfaceOpened, got {other:?}"),
    };
    assert_eq!(pending.contents, "pick a1b2c3 first\n");

    handle_command(
        Command::CompleteEdit(pending, "drop a1b2c3 first".to_string()),
        &services,
        tx,
    )
    .unwrap();

    // The write happens on a task; wait for the marker
    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while !handoff.join("done").exists() {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(std::fs::read_to_string(&todo).unwrap(), "drop a1b2c3 first\n");
}

#[tokio::test]
async fn test_keystroke_fuzzing() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = MockCommandRunner::new();
    runner.expect_run().returning(|_, _| Ok(()));

    let (action_tx, action_rx) = mpsc::channel(100);
    let services = services(dir.path(), probe_ok(), runner, action_tx.clone());
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let app_state = AppState::new("fuzz");

    let (event_tx, event_rx) = mpsc::channel(100);

    // Spawn a task to feed random events
    let fuzzer_handle = tokio::spawn(async move {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..10000 {
            let event = match rng.gen_range(0..100) {
                0..=5 => {
                    let w = rng.gen_range(10..200);
                    let h = rng.gen_range(10..100);
                    Event::Resize(w, h)
                }
                _ => generate_random_key(&mut rng),
            };
            if event_tx.send(Ok(event)).await.is_err() {
                break;
            }
            // Yield to allow the loop to process events
            if rng.gen_bool(0.1) {
                tokio::task::yield_now().await;
            }
        }
        // Ctrl+C quits from every mode
        let _ = event_tx
            .send(Ok(Event::Key(crossterm::event::KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))))
            .await;
    });

    // Run the real loop (with a test backend)
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(30),
        run_loop_with_events(
            &mut terminal,
            app_state,
            services,
            action_tx,
            action_rx,
            event_rx,
        ),
    )
    .await;

    match result {
        Ok(res) => res.unwrap(),
        Err(_) => panic!("Fuzzer timed out - possible deadlock or too slow"),
    }

    fuzzer_handle.await.unwrap();
}

fn generate_random_key<R: Rng>(rng: &mut R) -> Event {
    use crossterm::event::KeyEvent;
    let code = match rng.gen_range(0..20) {
        0 => KeyCode::Esc,
        1 => KeyCode::Enter,
        2 => KeyCode::Left,
        3 => KeyCode::Right,
        4 => KeyCode::Up,
        5 => KeyCode::Down,
        6 => KeyCode::Home,
        7 => KeyCode::End,
        8 => KeyCode::PageUp,
        9 => KeyCode::PageDown,
        10 => KeyCode::Tab,
        11 => KeyCode::BackTab,
        12 => KeyCode::Delete,
        13 => KeyCode::Backspace,
        _ => {
            let c = rng.gen_range(b' '..=b'~') as char;
            KeyCode::Char(c)
        }
    };

    let mut modifiers = KeyModifiers::empty();
    if rng.gen_bool(0.1) {
        modifiers.insert(KeyModifiers::CONTROL);
    }
    if rng.gen_bool(0.1) {
        modifiers.insert(KeyModifiers::ALT);
    }
    if rng.gen_bool(0.1) {
        modifiers.insert(KeyModifiers::SHIFT);
    }

    Event::Key(KeyEvent::new(code, modifiers))
}

fn abort_finds_nothing() -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|_, invocation| invocation.args == vec!["rebase", "--abort"])
        .times(1)
        .returning(|_, invocation| {
            Err(CommandError::Failed {
                command: invocation.to_string(),
                code: Some(128),
                stderr: "fatal: No rebase in progress?".to_string(),
            })
        });
    runner
}

#[tokio::test]
async fn test_interactive_abort_after_git_cleaned_up_is_not_an_error() {
    let (tx, mut rx) = mpsc::channel(8);
    let services = services(Path::new("/work/app"), probe_ok(), abort_finds_nothing(), tx.clone());
    let mut state = AppState::new("app");
    state.interactive_running = true;
    state.mode = AppMode::Loading;

    let cmd = crate::app::reducer::update(&mut state, Action::AbortInteractive);
    assert_eq!(cmd, Some(Command::AbortInteractive));
    handle_command(Command::AbortInteractive, &services, tx).unwrap();

    let started = rx.recv().await.unwrap();
    assert_eq!(started, Action::OperationStarted("Aborting rebase...".to_string()));
    crate::app::reducer::update(&mut state, started);

    let completed = rx.recv().await.unwrap();
    assert_eq!(
        completed,
        Action::OperationCompleted(Ok("Rebase aborted".to_string()))
    );
    crate::app::reducer::update(&mut state, completed);
    assert!(state.last_error.is_none());
    assert_eq!(state.status_message.as_deref(), Some("Rebase aborted"));

    // The interrupted interactive run reports its own failure afterwards
    crate::app::reducer::update(
        &mut state,
        Action::InteractiveFinished(Err("There was a problem with the editor".to_string())),
    );
    assert!(state.last_error.is_none());
    assert_eq!(state.mode, AppMode::Menu);
}

#[tokio::test]
async fn test_interactive_abort_failure_while_still_rebasing_is_reported() {
    let mut probe = MockRepositoryProbe::new();
    probe.expect_probe().returning(|_| {
        Ok(RepoSnapshot {
            status: RebaseStatus::InProgress {
                original_head: "topic".to_string(),
            },
            ..snapshot()
        })
    });
    let (tx, mut rx) = mpsc::channel(8);
    let services = services(Path::new("/work/app"), probe, abort_finds_nothing(), tx.clone());

    handle_command(Command::AbortInteractive, &services, tx).unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        Action::OperationStarted("Aborting rebase...".to_string())
    );
    match rx.recv().await.unwrap() {
        Action::OperationCompleted(Err(msg)) => assert!(msg.contains("No rebase in progress")),
        other => panic!("Expected Action::OperationCompleted(Err), got {other:?}"),
    }
}

use crate::domain::models::{GitInvocation, HeadRef, RebaseStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    OntoPushRemote(String),
    OntoUpstream(String),
    OntoElsewhere,
    Interactively,
    Continue,
    Skip,
    EditTodo,
    Abort,
}

/// Commands that act on a rebase that is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Continue,
    Skip,
    EditTodo,
    Abort,
}

impl ControlCommand {
    pub fn flag(self) -> &'static str {
        match self {
            ControlCommand::Continue => "--continue",
            ControlCommand::Skip => "--skip",
            ControlCommand::EditTodo => "--edit-todo",
            ControlCommand::Abort => "--abort",
        }
    }

    pub fn invocation(self) -> GitInvocation {
        GitInvocation::new(["rebase", self.flag()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: char,
    pub description: String,
    pub action: MenuAction,
}

impl MenuItem {
    fn new(key: char, description: impl Into<String>, action: MenuAction) -> Self {
        Self {
            key,
            description: description.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn item_for_key(&self, key: char) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.key == key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuOptions {
    pub enable_edit_todo: bool,
}

pub fn build_menu(status: &RebaseStatus, head: &HeadRef, options: MenuOptions) -> Menu {
    match status {
        RebaseStatus::InProgress { .. } => control_menu(options),
        RebaseStatus::Absent => initiation_menu(head),
    }
}

fn control_menu(options: MenuOptions) -> Menu {
    let mut items = vec![
        MenuItem::new('r', "Continue", MenuAction::Continue),
        MenuItem::new('s', "Skip", MenuAction::Skip),
    ];
    if options.enable_edit_todo {
        items.push(MenuItem::new('e', "Edit", MenuAction::EditTodo));
    }
    items.push(MenuItem::new('a', "Abort", MenuAction::Abort));

    Menu {
        title: "Rebasing".to_string(),
        items,
    }
}

// Order matters: push, upstream, elsewhere, interactively.
fn initiation_menu(head: &HeadRef) -> Menu {
    let mut items = Vec::with_capacity(4);

    if let Some(push) = &head.push_remote {
        let target = push.to_string();
        items.push(MenuItem::new(
            'p',
            format!("onto {target}"),
            MenuAction::OntoPushRemote(target),
        ));
    }

    if let Some(upstream) = &head.upstream {
        let target = upstream.to_string();
        items.push(MenuItem::new(
            'u',
            format!("onto {target}"),
            MenuAction::OntoUpstream(target),
        ));
    }

    items.push(MenuItem::new('e', "onto elsewhere", MenuAction::OntoElsewhere));
    items.push(MenuItem::new('i', "interactively", MenuAction::Interactively));

    Menu {
        title: format!("Rebasing {}", head.name),
        items,
    }
}

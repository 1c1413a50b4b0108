use std::fmt;
use std::path::{Path, PathBuf};

/// A git working copy the tool operates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub root: PathBuf,
    pub git_dir: PathBuf,
}

impl Repository {
    pub fn new(root: impl Into<PathBuf>, git_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            git_dir: git_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseStatus {
    Absent,
    InProgress { original_head: String },
}

impl RebaseStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, RebaseStatus::InProgress { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote: String,
    pub name: String,
}

impl fmt::Display for RemoteBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadRef {
    pub name: String,
    pub push_remote: Option<RemoteBranch>,
    pub upstream: Option<RemoteBranch>,
}

/// What the probe saw on disk at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSnapshot {
    pub status: RebaseStatus,
    pub head: HeadRef,
}

/// Editor override handed to git for the duration of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRedirect {
    pub variable: String,
}

impl EditorRedirect {
    pub fn sequence_editor() -> Self {
        Self {
            variable: "GIT_SEQUENCE_EDITOR".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInvocation {
    pub args: Vec<String>,
    pub editor: Option<EditorRedirect>,
}

impl GitInvocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            editor: None,
        }
    }

    pub fn with_editor(mut self, editor: EditorRedirect) -> Self {
        self.editor = Some(editor);
        self
    }
}

impl fmt::Display for GitInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

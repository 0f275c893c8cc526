use crate::agent::Agent;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A single invertible filesystem command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Move { src: PathBuf, dest: PathBuf },
    CreateDir { path: PathBuf },
    RemoveDir { path: PathBuf },
}

impl Operation {
    pub fn move_path(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self::Move {
            src: src.into(),
            dest: dest.into(),
        }
    }

    pub fn create_dir(path: impl Into<PathBuf>) -> Self {
        Self::CreateDir { path: path.into() }
    }

    pub fn remove_dir(path: impl Into<PathBuf>) -> Self {
        Self::RemoveDir { path: path.into() }
    }

    /// Run this operation through `agent`.
    pub fn apply<A: Agent + ?Sized>(&self, agent: &mut A) -> io::Result<()> {
        match self {
            Self::Move { src, dest } => agent.move_path(src, dest),
            Self::CreateDir { path } => agent.create_dir(path),
            Self::RemoveDir { path } => agent.remove_dir(path),
        }
    }

    /// The operation that undoes this one.
    pub fn invert(&self) -> Self {
        match self {
            Self::Move { src, dest } => Self::Move {
                src: dest.clone(),
                dest: src.clone(),
            },
            Self::CreateDir { path } => Self::RemoveDir { path: path.clone() },
            Self::RemoveDir { path } => Self::CreateDir { path: path.clone() },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { src, dest } => write!(f, "mv {} {}", quote(src), quote(dest)),
            Self::CreateDir { path } => write!(f, "mkdir {}", quote(path)),
            Self::RemoveDir { path } => write!(f, "rmdir {}", quote(path)),
        }
    }
}

/// Quote a path so it can be pasted into a POSIX shell as a single word.
pub fn quote(path: &Path) -> Cow<'_, str> {
    let text = path.to_string_lossy();

    if text.is_empty() {
        return Cow::Borrowed("''");
    }

    let is_safe = text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if is_safe {
        return text;
    }

    // Close the quote, emit an escaped-by-double-quotes ', reopen
    Cow::Owned(format!("'{}'", text.replace('\'', r#"'"'"'"#)))
}

use anyhow::{Context, Result};
use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// How to turn a search/replace pair into a path mapping.
#[derive(Debug, Clone, Default)]
pub struct MapperOptions {
    pub search: String,
    pub replace: String,
    /// Match `search` as plain text and insert `replace` verbatim
    pub literal: bool,
    pub ignore_case: bool,
    /// Only substitute within the final path component
    pub basename: bool,
}

/// Compiled search/replace applied to paths.
#[derive(Debug, Clone)]
pub struct PathMapper {
    regex: Regex,
    replace: String,
    literal: bool,
    basename: bool,
}

/// Compile the search pattern, escaping it first in literal mode.
pub fn make_pattern(search: &str, literal: bool, ignore_case: bool) -> Result<Regex> {
    let pattern: Cow<'_, str> = if literal {
        Cow::Owned(regex::escape(search))
    } else {
        Cow::Borrowed(search)
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(ignore_case)
        .build()
        .with_context(|| format!("Invalid search pattern: {}", search))
}

impl PathMapper {
    pub fn new(options: &MapperOptions) -> Result<Self> {
        Ok(Self {
            regex: make_pattern(&options.search, options.literal, options.ignore_case)?,
            replace: options.replace.clone(),
            literal: options.literal,
            basename: options.basename,
        })
    }

    /// The path `path` should be renamed to. Unchanged when nothing matches.
    pub fn map_path(&self, path: &Path) -> PathBuf {
        if self.basename {
            self.resub_basename(path)
        } else {
            self.resub_path(path)
        }
    }

    /// Substitute across the whole path, separators included.
    pub fn resub_path(&self, path: &Path) -> PathBuf {
        match path.to_str() {
            Some(text) => PathBuf::from(self.substitute(text).into_owned()),
            None => {
                tracing::warn!("Skipping non UTF-8 path: {}", path.display());
                path.to_path_buf()
            },
        }
    }

    /// Substitute within the file name only; the parent is kept as is.
    pub fn resub_basename(&self, path: &Path) -> PathBuf {
        let Some(name) = path.file_name() else {
            return path.to_path_buf();
        };
        let Some(name) = name.to_str() else {
            tracing::warn!("Skipping non UTF-8 path: {}", path.display());
            return path.to_path_buf();
        };

        match self.substitute(name) {
            Cow::Borrowed(_) => path.to_path_buf(),
            Cow::Owned(new_name) => path.with_file_name(new_name),
        }
    }

    fn substitute<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.literal {
            self.regex.replace_all(text, NoExpand(&self.replace))
        } else {
            self.regex.replace_all(text, self.replace.as_str())
        }
    }
}

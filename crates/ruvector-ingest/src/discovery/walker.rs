//! Directory walker producing file references for ingestion

use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};
use crate::types::FileReference;

/// Ignore files looked up in the root, first match wins
const IGNORE_FILES: [&str; 2] = [".serveignore", ".gitignore"];

/// A compiled gitignore-style pattern
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    source: String,
    regex: Regex,
    dir_only: bool,
    anchored: bool,
}

impl IgnorePattern {
    /// Compile a pattern. Blank lines, comments and negations yield `None`.
    pub fn parse(pattern: &str) -> Result<Option<Self>> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        if trimmed.starts_with('!') {
            tracing::debug!("Negated ignore pattern not supported: {}", trimmed);
            return Ok(None);
        }

        let dir_only = trimmed.ends_with('/');
        let body = trimmed.trim_end_matches('/');
        let anchored = body.contains('/');
        let body = body.trim_start_matches('/');
        if body.is_empty() {
            return Ok(None);
        }

        let regex = Regex::new(&glob_to_regex(body))
            .map_err(|e| Error::config(format!("invalid ignore pattern '{}': {}", trimmed, e)))?;

        Ok(Some(Self {
            source: trimmed.to_string(),
            regex,
            dir_only,
            anchored,
        }))
    }

    /// Pattern as written in the ignore file or config
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether an entry with `relative` path matches
    pub fn matches(&self, relative: &Path, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        if self.anchored {
            return self.regex.is_match(&to_slash(relative));
        }
        relative
            .file_name()
            .map(|name| self.regex.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = glob.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Recursive directory walker
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: PathBuf,
    required_exts: Vec<String>,
    ignore: Vec<IgnorePattern>,
}

impl DirectoryWalker {
    /// Create a walker rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            required_exts: Vec::new(),
            ignore: Vec::new(),
        }
    }

    /// Build a walker from discovery configuration
    pub fn from_config(root: impl Into<PathBuf>, config: &DiscoveryConfig) -> Result<Self> {
        let mut walker = Self::new(root)
            .required_exts(config.required_exts.iter().cloned())
            .ignore_patterns(config.ignore_patterns.iter().map(String::as_str))?;
        if config.use_ignore_files {
            walker = walker.load_ignore_file()?;
        }
        Ok(walker)
    }

    /// Keep only files whose name ends with one of `exts`
    pub fn required_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_exts.extend(exts.into_iter().map(Into::into));
        self
    }

    /// Add gitignore-style ignore patterns
    pub fn ignore_patterns<'a, I>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for pattern in patterns {
            if let Some(compiled) = IgnorePattern::parse(pattern)? {
                self.ignore.push(compiled);
            }
        }
        Ok(self)
    }

    /// Add patterns from `.serveignore`, or `.gitignore` when there is none
    pub fn load_ignore_file(self) -> Result<Self> {
        for name in IGNORE_FILES {
            let path = self.root.join(name);
            if path.is_file() {
                let contents = std::fs::read_to_string(&path)?;
                tracing::debug!("Loaded ignore patterns from {}", path.display());
                return self.ignore_patterns(contents.lines());
            }
        }
        Ok(self)
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        self.ignore.iter().any(|p| p.matches(relative, is_dir))
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let is_dir = entry.file_type().is_dir();
        if is_dir && entry.file_name().to_string_lossy().starts_with('.') {
            return false;
        }
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        !self.is_ignored(relative, is_dir)
    }

    fn has_required_ext(&self, name: &str) -> bool {
        self.required_exts.is_empty() || self.required_exts.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Walk the tree and return file references sorted by relative path
    pub fn walk(&self) -> Result<Vec<FileReference>> {
        let root_meta = std::fs::metadata(&self.root)?;
        if !root_meta.is_dir() {
            return Err(Error::config(format!("{} is not a directory", self.root.display())));
        }

        let mut files = Vec::new();
        let entries = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.keep_entry(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.has_required_ext(&entry.file_name().to_string_lossy()) {
                continue;
            }

            let modified = match entry.metadata().map_err(Error::from).and_then(|m| Ok(m.modified()?)) {
                Ok(modified) => DateTime::<Utc>::from(modified),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();
            files.push(FileReference::new(entry.path(), relative, modified));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::info!("Discovered {} files under {}", files.len(), self.root.display());
        Ok(files)
    }
}

//! Exclusion list value object
//!
//! Loads `.deployignore` patterns (gitignore semantics) and always adds the
//! built-in protected paths. Every transfer mechanism consults this one
//! matcher; a matching path is never pushed.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the project-local exclusion file
pub const DEFAULT_IGNORE_FILE: &str = ".deployignore";

/// Paths excluded regardless of the ignore file.
///
/// `static/` holds user-uploaded media on the remote host.
pub const BUILTIN_EXCLUSIONS: &[&str] = &["static/", ".deploy/", ".git/"];

/// Maximum file size for `.deployignore` (64KB)
const MAX_FILE_SIZE: u64 = 65536;

/// Maximum number of patterns allowed
const MAX_PATTERNS: usize = 1000;

#[derive(Debug, Clone)]
pub struct ExclusionList {
    matcher: Gitignore,
    builtin: Gitignore,
    patterns: Vec<String>,
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::builtin_only()
    }
}

impl ExclusionList {
    /// Only the built-in protected paths.
    pub fn builtin_only() -> Self {
        Self {
            matcher: Gitignore::empty(),
            builtin: build_builtin(),
            patterns: Vec::new(),
        }
    }

    /// Load patterns from `<project_root>/<file_name>`.
    ///
    /// Returns the built-in list if the file doesn't exist.
    pub fn load(project_root: &Path, file_name: &str) -> Result<Self, ExclusionError> {
        let ignore_path = project_root.join(file_name);

        if !ignore_path.exists() {
            return Ok(Self::builtin_only());
        }

        let metadata = fs::metadata(&ignore_path).map_err(ExclusionError::Io)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(ExclusionError::FileTooLarge {
                path: ignore_path,
                size: metadata.len(),
                limit: MAX_FILE_SIZE,
            });
        }

        let content = fs::read_to_string(&ignore_path).map_err(ExclusionError::Io)?;
        Self::from_content(project_root, &ignore_path, &content)
    }

    /// Parse patterns from string content.
    pub fn from_content(
        root: &Path,
        source_path: &Path,
        content: &str,
    ) -> Result<Self, ExclusionError> {
        let mut builder = GitignoreBuilder::new(root);
        let mut patterns = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if patterns.len() == MAX_PATTERNS {
                return Err(ExclusionError::TooManyPatterns {
                    path: source_path.to_path_buf(),
                    count: patterns.len() + 1,
                    limit: MAX_PATTERNS,
                });
            }

            if let Err(e) = builder.add_line(Some(source_path.to_path_buf()), line) {
                return Err(ExclusionError::InvalidPattern {
                    path: source_path.to_path_buf(),
                    line: line_num + 1,
                    pattern: line.to_string(),
                    message: e.to_string(),
                });
            }
            patterns.push(trimmed.to_string());
        }

        let matcher = builder
            .build()
            .map_err(|e| ExclusionError::BuildFailed(e.to_string()))?;

        Ok(Self {
            matcher,
            builtin: build_builtin(),
            patterns,
        })
    }

    /// Check if a project-relative path must never be transferred.
    ///
    /// Built-in exclusions cannot be re-included by a `!pattern` line.
    pub fn is_excluded(&self, rel_path: &Path, is_dir: bool) -> bool {
        let rel_path = rel_path.strip_prefix("./").unwrap_or(rel_path);
        if rel_path.as_os_str().is_empty() {
            return false;
        }
        self.builtin
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
            || self
                .matcher
                .matched_path_or_any_parents(rel_path, is_dir)
                .is_ignore()
    }

    /// Patterns read from the ignore file (built-ins not included).
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

fn build_builtin() -> Gitignore {
    let mut builder = GitignoreBuilder::new("");
    for pattern in BUILTIN_EXCLUSIONS {
        // Patterns are compile-time constants; a failure here would surface in tests.
        let _ = builder.add_line(None, pattern);
    }
    builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Errors that can occur when loading the exclusion list.
#[derive(Debug)]
pub enum ExclusionError {
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },
    TooManyPatterns {
        path: PathBuf,
        count: usize,
        limit: usize,
    },
    InvalidPattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        message: String,
    },
    BuildFailed(String),
    Io(std::io::Error),
}

impl fmt::Display for ExclusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooLarge { path, size, limit } => {
                write!(
                    f,
                    "{} exceeds {}KB limit ({} bytes)",
                    path.display(),
                    limit / 1024,
                    size
                )
            }
            Self::TooManyPatterns { path, count, limit } => {
                write!(
                    f,
                    "{} has {} patterns, exceeds {} limit",
                    path.display(),
                    count,
                    limit
                )
            }
            Self::InvalidPattern {
                path,
                line,
                pattern,
                message,
            } => {
                write!(
                    f,
                    "Invalid pattern at {}:{}: '{}' - {}",
                    path.display(),
                    line,
                    pattern,
                    message
                )
            }
            Self::BuildFailed(msg) => write!(f, "Failed to build exclusion matcher: {}", msg),
            Self::Io(e) => write!(f, "IO error reading exclusion file: {}", e),
        }
    }
}

impl std::error::Error for ExclusionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

//! Route pattern matching.
//!
//! # Responsibilities
//! - Compose the effective pattern (optional base-path group + route pattern)
//! - Anchor it to the whole path
//! - Extract captured groups as positional arguments
//!
//! # Design Decisions
//! - Path matching is case-sensitive; patterns carry their own flags
//! - Compiled regexes are cached per effective pattern
//! - A pattern that fails to compile never matches and is logged once
//! - Regex size is capped to bound memory per pattern

use dashmap::DashMap;
use regex::{Regex, RegexBuilder};

use crate::error::{RouterError, RouterResult};

/// Maximum compiled size for a single effective pattern.
const MAX_PATTERN_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Mount point prepended to every route pattern during one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePath<'a>(Option<&'a str>);

impl<'a> BasePath<'a> {
    /// `""` and `"/"` mean "no prefix".
    pub fn new(base_path: &'a str) -> Self {
        if base_path.is_empty() || base_path == "/" {
            Self(None)
        } else {
            Self(Some(base_path))
        }
    }

    pub fn is_prefixed(&self) -> bool {
        self.0.is_some()
    }

    /// Full anchored regex source for `pattern` under this base path.
    pub fn effective_pattern(&self, pattern: &str) -> String {
        match self.0 {
            Some(base) => format!("^(?:({}){})$", base, pattern),
            None => format!("^(?:{})$", pattern),
        }
    }
}

/// Compile an effective pattern with the size cap applied.
pub fn compile(source: &str) -> RouterResult<Regex> {
    RegexBuilder::new(source)
        .size_limit(MAX_PATTERN_REGEX_SIZE)
        .build()
        .map_err(|source_err| RouterError::InvalidPattern {
            pattern: source.to_string(),
            source: source_err,
        })
}

/// Cache of compiled effective patterns. `None` marks a pattern that failed
/// to compile.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: DashMap<String, Option<Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached effective patterns (valid or not).
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    fn regex(&self, source: String) -> Option<Regex> {
        if let Some(entry) = self.compiled.get(&source) {
            return entry.value().clone();
        }

        let compiled = match compile(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(
                    pattern = %source,
                    error = %e,
                    "Route pattern failed to compile; treating as non-match"
                );
                None
            }
        };
        self.compiled.entry(source).or_insert(compiled).value().clone()
    }

    /// Match `path` against `pattern` under `base`.
    ///
    /// Returns the captured groups (base-path group included) or `None` when
    /// the path does not match.
    pub fn captures(&self, pattern: &str, base: BasePath<'_>, path: &str) -> Option<Vec<String>> {
        let regex = self.regex(base.effective_pattern(pattern))?;
        let caps = regex.captures(path)?;

        let mut groups: Vec<Option<&str>> =
            caps.iter().skip(1).map(|m| m.map(|m| m.as_str())).collect();
        // Trailing groups that took no part in the match are not arguments.
        while matches!(groups.last(), Some(None)) {
            groups.pop();
        }

        Some(
            groups
                .into_iter()
                .map(|g| g.unwrap_or_default().to_string())
                .collect(),
        )
    }
}

// Filename pattern classification
// A pattern is inspected once and reduced to one of four comparison modes

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use super::error::SearchError;

/// Which part of a file name is compared against the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// `*.*` - skip comparison, every file matches
    MatchAll,
    /// `*.ext` - compare extensions
    Extension,
    /// `name.*` - compare base names
    BaseName,
    /// anything else - the whole name must be equal
    FullName,
}

/// Where a file name is split into base name and extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DotRule {
    /// `archive.tar.gz` -> `archive` + `tar.gz`
    #[default]
    First,
    /// `archive.tar.gz` -> `archive.tar` + `gz`
    Last,
}

impl DotRule {
    fn dot_index(self, name: &str) -> Option<usize> {
        match self {
            DotRule::First => name.find('.'),
            DotRule::Last => name.rfind('.'),
        }
    }

    /// Extension of `name`, `None` when the name has no dot at all
    ///
    /// A trailing dot yields `Some("")`.
    pub fn extension(self, name: &str) -> Option<&str> {
        self.dot_index(name).map(|i| &name[i + 1..])
    }

    /// Base name of `name`; the whole name when there is no dot
    pub fn base_name(self, name: &str) -> &str {
        match self.dot_index(name) {
            Some(i) => &name[..i],
            None => name,
        }
    }
}

/// A classified filename pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    text: String,
    mode: PatternMode,
    operand: String,
    dot_rule: DotRule,
}

impl Pattern {
    /// Classify a pattern using the default dot rule
    ///
    /// # Errors
    /// Returns `InvalidPattern` for patterns shorter than two characters
    pub fn parse(text: &str) -> Result<Self, SearchError> {
        Self::with_dot_rule(text, DotRule::default())
    }

    /// Classify a pattern, splitting candidate names with `dot_rule`
    ///
    /// Checks run in a fixed order: `*.` followed by `*` is match-all, any
    /// other `*.` prefix is an extension match, a `.*` suffix is a base name
    /// match, everything else must match the whole name.
    pub fn with_dot_rule(text: &str, dot_rule: DotRule) -> Result<Self, SearchError> {
        if text.chars().count() < 2 {
            return Err(SearchError::InvalidPattern {
                pattern: text.to_string(),
                reason: "pattern must be at least 2 characters long".to_string(),
            });
        }

        let (mode, operand) = if let Some(rest) = text.strip_prefix("*.") {
            if rest.starts_with('*') {
                (PatternMode::MatchAll, String::new())
            } else {
                (PatternMode::Extension, rest.to_string())
            }
        } else if let Some(stem) = text.strip_suffix(".*") {
            (PatternMode::BaseName, stem.to_string())
        } else {
            (PatternMode::FullName, text.to_string())
        };

        Ok(Self {
            text: text.to_string(),
            mode,
            operand,
            dot_rule,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    pub fn dot_rule(&self) -> DotRule {
        self.dot_rule
    }

    /// The substring the mode compares against (empty for match-all)
    pub fn operand(&self) -> &str {
        &self.operand
    }

    /// Check a bare file name (no directory part) against the pattern
    pub fn matches(&self, file_name: &str) -> bool {
        match self.mode {
            PatternMode::MatchAll => true,
            PatternMode::FullName => file_name == self.operand,
            PatternMode::Extension => self.dot_rule.extension(file_name) == Some(self.operand.as_str()),
            PatternMode::BaseName => self.dot_rule.base_name(file_name) == self.operand,
        }
    }

    /// Check a raw OS file name against the pattern
    ///
    /// Match-all accepts any name. Every other mode compares text, so a name
    /// that is not valid UTF-8 never matches.
    pub fn matches_os(&self, file_name: &OsStr) -> bool {
        match (self.mode, file_name.to_str()) {
            (PatternMode::MatchAll, _) => true,
            (_, Some(name)) => self.matches(name),
            (_, None) => false,
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for Pattern {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

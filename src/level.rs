//! Help level selection

use std::fmt;
use thiserror::Error;

/// Rejected help level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid help level {0} (expected 1, 2 or 3)")]
pub struct InvalidLevel(pub u8);

/// How direct the tutor's hint may be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum HelpLevel {
    /// Light clue
    Light,
    /// Method: an approach or a notion to revisit
    #[default]
    Method,
    /// Diagnostic: points at a probable error or a test to run
    Diagnostic,
}

impl HelpLevel {
    pub const ALL: [HelpLevel; 3] = [HelpLevel::Light, HelpLevel::Method, HelpLevel::Diagnostic];

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            HelpLevel::Light => 1,
            HelpLevel::Method => 2,
            HelpLevel::Diagnostic => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HelpLevel::Light => "Indice léger",
            HelpLevel::Method => "Méthode",
            HelpLevel::Diagnostic => "Diagnostic",
        }
    }
}

impl TryFrom<u8> for HelpLevel {
    type Error = InvalidLevel;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(HelpLevel::Light),
            2 => Ok(HelpLevel::Method),
            3 => Ok(HelpLevel::Diagnostic),
            other => Err(InvalidLevel(other)),
        }
    }
}

impl fmt::Display for HelpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.number(), self.label())
    }
}

/// Holds the active help level
#[derive(Debug, Clone, Default)]
pub struct LevelSelector {
    current: HelpLevel,
}

impl LevelSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate then store.
    ///
    /// # Errors
    ///
    /// [`InvalidLevel`] when `n` is not 1, 2 or 3; the previous level is kept.
    pub fn set_level(&mut self, n: u8) -> Result<HelpLevel, InvalidLevel> {
        let level = HelpLevel::try_from(n)?;
        self.current = level;
        Ok(level)
    }

    pub fn select(&mut self, level: HelpLevel) {
        self.current = level;
    }

    #[must_use]
    pub fn current_level(&self) -> HelpLevel {
        self.current
    }
}

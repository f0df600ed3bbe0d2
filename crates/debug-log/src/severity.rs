//! Severities and the threshold they are compared against.

use std::fmt;
use std::str::FromStr;

/// The severity of a log message.
///
/// Ordered by rank: `Error < Warning < Info`. A lower rank is a higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
  /// Something went wrong. Logged at every threshold from `Error` up.
  Error,
  /// Suspicious, but not necessarily wrong.
  Warning,
  /// Informational chatter.
  Info,
}

impl Severity {
  /// All the severities, highest priority first.
  pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];

  /// Returns the numeric rank. The ranks are sparse (1, 3, 5) so numeric configuration values can
  /// sit between them.
  #[must_use]
  pub const fn rank(self) -> i32 {
    match self {
      Severity::Error => 1,
      Severity::Warning => 3,
      Severity::Info => 5,
    }
  }

  /// Returns the severity with exactly this rank, if any.
  #[must_use]
  pub const fn from_rank(rank: i32) -> Option<Self> {
    match rank {
      1 => Some(Severity::Error),
      3 => Some(Severity::Warning),
      5 => Some(Severity::Info),
      _ => None,
    }
  }

  /// Returns the matching `log` crate level.
  #[must_use]
  pub const fn to_log_level(self) -> log::Level {
    match self {
      Severity::Error => log::Level::Error,
      Severity::Warning => log::Level::Warn,
      Severity::Info => log::Level::Info,
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Error => f.write_str("error"),
      Severity::Warning => f.write_str("warning"),
      Severity::Info => f.write_str("info"),
    }
  }
}

impl FromStr for Severity {
  type Err = ParseSeverityError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("error") {
      Ok(Severity::Error)
    } else if s.eq_ignore_ascii_case("warning") || s.eq_ignore_ascii_case("warn") {
      Ok(Severity::Warning)
    } else if s.eq_ignore_ascii_case("info") {
      Ok(Severity::Info)
    } else {
      s.parse().ok().and_then(Severity::from_rank).ok_or_else(|| ParseSeverityError(s.to_owned()))
    }
  }
}

/// The maximum rank of messages that get written.
///
/// Any rank is allowed, not just those of the defined severities: a threshold of 4 lets through
/// errors and warnings, 0 lets through nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(i32);

impl Threshold {
  /// Returns a threshold with this rank.
  #[must_use]
  pub const fn new(rank: i32) -> Self {
    Self(rank)
  }

  /// Returns the rank.
  #[must_use]
  pub const fn rank(self) -> i32 {
    self.0
  }

  /// Returns whether a message of this severity passes the threshold.
  #[must_use]
  pub const fn allows(self, severity: Severity) -> bool {
    severity.rank() <= self.0
  }
}

impl Default for Threshold {
  fn default() -> Self {
    Severity::Warning.into()
  }
}

impl From<Severity> for Threshold {
  fn from(severity: Severity) -> Self {
    Self(severity.rank())
  }
}

impl From<i32> for Threshold {
  fn from(rank: i32) -> Self {
    Self(rank)
  }
}

impl fmt::Display for Threshold {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match Severity::from_rank(self.0) {
      Some(s) => s.fmt(f),
      None => self.0.fmt(f),
    }
  }
}

impl FromStr for Threshold {
  type Err = ParseSeverityError;

  /// Accepts a severity name or any integer rank.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().parse::<i32>() {
      Ok(n) => Ok(Self(n)),
      Err(_) => s.parse::<Severity>().map(Self::from),
    }
  }
}

/// An error when a [`Severity`] or [`Threshold`] could not be parsed from a str.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError(String);

impl fmt::Display for ParseSeverityError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "not a severity: {:?}", self.0)
  }
}

impl std::error::Error for ParseSeverityError {}

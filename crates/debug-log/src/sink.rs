//! Where diagnostic lines go.

use crate::severity::Severity;
use std::fmt;
use std::io::Write as _;
use std::sync::{Mutex, PoisonError};

/// The place in the source a line was logged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
  /// The path of the enclosing function, like `my_crate::module::func`.
  pub function: &'static str,
  /// The source file.
  pub file: &'static str,
  /// The line in `file`.
  pub line: u32,
}

/// One diagnostic line, not yet formatted.
///
/// Displays as `<function>(<line>): <message>`.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
  /// The severity, or `None` for untagged prints.
  pub severity: Option<Severity>,
  /// Where it came from.
  pub site: &'a CallSite,
  /// The message.
  pub message: fmt::Arguments<'a>,
}

impl fmt::Display for Entry<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}({}): {}", self.site.function, self.site.line, self.message)
  }
}

/// A destination for diagnostic lines.
pub trait Sink: Send + Sync {
  /// Write the entry. Must not fail; errors are swallowed.
  fn write(&self, entry: &Entry<'_>);
}

/// Writes each entry as a line on standard error. The default.
#[derive(Debug, Default)]
pub struct Stderr(());

impl Sink for Stderr {
  fn write(&self, entry: &Entry<'_>) {
    let mut err = std::io::stderr().lock();
    let _ = writeln!(err, "{entry}");
  }
}

/// Forwards entries to the [`log`] facade, with the enclosing function as the target.
///
/// Untagged lines, from [`dprint!`](crate::dprint), [`dcondition_log!`](crate::dcondition_log) and
/// failed assertions, are logged at `debug`. Function names from
/// [`dprint_fn_name!`](crate::dprint_fn_name) are tagged `info`.
#[derive(Debug, Default)]
pub struct LogFacade(());

impl Sink for LogFacade {
  fn write(&self, entry: &Entry<'_>) {
    let level = entry.severity.map_or(log::Level::Debug, Severity::to_log_level);
    log::log!(target: entry.site.function, level, "{entry}");
  }
}

/// Keeps every line in memory. Mainly for tests.
#[derive(Debug, Default)]
pub struct MemorySink(Mutex<Vec<String>>);

impl MemorySink {
  /// Returns a new, empty `MemorySink`.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a copy of the lines written so far.
  #[must_use]
  pub fn lines(&self) -> Vec<String> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }

  /// Removes and returns the lines written so far.
  pub fn take(&self) -> Vec<String> {
    std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
  }
}

impl Sink for MemorySink {
  fn write(&self, entry: &Entry<'_>) {
    self.0.lock().unwrap_or_else(PoisonError::into_inner).push(entry.to_string());
  }
}

impl<S> Sink for std::sync::Arc<S>
where
  S: Sink + ?Sized,
{
  fn write(&self, entry: &Entry<'_>) {
    (**self).write(entry);
  }
}

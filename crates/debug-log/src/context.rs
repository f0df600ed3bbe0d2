//! The process-wide logging context.

use crate::debugger::{Debugger, HostDebugger};
use crate::severity::{Severity, Threshold};
use crate::sink::{CallSite, Entry, Sink, Stderr};
use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Everything the logging macros consult: the threshold, where lines go, and how to reach a
/// debugger.
///
/// The threshold may be changed at any time from any thread.
pub struct Context {
  threshold: AtomicI32,
  sink: Box<dyn Sink>,
  debugger: Box<dyn Debugger>,
}

impl Context {
  /// Returns a builder, which starts out with the defaults.
  #[must_use]
  pub fn builder() -> ContextBuilder {
    ContextBuilder::default()
  }

  /// Returns the current threshold.
  #[must_use]
  pub fn threshold(&self) -> Threshold {
    Threshold::new(self.threshold.load(Ordering::Relaxed))
  }

  /// Sets the threshold. Any rank is accepted.
  pub fn set_threshold<T>(&self, threshold: T)
  where
    T: Into<Threshold>,
  {
    self.threshold.store(threshold.into().rank(), Ordering::Relaxed);
  }

  /// Returns whether a message of this severity would be written.
  #[must_use]
  pub fn should_log(&self, severity: Severity) -> bool {
    self.threshold().allows(severity)
  }

  /// Writes the message regardless of the threshold.
  pub fn print(&self, site: &CallSite, message: fmt::Arguments<'_>) {
    self.write(None, site, message);
  }

  /// Writes the message if `cond` holds.
  pub fn log_if(&self, cond: bool, site: &CallSite, message: fmt::Arguments<'_>) {
    if cond {
      self.print(site, message);
    }
  }

  /// Writes the message if the severity passes the threshold.
  pub fn log(&self, severity: Severity, site: &CallSite, message: fmt::Arguments<'_>) {
    if self.should_log(severity) {
      self.write(Some(severity), site, message);
    }
  }

  /// Writes the message tagged with `severity`, without consulting the threshold.
  ///
  /// For callers that already checked [`Self::should_log`].
  pub fn write(&self, severity: Option<Severity>, site: &CallSite, message: fmt::Arguments<'_>) {
    self.sink.write(&Entry { severity, site, message });
  }

  /// Reports a failed assertion: writes one line, then traps if a debugger is attached.
  pub fn assertion_failed(&self, site: &CallSite, description: &str) {
    self.print(site, format_args!("dassert failed: {description}"));
    if self.debugger.is_attached() {
      self.debugger.trap();
    }
  }
}

impl Default for Context {
  fn default() -> Self {
    Context::builder().build()
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Context").field("threshold", &self.threshold()).finish_non_exhaustive()
  }
}

/// Configures a [`Context`].
#[derive(Default)]
pub struct ContextBuilder {
  threshold: Threshold,
  sink: Option<Box<dyn Sink>>,
  debugger: Option<Box<dyn Debugger>>,
}

impl ContextBuilder {
  /// Sets the starting threshold. Defaults to [`Severity::Warning`].
  #[must_use]
  pub fn threshold<T>(mut self, threshold: T) -> Self
  where
    T: Into<Threshold>,
  {
    self.threshold = threshold.into();
    self
  }

  /// Sets the sink. Defaults to [`Stderr`].
  #[must_use]
  pub fn sink<S>(mut self, sink: S) -> Self
  where
    S: Sink + 'static,
  {
    self.sink = Some(Box::new(sink));
    self
  }

  /// Sets the debugger. Defaults to [`HostDebugger`].
  #[must_use]
  pub fn debugger<D>(mut self, debugger: D) -> Self
  where
    D: Debugger + 'static,
  {
    self.debugger = Some(Box::new(debugger));
    self
  }

  /// Finishes the context.
  #[must_use]
  pub fn build(self) -> Context {
    Context {
      threshold: AtomicI32::new(self.threshold.rank()),
      sink: self.sink.unwrap_or_else(|| Box::new(Stderr::default())),
      debugger: self.debugger.unwrap_or_else(|| Box::new(HostDebugger::default())),
    }
  }
}

impl fmt::Debug for ContextBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContextBuilder")
      .field("threshold", &self.threshold)
      .field("sink", &self.sink.is_some())
      .field("debugger", &self.debugger.is_some())
      .finish()
  }
}

/// Installed contexts, oldest first.
static INSTALLED: RwLock<Vec<Arc<Context>>> = RwLock::new(Vec::new());
static DEFAULT: OnceLock<Arc<Context>> = OnceLock::new();

/// Returns the most recently installed context that is still installed, or the default one if
/// there is none.
#[must_use]
pub fn current() -> Arc<Context> {
  let installed = INSTALLED.read().unwrap_or_else(PoisonError::into_inner);
  match installed.last() {
    Some(ctx) => Arc::clone(ctx),
    None => Arc::clone(DEFAULT.get_or_init(|| Arc::new(Context::default()))),
  }
}

/// Makes `ctx` the current context until the returned guard is dropped.
///
/// Guards may be dropped in any order. Dropping one only uninstalls its own context, so the
/// current context is always the newest one whose guard is still alive.
#[must_use = "the context is uninstalled when the guard is dropped"]
pub fn install(ctx: Context) -> Installed {
  let ctx = Arc::new(ctx);
  INSTALLED.write().unwrap_or_else(PoisonError::into_inner).push(Arc::clone(&ctx));
  Installed { ctx }
}

/// Keeps a context installed. See [`install`].
#[derive(Debug)]
pub struct Installed {
  ctx: Arc<Context>,
}

impl Installed {
  /// Returns the installed context.
  #[must_use]
  pub fn context(&self) -> &Context {
    &self.ctx
  }
}

impl Drop for Installed {
  fn drop(&mut self) {
    let mut installed = INSTALLED.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(idx) = installed.iter().rposition(|ctx| Arc::ptr_eq(ctx, &self.ctx)) {
      installed.remove(idx);
    }
  }
}

/// Returns the threshold of the current context.
#[must_use]
pub fn threshold() -> Threshold {
  current().threshold()
}

/// Sets the threshold of the current context.
pub fn set_threshold<T>(threshold: T)
where
  T: Into<Threshold>,
{
  current().set_threshold(threshold);
}

/// Returns whether the current context would write a message of this severity.
#[must_use]
pub fn should_log(severity: Severity) -> bool {
  current().should_log(severity)
}

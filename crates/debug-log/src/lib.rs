//! Logging and assertions for debug builds.
//!
//! The macros only do anything when this crate's `debug` feature is enabled. Without it they
//! expand to a branch that is never taken: the format string and arguments are still
//! type-checked, but nothing is evaluated and the optimizer removes all of it.
//!
//! - [`dprint!`] writes a line no matter what.
//! - [`dprint_fn_name!`] writes the enclosing function's name.
//! - [`dcondition_log!`] writes a line if a condition holds.
//! - [`derror!`], [`dwarning!`] and [`dinfo!`] write a line if the severity passes the current
//!   [`Threshold`], which defaults to [`Severity::Warning`].
//! - [`dassert!`] writes a line if a condition does not hold, then stops in the debugger if one is
//!   attached. It never panics.
//!
//! Lines have the form `<function>(<line>): <message>` and go to the [`Sink`] of the current
//! [`Context`], which is standard error unless another context was [`install`]ed.

mod context;
mod debugger;
mod severity;
mod sink;

#[cfg(test)]
mod tests;

pub use context::{current, install, set_threshold, should_log, threshold};
pub use context::{Context, ContextBuilder, Installed};
pub use debugger::{breakpoint, Debugger, Detached, HostDebugger};
pub use severity::{ParseSeverityError, Severity, Threshold};
pub use sink::{CallSite, Entry, LogFacade, MemorySink, Sink, Stderr};

/// Whether the macros were compiled in.
pub const ENABLED: bool = cfg!(feature = "debug");

/// Returns the path of the function `f` is defined in. `f` should be a fn item named `f`.
#[doc(hidden)]
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn __enclosing<F>(_: F) -> &'static str {
  let mut name = std::any::type_name::<F>();
  name = name.strip_suffix("::f").unwrap_or(name);
  while let Some(x) = name.strip_suffix("::{{closure}}") {
    name = x;
  }
  name
}

#[doc(hidden)]
#[macro_export]
macro_rules! __call_site {
  () => {
    $crate::CallSite {
      function: {
        fn f() {}
        $crate::__enclosing(f)
      },
      file: ::core::file!(),
      line: ::core::line!(),
    }
  };
}

/// Writes the formatted text, regardless of the threshold.
///
/// ```ignore
/// dprint!("loaded {} items", items.len());
/// ```
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dprint {
  ($($arg:tt)+) => {
    $crate::current().print(&$crate::__call_site!(), ::core::format_args!($($arg)+))
  };
}

/// Writes the formatted text, regardless of the threshold.
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dprint {
  ($($arg:tt)+) => {{
    if false {
      let _ = ::core::format_args!($($arg)+);
    }
  }};
}

/// Writes the name of the enclosing function, regardless of the threshold.
///
/// The line is tagged [`Severity::Info`], so [`LogFacade`] logs it at `info`.
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dprint_fn_name {
  () => {{
    let site = $crate::__call_site!();
    let severity = ::core::option::Option::Some($crate::Severity::Info);
    $crate::current().write(severity, &site, ::core::format_args!("{}", site.function));
  }};
}

/// Writes the name of the enclosing function.
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dprint_fn_name {
  () => {{}};
}

/// Writes the formatted text if the condition holds. The arguments are only evaluated if it does.
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dcondition_log {
  ($cond:expr, $($arg:tt)+) => {{
    if $cond {
      $crate::dprint!($($arg)+);
    }
  }};
}

/// Writes the formatted text if the condition holds. The arguments are only evaluated if it does.
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dcondition_log {
  ($cond:expr, $($arg:tt)+) => {{
    if false {
      let _: bool = $cond;
      let _ = ::core::format_args!($($arg)+);
    }
  }};
}

#[doc(hidden)]
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! __dlevel {
  ($severity:expr, $($arg:tt)+) => {{
    let severity: $crate::Severity = $severity;
    let ctx = $crate::current();
    if ctx.should_log(severity) {
      let severity = ::core::option::Option::Some(severity);
      ctx.write(severity, &$crate::__call_site!(), ::core::format_args!($($arg)+));
    }
  }};
}

#[doc(hidden)]
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! __dlevel {
  ($severity:expr, $($arg:tt)+) => {{
    if false {
      let _: $crate::Severity = $severity;
      let _ = ::core::format_args!($($arg)+);
    }
  }};
}

/// Writes the formatted text if the threshold is at least [`Severity::Error`].
#[macro_export]
macro_rules! derror {
  ($($arg:tt)+) => {
    $crate::__dlevel!($crate::Severity::Error, $($arg)+)
  };
}

/// Writes the formatted text if the threshold is at least [`Severity::Warning`].
#[macro_export]
macro_rules! dwarning {
  ($($arg:tt)+) => {
    $crate::__dlevel!($crate::Severity::Warning, $($arg)+)
  };
}

/// Writes the formatted text if the threshold is at least [`Severity::Info`].
#[macro_export]
macro_rules! dinfo {
  ($($arg:tt)+) => {
    $crate::__dlevel!($crate::Severity::Info, $($arg)+)
  };
}

/// Like `debug_assert!`, except a failure is written to the log instead of panicking, and the
/// debugger (if attached) is stopped in.
///
/// The description defaults to the condition's source text.
///
/// ```ignore
/// dassert!(index < len);
/// dassert!(delegates.live_len() > 0, "no delegates left");
/// ```
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dassert {
  ($cond:expr $(,)?) => {
    $crate::dassert!($cond, ::core::stringify!($cond))
  };
  ($cond:expr, $desc:expr $(,)?) => {{
    if !$cond {
      $crate::current().assertion_failed(&$crate::__call_site!(), $desc);
    }
  }};
}

/// Like `debug_assert!`, except a failure is written to the log instead of panicking, and the
/// debugger (if attached) is stopped in.
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dassert {
  ($cond:expr $(,)?) => {{
    if false {
      let _: bool = $cond;
    }
  }};
  ($cond:expr, $desc:expr $(,)?) => {{
    if false {
      let _: bool = $cond;
      let _: &str = $desc;
    }
  }};
}

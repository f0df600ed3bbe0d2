//! Detecting and breaking into an attached debugger.

/// The host's debugger, as far as failed assertions are concerned.
pub trait Debugger: Send + Sync {
  /// Returns whether an interactive debugger is attached. If unknown, returns false.
  fn is_attached(&self) -> bool;

  /// Stop in the debugger. Only called when [`Self::is_attached`] returned true.
  fn trap(&self) {
    breakpoint();
  }
}

/// Asks the operating system.
///
/// On Linux this reads `TracerPid` from `/proc/self/status`. Elsewhere, or if that can't be read,
/// nothing is considered attached.
#[derive(Debug, Default)]
pub struct HostDebugger(());

impl Debugger for HostDebugger {
  fn is_attached(&self) -> bool {
    tracer_pid().is_some_and(|pid| pid != 0)
  }
}

/// Never attached. Failed assertions only log.
#[derive(Debug, Default)]
pub struct Detached(());

impl Debugger for Detached {
  fn is_attached(&self) -> bool {
    false
  }
}

#[cfg(target_os = "linux")]
fn tracer_pid() -> Option<u32> {
  let status = std::fs::read_to_string("/proc/self/status").ok()?;
  parse_tracer_pid(&status)
}

#[cfg(not(target_os = "linux"))]
fn tracer_pid() -> Option<u32> {
  None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
/// Finds the `TracerPid:` line in the contents of a `/proc/<pid>/status` file.
pub(crate) fn parse_tracer_pid(status: &str) -> Option<u32> {
  let pid = status.lines().find_map(|line| line.strip_prefix("TracerPid:"))?;
  pid.trim().parse().ok()
}

/// Executes a breakpoint trap.
///
/// Without a debugger attached this usually kills the process, so check first.
#[inline]
pub fn breakpoint() {
  #[cfg(unix)]
  // SAFETY: raising a signal has no memory-safety preconditions.
  unsafe {
    libc::raise(libc::SIGTRAP);
  };
  #[cfg(all(not(unix), any(target_arch = "x86", target_arch = "x86_64")))]
  // SAFETY: int3 only transfers control to the debugger.
  unsafe {
    std::arch::asm!("int3", options(nomem, nostack));
  };
}

use crate::debugger::parse_tracer_pid;
use crate::{CallSite, Context, Debugger, Detached, MemorySink, Severity, Threshold};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Once, PoisonError};

/// The installed context is process-wide, so tests that install one take turns.
static SERIAL: Mutex<()> = Mutex::new(());

#[derive(Debug, Default)]
struct Stub {
  attached: bool,
  traps: Arc<AtomicUsize>,
}

impl Debugger for Stub {
  fn is_attached(&self) -> bool {
    self.attached
  }

  fn trap(&self) {
    self.traps.fetch_add(1, Ordering::SeqCst);
  }
}

struct Setup {
  lines: Arc<MemorySink>,
  traps: Arc<AtomicUsize>,
  _installed: crate::Installed,
  _serial: MutexGuard<'static, ()>,
}

fn setup(threshold: Severity, attached: bool) -> Setup {
  let serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
  let lines = Arc::new(MemorySink::new());
  let traps = Arc::new(AtomicUsize::new(0));
  let ctx = Context::builder()
    .threshold(threshold)
    .sink(Arc::clone(&lines))
    .debugger(Stub { attached, traps: Arc::clone(&traps) })
    .build();
  Setup { lines, traps, _installed: crate::install(ctx), _serial: serial }
}

const SITE: CallSite =
  CallSite { function: "app::delegate::did_load", file: "src/delegate.rs", line: 12 };

/// Records everything sent to the `log` facade.
struct Capture(Mutex<Vec<(log::Level, String, String)>>);

impl log::Log for Capture {
  fn enabled(&self, _: &log::Metadata<'_>) -> bool {
    true
  }

  fn log(&self, record: &log::Record<'_>) {
    let rec = (record.level(), record.target().to_owned(), record.args().to_string());
    self.0.lock().unwrap_or_else(PoisonError::into_inner).push(rec);
  }

  fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

/// Installs [`CAPTURE`] as the logger, then takes the records it got for `target` so far.
fn captured(target: &str) -> Vec<(log::Level, String)> {
  static INIT: Once = Once::new();
  INIT.call_once(|| {
    log::set_logger(&CAPTURE).expect("no other logger");
    log::set_max_level(log::LevelFilter::Trace);
  });
  let mut records = CAPTURE.0.lock().unwrap_or_else(PoisonError::into_inner);
  let (mine, rest) = records.drain(..).partition::<Vec<_>, _>(|(_, t, _)| t == target);
  *records = rest;
  mine.into_iter().map(|(level, _, message)| (level, message)).collect()
}

#[test]
fn ranks() {
  assert_eq!(Severity::ALL.map(Severity::rank), [1, 3, 5]);
  assert!(Severity::Error < Severity::Warning);
  assert!(Severity::Warning < Severity::Info);
  assert_eq!(Severity::from_rank(4), None);
}

#[test]
fn threshold_allows_by_rank() {
  for rank in -1..=7 {
    let t = Threshold::new(rank);
    for s in Severity::ALL {
      assert_eq!(t.allows(s), s.rank() <= rank, "{s} at {rank}");
    }
  }
}

#[test]
fn threshold_between_levels() {
  let t = Threshold::new(4);
  assert!(t.allows(Severity::Error));
  assert!(t.allows(Severity::Warning));
  assert!(!t.allows(Severity::Info));
}

#[test]
fn default_threshold() {
  assert_eq!(Threshold::default(), Threshold::from(Severity::Warning));
  let ctx = Context::builder().sink(MemorySink::new()).debugger(Detached::default()).build();
  assert!(ctx.should_log(Severity::Error));
  assert!(ctx.should_log(Severity::Warning));
  assert!(!ctx.should_log(Severity::Info));
}

#[test]
fn parse() {
  assert_eq!("info".parse::<Severity>().unwrap(), Severity::Info);
  assert_eq!(" WARN ".parse::<Severity>().unwrap(), Severity::Warning);
  assert_eq!("1".parse::<Severity>().unwrap(), Severity::Error);
  assert!("2".parse::<Severity>().is_err());
  assert_eq!("error".parse::<Threshold>().unwrap().rank(), 1);
  assert_eq!("4".parse::<Threshold>().unwrap().rank(), 4);
  assert_eq!("-3".parse::<Threshold>().unwrap().rank(), -3);
  let err = "loud".parse::<Threshold>().unwrap_err();
  assert_eq!(err.to_string(), "not a severity: \"loud\"");
}

#[test]
fn display() {
  assert_eq!(Threshold::from(Severity::Info).to_string(), "info");
  assert_eq!(Threshold::new(4).to_string(), "4");
}

#[test]
fn context_log() {
  let lines = Arc::new(MemorySink::new());
  let ctx = Context::builder()
    .threshold(Severity::Error)
    .sink(Arc::clone(&lines))
    .debugger(Detached::default())
    .build();
  ctx.log(Severity::Error, &SITE, format_args!("lost {} delegates", 2));
  ctx.log(Severity::Warning, &SITE, format_args!("suppressed"));
  ctx.log(Severity::Info, &SITE, format_args!("suppressed"));
  assert_eq!(lines.take(), ["app::delegate::did_load(12): lost 2 delegates"]);
  ctx.set_threshold(Severity::Info);
  ctx.log(Severity::Info, &SITE, format_args!("now shown"));
  ctx.log_if(false, &SITE, format_args!("not shown"));
  ctx.print(&SITE, format_args!("always"));
  assert_eq!(
    lines.take(),
    ["app::delegate::did_load(12): now shown", "app::delegate::did_load(12): always"]
  );
}

#[test]
fn log_facade_levels() {
  let site = CallSite { function: "app::sync::pull", file: "src/sync.rs", line: 40 };
  captured(site.function);
  let ctx = Context::builder().threshold(Severity::Info).sink(crate::LogFacade::default()).build();
  ctx.log(Severity::Error, &site, format_args!("e"));
  ctx.log(Severity::Warning, &site, format_args!("w"));
  ctx.log(Severity::Info, &site, format_args!("i"));
  ctx.print(&site, format_args!("p"));
  ctx.assertion_failed(&site, "ok");
  ctx.set_threshold(Severity::Error);
  ctx.log(Severity::Warning, &site, format_args!("suppressed"));
  let want = [
    (log::Level::Error, "app::sync::pull(40): e"),
    (log::Level::Warn, "app::sync::pull(40): w"),
    (log::Level::Info, "app::sync::pull(40): i"),
    (log::Level::Debug, "app::sync::pull(40): p"),
    (log::Level::Debug, "app::sync::pull(40): dassert failed: ok"),
  ]
  .map(|(level, message)| (level, message.to_owned()));
  assert_eq!(captured(site.function), want);
}

#[test]
fn write_skips_threshold() {
  let lines = Arc::new(MemorySink::new());
  let ctx = Context::builder().threshold(0).sink(Arc::clone(&lines)).build();
  ctx.write(Some(Severity::Info), &SITE, format_args!("already checked"));
  assert_eq!(lines.take(), ["app::delegate::did_load(12): already checked"]);
}

#[test]
fn assertion_failed_without_debugger() {
  let traps = Arc::new(AtomicUsize::new(0));
  let lines = Arc::new(MemorySink::new());
  let ctx = Context::builder()
    .threshold(0)
    .sink(Arc::clone(&lines))
    .debugger(Stub { attached: false, traps: Arc::clone(&traps) })
    .build();
  ctx.assertion_failed(&SITE, "count > 0");
  assert_eq!(lines.lines(), ["app::delegate::did_load(12): dassert failed: count > 0"]);
  assert_eq!(traps.load(Ordering::SeqCst), 0);
}

#[test]
fn assertion_failed_with_debugger() {
  let traps = Arc::new(AtomicUsize::new(0));
  let ctx = Context::builder()
    .sink(MemorySink::new())
    .debugger(Stub { attached: true, traps: Arc::clone(&traps) })
    .build();
  ctx.assertion_failed(&SITE, "count > 0");
  assert_eq!(traps.load(Ordering::SeqCst), 1);
}

#[test]
fn tracer_pid() {
  let status = "Name:\tcat\nState:\tR (running)\nTracerPid:\t4242\nUid:\t0\t0\t0\t0\n";
  assert_eq!(parse_tracer_pid(status), Some(4242));
  assert_eq!(parse_tracer_pid("TracerPid:\t0\n"), Some(0));
  assert_eq!(parse_tracer_pid("Name:\tcat\n"), None);
}

#[test]
fn install_and_restore() {
  let outer = setup(Severity::Warning, false);
  crate::set_threshold(Severity::Info);
  assert!(crate::should_log(Severity::Info));
  {
    let inner = crate::install(Context::builder().threshold(Severity::Error).build());
    assert_eq!(crate::threshold(), Threshold::from(Severity::Error));
    assert_eq!(inner.context().threshold(), Threshold::from(Severity::Error));
  }
  assert_eq!(crate::threshold(), Threshold::from(Severity::Info));
  drop(outer);
}

#[test]
fn guards_dropped_out_of_order() {
  let outer = setup(Severity::Warning, false);
  let a = crate::install(Context::builder().threshold(Severity::Error).build());
  let b = crate::install(Context::builder().threshold(Severity::Info).build());
  assert_eq!(crate::threshold(), Threshold::from(Severity::Info));
  drop(a);
  assert_eq!(crate::threshold(), Threshold::from(Severity::Info));
  drop(b);
  assert_eq!(crate::threshold(), Threshold::from(Severity::Warning));
  crate::current().print(&SITE, format_args!("back to outer"));
  assert_eq!(outer.lines.take(), ["app::delegate::did_load(12): back to outer"]);
}

#[cfg(feature = "debug")]
mod enabled {
  use super::setup;
  use crate::Severity;
  use std::cell::Cell;
  use std::sync::atomic::Ordering;

  #[test]
  fn levels_at_error() {
    let s = setup(Severity::Error, false);
    crate::derror!("bad {}", 1);
    crate::dwarning!("meh {}", 2);
    crate::dinfo!("fyi {}", 3);
    let lines = s.lines.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(": bad 1"), "{}", lines[0]);
  }

  #[test]
  fn levels_at_info() {
    let s = setup(Severity::Info, false);
    crate::derror!("bad");
    crate::dwarning!("meh");
    crate::dinfo!("fyi");
    assert_eq!(s.lines.take().len(), 3);
  }

  #[test]
  fn suppressed_levels_are_lazy() {
    let s = setup(Severity::Error, false);
    let evaluated = Cell::new(0);
    let touch = || {
      evaluated.set(evaluated.get() + 1);
      "touched"
    };
    crate::dwarning!("{}", touch());
    crate::dinfo!("{}", touch());
    assert_eq!(evaluated.get(), 0);
    crate::derror!("{}", touch());
    assert_eq!(evaluated.get(), 1);
    assert_eq!(s.lines.take().len(), 1);
  }

  #[test]
  fn compiled_in() {
    assert!(crate::ENABLED);
  }

  #[test]
  fn print_ignores_threshold() {
    let s = setup(Severity::Error, false);
    crate::set_threshold(0);
    crate::dprint!("hello {}", "world");
    let lines = s.lines.take();
    let line = line!() - 2;
    let want = format!("debug_log::tests::enabled::print_ignores_threshold({line}): hello world");
    assert_eq!(lines, [want]);
  }

  #[test]
  fn fn_name() {
    let s = setup(Severity::Warning, false);
    crate::dprint_fn_name!();
    let lines = s.lines.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(": debug_log::tests::enabled::fn_name"), "{}", lines[0]);
  }

  #[test]
  fn fn_name_logged_at_info() {
    let _s = setup(Severity::Error, false);
    let target = "debug_log::tests::enabled::fn_name_logged_at_info";
    super::captured(target);
    let _installed = crate::install(
      crate::Context::builder().threshold(0).sink(crate::LogFacade::default()).build(),
    );
    crate::dprint_fn_name!();
    let records = super::captured(target);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, log::Level::Info);
    assert!(records[0].1.ends_with(&format!(": {target}")), "{}", records[0].1);
  }

  #[test]
  fn fn_name_in_closure() {
    let s = setup(Severity::Warning, false);
    let run = || crate::dprint_fn_name!();
    run();
    let lines = s.lines.take();
    assert!(lines[0].ends_with(": debug_log::tests::enabled::fn_name_in_closure"), "{}", lines[0]);
  }

  #[test]
  fn condition_log_is_lazy() {
    let s = setup(Severity::Warning, false);
    let evaluated = Cell::new(0);
    let touch = || {
      evaluated.set(evaluated.get() + 1);
      "touched"
    };
    crate::dcondition_log!(false, "{}", touch());
    assert_eq!(evaluated.get(), 0);
    crate::dcondition_log!(true, "{}", touch());
    assert_eq!(evaluated.get(), 1);
    assert_eq!(s.lines.take().len(), 1);
  }

  #[test]
  fn failed_assert_continues() {
    let s = setup(Severity::Error, false);
    crate::dassert!(1 + 1 == 3);
    crate::dassert!(1 + 1 == 2);
    let lines = s.lines.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(": dassert failed: 1 + 1 == 3"), "{}", lines[0]);
    assert_eq!(s.traps.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn failed_assert_traps_when_attached() {
    let s = setup(Severity::Warning, true);
    crate::dassert!(Vec::<u8>::new().len() == 1, "delegates missing");
    assert_eq!(s.lines.take().len(), 1);
    assert_eq!(s.traps.load(Ordering::SeqCst), 1);
  }
}

#[cfg(not(feature = "debug"))]
mod disabled {
  use super::setup;
  use crate::Severity;
  use std::cell::Cell;
  use std::sync::atomic::Ordering;

  #[test]
  fn nothing_written_or_evaluated() {
    let s = setup(Severity::Info, true);
    let evaluated = Cell::new(0);
    let touch = || {
      evaluated.set(evaluated.get() + 1);
      true
    };
    crate::dprint!("{}", touch());
    crate::dprint_fn_name!();
    crate::dcondition_log!(touch(), "{}", touch());
    crate::derror!("{}", touch());
    crate::dwarning!("{}", touch());
    crate::dinfo!("{}", touch());
    crate::dassert!(!touch());
    crate::dassert!(!touch(), "never");
    assert_eq!(evaluated.get(), 0);
    assert!(s.lines.lines().is_empty());
    assert_eq!(s.traps.load(Ordering::SeqCst), 0);
    assert!(!crate::ENABLED);
  }
}

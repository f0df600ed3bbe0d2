//! A task runner using the [xtask spec][1].
//!
//! [1]: https://github.com/matklad/cargo-xtask

use anyhow::{bail, Result};
use pico_args::Arguments;
use std::path::Path;
use xshell::{cmd, pushd};

#[inline]
fn show_help() {
  print!("{}", include_str!("help.txt"));
}

fn finish_args(args: Arguments) -> Result<()> {
  let args = args.finish();
  if !args.is_empty() {
    bail!("unused arguments: {:?}", args);
  }
  Ok(())
}

/// The macros in `debug-log` are compiled out unless its `debug` feature is on, so everything is
/// tested both ways.
fn test() -> Result<()> {
  cmd!("cargo test --workspace").run()?;
  cmd!("cargo test --workspace --all-features").run()?;
  Ok(())
}

fn run() -> Result<()> {
  let mut args = Arguments::from_env();
  if args.contains(["-h", "--help"]) {
    show_help();
    return Ok(());
  }
  let subcommand = match args.subcommand()? {
    Some(x) => x,
    None => {
      show_help();
      return Ok(());
    }
  };
  let root = match Path::new(env!("CARGO_MANIFEST_DIR")).parent() {
    Some(x) => x,
    None => bail!("xtask is not in a workspace"),
  };
  let _d = pushd(root)?;
  match subcommand.as_str() {
    "ci" => {
      finish_args(args)?;
      cmd!("cargo test --workspace --all-features --no-run").run()?;
      cmd!("cargo fmt -- --check").run()?;
      cmd!("cargo clippy --workspace").run()?;
      cmd!("cargo clippy --workspace --all-features").run()?;
      test()?;
    }
    "test" => {
      finish_args(args)?;
      test()?;
    }
    s => bail!("unknown subcommand: {}", s),
  }
  Ok(())
}

fn main() {
  match run() {
    Ok(()) => {}
    Err(e) => {
      eprintln!("{}", e);
      std::process::exit(1);
    }
  }
}

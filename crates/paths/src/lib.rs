//! Building paths under the standard application directories.
//!
//! Nothing here touches the file system beyond finding the roots: the returned paths may or may
//! not exist.


use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// Appends `relative` to `base`, with exactly one separator between them.
///
/// Leading separators, `.` components and repeated separators in `relative` are dropped. `..` is
/// kept as is; nothing is resolved. If `relative` is empty, returns `base`.
#[must_use]
pub fn join(base: &Path, relative: &str) -> PathBuf {
  let mut ret = base.to_path_buf();
  for c in Path::new(relative).components() {
    match c {
      Component::Normal(x) => ret.push(x),
      Component::ParentDir => ret.push(Component::ParentDir.as_os_str()),
      Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
    }
  }
  ret
}

/// The directories paths are built under.
pub trait Roots {
  /// The directory holding the application's bundled resources.
  fn resources(&self) -> &Path;

  /// The user-writable documents directory.
  fn documents(&self) -> &Path;

  /// Returns `relative` under `bundle`, or under [`Self::resources`] if `bundle` is `None`.
  fn bundle_resource(&self, bundle: Option<&Path>, relative: &str) -> PathBuf {
    join(bundle.unwrap_or_else(|| self.resources()), relative)
  }

  /// Returns `relative` under [`Self::documents`].
  fn documents_resource(&self, relative: &str) -> PathBuf {
    join(self.documents(), relative)
  }
}

/// The real roots, found from the running process.
///
/// - Resources: the directory of the current executable.
/// - Documents: `Documents` in the home directory (`HOME`, or `USERPROFILE` on Windows).
///
/// A root that can't be found is empty, so paths under it come out relative.
#[derive(Debug, Clone)]
pub struct HostRoots {
  resources: PathBuf,
  documents: PathBuf,
}

impl HostRoots {
  /// Finds the roots.
  #[must_use]
  pub fn new() -> Self {
    Self {
      resources: resources_root(std::env::current_exe()),
      documents: documents_root(std::env::var_os(HOME_VAR)),
    }
  }
}

impl Default for HostRoots {
  fn default() -> Self {
    Self::new()
  }
}

impl Roots for HostRoots {
  fn resources(&self) -> &Path {
    &self.resources
  }

  fn documents(&self) -> &Path {
    &self.documents
  }
}

/// Roots given up front. Mainly for testing.
#[derive(Debug, Clone, Default)]
pub struct FixedRoots {
  resources: PathBuf,
  documents: PathBuf,
}

impl FixedRoots {
  /// Returns a new `FixedRoots`.
  #[must_use]
  pub fn new<R, D>(resources: R, documents: D) -> Self
  where
    R: Into<PathBuf>,
    D: Into<PathBuf>,
  {
    Self { resources: resources.into(), documents: documents.into() }
  }
}

impl Roots for FixedRoots {
  fn resources(&self) -> &Path {
    &self.resources
  }

  fn documents(&self) -> &Path {
    &self.documents
  }
}

/// Returns `relative` under `bundle`, or under the running executable's directory if `bundle` is
/// `None`.
#[must_use]
pub fn bundle_resource(bundle: Option<&Path>, relative: &str) -> PathBuf {
  host().bundle_resource(bundle, relative)
}

/// Returns `relative` under the user's documents directory.
#[must_use]
pub fn documents_resource(relative: &str) -> PathBuf {
  host().documents_resource(relative)
}

fn host() -> &'static HostRoots {
  static HOST: OnceLock<HostRoots> = OnceLock::new();
  HOST.get_or_init(HostRoots::new)
}

#[cfg(windows)]
const HOME_VAR: &str = "USERPROFILE";
#[cfg(not(windows))]
const HOME_VAR: &str = "HOME";

fn resources_root(exe: std::io::Result<PathBuf>) -> PathBuf {
  match exe {
    Ok(exe) => match exe.parent() {
      Some(dir) => dunce::simplified(dir).to_path_buf(),
      None => {
        log::warn!("executable {} has no parent directory", exe.display());
        PathBuf::new()
      }
    },
    Err(e) => {
      log::warn!("couldn't find the current executable: {e}");
      PathBuf::new()
    }
  }
}

fn documents_root(home: Option<OsString>) -> PathBuf {
  match home {
    Some(home) if !home.is_empty() => PathBuf::from(home).join("Documents"),
    _ => {
      log::warn!("{HOME_VAR} is not set, documents root is empty");
      PathBuf::new()
    }
  }
}

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A path cut at its last separator.
///
/// `prefix` keeps the trailing `/`, so `prefix + leaf` gives back the input
/// byte for byte. `prefix` is empty for a bare name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    pub prefix: PathBuf,
    pub leaf: PathBuf,
}

impl SplitPath {
    /// The path both halves stand for, relative to the directory the split
    /// was made in.
    pub fn joined(&self) -> PathBuf {
        let mut bytes = self.prefix.as_os_str().as_bytes().to_vec();
        bytes.extend_from_slice(self.leaf.as_os_str().as_bytes());
        PathBuf::from(OsStr::from_bytes(&bytes))
    }
}

/// Split `path` into its directory prefix and leaf name.
///
/// This is a plain byte partition: no `.`/`..` handling, no filesystem access.
/// An empty path yields an empty prefix and an empty leaf.
pub fn split<P: AsRef<Path>>(path: P) -> SplitPath {
    let bytes = path.as_ref().as_os_str().as_bytes();
    let cut = bytes.iter().rposition(|&b| b == b'/').map_or(0, |i| i + 1);
    SplitPath {
        prefix: PathBuf::from(OsStr::from_bytes(&bytes[..cut])),
        leaf: PathBuf::from(OsStr::from_bytes(&bytes[cut..])),
    }
}

/// Drop trailing separators, so `dir/` names `dir` itself. A path made only
/// of separators keeps a single `/`.
pub fn trim_trailing_separators<P: AsRef<Path>>(path: P) -> PathBuf {
    let bytes = path.as_ref().as_os_str().as_bytes();
    let end = bytes.iter().rposition(|&b| b != b'/').map_or(0, |i| i + 1);
    let kept = if end == 0 && !bytes.is_empty() {
        &bytes[..1]
    } else {
        &bytes[..end]
    };
    PathBuf::from(OsStr::from_bytes(kept))
}

/// Make a path explicitly relative by prepending `./`, unless it is absolute
/// or already starts with `./`.
pub fn normalize<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let bytes = path.as_os_str().as_bytes();
    if bytes.is_empty() {
        return Err(Error::InvalidInput {
            path: path.to_path_buf(),
            reason: "empty path",
        });
    }
    if bytes.starts_with(b"/") || bytes.starts_with(b"./") {
        return Ok(path.to_path_buf());
    }
    let mut marked = b"./".to_vec();
    marked.extend_from_slice(bytes);
    Ok(PathBuf::from(OsStr::from_bytes(&marked)))
}

/// Whether `path` can be reached, following links the way `access(F_OK)` does.
///
/// An entry whose resolution only fails because of a symlink loop still
/// counts as reachable: the resolver walks into the loop and its hop guard
/// reports it.
pub fn is_accessible<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(_) => true,
        Err(ref e) if is_loop(e) => fs::symlink_metadata(path).is_ok(),
        Err(_) => false,
    }
}

fn is_loop(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::ELOOP)
}

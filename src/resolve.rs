//! Hop-by-hop symlink resolution.
//!
//! Each hop is interpreted relative to the directory of the previous one,
//! the way a shell would see it after `cd`-ing into that directory. The
//! directory is carried in a [`Context`] instead of the process working
//! directory, so resolving one argument never disturbs the next.

use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::path::{is_accessible, split, SplitPath};

/// Linux gives up after 40 links as well (`MAXSYMLINKS`).
pub const DEFAULT_MAX_HOPS: usize = 40;

/// One hop of a chain, as it is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionStep {
    /// Directory prefix exactly as recorded, either by the user or in the
    /// previous link's target.
    pub prefix: PathBuf,
    pub leaf: PathBuf,
    pub is_terminal: bool,
    pub is_broken: bool,
}

impl ResolutionStep {
    /// `prefix + leaf`, the path as it reads in the chain.
    pub fn rendered(&self) -> PathBuf {
        SplitPath {
            prefix: self.prefix.clone(),
            leaf: self.leaf.clone(),
        }
        .joined()
    }
}

/// Bounds on a single resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Symlinks followed before giving up with [`Error::TooManyHops`].
    pub max_hops: usize,
    /// Longest link target accepted, in bytes. The kernel already stops
    /// targets at `PATH_MAX - 1`, so only a tighter bound can be exceeded.
    pub max_target_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_hops: DEFAULT_MAX_HOPS,
            max_target_len: libc::PATH_MAX as usize,
        }
    }
}

/// Where the next hop is looked up, and how many hops were taken so far.
#[derive(Debug, Clone)]
pub struct Context {
    base: PathBuf,
    hops: usize,
    limits: Limits,
}

impl Context {
    /// A context rooted at the process working directory.
    pub fn new(limits: Limits) -> Self {
        Context::at(PathBuf::new(), limits)
    }

    /// A context rooted at `base`.
    pub fn at<P: Into<PathBuf>>(base: P, limits: Limits) -> Self {
        Context {
            base: base.into(),
            hops: 0,
            limits,
        }
    }

    /// The directory `prefix` names when seen from the current base.
    fn enter(&self, prefix: &Path) -> PathBuf {
        if prefix.as_os_str().is_empty() {
            self.base.clone()
        } else {
            self.base.join(prefix)
        }
    }
}

/// Query the symbolic target of `path`, if it is a symlink at all.
///
/// The link itself is inspected, never followed.
fn readlink(path: &Path) -> Result<Option<PathBuf>> {
    let metadata = fs::symlink_metadata(path)?;
    if !metadata.file_type().is_symlink() {
        return Ok(None);
    }
    Ok(Some(fs::read_link(path)?))
}

/// Lazy iterator over the hops of one chain.
///
/// Yields one step per call. The chain ends after a terminal step (a regular
/// entry or a broken one) or after the first error.
pub struct Hops {
    ctx: Context,
    /// The hop to inspect next, or the failure found while reading the
    /// previous link, reported after that link's own step.
    next: Option<Result<SplitPath>>,
}

impl Hops {
    pub fn new(start: SplitPath, ctx: Context) -> Self {
        Hops {
            ctx,
            next: Some(Ok(start)),
        }
    }

    fn step(&mut self, current: SplitPath) -> Result<ResolutionStep> {
        if current.leaf.as_os_str().is_empty() {
            return Err(Error::InvalidInput {
                path: current.joined(),
                reason: "no file name to resolve",
            });
        }

        let dir = self.ctx.enter(&current.prefix);
        let on_disk = dir.join(&current.leaf);
        trace!("inspecting {}", on_disk.display());

        if !is_accessible(&on_disk) {
            debug!("{} is not accessible", on_disk.display());
            return Ok(ResolutionStep {
                prefix: current.prefix,
                leaf: current.leaf,
                is_terminal: true,
                is_broken: true,
            });
        }

        match readlink(&on_disk)? {
            Some(target) => {
                if self.ctx.hops >= self.ctx.limits.max_hops {
                    return Err(Error::TooManyHops {
                        path: current.joined(),
                        max: self.ctx.limits.max_hops,
                    });
                }
                debug!("{} -> {}", on_disk.display(), target.display());
                self.ctx.base = dir;
                self.ctx.hops += 1;
                let len = target.as_os_str().as_bytes().len();
                let max = self.ctx.limits.max_target_len;
                self.next = Some(if len > max {
                    Err(Error::TargetTooLong {
                        path: current.joined(),
                        len,
                        max,
                    })
                } else {
                    Ok(split(&target))
                });
                Ok(ResolutionStep {
                    prefix: current.prefix,
                    leaf: current.leaf,
                    is_terminal: false,
                    is_broken: false,
                })
            }
            None => Ok(ResolutionStep {
                prefix: current.prefix,
                leaf: current.leaf,
                is_terminal: true,
                is_broken: false,
            }),
        }
    }
}

impl Iterator for Hops {
    type Item = Result<ResolutionStep>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next.take()? {
            Ok(current) => Some(self.step(current)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Resolve `start` hop by hop, handing every step to `emit` as soon as it is
/// known.
///
/// Returns [`Error::BrokenLink`] once a broken step has been emitted. Errors
/// raised by `emit` abort the walk.
pub fn resolve<F>(start: SplitPath, ctx: Context, mut emit: F) -> Result<()>
where
    F: FnMut(&ResolutionStep) -> io::Result<()>,
{
    for step in Hops::new(start, ctx) {
        let step = step?;
        emit(&step)?;
        if step.is_broken {
            return Err(Error::BrokenLink {
                path: step.rendered(),
            });
        }
    }
    Ok(())
}

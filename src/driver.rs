use std::env::consts::{ARCH, OS};
use std::fs;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::Config;
use crate::error::Error;
use crate::path::{split, trim_trailing_separators};
use crate::print::{write_colored, ChainPrinter, Color};
use crate::resolve::{resolve, Context};

/// Where output goes, and whether each stream gets colors.
pub struct Streams<O, E> {
    pub out: O,
    pub out_color: bool,
    pub err: E,
    pub err_color: bool,
}

/// The text printed by `--version`.
pub fn banner() -> String {
    format!(
        "ldig {} - print symbolic links recursively.\n\
         Built for {}-{}.\n\
         Written by {}.\n\
         License GPLv3+: GNU GPL version 3 or later <http://gnu.org/licenses/gpl.html>\n\
         This is free software: you are free to change and redistribute it.\n\
         There is NO WARRANTY, to the extent permitted by law.\n",
        env!("CARGO_PKG_VERSION"),
        ARCH,
        OS,
        env!("CARGO_PKG_AUTHORS"),
    )
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

fn report<E: Write>(err: &mut E, color: bool, file: &Path, e: &Error) -> io::Result<()> {
    let mut line = b"ldig: ".to_vec();
    line.extend_from_slice(file.as_os_str().as_bytes());
    line.extend_from_slice(format!(": {}", e).as_bytes());
    write_colored(err, Color::Red, &line, color)?;
    err.write_all(b"\n")
}

/// Resolve every FILE of `config`, in order, each from the process working
/// directory.
///
/// Returns `false` if some argument failed for a reason other than a broken
/// link. Such failures are reported on the error stream and do not stop the
/// remaining arguments.
pub fn run<O: Write, E: Write>(config: &Config, streams: Streams<O, E>) -> io::Result<bool> {
    let Streams {
        mut out,
        out_color,
        mut err,
        err_color,
    } = streams;

    if config.version {
        out.write_all(banner().as_bytes())?;
    }

    // Deciding up front which arguments get printed lets list mode place its
    // separators without retracting anything. `dir/` is looked up as `dir`.
    let kept: Vec<PathBuf> = config
        .files
        .iter()
        .map(trim_trailing_separators)
        .filter(|file| {
            let keep = !config.ignore || is_symlink(file);
            if !keep {
                debug!("skipping {}: not a symbolic link", file.display());
            }
            keep
        })
        .collect();

    let mut printer = ChainPrinter::new(out, config.mode, out_color, config.explicit);
    let mut all_ok = true;

    for (i, file) in kept.into_iter().enumerate() {
        if i > 0 {
            printer.separator()?;
        }
        let ctx = Context::new(config.limits);
        match resolve(split(&file), ctx, |step| printer.step(step)) {
            Ok(()) => {}
            Err(ref e) if e.is_broken_link() => debug!("{}", e),
            Err(e) => {
                printer.interrupt()?;
                report(&mut err, err_color, &file, &e)?;
                all_ok = false;
            }
        }
    }

    printer.interrupt()?;
    err.flush()?;
    Ok(all_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::Mode;
    use crate::resolve::Limits;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    struct Outcome {
        ok: bool,
        out: String,
        err: String,
    }

    fn run_with(config: Config) -> Outcome {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run(
            &config,
            Streams {
                out: &mut out,
                out_color: false,
                err: &mut err,
                err_color: false,
            },
        )
        .unwrap();
        Outcome {
            ok,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("file"), b"").unwrap();
        fs::write(dir.path().join("other"), b"").unwrap();
        symlink("file", dir.path().join("link")).unwrap();
        symlink("link", dir.path().join("link2")).unwrap();
        symlink("missing", dir.path().join("dangling")).unwrap();
        symlink("loop", dir.path().join("loop")).unwrap();
        dir
    }

    fn config(dir: &TempDir, files: &[&str]) -> Config {
        Config {
            files: files.iter().map(|f| dir.path().join(f)).collect(),
            ..Config::default()
        }
    }

    fn shown(dir: &TempDir, s: &str) -> String {
        s.replace(&format!("{}/", dir.path().display()), "")
    }

    #[test]
    fn inline_chain() {
        let dir = fixture();
        let outcome = run_with(config(&dir, &["link2"]));
        assert!(outcome.ok);
        assert_eq!(shown(&dir, &outcome.out), "link2 -> link -> file\n");
        assert!(outcome.err.is_empty());
    }

    #[test]
    fn list_mode_separates_chains() {
        let dir = fixture();
        let outcome = run_with(Config {
            mode: Mode::Listed,
            ..config(&dir, &["file", "other"])
        });
        assert_eq!(shown(&dir, &outcome.out), "file\n\nother\n");
    }

    #[test]
    fn ignore_skips_regular_files() {
        let dir = fixture();
        let outcome = run_with(Config {
            ignore: true,
            ..config(&dir, &["file"])
        });
        assert!(outcome.ok);
        assert!(outcome.out.is_empty());
        assert!(outcome.err.is_empty());
    }

    #[test]
    fn ignore_in_list_mode_keeps_separators_tidy() {
        let dir = fixture();
        let outcome = run_with(Config {
            ignore: true,
            mode: Mode::Listed,
            ..config(&dir, &["file", "link", "other", "link2", "nothing"])
        });
        assert_eq!(
            shown(&dir, &outcome.out),
            "link\nfile\n\nlink2\nlink\nfile\n"
        );
    }

    #[test]
    fn broken_link_is_not_a_failure() {
        let dir = fixture();
        let outcome = run_with(config(&dir, &["dangling", "file"]));
        assert!(outcome.ok);
        assert_eq!(
            shown(&dir, &outcome.out),
            "dangling (broken symlink or no such file)\nfile\n"
        );
        assert!(outcome.err.is_empty());
    }

    #[test]
    fn cycle_is_reported_and_next_argument_still_runs() {
        let dir = fixture();
        let outcome = run_with(Config {
            limits: Limits {
                max_hops: 2,
                ..Limits::default()
            },
            ..config(&dir, &["loop", "file"])
        });
        assert!(!outcome.ok);
        assert_eq!(shown(&dir, &outcome.out), "loop -> loop -> ...\nfile\n");
        assert!(outcome.err.contains("too many levels of symbolic links"));
    }

    #[test]
    fn long_target_shows_its_link_before_the_error() {
        let dir = fixture();
        let outcome = run_with(Config {
            limits: Limits {
                max_target_len: 2,
                ..Limits::default()
            },
            ..config(&dir, &["link2", "file"])
        });
        assert!(!outcome.ok);
        assert_eq!(shown(&dir, &outcome.out), "link2 -> ...\nfile\n");
        assert!(shown(&dir, &outcome.err).contains("link target of 'link2' is 4 bytes long"));
    }

    #[test]
    fn symlinked_directory_with_trailing_slash() {
        let dir = fixture();
        fs::create_dir(dir.path().join("real")).unwrap();
        symlink("real", dir.path().join("alias")).unwrap();

        let outcome = run_with(Config {
            ignore: true,
            ..config(&dir, &["alias/", "real/"])
        });
        assert!(outcome.ok);
        assert_eq!(shown(&dir, &outcome.out), "alias -> real\n");
        assert!(outcome.err.is_empty());
    }

    #[test]
    fn relative_arguments_do_not_leak_into_each_other() {
        let dir = fixture();
        fs::create_dir(dir.path().join("sub")).unwrap();
        symlink("../file", dir.path().join("sub/up")).unwrap();

        let outcome = run_with(config(&dir, &["sub/up", "link"]));
        assert_eq!(shown(&dir, &outcome.out), "sub/up -> ../file\nlink -> file\n");
    }

    #[test]
    fn version_banner_comes_first() {
        let dir = fixture();
        let outcome = run_with(Config {
            version: true,
            ..config(&dir, &["file"])
        });
        assert!(outcome.out.starts_with(&banner()));
        assert!(outcome.out.ends_with("file\n"));
    }

    #[test]
    fn banner_names_the_program() {
        let text = banner();
        assert!(text.starts_with(&format!("ldig {}", env!("CARGO_PKG_VERSION"))));
        assert!(text.contains("GPLv3+"));
        assert_eq!(text.lines().count(), 6);
    }
}

use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;

use crate::path::normalize;
use crate::resolve::ResolutionStep;

// # Colors

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Gray,
}

impl Color {
    fn escape(self) -> &'static str {
        match self {
            Color::Red => "\x1B[31m",
            Color::Gray => "\x1B[90m",
        }
    }
}

const RESET: &str = "\x1B[0m";

/// Whether `fd` is an ansi-capable terminal.
pub fn is_terminal(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

/// Write `text` to `stream`, wrapped in `color` escapes when `enabled`.
///
/// The text itself is written unchanged either way.
pub fn write_colored<W: Write + ?Sized>(
    stream: &mut W,
    color: Color,
    text: &[u8],
    enabled: bool,
) -> io::Result<()> {
    if enabled {
        stream.write_all(color.escape().as_bytes())?;
        stream.write_all(text)?;
        stream.write_all(RESET.as_bytes())
    } else {
        stream.write_all(text)
    }
}

// # Chains

/// How the hops of a chain are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `a -> b -> c` on a single line.
    Inline,
    /// One hop per line, a blank line between chains.
    Listed,
}

const ARROW: &[u8] = b" -> ";
const BROKEN: &[u8] = b" (broken symlink or no such file)";
const CUT: &[u8] = b"...";

/// Renders resolution steps as they arrive.
pub struct ChainPrinter<W> {
    out: W,
    mode: Mode,
    color: bool,
    explicit: bool,
    /// An inline chain has been started but not yet terminated.
    open: bool,
}

impl<W: Write> ChainPrinter<W> {
    pub fn new(out: W, mode: Mode, color: bool, explicit: bool) -> Self {
        ChainPrinter {
            out,
            mode,
            color,
            explicit,
            open: false,
        }
    }

    pub fn step(&mut self, step: &ResolutionStep) -> io::Result<()> {
        let mut path = step.rendered();
        if self.explicit {
            // Rendered steps always carry a leaf, so this cannot fail.
            if let Ok(marked) = normalize(&path) {
                path = marked;
            }
        }
        let text = path.as_os_str().as_bytes();

        if step.is_broken {
            let mut label = text.to_vec();
            label.extend_from_slice(BROKEN);
            write_colored(&mut self.out, Color::Red, &label, self.color)?;
            return self.end_line();
        }

        self.out.write_all(text)?;
        if step.is_terminal {
            return self.end_line();
        }
        match self.mode {
            Mode::Inline => {
                self.open = true;
                write_colored(&mut self.out, Color::Gray, ARROW, self.color)
            }
            Mode::Listed => self.end_line(),
        }
    }

    /// Close a chain that stopped before reaching a terminal step.
    pub fn interrupt(&mut self) -> io::Result<()> {
        if self.open {
            self.out.write_all(CUT)?;
            self.end_line()?;
        }
        self.out.flush()
    }

    /// Blank line between two listed chains.
    pub fn separator(&mut self) -> io::Result<()> {
        if self.mode == Mode::Listed {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn end_line(&mut self) -> io::Result<()> {
        self.open = false;
        self.out.write_all(b"\n")
    }
}

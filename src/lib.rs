extern crate clap;
extern crate libc;
extern crate log;
extern crate thiserror;

pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod path;
pub mod print;
pub mod resolve;

pub use config::{app, ColorChoice, Config};
pub use driver::{banner, run, Streams};
pub use error::{Error, Result};
pub use path::{is_accessible, normalize, split, trim_trailing_separators, SplitPath};
pub use print::{write_colored, ChainPrinter, Color, Mode};
pub use resolve::{resolve, Context, Hops, Limits, ResolutionStep};

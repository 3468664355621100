//! Command line surface and the configuration it produces.

use std::path::PathBuf;

use clap::{App, AppSettings, Arg, ArgMatches};

use crate::error::{Error, Result};
use crate::print::{is_terminal, Mode};
use crate::resolve::{Limits, DEFAULT_MAX_HOPS};

/// When to decorate output with ansi colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn parse(s: &str) -> Self {
        match s {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }

    /// Resolve the choice for the stream behind `fd`.
    pub fn enabled_for(self, fd: i32) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => cfg!(target_os = "linux") && is_terminal(fd),
        }
    }
}

/// Everything one invocation needs, gathered once after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub version: bool,
    pub ignore: bool,
    pub mode: Mode,
    pub explicit: bool,
    pub color: ColorChoice,
    pub limits: Limits,
    pub files: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: false,
            ignore: false,
            mode: Mode::Inline,
            explicit: false,
            color: ColorChoice::Auto,
            limits: Limits::default(),
            files: Vec::new(),
        }
    }
}

fn validate_hops(v: String) -> std::result::Result<(), String> {
    match v.parse::<usize>() {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(format!("'{}' is not a positive number of hops", v)),
    }
}

pub fn app() -> App<'static, 'static> {
    App::new("ldig")
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("ldig, print symbolic links recursively.")
        .setting(AppSettings::DisableVersion)
        .arg(Arg::with_name("version")
            .short("v")
            .long("version")
            .help("Print version information, then resolve any FILE given")
        )
        .arg(Arg::with_name("ignore")
            .short("i")
            .long("ignore")
            .help("Ignore FILE arguments that are not symbolic links")
        )
        .arg(Arg::with_name("list")
            .short("l")
            .long("list")
            .help("List one file per line")
        )
        .arg(Arg::with_name("explicit")
            .short("x")
            .long("explicit")
            .help("Prefix bare relative paths with ./")
        )
        .arg(Arg::with_name("color")
            .long("color")
            .value_name("WHEN")
            .possible_values(&["auto", "always", "never"])
            .default_value("auto")
            .help("When to use colors")
        )
        .arg(Arg::with_name("max-hops")
            .long("max-hops")
            .value_name("N")
            .validator(validate_hops)
            .help("Give up after following N symbolic links [default: 40]")
        )
        .arg(Arg::with_name("FILE")
            .help("The files to resolve")
            .multiple(true)
        )
}

impl Config {
    /// Build the configuration from parsed arguments.
    ///
    /// Fails when no FILE is given, unless `--version` was asked for.
    pub fn from_matches(matches: &ArgMatches) -> Result<Config> {
        let files: Vec<PathBuf> = matches
            .values_of_os("FILE")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default();
        let version = matches.is_present("version");
        if files.is_empty() && !version {
            return Err(Error::TooFewArguments);
        }

        let max_hops = matches
            .value_of("max-hops")
            .and_then(|n| n.parse().ok())
            .unwrap_or(DEFAULT_MAX_HOPS);

        Ok(Config {
            version,
            ignore: matches.is_present("ignore"),
            mode: if matches.is_present("list") {
                Mode::Listed
            } else {
                Mode::Inline
            },
            explicit: matches.is_present("explicit"),
            color: ColorChoice::parse(matches.value_of("color").unwrap_or("auto")),
            limits: Limits {
                max_hops,
                ..Limits::default()
            },
            files,
        })
    }
}

extern crate ldig;

use std::io;
use std::process;

use ldig::*;

fn main() {
    logging::init();

    let matches = app().get_matches();
    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ldig: {}", e);
            eprintln!("{}", matches.usage());
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    let streams = Streams {
        out: stdout.lock(),
        out_color: config.color.enabled_for(libc::STDOUT_FILENO),
        err: stderr.lock(),
        err_color: config.color.enabled_for(libc::STDERR_FILENO),
    };

    match run(&config, streams) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("ldig: {}", e);
            process::exit(1);
        }
    }
}

// src/main.rs

use std::process;

use tracing::error;

use waybridge::{cli, logging};

fn main() {
    process::exit(real_main());
}

fn real_main() -> i32 {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    let invocation = match cli::parse(&tokens) {
        Ok(invocation) => invocation,
        Err(err) => {
            // Usage errors surface before logging is up.
            eprintln!("waybridge: {err}");
            return 1;
        }
    };

    let args = match invocation {
        cli::Invocation::Help => {
            cli::print_help();
            return 0;
        }
        cli::Invocation::Version => {
            cli::print_version();
            return 0;
        }
        cli::Invocation::Launch(args) => args,
    };

    if let Err(err) = logging::init_logging(args.verbosity) {
        eprintln!("waybridge: {err}");
        return 1;
    }

    match waybridge::run(args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            1
        }
    }
}

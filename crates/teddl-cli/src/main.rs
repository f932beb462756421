use clap::Parser;
use teddl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible; stderr if the state dir is unusable.
    if logging::init_logging(cli.verbose).is_err() {
        logging::init_logging_stderr(cli.verbose);
    }

    match cli.run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("teddl error: {:#}", err);
            std::process::exit(1);
        }
    }
}

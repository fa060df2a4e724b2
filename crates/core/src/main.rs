mod cli;
mod runner;

use cli::CLI;

use clap::Parser;

use std::process::exit;

fn main() {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let cli = CLI::parse();

    match runner::run(&cli.path) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(err) => {
            eprintln!("{}: {}", cli.path.display(), err);
            exit(1);
        }
    }
}

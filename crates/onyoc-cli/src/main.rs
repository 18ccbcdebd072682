mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let code = match commands::run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    };
    std::process::exit(code);
}

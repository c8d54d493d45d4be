//! docfill CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, run the fill and
//! exit with the status code of its outcome. For programmatic use, prefer the
//! library API (`docfill::api`).

use clap::Parser;

mod cli;

fn main() {
    let code = match cli::CliArgs::try_parse() {
        Ok(args) => cli::run(args),
        Err(e) => {
            // help and version go to stdout, usage errors to stderr
            let _ = e.print();
            cli::AppError::Args(e).exit_code()
        }
    };
    std::process::exit(code.code());
}

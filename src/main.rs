use clap::Parser;
use stratrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

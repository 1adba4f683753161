use clap::Parser;
use sahambot::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

use clap::Parser;
use stockscope::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    stockscope::logging::setup_logging(cli.log_level.as_str());
    run(cli)
}

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod platform;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate(args) => platform::app::run_generate(args),
        Commands::InitConfig { path } => platform::config::init_config(path).map(|path| {
            println!("Wrote default configuration to {}", path.display());
            ExitCode::SUCCESS
        }),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

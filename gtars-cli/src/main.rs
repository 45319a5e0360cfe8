mod svtrain;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "gtars";
    pub const DEFAULT_LOG_FILTER: &str = "info";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Performance critical tools for genomic analysis, including training the structural variant genotyper.")
        .subcommand_required(true)
        .subcommand(svtrain::cli::create_svtrain_cli())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(consts::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // SV GENOTYPER TRAINING
        //
        Some((svtrain::cli::SVTRAIN_CMD, matches)) => {
            svtrain::handlers::run_svtrain(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

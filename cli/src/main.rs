use clap::Parser;
use pullgraph_cli::{RunArgs, commands, logging};

#[derive(Parser)]
#[command(
    version,
    about = "Split ACT network logs into pulls and chart their progression"
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    commands::run(&cli.run)
}

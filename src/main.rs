use anyhow::Result;
use clap::Parser;
use outlay::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    outlay::logging::init(cli.verbose, cli.log_file.as_deref())?;
    cli.run().await
}

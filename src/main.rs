use anyhow::Result;
use clap::Parser;
use tutorbook::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

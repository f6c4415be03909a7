//! `pathway`: explore, search and validate career domains from the terminal.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}

use clap::Parser;
use tracing::instrument;

use super::{OutputFormat, Workspace, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Look up job roles containing a search term")]
pub struct Roles {
    /// Case-insensitive part of the role name
    query: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Roles {
    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let roles = workspace.catalog()?.search_job_roles(&self.query);

        match self.output {
            OutputFormat::Json => print_json(&roles)?,
            OutputFormat::Table if roles.is_empty() => {
                println!("{}", format!("No job roles match '{}'.", self.query).warning());
            }
            OutputFormat::Table => {
                for role in roles {
                    println!("{role}");
                }
            }
        }
        Ok(())
    }
}

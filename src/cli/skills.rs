use clap::Parser;
use tracing::instrument;

use super::{OutputFormat, Workspace, print_json};

#[derive(Debug, Parser)]
#[command(about = "List the skills the taxonomy mentions")]
pub struct Skills {
    /// Only skills asked for by this domain
    #[arg(long, value_name = "ID")]
    domain: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Skills {
    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let catalog = workspace.catalog()?;

        let skills: Vec<String> = match &self.domain {
            None => catalog.all_skills(),
            Some(id) => {
                let Some(domain) = catalog.domain(id) else {
                    eprintln!("Domain '{id}' not found");
                    std::process::exit(1);
                };
                domain.skill_pool().into_iter().map(str::to_string).collect()
            }
        };

        match self.output {
            OutputFormat::Json => print_json(&skills)?,
            OutputFormat::Table => {
                for skill in skills {
                    println!("{skill}");
                }
            }
        }
        Ok(())
    }
}

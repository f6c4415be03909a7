use clap::Parser;
use pathway::Domain;
use serde::Serialize;
use tracing::instrument;

use super::{OutputFormat, Workspace, print_json, print_table, terminal::Colorize};

#[derive(Debug, Default, Parser)]
#[command(about = "List career domains")]
pub struct Domains {
    /// Only high-demand domains, fastest-growing first
    #[arg(long)]
    trending: bool,

    /// Limit number of rows returned (defaults to the configured limit)
    #[arg(long)]
    limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DomainRow<'a> {
    id: &'a str,
    name: &'a str,
    demand: pathway::domain::Demand,
    growth_rate: f64,
    subfields: usize,
    careers: usize,
    internships: usize,
}

impl<'a> From<&'a Domain> for DomainRow<'a> {
    fn from(domain: &'a Domain) -> Self {
        Self {
            id: &domain.id,
            name: &domain.name,
            demand: domain.industry_trends.demand,
            growth_rate: domain.industry_trends.growth_rate,
            subfields: domain.subfields.len(),
            careers: domain.career_examples.len(),
            internships: domain.internships.len(),
        }
    }
}

impl Domains {
    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let catalog = workspace.catalog()?;
        let limit = self.limit.unwrap_or_else(|| workspace.limit());

        let domains: Vec<&Domain> = if self.trending {
            catalog.trending_domains(limit)
        } else {
            catalog.domains().iter().take(limit).collect()
        };
        let rows: Vec<DomainRow<'_>> = domains.into_iter().map(DomainRow::from).collect();

        match self.output {
            OutputFormat::Json => print_json(&rows)?,
            OutputFormat::Table => {
                if rows.is_empty() {
                    println!("{}", "No domains found.".warning());
                    return Ok(());
                }
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.id.to_string(),
                            row.name.to_string(),
                            row.demand.to_string(),
                            format!("{}%", row.growth_rate),
                            row.subfields.to_string(),
                            row.careers.to_string(),
                        ]
                    })
                    .collect();
                print_table(
                    &["ID", "NAME", "DEMAND", "GROWTH", "SUBFIELDS", "CAREERS"],
                    &table,
                );
            }
        }
        Ok(())
    }
}

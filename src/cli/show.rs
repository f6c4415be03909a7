use clap::Parser;
use pathway::{Catalog, Domain};
use serde::Serialize;
use tracing::instrument;

use super::{OutputFormat, Workspace, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a domain")]
pub struct Show {
    /// The id of the domain to display
    domain: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DomainDetail<'a> {
    #[serde(flatten)]
    domain: &'a Domain,
    resolved_related_domains: Vec<&'a str>,
}

impl Show {
    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let catalog = workspace.catalog()?;

        let Some(domain) = catalog.domain(self.domain.trim()) else {
            eprintln!("Domain '{}' not found", self.domain);
            std::process::exit(1);
        };

        match self.output {
            OutputFormat::Json => print_json(&DomainDetail {
                domain,
                resolved_related_domains: catalog
                    .related_domains(&domain.id)
                    .into_iter()
                    .map(|related| related.id.as_str())
                    .collect(),
            })?,
            OutputFormat::Table => Self::output_pretty(&catalog, domain),
        }
        Ok(())
    }

    fn output_pretty(catalog: &Catalog, domain: &Domain) {
        let trends = &domain.industry_trends;

        println!("# {}", domain.name);
        println!("{}\n", domain.description);

        println!("{}", "Market".dim());
        println!("  Id:              {}", domain.id);
        println!("  Demand:          {}", trends.demand);
        println!("  Growth:          {}%", trends.growth_rate);
        println!("  Competitiveness: {}", trends.competitiveness);
        if !trends.emerging_roles.is_empty() {
            println!("  Emerging roles:  {}", trends.emerging_roles.join(", "));
        }

        if !domain.subfields.is_empty() {
            println!("\n{}", "Subfields".dim());
            for subfield in &domain.subfields {
                println!("  • {} ({})", subfield.name, subfield.id.as_str().info());
                if !subfield.job_roles.is_empty() {
                    println!("      roles:  {}", subfield.job_roles.join(", "));
                }
                if !subfield.required_skills.is_empty() {
                    println!("      skills: {}", subfield.required_skills.join(", "));
                }
            }
        }

        if !domain.career_examples.is_empty() {
            println!("\n{}", "Careers".dim());
            for career in &domain.career_examples {
                let salary = &career.salary_range;
                println!(
                    "  • {} [{}] {}-{} {}",
                    career.title, career.experience_level, salary.min, salary.max, salary.currency
                );
            }
        }

        if !domain.internships.is_empty() {
            println!("\n{}", "Internships".dim());
            for internship in &domain.internships {
                println!("  • {} ({})", internship.title, internship.duration);
            }
        }

        if !domain.experience_levels.is_empty() {
            println!("\n{}", "Career stages".dim());
            for info in &domain.experience_levels {
                println!(
                    "  • {:<10} {} ({} years)",
                    info.level.as_str(),
                    info.title,
                    info.years_experience
                );
            }
        }

        let related = catalog.related_domains(&domain.id);
        if !related.is_empty() {
            println!("\n{}", "Related domains".dim());
            for other in related {
                println!("  • {} ({})", other.name, other.id);
            }
        }
    }
}

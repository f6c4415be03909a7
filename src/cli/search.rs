use clap::Parser;
use pathway::{
    ExperienceLevel, SearchFilters,
    domain::{ResultKind, SalaryRange, WorkEnvironment},
};
use tracing::instrument;

use super::{
    OutputFormat, Workspace, print_json, print_table,
    terminal::{self, Colorize},
};

const DESCRIPTION_WIDTH: usize = 48;

#[derive(Debug, Parser)]
#[command(about = "Search domains, subfields, careers and internships")]
pub struct Search {
    /// Free-text query (case-insensitive substring match)
    query: Option<String>,

    /// Restrict to these domains
    #[arg(long = "domain", value_name = "ID")]
    domains: Vec<String>,

    /// Restrict to these subfields
    #[arg(long = "subfield", value_name = "ID")]
    subfields: Vec<String>,

    /// Only careers at these experience levels
    #[arg(long = "level", value_name = "LEVEL")]
    levels: Vec<ExperienceLevel>,

    /// Only careers paying at least this much
    #[arg(long, value_name = "AMOUNT", requires = "salary_max")]
    salary_min: Option<u32>,

    /// Only careers paying at most this much
    #[arg(long, value_name = "AMOUNT", requires = "salary_min")]
    salary_max: Option<u32>,

    /// Only careers that can be done remotely
    #[arg(long)]
    remote: bool,

    /// Only careers offering hybrid work
    #[arg(long)]
    hybrid: bool,

    /// Only careers offering on-site work
    #[arg(long)]
    onsite: bool,

    /// Only entries asking for one of these skills
    #[arg(long = "skill", value_name = "SKILL")]
    skills: Vec<String>,

    /// Only entries with one of these keywords
    #[arg(long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Limit number of rows returned (defaults to the configured limit)
    #[arg(long)]
    limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Search {
    fn filters(&self) -> SearchFilters {
        let salary_range = match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some(SalaryRange::new(min, max)),
            _ => None,
        };
        let work_environment = (self.remote || self.hybrid || self.onsite).then_some(
            WorkEnvironment {
                remote: self.remote,
                hybrid: self.hybrid,
                onsite: self.onsite,
            },
        );

        SearchFilters {
            query: self.query.clone(),
            domain_ids: self.domains.clone(),
            subfield_ids: self.subfields.clone(),
            experience_levels: self.levels.clone(),
            salary_range,
            work_environment,
            skills: self.skills.clone(),
            keywords: self.keywords.clone(),
        }
    }

    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let catalog = workspace.catalog()?;
        let filters = self.filters();
        let mut response = catalog.search(&filters);
        response
            .results
            .truncate(self.limit.unwrap_or_else(|| workspace.limit()));

        if self.output == OutputFormat::Json {
            return print_json(&response);
        }

        if response.results.is_empty() {
            println!("{}", "No matches.".warning());
        } else {
            let narrow = terminal::is_narrow();
            let mut headers = vec!["TYPE", "ID", "TITLE", "SCORE"];
            if !narrow {
                headers.extend(["PARENT", "DESCRIPTION"]);
            }

            let rows: Vec<Vec<String>> = response
                .results
                .iter()
                .map(|result| {
                    let mut row = vec![
                        kind_label(result.kind).to_string(),
                        result.id.to_string(),
                        result.title.to_string(),
                        format!("{:.2}", result.relevance_score),
                    ];
                    if !narrow {
                        row.push(
                            result
                                .parent_subfield
                                .or(result.parent_domain)
                                .unwrap_or_default()
                                .to_string(),
                        );
                        row.push(terminal::truncate(result.description, DESCRIPTION_WIDTH));
                    }
                    row
                })
                .collect();
            print_table(&headers, &rows);

            if response.total_count > response.results.len() {
                println!(
                    "{}",
                    format!(
                        "Showing {} of {} matches",
                        response.results.len(),
                        response.total_count
                    )
                    .dim()
                );
            }
        }

        if !response.suggestions.is_empty() {
            println!(
                "\n{} {}",
                "Try:".info(),
                response.suggestions.join(", ")
            );
        }
        Ok(())
    }
}

const fn kind_label(kind: ResultKind) -> &'static str {
    match kind {
        ResultKind::Domain => "domain",
        ResultKind::Subfield => "subfield",
        ResultKind::Career => "career",
        ResultKind::Internship => "internship",
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pathway::{DomainSelection, Skill, ValidationResult};
use tracing::instrument;

use super::{OutputFormat, Workspace, print_json, terminal::Colorize};

/// Exit status used when validation finds errors.
pub const INVALID_EXIT_CODE: i32 = 2;

#[derive(Debug, Parser)]
#[command(about = "Check a domain selection for consistency and skill alignment")]
pub struct Validate {
    /// Read the selection from a JSON file instead of flags
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["domain", "subfield", "career", "level", "skills", "goals"]
    )]
    file: Option<PathBuf>,

    /// The selected domain
    #[arg(long, value_name = "ID", required_unless_present = "file")]
    domain: Option<String>,

    /// The selected subfield
    #[arg(long, value_name = "ID")]
    subfield: Option<String>,

    /// The selected career example
    #[arg(long, value_name = "ID")]
    career: Option<String>,

    /// The selected experience level
    #[arg(long, value_name = "LEVEL")]
    level: Option<String>,

    /// A skill you have (repeatable)
    #[arg(long = "skill", value_name = "SKILL")]
    skills: Vec<String>,

    /// A career goal (repeatable)
    #[arg(long = "goal", value_name = "GOAL")]
    goals: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Validate {
    fn selection(&self) -> anyhow::Result<DomainSelection> {
        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("failed to parse selection in {}", path.display()));
        }

        Ok(DomainSelection {
            domain_id: self.domain.clone(),
            subfield_id: self.subfield.clone(),
            career_example_id: self.career.clone(),
            experience_level: self.level.clone(),
            selected_skills: self.skills.iter().map(|s| Skill::from(s.as_str())).collect(),
            career_goals: self.goals.clone(),
        })
    }

    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let catalog = workspace.catalog()?;
        let selection = self.selection()?;
        let result = catalog.validate_selection(&selection);

        report(&result, self.output, "Selection is valid")
    }
}

/// Prints a validation result and exits with [`INVALID_EXIT_CODE`] if it has
/// errors.
pub fn report(result: &ValidationResult, output: OutputFormat, ok: &str) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => print_json(result)?,
        OutputFormat::Table => {
            for error in &result.errors {
                println!(
                    "{} {}: {} {}",
                    "✗".failure(),
                    error.field,
                    error.message,
                    format!("[{}]", error.code).dim()
                );
            }
            for warning in &result.warnings {
                println!("{} {}: {}", "⚠".warning(), warning.field, warning.message);
                if let Some(suggestion) = &warning.suggestion {
                    println!("    {}", suggestion.dim());
                }
            }
            if result.is_valid {
                println!("{}", format!("✅ {ok}").success());
            }
        }
    }

    if !result.is_valid {
        std::process::exit(INVALID_EXIT_CODE);
    }
    Ok(())
}

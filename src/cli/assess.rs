use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pathway::AssessmentForm;
use tracing::instrument;

use super::{OutputFormat, Workspace, validate::report};

#[derive(Debug, Parser)]
#[command(about = "Check an assessment form")]
pub struct Assess {
    /// JSON file holding the form
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Assess {
    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let catalog = workspace.catalog()?;
        let content = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        let form: AssessmentForm = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse form in {}", self.file.display()))?;

        report(&catalog.validate_assessment(&form), self.output, "Form is complete")
    }
}

use clap::Parser;
use pathway::{ExperienceLevel, Skill, domain::normalize_skills};
use tracing::instrument;

use super::{OutputFormat, Workspace, print_json, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Recommend career domains for a profile")]
pub struct Recommend {
    /// A skill you have (repeatable)
    #[arg(long = "skill", value_name = "SKILL", required = true)]
    skills: Vec<String>,

    /// Something you are interested in (repeatable)
    #[arg(long = "interest", value_name = "INTEREST")]
    interests: Vec<String>,

    /// Your current or target experience level
    #[arg(long, value_name = "LEVEL", default_value = "entry")]
    level: ExperienceLevel,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Recommend {
    #[instrument(level = "debug", skip(self, workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let catalog = workspace.catalog()?;
        let skills: Vec<Skill> = self.skills.iter().map(|s| Skill::from(s.as_str())).collect();
        let skills = normalize_skills(&skills);

        let recommendations = catalog.recommend(&skills, &self.interests, self.level);

        if self.output == OutputFormat::Json {
            return print_json(&recommendations);
        }

        if recommendations.is_empty() {
            println!(
                "{}",
                "No domain is a strong enough match. Try adding more skills or interests.".warning()
            );
            return Ok(());
        }

        for (rank, recommendation) in recommendations.iter().enumerate() {
            println!(
                "{}. {} {}",
                rank + 1,
                recommendation.domain.name,
                format!("({:.0}% match)", recommendation.match_score * 100.0).success()
            );
            for reason in &recommendation.match_reasons {
                println!("   • {reason}");
            }

            if !recommendation.recommended_subfields.is_empty() {
                let names: Vec<&str> = recommendation
                    .recommended_subfields
                    .iter()
                    .map(|subfield| subfield.name.as_str())
                    .collect();
                println!("   {} {}", "Subfields:".dim(), names.join(", "));
            }
            if !recommendation.recommended_careers.is_empty() {
                let titles: Vec<&str> = recommendation
                    .recommended_careers
                    .iter()
                    .map(|career| career.title.as_str())
                    .collect();
                println!("   {} {}", "Careers:".dim(), titles.join(", "));
            }
            if !recommendation.learning_path.is_empty() {
                println!("   {}", "Learning path:".dim());
                for (step, item) in recommendation.learning_path.iter().enumerate() {
                    println!("     {}. {item}", step + 1);
                }
            }
            println!();
        }
        Ok(())
    }
}

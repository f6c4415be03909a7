use std::path::PathBuf;

mod assess;
mod domains;
mod recommend;
mod roles;
mod search;
mod show;
mod skills;
mod terminal;
mod validate;

use anyhow::Context;
use assess::Assess;
use clap::ArgAction;
use domains::Domains;
use pathway::{Catalog, Config};
use recommend::Recommend;
use roles::Roles;
use search::Search;
use serde::Serialize;
use show::Show;
use skills::Skills;
use tracing::instrument;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The workspace root, where `pathway.toml` is looked up
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Taxonomy file to load, overriding the configured one (relative to the
    /// root)
    #[arg(short, long, global = true)]
    taxonomy: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let workspace = Workspace::open(self.root, self.taxonomy)?;

        self.command
            .unwrap_or_else(|| Command::Domains(Domains::default()))
            .run(&workspace)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List career domains (default)
    Domains(Domains),

    /// Show a domain in detail
    Show(Show),

    /// Search domains, subfields, careers and internships
    Search(Search),

    /// Recommend domains for a set of skills and interests
    Recommend(Recommend),

    /// Check a domain selection for consistency
    ///
    /// Exits with status 2 when the selection has errors.
    Validate(Validate),

    /// Check an assessment form
    ///
    /// Exits with status 2 when the form has errors.
    Assess(Assess),

    /// Look up job roles by name
    Roles(Roles),

    /// List every skill the taxonomy mentions
    Skills(Skills),
}

impl Command {
    fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        match self {
            Self::Domains(command) => command.run(workspace)?,
            Self::Show(command) => command.run(workspace)?,
            Self::Search(command) => command.run(workspace)?,
            Self::Recommend(command) => command.run(workspace)?,
            Self::Validate(command) => command.run(workspace)?,
            Self::Assess(command) => command.run(workspace)?,
            Self::Roles(command) => command.run(workspace)?,
            Self::Skills(command) => command.run(workspace)?,
        }
        Ok(())
    }
}

/// The workspace root together with its resolved configuration.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    #[instrument(level = "debug")]
    fn open(root: PathBuf, taxonomy: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut config = Config::load_or_default(&root).map_err(anyhow::Error::msg)?;
        if let Some(taxonomy) = taxonomy {
            config.set_taxonomy(taxonomy);
        }
        Ok(Self { root, config })
    }

    /// Loads the configured taxonomy.
    pub fn catalog(&self) -> anyhow::Result<Catalog> {
        let path = self.config.taxonomy_path(&self.root);
        let catalog = pathway::load_catalog(&path)
            .with_context(|| format!("failed to load taxonomy from {}", path.display()))?;
        tracing::info!(domains = catalog.len(), path = %path.display(), "taxonomy loaded");
        Ok(catalog)
    }

    /// Default row limit for listings.
    pub const fn limit(&self) -> usize {
        self.config.limit
    }
}

/// Output formats shared by every command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Writes `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value).context("failed to render json output")?;
    println!();
    Ok(())
}

/// Prints rows as an aligned table under `headers`.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect::<Vec<_>>();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();

    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in rows {
        for (value, width) in row.iter().zip(&widths) {
            print!("{value:<width$}  ");
        }
        println!();
    }
}

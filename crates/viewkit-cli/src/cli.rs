//! Command-line interface definition and command execution.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use viewkit::{LoaderConfig, Templates, TemplatesBuilder};

/// Check and render viewkit template trees
#[derive(Debug, Parser)]
#[command(name = "viewkit")]
#[command(version)]
#[command(about = "Check and render view/partial template trees")]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub loader: LoaderArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options that control how the template tree is loaded.
#[derive(Debug, Default, Args)]
pub struct LoaderArgs {
    /// YAML loader config file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of the views subdirectory
    #[arg(long, global = true, value_name = "NAME")]
    pub views_dir: Option<String>,

    /// Only load files with this extension (repeatable)
    #[arg(short = 'e', long = "ext", global = true, value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Fail on undefined variables
    #[arg(long, global = true)]
    pub strict: bool,
}

impl LoaderArgs {
    /// Merges the config file (if any) with command-line overrides.
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => LoaderConfig::default(),
        };

        if let Some(views_dir) = &self.views_dir {
            config.views_dir = views_dir.clone();
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions.clone();
        }
        if self.strict {
            config.strict_undefined = true;
        }
        Ok(config)
    }

    fn build(&self, dir: &Path) -> Result<Templates> {
        let config = self.loader_config()?;
        debug!(?config, dir = %dir.display(), "building templates");
        TemplatesBuilder::from_config(config)
            .build(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a template tree and list its views and partials
    Check {
        /// Template root directory
        dir: PathBuf,
    },

    /// Render a view through a layout
    Render {
        /// Template root directory
        dir: PathBuf,

        /// View path relative to the root (e.g. views/index.html)
        view: String,

        /// Template to render through the view
        #[arg(short, long, default_value = "base.html")]
        template: String,

        /// JSON file with the render data
        #[arg(short, long, value_name = "FILE")]
        data: Option<PathBuf>,
    },
}

/// Runs the parsed command, writing normal output to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    match &cli.command {
        Command::Check { dir } => check(&cli.loader, dir, out),
        Command::Render {
            dir,
            view,
            template,
            data,
        } => render(&cli.loader, dir, view, template, data.as_deref(), out),
    }
}

fn check<W: Write>(loader: &LoaderArgs, dir: &Path, out: &mut W) -> Result<()> {
    let templates = loader.build(dir)?;

    writeln!(out, "views ({}):", templates.len())?;
    for name in templates.view_names() {
        writeln!(out, "  {name}")?;
    }
    let partials: Vec<&str> = templates.partial_names().collect();
    writeln!(out, "partials ({}):", partials.len())?;
    for name in partials {
        writeln!(out, "  {name}")?;
    }
    Ok(())
}

fn render<W: Write>(
    loader: &LoaderArgs,
    dir: &Path,
    view: &str,
    template: &str,
    data: Option<&Path>,
    out: &mut W,
) -> Result<()> {
    let templates = loader.build(dir)?;
    let data = match data {
        Some(path) => read_data(path)?,
        None => serde_json::Value::Null,
    };

    // Only write once the whole page rendered.
    let page = templates
        .get(view)
        .render_to_string(template, &data)
        .with_context(|| format!("Failed to render {template} through {view}"))?;
    out.write_all(page.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn read_data(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in data file {}", path.display()))
}

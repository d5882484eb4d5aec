/*!
# Integrator Viewer CLI

Command-line entry point: interactive viewer plus batch helpers for
printing, describing and rendering integration result trees.
*/

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use integrator::cli_common::{self, CommonArgs, RendererArgs};
use integrator::shell;
use integrator::{
    DotRenderer, IntegrationTreeModel, RenderPipeline, RenderWorkspace, ResultTree,
    SelectionOutcome, Tag, ViewerConfig, ViewerStartup,
};

#[derive(Parser)]
#[command(
    name = "integrator",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect the result tree of a speculative specialization (inlining and loop peeling) pass"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive two-pane viewer
    View {
        /// Results document (JSON)
        results: PathBuf,

        #[command(flatten)]
        renderer: RendererArgs,
    },

    /// Print the result hierarchy with child-index paths
    Tree {
        /// Results document (JSON)
        results: PathBuf,
    },

    /// Write the graph description of one attempt
    Dot {
        /// Results document (JSON)
        results: PathBuf,

        /// Child-index path of the attempt, e.g. 0/2/1 (default: root)
        #[arg(short, long, default_value = "")]
        node: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render every attempt into a directory
    Export {
        /// Results document (JSON)
        results: PathBuf,

        /// Directory for the rendered images
        #[arg(long)]
        out_dir: PathBuf,

        #[command(flatten)]
        renderer: RendererArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ViewerConfig::load_or_default(cli.common.config.as_deref())?;
    let level = cli.common.log_level(config.log_level()?);

    match cli.command {
        Commands::View { results, renderer } => {
            let log_file = config
                .logging
                .file
                .clone()
                .or_else(cli_common::default_log_file);
            cli_common::init_logging(level, log_file.as_deref())?;

            let config = config.with_overrides(renderer.renderer, renderer.format);
            config.validate()?;
            let tree = load_tree(&results)?;
            if let Err(e) = shell::run_viewer(ViewerStartup::new(tree, config)) {
                cli_common::print_error(&format!("{:#}", e));
                tracing::error!("viewer stopped: {:#}", e);
                std::process::exit(1);
            }
        }

        Commands::Tree { results } => {
            cli_common::init_logging(level, None)?;
            tree_command(&results)?;
        }

        Commands::Dot {
            results,
            node,
            output,
        } => {
            cli_common::init_logging(level, None)?;
            dot_command(&results, &node, output.as_deref())?;
        }

        Commands::Export {
            results,
            out_dir,
            renderer,
        } => {
            cli_common::init_logging(level, None)?;
            let config = config.with_overrides(renderer.renderer, renderer.format);
            config.validate()?;
            export_command(&results, &out_dir, &config, &cli.common)?;
        }
    }

    Ok(())
}

fn load_tree(path: &Path) -> Result<ResultTree> {
    cli_common::validate_path(path, "Results file")?;
    ResultTree::load_from_file(path)
        .with_context(|| format!("Failed to load results from {}", path.display()))
}

fn tree_command(results: &Path) -> Result<()> {
    let tree = load_tree(results)?;
    let model = IntegrationTreeModel::new(&tree);
    let term = Term::stdout();

    for (depth, tag) in model.walk_depth_first() {
        let indent = "  ".repeat(depth);
        let path = format!("/{}", model.path_of(tag));
        let label = model.label(Some(tag));
        let line = match tag {
            Tag::Attempt(_) => format!("{}{} {}", indent, style(path).dim(), label),
            Tag::Peel(_) => format!(
                "{}{} {} {}",
                indent,
                style(path).dim(),
                style("loop").magenta(),
                style(label).magenta()
            ),
        };
        term.write_line(&line)?;
    }
    Ok(())
}

fn dot_command(results: &Path, node: &str, output: Option<&Path>) -> Result<()> {
    let tree = load_tree(results)?;
    let model = IntegrationTreeModel::new(&tree);
    let tag = model.resolve_path(node)?;
    let Some(id) = tag.as_attempt() else {
        bail!("node '{}' is a loop; only attempts have a call graph", node);
    };

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            tree.describe_as_dot(id, &mut file)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Graph description written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            tree.describe_as_dot(id, &mut stdout.lock())?;
        }
    }
    Ok(())
}

/// File name of an exported image: the child-index path with `_` separators
fn export_file_name(path: &str, extension: &str) -> String {
    if path.is_empty() {
        format!("root.{}", extension)
    } else {
        format!("{}.{}", path.replace('/', "_"), extension)
    }
}

fn export_command(
    results: &Path,
    out_dir: &Path,
    config: &ViewerConfig,
    common: &CommonArgs,
) -> Result<()> {
    let start = Instant::now();
    let tree = load_tree(results)?;
    cli_common::ensure_dir_exists(out_dir)?;

    if common.should_print() {
        cli_common::print_header(
            "integrator export",
            env!("CARGO_PKG_VERSION"),
            &format!("Rendering {} attempts into {}", tree.attempt_count(), out_dir.display()),
        );
    }

    let format = config.renderer.format;
    let workspace = match RenderWorkspace::acquire(&config.workspace.prefix, format) {
        Ok(workspace) => workspace,
        Err(e) => {
            cli_common::print_error(&e.to_string());
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let renderer = DotRenderer::new(config.renderer.program.clone(), format);
    let mut pipeline = RenderPipeline::new(workspace, renderer);

    let model = IntegrationTreeModel::new(&tree);
    let attempts: Vec<Tag> = model
        .walk_depth_first()
        .into_iter()
        .map(|(_, tag)| tag)
        .filter(|tag| tag.as_attempt().is_some())
        .collect();

    let pb = if common.should_print() {
        ProgressBar::new(attempts.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Failed to set progress style")?
            .progress_chars("#>-"),
    );

    let mut exported = 0usize;
    let mut failed = 0usize;
    for tag in attempts {
        let path = model.path_of(tag);
        pb.set_message(model.label(Some(tag)).to_string());

        if pipeline.select(&tree, Some(tag)) != SelectionOutcome::Displayed {
            pb.inc(1);
            continue;
        }

        match pipeline.last_failure() {
            Some(failure) => {
                warn!(node = %path, "export failed: {}", failure);
                failed += 1;
            }
            None => {
                let target = out_dir.join(export_file_name(&path, format.extension()));
                let source = pipeline.workspace().output_image_path();
                match std::fs::copy(source, &target) {
                    Ok(_) => {
                        debug!(node = %path, "exported to {}", target.display());
                        exported += 1;
                    }
                    Err(e) => {
                        warn!(node = %path, "failed to copy {}: {}", target.display(), e);
                        failed += 1;
                    }
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    pipeline.shutdown();

    if common.should_print() {
        let elapsed = cli_common::format_duration(start.elapsed());
        if failed == 0 {
            cli_common::print_success(&format!(
                "Exported {} images to {} in {}",
                exported,
                out_dir.display(),
                elapsed
            ));
        } else {
            cli_common::print_warning(&format!(
                "Exported {} images, {} failed ({})",
                exported, failed, elapsed
            ));
        }
        println!(
            "   {} {}  {} {}",
            "ok:".green(),
            exported.to_string().bold(),
            "failed:".red(),
            failed.to_string().bold()
        );
    }
    Ok(())
}

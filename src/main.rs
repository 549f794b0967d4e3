use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use logview_logs::{load, LevelCounts, LoadReport};
use logview_render::{
    render_html, ArgumentRenderer, DocumentAssembler, HostBridge, HtmlOptions,
    InteractionController,
};
use logview_tui::ViewerOptions;

mod config;
mod editor;
mod viewer;

use config::{load_settings, Settings};
use editor::EditorHost;

/// logview - Render line-delimited JSON logs as an interactive view
#[derive(Parser, Debug)]
#[command(name = "logview")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default: ./logview.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a self-contained HTML document
    Render {
        /// Log file, one JSON record per line
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Spaces per level in expanded JSON
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Browse the log in the terminal
    View {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print entry counts per level
    Stats {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    let settings = load_settings(args.config.as_deref());

    match args.command {
        Commands::Render {
            file,
            output,
            title,
            indent,
        } => render_command(&settings, &file, output.as_deref(), title, indent),
        Commands::View { file } => view_command(settings, &file).await,
        Commands::Stats { file } => stats_command(&file),
    }
}

/// Read and parse a log file, reporting skipped lines
fn load_file(path: &Path) -> Result<LoadReport> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let report = load(&String::from_utf8_lossy(&bytes));

    info!(
        "{}: {} entries, {} blank lines",
        path.display(),
        report.entries.len(),
        report.blank_lines
    );
    if report.malformed_count() > 0 {
        warn!(
            "{}: skipped {} lines that are not JSON objects",
            path.display(),
            report.malformed_count()
        );
    }
    Ok(report)
}

fn render_command(
    settings: &Settings,
    file: &Path,
    output: Option<&Path>,
    title: Option<String>,
    indent: Option<usize>,
) -> Result<()> {
    if output == Some(file) {
        anyhow::bail!("Refusing to overwrite the input log {}", file.display());
    }

    let report = load_file(file)?;
    let renderer = ArgumentRenderer::new(indent.unwrap_or(settings.render.indent));
    let document = DocumentAssembler::new(renderer).assemble_report(&report);

    let options = HtmlOptions {
        title: title.unwrap_or_else(|| settings.render.title.clone()),
        ..HtmlOptions::default()
    };
    let html = render_html(&document, &options);

    match output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} entries to {}", document.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn view_command(settings: Settings, file: &Path) -> Result<()> {
    let report = load_file(file)?;
    let renderer = ArgumentRenderer::new(settings.render.indent);
    let document = DocumentAssembler::new(renderer).assemble_report(&report);

    let (bridge, host_rx) = HostBridge::channel();
    let controller = InteractionController::new(document, bridge);

    let workspace = match settings.editor.workspace.clone() {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };
    let editor = EditorHost::new(settings.editor.clone(), workspace);

    let source_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let options = ViewerOptions {
        show_timestamps: settings.viewer.show_timestamps,
        show_function_names: settings.viewer.show_function_names,
    };

    viewer::run_viewer(controller, host_rx, editor, source_name, options).await
}

fn stats_command(file: &Path) -> Result<()> {
    let report = load_file(file)?;
    let counts = LevelCounts::tally(report.entries.iter().map(|e| e.as_ref()));
    print!("{}", format_stats(&counts, &report));
    Ok(())
}

fn format_stats(counts: &LevelCounts, report: &LoadReport) -> String {
    let mut out = String::new();
    for (level, count) in counts.non_zero() {
        out.push_str(&format!("{:<8} {}\n", level.as_str(), count));
    }
    out.push_str(&format!("{:<8} {}\n", "total", counts.total()));
    out.push_str(&format!("{:<8} {}\n", "skipped", report.malformed_count()));
    out
}

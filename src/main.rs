//! mkdoc — generate documentation from annotated Makefiles.
//!
//! Scans a Makefile (and everything it includes) for `##` doc comments,
//! `##@` categories, aliases, and target-scoped variables, then renders
//! the result as embeddable make, terminal text, HTML, Markdown, or JSON.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mkdoc::parser;
use mkdoc::render::{self, Format, RenderConfig, RenderError, Renderer};

#[derive(Parser)]
#[command(
    name = "mkdoc",
    about = "Generate documentation from annotated Makefiles"
)]
struct Cli {
    /// Makefile to scan
    #[arg(default_value = "Makefile")]
    makefile: PathBuf,

    /// Output format: make, text, html, markdown, json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Write to this file, or into this directory as help.<ext>
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Render the detailed view of a single target
    #[arg(short = 't', long)]
    target: Option<String>,

    /// Insert ANSI color codes (text format)
    #[arg(long)]
    color: bool,

    /// Base directory for shortening source locations
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// List supported formats and exit
    #[arg(long)]
    list_formats: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_formats {
        return list_formats();
    }

    let format: Format = cli.format.parse()?;
    let config = RenderConfig {
        use_color: cli.color,
        color_scheme: None,
        base_source_path: cli.base_path.clone(),
    };
    let renderer = render::create(format, config);

    let model = parser::scan(&cli.makefile)
        .with_context(|| format!("failed to scan {}", cli.makefile.display()))?;

    let mut rendered = Vec::new();
    render_requested(&cli, renderer.as_ref(), &model, &mut rendered)?;
    write_output(&cli, renderer.as_ref(), &rendered)
}

/// One renderer call per invocation: the whole help view, or one target's
/// detailed view, falling back to the basic view for bare targets.
fn render_requested(
    cli: &Cli,
    renderer: &dyn Renderer,
    model: &mkdoc::model::DocModel,
    out: &mut Vec<u8>,
) -> Result<(), RenderError> {
    match &cli.target {
        Some(name) => match model.find_target(name) {
            Some(target) if target.is_documented() => renderer.render_target(target, out),
            Some(target) => {
                renderer.render_basic_target(&target.name, &target.file, target.line, out)
            }
            None => Err(RenderError::MissingTarget(name.clone())),
        },
        None => renderer.render_help(model, out),
    }
}

fn write_output(cli: &Cli, renderer: &dyn Renderer, rendered: &[u8]) -> Result<()> {
    match &cli.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(format!("help.{}", renderer.file_extension()))
            } else {
                path.clone()
            };
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => io::stdout()
            .write_all(rendered)
            .context("failed to write to stdout"),
    }
}

fn list_formats() -> Result<()> {
    for format in Format::ALL {
        let renderer = render::create(format, RenderConfig::default());
        let names = std::iter::once(format.name())
            .chain(format.aliases().iter().copied())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<14} {:<18} .{}",
            names,
            renderer.content_type(),
            renderer.file_extension()
        );
    }
    Ok(())
}

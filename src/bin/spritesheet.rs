use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spritesheet::{
    DEFAULT_OUTPUT_FILE_NAME, ExportConfig, LayoutMode, OutputFormat, RasterDocument, RasterHost,
    ResizeFilter,
};

#[derive(Parser, Debug)]
#[command(name = "spritesheet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the document's frames into a spritesheet image.
    Export(ExportArgs),
    /// Print the sheet layout as JSON without rendering.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input document manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path (defaults to `Spritesheet.png` next to the manifest).
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    sheet: SheetArgs,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input document manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    sheet: SheetArgs,
}

/// Settings shared by `export` and `plan`; each flag overrides the config file.
#[derive(Args, Debug)]
struct SheetArgs {
    /// Export config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows, Columns, "Horizontal Strip" or "Vertical Strip".
    #[arg(long)]
    layout: Option<LayoutMode>,

    /// Sprite width in pixels, before padding.
    #[arg(long)]
    width: Option<u32>,

    /// Sprite height in pixels, before padding.
    #[arg(long)]
    height: Option<u32>,

    /// Transparent border added on each side of every sprite.
    #[arg(long)]
    padding: Option<u32>,

    /// Resampling filter used when resizing sprites.
    #[arg(long)]
    filter: Option<ResizeFilter>,

    /// Output encoding.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Export every time in the range, not only keyframes.
    #[arg(long)]
    keep_empty_frames: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &Path) -> anyhow::Result<RasterDocument> {
    spritesheet::load_document(path)
        .with_context(|| format!("load document '{}'", path.display()))
}

fn build_config(
    doc: &RasterDocument,
    in_path: &Path,
    out: Option<PathBuf>,
    args: SheetArgs,
) -> anyhow::Result<ExportConfig> {
    let mut cfg = match &args.config {
        Some(path) => ExportConfig::from_path(path)
            .with_context(|| format!("read export config '{}'", path.display()))?,
        None => {
            let dir = in_path.parent().unwrap_or_else(|| Path::new("."));
            ExportConfig::for_document(doc, dir.join(DEFAULT_OUTPUT_FILE_NAME))
        }
    };

    if let Some(out) = out {
        cfg.output_path = out;
    }
    if let Some(layout) = args.layout {
        cfg.layout = layout;
    }
    if let Some(w) = args.width {
        cfg.sprite_width = w;
    }
    if let Some(h) = args.height {
        cfg.sprite_height = h;
    }
    if let Some(p) = args.padding {
        cfg.padding = p;
    }
    if let Some(f) = args.filter {
        cfg.filter = f;
    }
    if let Some(f) = args.format {
        cfg.format = f;
    }
    if args.keep_empty_frames {
        cfg.ignore_empty_frames = false;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let doc = load(&args.in_path)?;
    let cfg = build_config(&doc, &args.in_path, args.out, args.sheet)?;

    let mut host = RasterHost::new();
    let report = spritesheet::export_spritesheet(&mut host, &doc, &cfg)
        .with_context(|| format!("export spritesheet from '{}'", args.in_path.display()))?;

    eprintln!(
        "wrote {} ({} frames, {}x{})",
        report.output_path.display(),
        report.plan.frame_count(),
        report.plan.canvas.width,
        report.plan.canvas.height
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let doc = load(&args.in_path)?;
    let cfg = build_config(&doc, &args.in_path, None, args.sheet)?;
    let plan = spritesheet::plan_export(&doc, &cfg)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

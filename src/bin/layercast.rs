use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use layercast::{
    CoordMode, DirectoryRasterizer, DocumentDef, ExportCommand, ExportOptions, ExportOutcome,
    ExportSession, ImageCompare, MagickCompare, Rasterizer, build_scene,
};

#[derive(Parser, Debug)]
#[command(name = "layercast", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the scene-graph metadata for a document dump and print or write it.
    Metadata(MetadataArgs),
    /// Run a full export cycle against a directory of pre-rasterized layers.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct MetadataArgs {
    /// Input document dump JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output metadata file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output coordinate convention.
    #[arg(long, value_enum, default_value_t = CoordsChoice::Spritekit)]
    coords: CoordsChoice,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input document dump JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory of pre-rasterized `<layer_id>.png` files.
    #[arg(long)]
    layers: PathBuf,

    /// Export root directory.
    #[arg(long)]
    out: PathBuf,

    /// Export command to run.
    #[arg(long, value_enum, default_value_t = CommandChoice::Spritekit)]
    command: CommandChoice,

    /// Render queue deadline in seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Image compare program (ImageMagick).
    #[arg(long, default_value = "convert")]
    compare_program: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CoordsChoice {
    Spritekit,
    NativeUi,
}

impl From<CoordsChoice> for CoordMode {
    fn from(c: CoordsChoice) -> Self {
        match c {
            CoordsChoice::Spritekit => CoordMode::Centered,
            CoordsChoice::NativeUi => CoordMode::TopLeft,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CommandChoice {
    Spritekit,
    NativeUi,
    ImagesCropped,
    ImagesFull,
}

impl From<CommandChoice> for ExportCommand {
    fn from(c: CommandChoice) -> Self {
        match c {
            CommandChoice::Spritekit => ExportCommand::SpriteKit,
            CommandChoice::NativeUi => ExportCommand::NativeUi,
            CommandChoice::ImagesCropped => ExportCommand::ImagesCropped,
            CommandChoice::ImagesFull => ExportCommand::ImagesFull,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Metadata(args) => cmd_metadata(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn cmd_metadata(args: MetadataArgs) -> anyhow::Result<()> {
    let doc = DocumentDef::from_path(&args.in_path)?;
    let (description, queue) = build_scene(&doc, args.coords.into())?;

    let json = serde_json::to_string(&description).context("serialize scene description")?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("write metadata '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    eprintln!("{} layer(s) queued for rasterization", queue.len());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let doc = DocumentDef::from_path(&args.in_path)?;

    let rasterizer: Arc<dyn Rasterizer> = Arc::new(DirectoryRasterizer::new(&args.layers, &doc));
    let compare: Arc<dyn ImageCompare> = Arc::new(MagickCompare::with_program(args.compare_program));

    let session = ExportSession::new();
    let outcome = session.export(
        &doc,
        &args.out,
        args.command.into(),
        &rasterizer,
        &compare,
        ExportOptions {
            render_timeout: Duration::from_secs(args.timeout_secs),
            ..ExportOptions::default()
        },
    )?;

    match &outcome {
        ExportOutcome::Completed { notice, .. } | ExportOutcome::Rejected { notice } => {
            eprintln!("{notice}");
        }
    }
    Ok(())
}

use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tileview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the frame a viewer configuration composes (views, view states, layers) as JSON.
    Scene(SceneArgs),
    /// Simulate a click inside the overview and print the detail view state before and after.
    Pan(PanArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Input viewer configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct PanArgs {
    /// Input viewer configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Click position, in pixels from the overview's left edge.
    #[arg(long)]
    x: f64,

    /// Click position, in pixels from the overview's top edge.
    #[arg(long)]
    y: f64,
}

/// Serializes every frame it is handed.
struct JsonRenderer {
    pretty: bool,
    frames: Vec<String>,
}

impl tileview::SceneRenderer for JsonRenderer {
    fn render(&mut self, frame: &tileview::SceneFrame<'_>) -> tileview::TileviewResult<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(frame)
        } else {
            serde_json::to_string(frame)
        }
        .map_err(|e| tileview::TileviewError::serde(format!("serialize frame: {e}")))?;
        self.frames.push(json);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Scene(args) => cmd_scene(args),
        Command::Pan(args) => cmd_pan(args),
    }
}

fn load_session(path: &std::path::Path) -> anyhow::Result<tileview::ViewerSession> {
    let config = tileview::ViewerConfig::from_path(path)
        .with_context(|| format!("load viewer config '{}'", path.display()))?;
    let viewer = config.into_viewer().context("build viewer")?;
    Ok(tileview::ViewerSession::new(viewer))
}

fn cmd_scene(args: SceneArgs) -> anyhow::Result<()> {
    let session = load_session(&args.config)?;
    let mut renderer = JsonRenderer {
        pretty: args.pretty,
        frames: Vec::new(),
    };
    if !session.render(&mut renderer).context("render scene")? {
        eprintln!("no image loaded; nothing to render");
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    for frame in &renderer.frames {
        writeln!(out, "{frame}").context("write frame")?;
    }
    Ok(())
}

fn cmd_pan(args: PanArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.config)?;
    let before = session
        .view_state(tileview::DETAIL_VIEW_ID)
        .cloned()
        .context("no detail view; is a loader configured?")?;

    let changed = session
        .pan_from_overview(tileview::Point::new(args.x, args.y))
        .context("pan from overview")?;
    let after = session
        .view_state(tileview::DETAIL_VIEW_ID)
        .cloned()
        .context("detail view disappeared")?;

    let report = serde_json::json!({
        "changed": changed,
        "before": before,
        "after": after,
    });
    let json = serde_json::to_string_pretty(&report).context("serialize pan report")?;
    println!("{json}");
    Ok(())
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use track_sketcher_core::{
    load_points, save_points, AppConfig, ControlPoint, SketchSession, TrackError, TrackScene,
    STEP_TIME,
};
use tracing_subscriber::EnvFilter;

fn main() -> track_sketcher_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            control_points,
            out,
            mesh_json,
        } => run_generate(&config, &control_points, out.as_deref(), mesh_json.as_deref()),
        Commands::Simulate { path, ticks, dt } => run_simulate(&config, &path, ticks, dt),
    }
}

fn run_generate(
    config: &AppConfig,
    control_points: &Path,
    out: Option<&Path>,
    mesh_json: Option<&Path>,
) -> track_sketcher_core::Result<()> {
    tracing::info!(?control_points, "generating track");

    let loaded = load_points(control_points)?
        .into_iter()
        .map(ControlPoint::from_vec3);
    let session = SketchSession::with_points(config.editor.clone(), loaded)?;
    let mut scene = TrackScene::new(config.track.clone())?;
    if !scene.regenerate(session.control_points())? {
        return Err(TrackError::msg(format!(
            "{} control points given, at least 4 are needed for a track",
            session.len()
        )));
    }
    let track = scene
        .track()
        .ok_or_else(|| TrackError::msg("track vanished after generation"))?;

    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.export.animation_file));
    save_points(&out, &track.path)?;
    tracing::info!(?out, points = track.path.len(), "wrote animation path");

    if let Some(mesh_json) = mesh_json {
        let json = serde_json::to_string_pretty(&track.mesh)
            .map_err(|err| TrackError::msg(format!("serializing mesh: {err}")))?;
        std::fs::write(mesh_json, json)?;
        tracing::info!(?mesh_json, vertices = track.mesh.vertices().len(), "wrote mesh");
    }
    Ok(())
}

fn run_simulate(
    config: &AppConfig,
    path: &Path,
    ticks: u32,
    dt: f32,
) -> track_sketcher_core::Result<()> {
    tracing::info!(?path, ticks, dt, "replaying animation path");

    let points = load_points(path)?;
    let mut scene = TrackScene::with_path(config.track.clone(), points)?;
    for tick in 0..ticks {
        let Some(frame) = scene.tick(dt)? else {
            break;
        };
        let index = scene.animation().current_index;
        let p = frame.position;
        let f = frame.forward;
        let u = frame.up;
        println!(
            "{tick} {index} pos=({:.3} {:.3} {:.3}) fwd=({:.3} {:.3} {:.3}) up=({:.3} {:.3} {:.3})",
            p.x, p.y, p.z, f.x, f.y, f.z, u.x, u.y, u.z
        );
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Sketch a closed track and drive a car around it", long_about = None)]
struct Cli {
    /// JSON configuration file; defaults are used for anything it omits.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a track from control points and write its animation path.
    Generate {
        /// File with one `x y height` control point per line.
        control_points: PathBuf,
        /// Where to write the animation path. Defaults to the configured file.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also dump the track mesh as JSON.
        #[arg(long)]
        mesh_json: Option<PathBuf>,
    },
    /// Replay a vehicle along a saved animation path.
    Simulate {
        /// Animation path written by `generate`.
        path: PathBuf,
        /// Number of ticks to run.
        #[arg(short, long, default_value_t = 30)]
        ticks: u32,
        /// Seconds per tick.
        #[arg(long, default_value_t = STEP_TIME)]
        dt: f32,
    },
}

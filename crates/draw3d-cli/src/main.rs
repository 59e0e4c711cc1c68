use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use draw3d_algo::{AlgorithmRegistry, Engine};
use draw3d_core::model::Polygon;
use draw3d_core::report::SceneSummary;
use draw3d_core::scene_file::{load_scene, save_scene};
use draw3d_core::transform::AxisRange;
use draw3d_core::{DrawConfig, Primitive, Scene, Vec3};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(name = "draw3d")]
#[command(about = "Sequenced 3D scenes and procedural animations.")]
#[command(version)]
struct Cli {
    /// TOML file overriding drawing defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered algorithms
    Algorithms,
    /// Write a sample two-view scene
    Demo {
        #[arg(long)]
        out: PathBuf,
    },
    /// Read a scene file and report its views
    Inspect {
        input: PathBuf,
        /// Also write every view, rendered shapes included, as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Run algorithms to completion
    Run {
        #[arg(required = true)]
        names: Vec<String>,
        /// Save the visible views afterwards
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 1.0)]
        speedup: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    // RUST_LOG wins over --log-level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Algorithms => {
            for name in AlgorithmRegistry::with_builtins().names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Demo { out } => demo(config, &out),
        Command::Inspect { input, json } => inspect(config, &input, json.as_deref()),
        Command::Run {
            names,
            out,
            speedup,
        } => run(config, &names, out.as_deref(), speedup).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<DrawConfig> {
    let Some(path) = path else {
        return Ok(DrawConfig::default());
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read config: {path:?}"))?;
    let config: DrawConfig =
        toml::from_str(&content).with_context(|| format!("parse config: {path:?}"))?;
    if !config.range.is_valid() {
        bail!("config range must have finite half-extents above zero: {path:?}");
    }
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
}

fn demo(config: DrawConfig, out: &Path) -> Result<()> {
    let mut scene = Scene::new(config);
    scene.set_camera(Vec3::new(-20.0, -150.0, -900.0));
    scene.draw(Primitive::vector(3.0, 4.0, 5.0));
    scene.draw(Primitive::arrow(
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(4.0, 0.0, 4.0),
    ));
    scene.draw(Primitive::label(Vec3::new(3.0, 4.0, 4.5), "v = (3, 4, 5)"));

    scene.advance_sequence();
    scene.set_range(AxisRange::new(5.0, 5.0, 5.0))?;
    scene.set_cumulate(true);
    let square = Polygon::new(vec![
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(2.0, -2.0, 0.0),
        Vec3::new(2.0, 2.0, 1.0),
        Vec3::new(-2.0, 2.0, 1.0),
    ])
    .with_decorations(true, true, true);
    scene.draw(Primitive::polygon(square));
    scene.draw(Primitive::plane(0.0, 0.0, 1.0, -1.0));
    scene.step_forward()?;

    ensure_parent(out);
    save_scene(&scene, out).with_context(|| format!("write scene: {out:?}"))?;
    info!(path = %out.display(), views = scene.views().len(), "wrote demo scene");
    Ok(())
}

fn inspect(config: DrawConfig, input: &Path, json: Option<&Path>) -> Result<()> {
    if !input.is_file() {
        bail!("input is not a file: {input:?}");
    }
    let mut scene = Scene::new(config);
    let report = load_scene(input, &mut scene).with_context(|| format!("read scene: {input:?}"))?;
    for w in &report.warnings {
        warn!(code = %w.code, "{}", w.message);
    }
    info!(
        lines = report.lines,
        groups = report.groups,
        primitives = report.primitives,
        "read scene"
    );

    // Show every view so each one is rendered before reporting.
    let last = scene.views().len().saturating_sub(1);
    scene.jump_to_start(0)?;
    scene.toggle_manual_cumulate();
    for _ in 0..last {
        scene.step_forward()?;
    }

    let summary = SceneSummary::of(&scene);
    let text = serde_json::to_string_pretty(&summary).context("serialize summary")?;
    println!("{text}");

    if let Some(path) = json {
        let dump = serde_json::to_string_pretty(scene.views()).context("serialize views")?;
        ensure_parent(path);
        std::fs::write(path, &dump).with_context(|| format!("write views: {path:?}"))?;
    }
    Ok(())
}

async fn run(config: DrawConfig, names: &[String], out: Option<&Path>, speedup: f64) -> Result<()> {
    let mut engine =
        Engine::new(Scene::new(config), AlgorithmRegistry::with_builtins()).with_speedup(speedup);
    for name in names {
        engine
            .load(name)
            .with_context(|| format!("load algorithm `{name}`"))?;
    }
    let report = engine.run().await?;
    for task in &report.tasks {
        info!(
            name = %task.name,
            view = task.target,
            drawn = task.drawn,
            canceled = task.canceled,
            "task finished"
        );
    }
    info!(
        started = %report.started.to_rfc3339(),
        elapsed_ms = report.elapsed().num_milliseconds(),
        "run complete"
    );

    if let Some(path) = out {
        ensure_parent(path);
        save_scene(engine.scene(), path).with_context(|| format!("write scene: {path:?}"))?;
        info!(path = %path.display(), "saved scene");
    }
    Ok(())
}

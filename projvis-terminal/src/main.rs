/// Projvis Terminal Viewer - Wireframe models through an off-axis planar projection
///
/// Controls:
///   - W/S: Move the viewpoint along z
///   - A/D: Move the viewpoint along x
///   - Q/E: Move the viewpoint along y
///   - R: Reset the viewpoint
///   - ESC: Quit
use anyhow::Context as _;
use clap::Parser;
use log::info;
use projvis_core::{config::DEFAULT_CONFIG_FILE, ProjectionConfig, WireframeModel};
use projvis_terminal::{logging, TerminalApp};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "projvis", version, about)]
struct Args {
    /// Wireframe model file. A cube is shown when omitted.
    model: Option<PathBuf>,

    /// Viewpoint and plane configuration file.
    #[arg(long, short = 'c', value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Distance the viewpoint moves per key press.
    #[arg(long, default_value_t = 0.5)]
    step: f64,

    #[command(flatten)]
    logging: logging::LoggingArgs,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::install(&args.logging)?;

    let model = match &args.model {
        Some(path) => WireframeModel::load(path)
            .with_context(|| format!("failed to load model {}", path.display()))?,
        None => {
            info!("no model given, using the built-in cube");
            WireframeModel::cube(2.0)
        }
    };
    println!(
        "Loaded model with {} vertices and {} faces.",
        model.vertices.len(),
        model.faces.len()
    );

    let config = ProjectionConfig::load_or_default(&args.config);

    println!("Starting viewer (press Esc to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(model, config, args.step)?;
    app.run()?;

    Ok(())
}

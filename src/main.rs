use std::convert::TryFrom;
use std::fs;
use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use tracing::{ debug, info };
use tracing_subscriber::filter::LevelFilter;

use portal_cone::canvas::Rasterizer;
use portal_cone::consts::OUT_FILE;
use portal_cone::pattern::CheckerPattern;
use portal_cone::point::Point2D;
use portal_cone::scene::{ Scene, SceneJson };
use portal_cone::world::FrameInput;

/// Replays a portal scene and renders its last frame.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene description. Defaults are used when omitted.
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Where the rendered PPM image is written.
    #[clap(short, long, default_value = OUT_FILE)]
    out: PathBuf,

    /// More output per occurrence.
    #[clap(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .try_init();

    let scene_json: SceneJson = match &args.scene {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading scene {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing scene {}", path.display()))?
        }
        None => SceneJson::default(),
    };

    let Scene { mut world, frames } = Scene::try_from(scene_json)
        .context("building the scene")?;
    let boundary = world.boundary;
    let mut sink = Rasterizer::new(boundary.width as usize,
        boundary.height as usize, CheckerPattern::default());

    info!("Replaying {} frames on a {}x{} screen...",
        frames.len(), boundary.width, boundary.height);

    let mut last = None;
    for (n, input) in frames.iter().enumerate() {
        let frame = world.step(input);
        if let Some(id) = frame.placed {
            info!("Frame {}: placed portal {}", n, id);
        }
        debug!("Frame {}: draw order {:?}", n, frame.order);

        // Each frame overwrites the canvas; the last one is saved.
        frame.draw(&boundary, &mut sink);
        last = Some(frame);
    }

    // With no script, still show the pending portal at the screen center.
    let frame = match last {
        Some(frame) => frame,
        None => {
            let frame = world.step(&FrameInput {
                cursor: Point2D::new(boundary.width * 0.5, boundary.height * 0.5),
                ..Default::default()
            });
            frame.draw(&boundary, &mut sink);
            frame
        }
    };

    sink.canvas.save(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;

    info!("Portals: {}, draw order: {:?}", frame.portals.len(), frame.order);
    info!("Saved render to {}.", args.out.display());

    Ok(())
}

//! Builds the visibility tree and depth-sorted polygon list of a fixture map,
//! turning the viewer a little each frame, and reports what was seen.

mod cli;
mod config;

use cli::*;
use glam::IVec2;
use level::{MapData, RenderFlags};
use log::{debug, info};
use math::Angle;
use render_trait::{ScreenSize, SeenMap};
use render_vis::{PolygonSorter, ViewData, VisTree};
use simplelog::TermLogger;
use std::error::Error;
use std::time::Instant;

use crate::config::UserConfig;

const BASE_DIR: &str = "vistree/";
const EYE_HEIGHT: i32 = 32;

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load()?;
    user_config.sync_cli(&mut options);
    user_config.write()?;

    let choice = options.map.unwrap_or_default();
    let map = choice.build(options.rooms)?;
    info!(
        "Loaded {:?}: {} polygons, {} lines, {} endpoints",
        choice,
        map.polygons().len(),
        map.lines().len(),
        map.endpoints().len()
    );

    let (x, y, polygon) = choice.start();
    let screen = ScreenSize::new(options.width, options.height);
    let fov = Angle::from_degrees(options.fov.unwrap_or(user_config.field_of_view));
    let turn = Angle::from_degrees(options.turn.unwrap_or(user_config.turn));

    let mut frame = Frame::new(&map);
    let mut yaw = Angle::default();
    let start = Instant::now();
    for n in 0..options.frames.max(1) {
        let view = ViewData::new(
            IVec2::new(x, y),
            EYE_HEIGHT,
            polygon,
            yaw,
            fov,
            Angle::default(),
            screen,
        );
        frame.render(&map, view)?;
        debug!(
            "Frame {n}: {} nodes, {} polygons sorted, {:?}",
            frame.tree.nodes().len(),
            frame.sorter.sorted_nodes().len(),
            frame.tree.stats()
        );
        yaw += turn;
    }
    info!(
        "Built {} frames in {:.3}ms",
        options.frames.max(1),
        start.elapsed().as_secs_f32() * 1000.0
    );
    info!(
        "Last frame saw {} polygons and {} lines",
        frame.seen.polygons.len(),
        frame.seen.lines.len()
    );

    if options.dump {
        frame.dump();
    }

    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;
    Ok(())
}

/// Everything that is reused from one frame to the next
struct Frame {
    tree: VisTree,
    sorter: PolygonSorter,
    flags: RenderFlags,
    seen: SeenMap,
}

impl Frame {
    fn new(map: &MapData) -> Self {
        let mut tree = VisTree::new();
        tree.resize(map.endpoints().len(), map.lines().len());
        let mut sorter = PolygonSorter::new();
        sorter.resize(map.polygons().len());
        Self {
            tree,
            sorter,
            flags: RenderFlags::new(map),
            seen: SeenMap::default(),
        }
    }

    fn render(&mut self, map: &MapData, view: ViewData) -> Result<(), Box<dyn Error>> {
        self.flags.clear();
        self.seen.clear();
        self.tree.set_view(view);
        self.tree.build_tree(map, &mut self.flags, &mut self.seen)?;
        self.sorter.sort_tree(&self.tree);
        Ok(())
    }

    /// Print the draw order of the last frame, far polygons first
    fn dump(&self) {
        for node in self.sorter.sorted_nodes() {
            println!("polygon {}", node.polygon_index);
            for window in self.sorter.clipping_windows(node) {
                println!(
                    "    x {}..{} y {}..{}",
                    window.x0, window.x1, window.y0, window.y1
                );
            }
        }
    }
}

use argh::FromArgs;

use crate::config::MapChoice;

/// Build and sort the visibility tree of a fixture map from a moving viewpoint
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// map to view <tworooms, junction, twoportals, corridor>
    #[argh(option)]
    pub map: Option<MapChoice>,
    /// number of rooms when the corridor map is chosen
    #[argh(option, default = "0")]
    pub rooms: usize,
    /// screen width in pixels
    #[argh(option, default = "0")]
    pub width: usize,
    /// screen height in pixels
    #[argh(option, default = "0")]
    pub height: usize,
    /// horizontal field of view in degrees
    #[argh(option)]
    pub fov: Option<f32>,
    /// number of frames to build, the view turns a little each frame
    #[argh(option, default = "0")]
    pub frames: u32,
    /// degrees the view turns between frames
    #[argh(option)]
    pub turn: Option<f32>,
    /// print every sorted polygon with its clipping windows for the last frame
    #[argh(switch)]
    pub dump: bool,
}

use std::error::Error;
use std::fmt;
use std::ops::Range;

use glam::I64Vec2;

/// Starting capacity of the node arena. It grows past this when needed.
pub const MAXIMUM_NODES: usize = 512;
pub const MAXIMUM_LINE_CLIPS: usize = 256;
pub const MAXIMUM_ENDPOINT_CLIPS: usize = 64;
pub const MAXIMUM_CLIPPING_WINDOWS: usize = 128;
/// Hard per-node limits. Running out is a build failure.
pub const MAXIMUM_CLIPPING_LINES_PER_NODE: usize = 6;
pub const MAXIMUM_CLIPPING_ENDPOINTS_PER_NODE: usize = 4;

/// Index of the endpoint clip for the left edge of the screen
pub const LEFT_SIDE_OF_SCREEN: usize = 0;
/// Index of the endpoint clip for the right edge of the screen
pub const RIGHT_SIDE_OF_SCREEN: usize = 1;
/// Index of the line clip for the top and bottom of the screen
pub const TOP_AND_BOTTOM_OF_SCREEN: usize = 0;

pub(crate) const NUMBER_OF_INITIAL_ENDPOINT_CLIPS: usize = 2;
pub(crate) const NUMBER_OF_INITIAL_LINE_CLIPS: usize = 1;

/// How a ray was clipped when it moved into a polygon. Stored as bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ClipFlag {
    /// The ray left a solid vertex going clockwise. Nothing left of it shows.
    Left = 1,
    /// The ray left a solid vertex going counterclockwise. Nothing right of it
    /// shows.
    Right = 1 << 1,
    /// A floor step on the crossed line raises the lower screen boundary
    Up = 1 << 2,
    /// A ceiling step on the crossed line lowers the upper screen boundary
    Down = 1 << 3,
    /// The ray hit a vertex exactly and has to be cast again both ways
    SplitRenderRay = 1 << 15,
}

/// Which way a ray goes when it lands exactly on a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Split in to a clockwise and a counterclockwise ray
    NoBias,
    /// Cross the edge clockwise from the vertex
    Clockwise,
    /// Cross the edge counterclockwise from the vertex
    Counterclockwise,
}

/// Screen-space vertical clip made by a line with a floor or ceiling step
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineClip {
    /// `ClipFlag::Up` and/or `ClipFlag::Down`, or 0 if the line is off screen
    pub flags: u16,
    pub x0: i32,
    pub x1: i32,
    /// View-space direction of the lowered ceiling edge
    pub top_vector: I64Vec2,
    pub top_y: i32,
    /// View-space direction of the raised floor edge
    pub bottom_vector: I64Vec2,
    pub bottom_y: i32,
}

/// Screen-space horizontal clip made by a solid vertex
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EndpointClip {
    /// Exactly one of `ClipFlag::Left` or `ClipFlag::Right`
    pub flags: u16,
    pub vector: I64Vec2,
    pub x: i32,
}

impl EndpointClip {
    #[inline]
    pub const fn is_left(&self) -> bool {
        self.flags & ClipFlag::Left as u16 != 0
    }
}

/// A screen rectangle a sorted polygon may be drawn in, with the view-space
/// vectors of its four edges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClippingWindow {
    pub x0: i32,
    pub x1: i32,
    pub left: I64Vec2,
    pub right: I64Vec2,
    /// Upper bound
    pub y0: i32,
    /// Lower bound
    pub y1: i32,
    pub top: I64Vec2,
    pub bottom: I64Vec2,
}

/// One visible polygon in draw order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedNode {
    pub polygon_index: usize,
    /// Handle filled in by the object placement pass
    pub interior_objects: Option<usize>,
    /// Handle filled in by the object placement pass
    pub exterior_objects: Option<usize>,
    /// Slice of `PolygonSorter::clipping_windows`
    pub clipping_windows: Range<usize>,
}

/// Counters for the last build, for tracing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub rays_cast: usize,
    pub ray_splits: usize,
    pub malformed_walks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisError {
    /// A node needed more line clips than it has room for
    TooManyClippingLines { node: usize, polygon: usize },
    /// A node needed more endpoint clips than it has room for
    TooManyClippingEndpoints { node: usize, polygon: usize },
    /// A link points outside the node arena
    DanglingLink { node: usize },
    /// The polygon search tree is out of order at this node
    TreeOrder { node: usize },
    /// A child does not name this node as its parent
    ParentMismatch { node: usize },
}

impl Error for VisError {}

impl fmt::Display for VisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisError::TooManyClippingLines { node, polygon } => write!(
                f,
                "node {node} (polygon {polygon}) exceeded {MAXIMUM_CLIPPING_LINES_PER_NODE} clipping lines"
            ),
            VisError::TooManyClippingEndpoints { node, polygon } => write!(
                f,
                "node {node} (polygon {polygon}) exceeded {MAXIMUM_CLIPPING_ENDPOINTS_PER_NODE} clipping endpoints"
            ),
            VisError::DanglingLink { node } => write!(f, "node {node} links outside the tree"),
            VisError::TreeOrder { node } => {
                write!(f, "polygon search tree is out of order at node {node}")
            }
            VisError::ParentMismatch { node } => {
                write!(f, "a child of node {node} names a different parent")
            }
        }
    }
}

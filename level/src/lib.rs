//! The map data the visibility tree walks: endpoints, lines and convex
//! polygons linked by per-edge adjacency, plus the per-frame render flags
//! the renderer marks while it walks them.
//!
//! Map loading is not done here. A `MapData` is either handed over fully
//! formed and validated with [`MapData::new`], or put together from polygon
//! outlines with [`MapBuilder`].

pub mod fixtures;
mod flags;
mod map_builder;
mod map_data;
mod map_defs;


use std::error::Error;
use std::fmt;

pub use flags::{EndpointFlags, LineFlags, RenderFlag, RenderFlags};
pub use glam;
pub use map_builder::MapBuilder;
pub use map_data::MapData;
pub use map_defs::{Endpoint, Line, MAXIMUM_VERTICES_PER_POLYGON, Polygon};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A polygon has fewer than 3 or more than `MAXIMUM_VERTICES_PER_POLYGON`
    /// vertices
    VertexCount { polygon: usize, count: usize },
    /// The per-edge arrays of a polygon differ in length from its vertex list
    EdgeArrays { polygon: usize },
    /// An index points outside the array it refers to
    DanglingIndex {
        kind: &'static str,
        owner: usize,
        index: usize,
    },
    /// A line was found on more than two polygons
    NonManifoldLine { endpoints: [usize; 2] },
}

impl Error for MapError {}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::VertexCount { polygon, count } => write!(
                f,
                "polygon {polygon} has {count} vertices, expected 3..={MAXIMUM_VERTICES_PER_POLYGON}"
            ),
            MapError::EdgeArrays { polygon } => {
                write!(f, "polygon {polygon} edge arrays do not match its vertex count")
            }
            MapError::DanglingIndex { kind, owner, index } => {
                write!(f, "{kind} index {index} referenced by {owner} is out of range")
            }
            MapError::NonManifoldLine { endpoints } => write!(
                f,
                "line between endpoints {} and {} borders more than two polygons",
                endpoints[0], endpoints[1]
            ),
        }
    }
}

use glam::IVec2;

use crate::flags::{EndpointFlags, LineFlags};

/// Largest polygon the map format allows
pub const MAXIMUM_VERTICES_PER_POLYGON: usize = 8;

/// A map vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub vertex: IVec2,
    pub flags: u16,
}

impl Endpoint {
    pub const fn new(vertex: IVec2, flags: u16) -> Self {
        Self { vertex, flags }
    }

    /// Every line touching this endpoint can be seen through. Rays aimed at
    /// a transparent endpoint cannot be clipped by it.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.flags & EndpointFlags::Transparent as u16 != 0
    }

    #[inline]
    pub const fn is_solid(&self) -> bool {
        self.flags & EndpointFlags::Solid as u16 != 0
    }
}

/// The edge between two endpoints, shared by up to two polygons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub endpoint_indexes: [usize; 2],
    pub flags: u16,
    /// The polygon that lists the endpoints in this line's order
    pub clockwise_polygon: Option<usize>,
    /// The polygon on the other side, if any
    pub counterclockwise_polygon: Option<usize>,
    /// Highest floor of the polygons on either side
    pub highest_adjacent_floor: i32,
    /// Lowest ceiling of the polygons on either side
    pub lowest_adjacent_ceiling: i32,
}

impl Line {
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.flags & LineFlags::Transparent as u16 != 0
    }

    #[inline]
    pub const fn is_solid(&self) -> bool {
        self.flags & LineFlags::Solid as u16 != 0
    }
}

/// A convex polygon. Vertices are listed clockwise as seen on the map; edge
/// `i` runs from vertex `i` to vertex `i + 1` and the per-edge arrays are
/// indexed by edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    pub endpoint_indexes: Vec<usize>,
    pub line_indexes: Vec<usize>,
    pub adjacent_polygon_indexes: Vec<Option<usize>>,
    pub side_indexes: Vec<Option<usize>>,
    pub floor_height: i32,
    pub ceiling_height: i32,
}

impl Polygon {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.endpoint_indexes.len()
    }

    /// Position of `endpoint` in this polygon's vertex list
    #[inline]
    pub fn vertex_of(&self, endpoint: usize) -> Option<usize> {
        self.endpoint_indexes.iter().position(|&e| e == endpoint)
    }
}

use crate::{Endpoint, Line, MAXIMUM_VERTICES_PER_POLYGON, MapError, Polygon};

/// The read-only map a frame is rendered from. Everything the visibility
/// pass touches is addressed by index into the arrays held here.
#[derive(Debug, Default, Clone)]
pub struct MapData {
    endpoints: Vec<Endpoint>,
    lines: Vec<Line>,
    polygons: Vec<Polygon>,
    side_count: usize,
}

impl MapData {
    /// Check that every index is in range and that each polygon's per-edge
    /// arrays agree with its vertex count. Geometry itself (convexity,
    /// agreement between the two polygons of a line) is taken on trust.
    pub fn new(
        endpoints: Vec<Endpoint>,
        lines: Vec<Line>,
        polygons: Vec<Polygon>,
        side_count: usize,
    ) -> Result<Self, MapError> {
        let check = |kind: &'static str, owner: usize, index: usize, len: usize| {
            if index < len {
                Ok(())
            } else {
                Err(MapError::DanglingIndex { kind, owner, index })
            }
        };

        for (i, line) in lines.iter().enumerate() {
            for e in line.endpoint_indexes {
                check("endpoint", i, e, endpoints.len())?;
            }
            for p in [line.clockwise_polygon, line.counterclockwise_polygon]
                .into_iter()
                .flatten()
            {
                check("polygon", i, p, polygons.len())?;
            }
        }

        for (i, polygon) in polygons.iter().enumerate() {
            let count = polygon.vertex_count();
            if !(3..=MAXIMUM_VERTICES_PER_POLYGON).contains(&count) {
                return Err(MapError::VertexCount { polygon: i, count });
            }
            if polygon.line_indexes.len() != count
                || polygon.adjacent_polygon_indexes.len() != count
                || polygon.side_indexes.len() != count
            {
                return Err(MapError::EdgeArrays { polygon: i });
            }
            for &e in &polygon.endpoint_indexes {
                check("endpoint", i, e, endpoints.len())?;
            }
            for &l in &polygon.line_indexes {
                check("line", i, l, lines.len())?;
            }
            for &p in polygon.adjacent_polygon_indexes.iter().flatten() {
                check("polygon", i, p, polygons.len())?;
            }
            for &s in polygon.side_indexes.iter().flatten() {
                check("side", i, s, side_count)?;
            }
        }

        Ok(Self {
            endpoints,
            lines,
            polygons,
            side_count,
        })
    }

    #[inline]
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[inline]
    pub fn side_count(&self) -> usize {
        self.side_count
    }

    #[inline]
    pub fn endpoint(&self, index: usize) -> &Endpoint {
        &self.endpoints[index]
    }

    #[inline]
    pub fn line(&self, index: usize) -> &Line {
        &self.lines[index]
    }

    #[inline]
    pub fn polygon(&self, index: usize) -> &Polygon {
        &self.polygons[index]
    }
}

use std::collections::BTreeMap;

use glam::IVec2;
use log::debug;

use crate::{Endpoint, EndpointFlags, Line, LineFlags, MapData, MapError, Polygon};

struct Outline {
    endpoints: Vec<usize>,
    floor_height: i32,
    ceiling_height: i32,
}

/// Assemble a `MapData` from polygon outlines.
///
/// Vertices at the same coordinate become one endpoint, and an edge walked by
/// two polygons becomes one transparent line with both polygons recorded on
/// it. Polygon indexes are handed out in the order outlines are added.
#[derive(Default)]
pub struct MapBuilder {
    endpoints: Vec<IVec2>,
    endpoint_lookup: BTreeMap<(i32, i32), usize>,
    outlines: Vec<Outline>,
    solid: Vec<(usize, usize)>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn endpoint(&mut self, vertex: IVec2) -> usize {
        let next = self.endpoints.len();
        let index = *self
            .endpoint_lookup
            .entry((vertex.x, vertex.y))
            .or_insert(next);
        if index == next {
            self.endpoints.push(vertex);
        }
        index
    }

    /// Add a polygon whose `vertices` run clockwise as seen on the map.
    /// Returns the index the polygon will have.
    pub fn polygon(&mut self, vertices: &[IVec2], floor_height: i32, ceiling_height: i32) -> usize {
        let endpoints = vertices.iter().map(|v| self.endpoint(*v)).collect();
        self.outlines.push(Outline {
            endpoints,
            floor_height,
            ceiling_height,
        });
        self.outlines.len() - 1
    }

    /// Make the line between `a` and `b` opaque even if two polygons share it
    pub fn mark_solid(&mut self, a: IVec2, b: IVec2) -> &mut Self {
        let a = self.endpoint(a);
        let b = self.endpoint(b);
        self.solid.push(line_key(a, b));
        self
    }

    pub fn build(self) -> Result<MapData, MapError> {
        let mut lines: Vec<Line> = Vec::new();
        let mut line_lookup: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        let mut polygons = Vec::with_capacity(self.outlines.len());
        let mut side_count = 0;

        for (p, outline) in self.outlines.iter().enumerate() {
            let count = outline.endpoints.len();
            let mut line_indexes = Vec::with_capacity(count);
            for i in 0..count {
                let a = outline.endpoints[i];
                let b = outline.endpoints[(i + 1) % count];
                let key = line_key(a, b);
                let index = match line_lookup.get(&key) {
                    Some(&l) => {
                        let line = &mut lines[l];
                        if line.counterclockwise_polygon.is_some() {
                            return Err(MapError::NonManifoldLine {
                                endpoints: line.endpoint_indexes,
                            });
                        }
                        line.counterclockwise_polygon = Some(p);
                        l
                    }
                    None => {
                        lines.push(Line {
                            endpoint_indexes: [a, b],
                            flags: 0,
                            clockwise_polygon: Some(p),
                            counterclockwise_polygon: None,
                            highest_adjacent_floor: outline.floor_height,
                            lowest_adjacent_ceiling: outline.ceiling_height,
                        });
                        line_lookup.insert(key, lines.len() - 1);
                        lines.len() - 1
                    }
                };
                line_indexes.push(index);
            }

            let side_indexes = (side_count..side_count + count).map(Some).collect();
            side_count += count;

            polygons.push(Polygon {
                endpoint_indexes: outline.endpoints.clone(),
                line_indexes,
                adjacent_polygon_indexes: vec![None; count],
                side_indexes,
                floor_height: outline.floor_height,
                ceiling_height: outline.ceiling_height,
            });
        }

        for (l, line) in lines.iter_mut().enumerate() {
            let key = line_key(line.endpoint_indexes[0], line.endpoint_indexes[1]);
            let forced = self.solid.contains(&key);
            match (line.clockwise_polygon, line.counterclockwise_polygon) {
                (Some(cw), Some(ccw)) if !forced => {
                    line.flags = LineFlags::Transparent as u16;
                    let (front, back) = (&self.outlines[cw], &self.outlines[ccw]);
                    line.highest_adjacent_floor = front.floor_height.max(back.floor_height);
                    line.lowest_adjacent_ceiling = front.ceiling_height.min(back.ceiling_height);

                    for (this, other) in [(cw, ccw), (ccw, cw)] {
                        let polygon = &mut polygons[this];
                        for (edge, &index) in polygon.line_indexes.iter().enumerate() {
                            if index == l {
                                polygon.adjacent_polygon_indexes[edge] = Some(other);
                            }
                        }
                    }
                }
                _ => line.flags = LineFlags::Solid as u16,
            }
        }

        let mut endpoints: Vec<Endpoint> = self
            .endpoints
            .iter()
            .map(|v| Endpoint::new(*v, EndpointFlags::Transparent as u16))
            .collect();
        for line in &lines {
            if line.is_solid() {
                for e in line.endpoint_indexes {
                    endpoints[e].flags = EndpointFlags::Solid as u16;
                }
            }
        }

        debug!(
            "Built map: {} endpoints, {} lines, {} polygons, {} sides",
            endpoints.len(),
            lines.len(),
            polygons.len(),
            side_count
        );
        MapData::new(endpoints, lines, polygons, side_count)
    }
}

fn line_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

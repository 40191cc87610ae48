//! Small hand-made maps with known visibility, shared by tests, benchmarks
//! and the inspection binary.
//!
//! All rooms have floor 0 and ceiling 128 unless stated.

use glam::IVec2;

use crate::{Endpoint, EndpointFlags, Line, LineFlags, MapBuilder, MapData, MapError, Polygon};

const FLOOR: i32 = 0;
const CEILING: i32 = 128;

fn square(x0: i32, y0: i32, x1: i32, y1: i32) -> [IVec2; 4] {
    [
        IVec2::new(x0, y0),
        IVec2::new(x1, y0),
        IVec2::new(x1, y1),
        IVec2::new(x0, y1),
    ]
}

/// Two 1024 square rooms side by side along x. Room 1 has its floor raised
/// to 64.
pub fn two_rooms() -> Result<MapData, MapError> {
    let mut builder = MapBuilder::new();
    builder.polygon(&square(0, 0, 1024, 1024), FLOOR, CEILING);
    builder.polygon(&square(1024, 0, 2048, 1024), 64, CEILING);
    builder.build()
}

/// Room 0 spans 0..1024 and has a vertex at (1024, 512) where two rooms on
/// its +x side meet: room 1 above (y 0..512) and room 2 below (y 512..1024).
pub fn junction() -> Result<MapData, MapError> {
    let mut builder = MapBuilder::new();
    builder.polygon(
        &[
            IVec2::new(0, 0),
            IVec2::new(1024, 0),
            IVec2::new(1024, 512),
            IVec2::new(1024, 1024),
            IVec2::new(0, 1024),
        ],
        FLOOR,
        CEILING,
    );
    builder.polygon(&square(1024, 0, 2048, 512), FLOOR, CEILING);
    builder.polygon(&square(1024, 512, 2048, 1024), FLOOR, CEILING);
    builder.build()
}

/// Room 0 with two separate doorways in its +x wall. The upper doorway
/// (y 256..384) leads to polygon `upper`, the lower one (y 640..768) to
/// polygon `lower`. Every other index is filled with an unconnected room far
/// away.
pub fn two_portals(upper: usize, lower: usize) -> Result<MapData, MapError> {
    assert!(upper != lower && upper > 0 && lower > 0);
    let mut builder = MapBuilder::new();
    for id in 0..=upper.max(lower) {
        if id == 0 {
            builder.polygon(
                &[
                    IVec2::new(0, 0),
                    IVec2::new(1024, 0),
                    IVec2::new(1024, 256),
                    IVec2::new(1024, 384),
                    IVec2::new(1024, 640),
                    IVec2::new(1024, 768),
                    IVec2::new(1024, 1024),
                    IVec2::new(0, 1024),
                ],
                FLOOR,
                CEILING,
            );
        } else if id == upper {
            builder.polygon(&square(1024, 256, 1280, 384), FLOOR, CEILING);
        } else if id == lower {
            builder.polygon(&square(1024, 640, 1280, 768), FLOOR, CEILING);
        } else {
            let x = 65536 + id as i32 * 1024;
            builder.polygon(&square(x, 65536, x + 512, 66048), FLOOR, CEILING);
        }
    }
    builder.build()
}

/// A triangular room 0 pointing -x whose +x wall (x 1024) has three
/// doorways, all opening in to the same triangular room 1 behind it. The wall
/// is split at y 200, 350, 450, 600 and 750; the segments 0..200, 350..450
/// and 600..750 are solid. Every jamb between a doorway and a solid segment
/// is a solid endpoint a ray can slip past in to room 1.
pub fn doorways() -> Result<MapData, MapError> {
    const WALL: [i32; 7] = [0, 200, 350, 450, 600, 750, 1024];
    let wall = WALL.map(|y| IVec2::new(1024, y));

    let mut builder = MapBuilder::new();
    let mut near = vec![IVec2::new(0, 512)];
    near.extend_from_slice(&wall);
    builder.polygon(&near, FLOOR, CEILING);

    let mut far = vec![wall[0], IVec2::new(2048, 512)];
    far.extend(wall[1..].iter().rev());
    builder.polygon(&far, FLOOR, CEILING);

    for pair in [0, 2, 4] {
        builder.mark_solid(wall[pair], wall[pair + 1]);
    }
    builder.build()
}

/// `rooms` rooms of 256 by 512 in a row along x, each open to the next
pub fn corridor(rooms: usize) -> Result<MapData, MapError> {
    let mut builder = MapBuilder::new();
    for i in 0..rooms as i32 {
        builder.polygon(&square(i * 256, 0, (i + 1) * 256, 512), FLOOR, CEILING);
    }
    builder.build()
}

/// A single room whose +x wall is a transparent line leading back into the
/// same room. Only reachable by building the map by hand.
pub fn self_portal() -> Result<MapData, MapError> {
    let corners = square(0, 0, 1024, 1024);
    let endpoints = corners
        .iter()
        .map(|v| Endpoint::new(*v, EndpointFlags::Solid as u16))
        .collect();
    let lines = (0..4)
        .map(|i| {
            let portal = i == 1;
            Line {
                endpoint_indexes: [i, (i + 1) % 4],
                flags: if portal {
                    LineFlags::Transparent as u16
                } else {
                    LineFlags::Solid as u16
                },
                clockwise_polygon: Some(0),
                counterclockwise_polygon: portal.then_some(0),
                highest_adjacent_floor: FLOOR,
                lowest_adjacent_ceiling: CEILING,
            }
        })
        .collect();
    let polygon = Polygon {
        endpoint_indexes: vec![0, 1, 2, 3],
        line_indexes: vec![0, 1, 2, 3],
        adjacent_polygon_indexes: vec![None, Some(0), None, None],
        side_indexes: vec![Some(0), Some(1), Some(2), Some(3)],
        floor_height: FLOOR,
        ceiling_height: CEILING,
    };
    MapData::new(endpoints, lines, vec![polygon], 4)
}

/// A zero-area "polygon" with all of its vertices on the x axis
pub fn collinear() -> Result<MapData, MapError> {
    let mut builder = MapBuilder::new();
    builder.polygon(
        &[IVec2::new(0, 0), IVec2::new(512, 0), IVec2::new(1024, 0)],
        FLOOR,
        CEILING,
    );
    builder.build()
}

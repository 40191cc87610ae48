//! Walking a ray across one polygon to find the edge it leaves by.

use glam::{I64Vec2, IVec2};
use level::{MapData, RenderFlag, RenderFlags};
use log::warn;
use math::{cross_product, long_vector, wrap_high, wrap_low};
use render_trait::AutomapTrait;

use crate::VisTree;
use crate::defs::{Bias, ClipFlag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    LookingForFirstNonzeroVertex,
    LookingClockwiseForRightVertex,
    LookingCounterclockwiseForLeftVertex,
    LookingForNextNonzeroVertex,
    Done,
}

/// Where a ray went after crossing a polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RayStep {
    /// The polygon entered, `None` if the ray stopped or was split
    pub next_polygon: Option<usize>,
    pub clip_flags: u16,
    /// The solid endpoint aimed at, if the ray passed through it
    pub clipping_endpoint: Option<usize>,
    /// The crossed line, if it has a floor or ceiling step
    pub clipping_line: Option<usize>,
}

/// The edge a ray leaves by after landing exactly on a vertex
struct VertexLead {
    polygon: Option<usize>,
    line: Option<usize>,
    side: Option<usize>,
    clip_flags: u16,
}

impl VisTree {
    fn push_polygon(
        &mut self,
        polygon_index: usize,
        flags: &mut RenderFlags,
        automap: &mut impl AutomapTrait,
    ) {
        if !flags.polygon(polygon_index, RenderFlag::PolygonIsVisible) {
            flags.set_polygon(polygon_index, RenderFlag::PolygonIsVisible);
            self.polygon_queue.push(polygon_index);
            automap.polygon_seen(polygon_index);
        }
    }

    /// Find the edge of `polygon_index` the ray from `origin` along `vector`
    /// leaves through, and what is on the other side.
    ///
    /// The vertices are searched for a sign change of the cross product with
    /// the ray. The first nonzero vertex sets the search direction. A vertex
    /// exactly on the ray is resolved by `decide_where_vertex_leads`. A walk
    /// that goes all the way around without finding a crossing is treated as
    /// leaving the map.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn next_polygon_along_line(
        &mut self,
        map: &MapData,
        flags: &mut RenderFlags,
        automap: &mut impl AutomapTrait,
        polygon_index: usize,
        origin: IVec2,
        vector: I64Vec2,
        target_endpoint: Option<usize>,
        bias: Bias,
    ) -> RayStep {
        let polygon = map.polygon(polygon_index);
        let vertex_count = polygon.vertex_count();
        self.push_polygon(polygon_index, flags, automap);

        let mut state = WalkState::LookingForFirstNonzeroVertex;
        let mut vertex_index = 0;
        let mut clockwise = true;
        let mut initial_vertex_index = vertex_index;
        let mut changed_state = true;

        let mut next_polygon = None;
        let mut crossed_line = None;
        let mut crossed_side = None;
        let mut passed_through_solid_vertex = false;
        let mut clip_flags = 0;

        while state != WalkState::Done {
            if changed_state {
                changed_state = false;
            } else if vertex_index == initial_vertex_index {
                self.stats.malformed_walks += 1;
                warn!("Ray went all the way around polygon {polygon_index} without leaving it");
                next_polygon = None;
                crossed_line = None;
                crossed_side = None;
                break;
            }

            let endpoint_index = polygon.endpoint_indexes[vertex_index];
            let vertex = map.endpoint(endpoint_index).vertex;
            let cross = cross_product(long_vector(vertex, origin), vector);

            match cross.signum() {
                // Left of the ray
                1 => match state {
                    WalkState::LookingForFirstNonzeroVertex => {
                        state = WalkState::LookingClockwiseForRightVertex;
                        initial_vertex_index = vertex_index;
                        changed_state = true;
                    }
                    WalkState::LookingCounterclockwiseForLeftVertex => {
                        next_polygon = polygon.adjacent_polygon_indexes[vertex_index];
                        crossed_line = Some(polygon.line_indexes[vertex_index]);
                        crossed_side = polygon.side_indexes[vertex_index];
                        state = WalkState::Done;
                    }
                    WalkState::LookingForNextNonzeroVertex => state = WalkState::Done,
                    _ => {}
                },
                // On the ray
                0 => {
                    if state != WalkState::LookingForFirstNonzeroVertex {
                        if Some(endpoint_index) == target_endpoint {
                            passed_through_solid_vertex = true;
                        }
                        if matches!(
                            state,
                            WalkState::LookingClockwiseForRightVertex
                                | WalkState::LookingCounterclockwiseForLeftVertex
                        ) {
                            let lead = self.decide_where_vertex_leads(
                                map,
                                polygon_index,
                                vertex_index,
                                origin,
                                vector,
                                bias,
                            );
                            next_polygon = lead.polygon;
                            crossed_line = lead.line;
                            crossed_side = lead.side;
                            clip_flags |= lead.clip_flags;
                            state = WalkState::LookingForNextNonzeroVertex;
                            initial_vertex_index = vertex_index;
                            changed_state = true;
                        }
                    }
                }
                // Right of the ray
                _ => match state {
                    WalkState::LookingForFirstNonzeroVertex => {
                        state = WalkState::LookingCounterclockwiseForLeftVertex;
                        clockwise = false;
                        initial_vertex_index = vertex_index;
                        changed_state = true;
                    }
                    WalkState::LookingClockwiseForRightVertex => {
                        let edge = wrap_low(vertex_index, vertex_count);
                        next_polygon = polygon.adjacent_polygon_indexes[edge];
                        crossed_line = Some(polygon.line_indexes[edge]);
                        crossed_side = polygon.side_indexes[edge];
                        state = WalkState::Done;
                    }
                    WalkState::LookingForNextNonzeroVertex => state = WalkState::Done,
                    _ => {}
                },
            }

            vertex_index = if clockwise {
                wrap_high(vertex_index, vertex_count)
            } else {
                wrap_low(vertex_index, vertex_count)
            };
        }

        let mut step = RayStep {
            next_polygon,
            clip_flags,
            clipping_endpoint: target_endpoint.filter(|_| passed_through_solid_vertex),
            clipping_line: None,
        };

        if let Some(line_index) = crossed_line {
            let line = map.line(line_index);
            if !flags.line(line_index, RenderFlag::LineHasBeenSeen) {
                flags.set_line(line_index, RenderFlag::LineHasBeenSeen);
                automap.line_seen(line_index);
            }
            if let Some(side_index) = crossed_side {
                flags.set_side(side_index, RenderFlag::SideIsVisible);
            }

            match next_polygon {
                Some(next_index) if line.is_transparent() => {
                    let next = map.polygon(next_index);
                    if line.highest_adjacent_floor > next.floor_height
                        || line.highest_adjacent_floor > polygon.floor_height
                    {
                        step.clip_flags |= ClipFlag::Up as u16;
                    }
                    if line.lowest_adjacent_ceiling < next.ceiling_height
                        || line.lowest_adjacent_ceiling < polygon.ceiling_height
                    {
                        step.clip_flags |= ClipFlag::Down as u16;
                    }
                    if step.clip_flags & (ClipFlag::Up as u16 | ClipFlag::Down as u16) != 0 {
                        step.clipping_line = Some(line_index);
                    }
                }
                _ => step.next_polygon = None,
            }
        }
        step
    }

    /// The ray lies exactly on vertex `vertex_index` of `polygon_index`.
    /// Without a bias the ray must be split. With one, the edge on that side
    /// of the vertex is crossed, and if the ray then leaves the vertex behind
    /// in the next polygon the vertex may clip what is seen past it.
    fn decide_where_vertex_leads(
        &self,
        map: &MapData,
        polygon_index: usize,
        vertex_index: usize,
        origin: IVec2,
        vector: I64Vec2,
        bias: Bias,
    ) -> VertexLead {
        let polygon = map.polygon(polygon_index);
        let endpoint_index = polygon.endpoint_indexes[vertex_index];
        let edge = match bias {
            Bias::NoBias => {
                return VertexLead {
                    polygon: None,
                    line: None,
                    side: None,
                    clip_flags: ClipFlag::SplitRenderRay as u16,
                };
            }
            Bias::Clockwise => vertex_index,
            Bias::Counterclockwise => wrap_low(vertex_index, polygon.vertex_count()),
        };

        let line_index = polygon.line_indexes[edge];
        let mut lead = VertexLead {
            polygon: polygon.adjacent_polygon_indexes[edge],
            line: Some(line_index),
            side: polygon.side_indexes[edge],
            clip_flags: 0,
        };

        let Some(next_index) = lead.polygon else {
            return lead;
        };
        if !map.line(line_index).is_transparent() {
            return lead;
        }

        let next = map.polygon(next_index);
        let Some(index) = next.vertex_of(endpoint_index) else {
            warn!(
                "Endpoint {endpoint_index} of polygon {polygon_index} is not in neighbour \
                 {next_index}"
            );
            return lead;
        };
        let index = if bias == Bias::Clockwise {
            wrap_high(index, next.vertex_count())
        } else {
            wrap_low(index, next.vertex_count())
        };
        let vertex = map.endpoint(next.endpoint_indexes[index]).vertex;
        let cross = cross_product(long_vector(vertex, origin), vector);

        if bias == Bias::Clockwise && cross >= 0 {
            lead.clip_flags |= ClipFlag::Left as u16;
        } else if bias == Bias::Counterclockwise && cross <= 0 {
            lead.clip_flags |= ClipFlag::Right as u16;
        }
        lead
    }
}

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::I64Vec2;
use level::{MapData, RenderFlag, RenderFlags};
use log::{debug, error, trace, warn};
use math::{long_vector, pin};
use render_trait::AutomapTrait;

use crate::ViewData;
use crate::defs::{
    Bias, ClipFlag, EndpointClip, LineClip, MAXIMUM_ENDPOINT_CLIPS, MAXIMUM_LINE_CLIPS,
    MAXIMUM_NODES, TreeStats, VisError,
};
use crate::nodes::VisNode;

/// Builds, once per frame, the tree of polygons visible from the view and
/// the clip records a renderer needs to draw each of them.
///
/// The root is the polygon the viewer stands in. A child is a polygon a ray
/// from the viewer crossed in to after leaving its parent, so the same
/// polygon may appear under several parents.
#[derive(Debug, Default)]
pub struct VisTree {
    pub(crate) view: Option<ViewData>,
    pub(crate) nodes: Vec<VisNode>,
    /// Polygons a ray has entered whose endpoints still need firing at
    pub(crate) polygon_queue: Vec<usize>,
    pub(crate) line_clips: Vec<LineClip>,
    pub(crate) endpoint_clips: Vec<EndpointClip>,
    /// Per line, index in to `line_clips`. Valid when the line has
    /// `RenderFlag::LineHasClipData`.
    pub(crate) line_clip_indexes: Vec<usize>,
    /// Per endpoint, screen column. Valid when the endpoint has
    /// `RenderFlag::EndpointHasBeenTransformed`.
    pub(crate) endpoint_x_coordinates: Vec<i64>,
    /// Per endpoint, view-space position. Valid once visited.
    pub(crate) transformed_endpoints: Vec<I64Vec2>,
    /// Per endpoint, left and right clip indexes. Valid when the endpoint has
    /// `RenderFlag::EndpointHasClipData`.
    pub(crate) endpoint_clip_indexes: Vec<[Option<usize>; 2]>,
    pub(crate) stats: TreeStats,
}

impl VisTree {
    pub fn new() -> Self {
        Self::with_capacity(MAXIMUM_NODES)
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            polygon_queue: Vec::with_capacity(nodes),
            line_clips: Vec::with_capacity(MAXIMUM_LINE_CLIPS),
            endpoint_clips: Vec::with_capacity(MAXIMUM_ENDPOINT_CLIPS),
            ..Self::default()
        }
    }

    /// Size the per-endpoint and per-line scratch for a map
    pub fn resize(&mut self, endpoint_count: usize, line_count: usize) {
        self.endpoint_x_coordinates.resize(endpoint_count, 0);
        self.transformed_endpoints.resize(endpoint_count, I64Vec2::ZERO);
        self.endpoint_clip_indexes.resize(endpoint_count, [None; 2]);
        self.line_clip_indexes.resize(line_count, 0);
    }

    pub fn set_view(&mut self, view: ViewData) {
        self.view = Some(view);
    }

    pub fn view(&self) -> Option<&ViewData> {
        self.view.as_ref()
    }

    /// Drop everything built for the last frame, keeping allocations
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.polygon_queue.clear();
        self.line_clips.clear();
        self.endpoint_clips.clear();
        self.stats = TreeStats::default();
    }

    pub fn nodes(&self) -> &[VisNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &VisNode {
        &self.nodes[index]
    }

    pub fn root(&self) -> Option<&VisNode> {
        self.nodes.first()
    }

    pub fn line_clips(&self) -> &[LineClip] {
        &self.line_clips
    }

    pub fn line_clip(&self, index: usize) -> &LineClip {
        &self.line_clips[index]
    }

    pub fn endpoint_clips(&self) -> &[EndpointClip] {
        &self.endpoint_clips
    }

    pub fn endpoint_clip(&self, index: usize) -> &EndpointClip {
        &self.endpoint_clips[index]
    }

    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    /// Build the tree for the current view.
    ///
    /// `flags` must be cleared by the caller before each frame. Without a
    /// view, or with `flags` sized for another map, the tree is left empty.
    pub fn build_tree(
        &mut self,
        map: &MapData,
        flags: &mut RenderFlags,
        automap: &mut impl AutomapTrait,
    ) -> Result<(), VisError> {
        #[cfg(feature = "hprof")]
        profile!("build_tree");
        self.reset();
        let Some(view) = self.view else {
            error!("build_tree called without a view");
            return Ok(());
        };
        if view.origin_polygon >= map.polygons().len() {
            error!(
                "View polygon {} is not in a map of {} polygons",
                view.origin_polygon,
                map.polygons().len()
            );
            return Ok(());
        }
        if !flags.fits(map) {
            error!("Render flags do not match the map, resize them before building");
            return Ok(());
        }
        if self.endpoint_x_coordinates.len() != map.endpoints().len()
            || self.line_clip_indexes.len() != map.lines().len()
        {
            debug!("Resizing visibility scratch to the map");
            self.resize(map.endpoints().len(), map.lines().len());
        }

        self.nodes.push(VisNode::new(view.origin_polygon, None));
        self.initialize_clip_data(&view);

        // Shoot the edges of the view cone so polygons only partly in view are
        // entered even if none of their endpoints are
        self.cast_render_ray(
            map,
            flags,
            automap,
            &view,
            view.left_edge,
            None,
            0,
            Bias::Counterclockwise,
        )?;
        self.cast_render_ray(
            map,
            flags,
            automap,
            &view,
            view.right_edge,
            None,
            0,
            Bias::Clockwise,
        )?;

        while let Some(polygon_index) = self.polygon_queue.pop() {
            #[cfg(feature = "hprof")]
            profile!("fire_at_polygon");
            let polygon = map.polygon(polygon_index);
            for &endpoint_index in &polygon.endpoint_indexes {
                if flags.endpoint(endpoint_index, RenderFlag::EndpointHasBeenVisited) {
                    continue;
                }
                let endpoint = map.endpoint(endpoint_index);
                let transformed = view.transform(endpoint.vertex);
                self.transformed_endpoints[endpoint_index] = transformed;
                if transformed.x > 0 {
                    self.endpoint_x_coordinates[endpoint_index] = pin(
                        view.screen_x(transformed),
                        i32::MIN as i64,
                        i32::MAX as i64,
                    );
                    flags.set_endpoint(endpoint_index, RenderFlag::EndpointHasBeenTransformed);
                }

                let vector = long_vector(endpoint.vertex, view.origin);
                if view.in_cone(vector) {
                    // Transparent endpoints can't clip anything so aren't aimed at
                    let target = (!endpoint.is_transparent()).then_some(endpoint_index);
                    self.cast_render_ray(
                        map,
                        flags,
                        automap,
                        &view,
                        vector,
                        target,
                        0,
                        Bias::NoBias,
                    )?;
                }
                flags.set_endpoint(endpoint_index, RenderFlag::EndpointHasBeenVisited);
            }
        }

        trace!(
            "Vis tree: {} nodes, {} line clips, {} endpoint clips, {} rays, {} splits, {} malformed",
            self.nodes.len(),
            self.line_clips.len(),
            self.endpoint_clips.len(),
            self.stats.rays_cast,
            self.stats.ray_splits,
            self.stats.malformed_walks
        );

        #[cfg(feature = "safety_check")]
        self.validate()?;
        Ok(())
    }

    /// Follow one ray from the viewer through the map, starting in the
    /// polygon of `parent`, adding nodes and clip records along the way.
    /// `endpoint` is the solid endpoint being aimed at, if any.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn cast_render_ray(
        &mut self,
        map: &MapData,
        flags: &mut RenderFlags,
        automap: &mut impl AutomapTrait,
        view: &ViewData,
        vector: I64Vec2,
        endpoint: Option<usize>,
        mut parent: usize,
        bias: Bias,
    ) -> Result<(), VisError> {
        #[cfg(feature = "hprof")]
        profile!("cast_render_ray");
        self.stats.rays_cast += 1;
        let mut polygon = Some(self.nodes[parent].polygon_index);
        let mut hops = 0;

        while let Some(polygon_index) = polygon {
            let step = self.next_polygon_along_line(
                map,
                flags,
                automap,
                polygon_index,
                view.origin,
                vector,
                endpoint,
                bias,
            );
            polygon = step.next_polygon;

            let Some(next_polygon) = step.next_polygon else {
                if step.clip_flags & ClipFlag::SplitRenderRay as u16 != 0 {
                    self.stats.ray_splits += 1;
                    debug!(
                        "Ray split on a vertex of polygon {polygon_index}, aiming at {endpoint:?}"
                    );
                    for bias in [Bias::Clockwise, Bias::Counterclockwise] {
                        self.cast_render_ray(
                            map, flags, automap, view, vector, endpoint, parent, bias,
                        )?;
                    }
                }
                break;
            };

            let node = match self.find_child(parent, next_polygon) {
                Some(node) => node,
                None => self.add_node(next_polygon, parent),
            };

            if let Some(line_index) = step.clipping_line {
                let clip = if flags.line(line_index, RenderFlag::LineHasClipData) {
                    self.line_clip_indexes[line_index]
                } else {
                    self.calculate_line_clipping_information(
                        map,
                        flags,
                        view,
                        line_index,
                        step.clip_flags,
                    )
                };
                if !self.nodes[node].add_clipping_line(clip) {
                    return Err(VisError::TooManyClippingLines {
                        node,
                        polygon: next_polygon,
                    });
                }
            }

            let side_clip = step.clip_flags & (ClipFlag::Left as u16 | ClipFlag::Right as u16);
            if let (Some(endpoint_index), true) = (step.clipping_endpoint, side_clip != 0) {
                let clip = self.endpoint_clip_for(flags, view, endpoint_index, step.clip_flags);
                if let Some(clip) = clip {
                    if !self.nodes[node].add_clipping_endpoint(clip) {
                        return Err(VisError::TooManyClippingEndpoints {
                            node,
                            polygon: next_polygon,
                        });
                    }
                }
            }

            parent = node;
            hops += 1;
            if hops > map.polygons().len() {
                warn!(
                    "Ray through polygon {polygon_index} crossed more polygons than the map has, \
                     abandoning it"
                );
                break;
            }
        }
        Ok(())
    }
}

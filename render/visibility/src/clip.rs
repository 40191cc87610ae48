//! The clip records made while casting rays: where on screen a line with a
//! floor or ceiling step cuts off the view, and where a solid vertex does.

use glam::I64Vec2;
use level::{MapData, RenderFlag, RenderFlags};
use log::warn;
use math::pin;

use crate::defs::{
    ClipFlag, EndpointClip, LEFT_SIDE_OF_SCREEN, LineClip, NUMBER_OF_INITIAL_ENDPOINT_CLIPS,
    NUMBER_OF_INITIAL_LINE_CLIPS, RIGHT_SIDE_OF_SCREEN, TOP_AND_BOTTOM_OF_SCREEN,
};
use crate::{ViewData, VisTree};

impl VisTree {
    /// Seed the clip lists with the edges of the screen
    pub(crate) fn initialize_clip_data(&mut self, view: &ViewData) {
        self.endpoint_clips.clear();
        self.endpoint_clips
            .resize(NUMBER_OF_INITIAL_ENDPOINT_CLIPS, EndpointClip::default());
        self.endpoint_clips[LEFT_SIDE_OF_SCREEN] = EndpointClip {
            flags: ClipFlag::Left as u16,
            vector: view.untransformed_left_edge,
            x: 0,
        };
        self.endpoint_clips[RIGHT_SIDE_OF_SCREEN] = EndpointClip {
            flags: ClipFlag::Right as u16,
            vector: view.untransformed_right_edge,
            x: view.screen.width(),
        };

        self.line_clips.clear();
        self.line_clips
            .resize(NUMBER_OF_INITIAL_LINE_CLIPS, LineClip::default());
        self.line_clips[TOP_AND_BOTTOM_OF_SCREEN] = LineClip {
            flags: ClipFlag::Up as u16 | ClipFlag::Down as u16,
            x0: 0,
            x1: view.screen.width(),
            top_vector: view.top_edge,
            top_y: 0,
            bottom_vector: view.bottom_edge,
            bottom_y: view.screen.height(),
        };
    }

    /// Project a crossed line with a floor and/or ceiling step on to the
    /// screen. The record is made once per line per frame; a line that ends
    /// up off screen keeps a record with no flags.
    pub(crate) fn calculate_line_clipping_information(
        &mut self,
        map: &MapData,
        flags: &mut RenderFlags,
        view: &ViewData,
        line_index: usize,
        clip_flags: u16,
    ) -> usize {
        let line = map.line(line_index);
        // The endpoints may not have been visited yet
        let p0 = view.transform(map.endpoint(line.endpoint_indexes[0]).vertex);
        let p1 = view.transform(map.endpoint(line.endpoint_indexes[1]).vertex);
        let mut clip_flags = clip_flags & (ClipFlag::Up as u16 | ClipFlag::Down as u16);
        let mut data = LineClip::default();

        if p0.x > 0 && p1.x > 0 {
            let width = view.screen.width() as i64;
            let height = view.screen.height() as i64;
            let mut x0 = pin(view.screen_x(p0), 0, width);
            let mut x1 = pin(view.screen_x(p1), 0, width);
            if x1 < x0 {
                std::mem::swap(&mut x0, &mut x1);
            }
            data.x0 = x0 as i32;
            data.x1 = x1 as i32;

            if x1 > x0 {
                if clip_flags & ClipFlag::Down as u16 != 0 {
                    let z = line.lowest_adjacent_ceiling as i64 - view.origin_z as i64;
                    let y0 = view.screen_y(z, p0.x);
                    let y1 = view.screen_y(z, p1.x);
                    // Highest on screen
                    let (y, p) = if y0 < y1 { (y0, p0) } else { (y1, p1) };
                    let y = pin(y, 0, height);
                    if y <= 0 {
                        clip_flags &= !(ClipFlag::Down as u16);
                    } else {
                        data.top_vector = I64Vec2::new(-p.x, -z);
                        data.top_y = y as i32;
                    }
                }

                if clip_flags & ClipFlag::Up as u16 != 0 {
                    let z = line.highest_adjacent_floor as i64 - view.origin_z as i64;
                    let y0 = view.screen_y(z, p0.x);
                    let y1 = view.screen_y(z, p1.x);
                    // Lowest on screen
                    let (y, p) = if y0 > y1 { (y0, p0) } else { (y1, p1) };
                    let y = pin(y, 0, height);
                    if y >= height {
                        clip_flags &= !(ClipFlag::Up as u16);
                    } else {
                        data.bottom_vector = I64Vec2::new(p.x, z);
                        data.bottom_y = y as i32;
                    }
                }

                data.flags = clip_flags;
            }
        }

        let index = self.line_clips.len();
        self.line_clips.push(data);
        self.line_clip_indexes[line_index] = index;
        flags.set_line(line_index, RenderFlag::LineHasClipData);
        index
    }

    /// The clip for a solid endpoint a ray passed through, made once per
    /// endpoint and side per frame. `None` if the endpoint was never
    /// projected on to the screen.
    pub(crate) fn endpoint_clip_for(
        &mut self,
        flags: &mut RenderFlags,
        view: &ViewData,
        endpoint_index: usize,
        clip_flags: u16,
    ) -> Option<usize> {
        if !flags.endpoint(endpoint_index, RenderFlag::EndpointHasClipData) {
            self.endpoint_clip_indexes[endpoint_index] = [None; 2];
            flags.set_endpoint(endpoint_index, RenderFlag::EndpointHasClipData);
        }
        let side = usize::from(clip_flags & ClipFlag::Left as u16 == 0);
        if let Some(index) = self.endpoint_clip_indexes[endpoint_index][side] {
            return Some(index);
        }
        if !flags.endpoint(endpoint_index, RenderFlag::EndpointHasBeenTransformed) {
            warn!("Endpoint {endpoint_index} clips the view but is not in front of it");
            return None;
        }

        let index = self.calculate_endpoint_clipping_information(view, endpoint_index, clip_flags);
        self.endpoint_clip_indexes[endpoint_index][side] = Some(index);
        Some(index)
    }

    fn calculate_endpoint_clipping_information(
        &mut self,
        view: &ViewData,
        endpoint_index: usize,
        clip_flags: u16,
    ) -> usize {
        let transformed = self.transformed_endpoints[endpoint_index];
        let data = if clip_flags & ClipFlag::Left as u16 != 0 {
            EndpointClip {
                flags: ClipFlag::Left as u16,
                vector: transformed,
                x: 0,
            }
        } else {
            // Negated so the clip faces the other way
            EndpointClip {
                flags: ClipFlag::Right as u16,
                vector: -transformed,
                x: 0,
            }
        };
        let x = pin(
            self.endpoint_x_coordinates[endpoint_index],
            0,
            view.screen.width() as i64,
        );

        let index = self.endpoint_clips.len();
        self.endpoint_clips.push(EndpointClip { x: x as i32, ..data });
        index
    }
}

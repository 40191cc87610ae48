use glam::{I64Vec2, IVec2};
use math::{Angle, angle_to_vector, transform_point2d};
use render_trait::ScreenSize;

/// Everything about the viewer the visibility pass needs for one frame.
///
/// World-space vectors use map coordinates. View-space vectors have x
/// pointing away from the viewer and y to the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewData {
    pub origin: IVec2,
    /// Eye height
    pub origin_z: i32,
    /// The polygon the viewer stands in
    pub origin_polygon: usize,
    pub yaw: Angle,
    /// World-space direction of the left side of the view cone
    pub left_edge: I64Vec2,
    /// World-space direction of the right side of the view cone
    pub right_edge: I64Vec2,
    /// View-space direction of the left edge of the screen
    pub untransformed_left_edge: I64Vec2,
    /// View-space direction of the right edge of the screen
    pub untransformed_right_edge: I64Vec2,
    /// View-space (distance, height) direction of the top of the screen
    pub top_edge: I64Vec2,
    /// View-space (distance, height) direction of the bottom of the screen
    pub bottom_edge: I64Vec2,
    pub screen: ScreenSize,
    pub world_to_screen_x: i64,
    pub world_to_screen_y: i64,
    /// Vertical shift of the horizon in pixels from looking up or down
    pub dtanpitch: i64,
}

impl ViewData {
    /// Derive a view from the viewer's position and facing. `field_of_view`
    /// is the full horizontal angle. Pixels are square.
    pub fn new(
        origin: IVec2,
        origin_z: i32,
        origin_polygon: usize,
        yaw: Angle,
        field_of_view: Angle,
        pitch: Angle,
        screen: ScreenSize,
    ) -> Self {
        let half_fov = field_of_view / 2.0;
        let half_width = screen.half_width() as i64;
        let half_height = screen.half_height() as i64;
        let world_to_screen_x = (half_width as f32 / half_fov.tan()).round() as i64;
        let world_to_screen_y = world_to_screen_x;
        let dtanpitch = (world_to_screen_y as f32 * pitch.tan()).round() as i64;

        Self {
            origin,
            origin_z,
            origin_polygon,
            yaw,
            left_edge: angle_to_vector(yaw - half_fov),
            right_edge: angle_to_vector(yaw + half_fov),
            untransformed_left_edge: I64Vec2::new(world_to_screen_x, -half_width),
            untransformed_right_edge: I64Vec2::new(world_to_screen_x, half_width),
            top_edge: I64Vec2::new(-world_to_screen_y, -(half_height + dtanpitch)),
            bottom_edge: I64Vec2::new(world_to_screen_y, dtanpitch - half_height),
            screen,
            world_to_screen_x,
            world_to_screen_y,
            dtanpitch,
        }
    }

    #[inline]
    pub fn transform(&self, point: IVec2) -> I64Vec2 {
        transform_point2d(point, self.origin, self.yaw)
    }

    /// Screen column of a view-space point in front of the viewer
    #[inline]
    pub fn screen_x(&self, transformed: I64Vec2) -> i64 {
        self.screen.half_width() as i64 + (transformed.y * self.world_to_screen_x) / transformed.x
    }

    /// Screen row of a height relative to the eye at view-space distance `x`
    #[inline]
    pub fn screen_y(&self, z: i64, x: i64) -> i64 {
        self.screen.half_height() as i64 - (z * self.world_to_screen_y) / x + self.dtanpitch
    }

    /// Is the world-space vector inside the view cone, edges included
    #[inline]
    pub fn in_cone(&self, vector: I64Vec2) -> bool {
        let (l, r) = (self.left_edge, self.right_edge);
        (r.x as i128 * vector.y as i128 - r.y as i128 * vector.x as i128) <= 0
            && (l.x as i128 * vector.y as i128 - l.y as i128 * vector.x as i128) >= 0
    }
}

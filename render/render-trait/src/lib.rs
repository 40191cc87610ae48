//! The narrow seams between the visibility pass and the rest of a renderer:
//! the size of the screen being drawn to, and the automap that is told what
//! the player has seen.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    width: i32,
    height: i32,
    width_usize: usize,
    height_usize: usize,
}

impl ScreenSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            width_usize: width,
            height_usize: height,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn half_width(&self) -> i32 {
        self.width / 2
    }

    pub const fn half_height(&self) -> i32 {
        self.height / 2
    }

    pub const fn width_usize(&self) -> usize {
        self.width_usize
    }

    pub const fn height_usize(&self) -> usize {
        self.height_usize
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

/// Receives the polygons and lines that became visible while building a
/// frame. Each is reported at most once per frame.
pub trait AutomapTrait {
    fn polygon_seen(&mut self, polygon: usize);
    fn line_seen(&mut self, line: usize);
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAutomap;

impl AutomapTrait for NoAutomap {
    fn polygon_seen(&mut self, _polygon: usize) {}

    fn line_seen(&mut self, _line: usize) {}
}

/// Remembers everything it has been told, in the order it was told
#[derive(Debug, Default, Clone)]
pub struct SeenMap {
    pub polygons: Vec<usize>,
    pub lines: Vec<usize>,
}

impl SeenMap {
    pub fn clear(&mut self) {
        self.polygons.clear();
        self.lines.clear();
    }
}

impl AutomapTrait for SeenMap {
    fn polygon_seen(&mut self, polygon: usize) {
        self.polygons.push(polygon);
    }

    fn line_seen(&mut self, line: usize) {
        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use crate::{AutomapTrait, ScreenSize, SeenMap};

    #[test]
    fn screen_halves() {
        let size = ScreenSize::new(320, 200);
        assert_eq!(size.half_width(), 160);
        assert_eq!(size.half_height(), 100);
        assert_eq!(size.width_usize(), 320);
    }

    #[test]
    fn seen_map_records() {
        let mut seen = SeenMap::default();
        seen.polygon_seen(3);
        seen.line_seen(7);
        seen.polygon_seen(1);
        assert_eq!(seen.polygons, vec![3, 1]);
        assert_eq!(seen.lines, vec![7]);
        seen.clear();
        assert!(seen.polygons.is_empty());
    }
}

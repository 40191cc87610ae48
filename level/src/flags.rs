use crate::MapData;

/// Attributes of an endpoint, derived from the lines touching it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum EndpointFlags {
    /// At least one line touching the endpoint is solid
    Solid = 1,
    /// Every line touching the endpoint is transparent
    Transparent = 1 << 1,
}

/// The flags control how rays treat a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum LineFlags {
    /// Nothing can be seen through this line
    Solid = 1,
    /// The polygon on the far side can be seen through this line
    Transparent = 1 << 1,
}

/// Per-frame marks set while the visibility tree is built. They are cleared
/// by the owner of the map between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum RenderFlag {
    PolygonIsVisible = 1,
    EndpointHasBeenVisited = 1 << 1,
    EndpointHasBeenTransformed = 1 << 2,
    EndpointHasClipData = 1 << 3,
    LineHasClipData = 1 << 4,
    LineHasBeenSeen = 1 << 5,
    SideIsVisible = 1 << 6,
}

/// One bitset per polygon, line, endpoint and side of a map
#[derive(Debug, Default, Clone)]
pub struct RenderFlags {
    polygons: Vec<u16>,
    lines: Vec<u16>,
    endpoints: Vec<u16>,
    sides: Vec<u16>,
}

macro_rules! flag_accessors {
    ($field:ident, $test:ident, $set:ident) => {
        #[inline]
        pub fn $test(&self, index: usize, flag: RenderFlag) -> bool {
            self.$field[index] & flag as u16 != 0
        }

        #[inline]
        pub fn $set(&mut self, index: usize, flag: RenderFlag) {
            self.$field[index] |= flag as u16;
        }
    };
}

impl RenderFlags {
    pub fn new(map: &MapData) -> Self {
        let mut flags = Self::default();
        flags.resize(map);
        flags
    }

    /// Match the map's entity counts. All flags are cleared.
    pub fn resize(&mut self, map: &MapData) {
        for (set, len) in [
            (&mut self.polygons, map.polygons().len()),
            (&mut self.lines, map.lines().len()),
            (&mut self.endpoints, map.endpoints().len()),
            (&mut self.sides, map.side_count()),
        ] {
            set.clear();
            set.resize(len, 0);
        }
    }

    /// Whether there is a bitset for every entity of `map`
    pub fn fits(&self, map: &MapData) -> bool {
        self.polygons.len() == map.polygons().len()
            && self.lines.len() == map.lines().len()
            && self.endpoints.len() == map.endpoints().len()
            && self.sides.len() == map.side_count()
    }

    /// Zero every flag, keeping the allocations
    pub fn clear(&mut self) {
        self.polygons.fill(0);
        self.lines.fill(0);
        self.endpoints.fill(0);
        self.sides.fill(0);
    }

    flag_accessors!(polygons, polygon, set_polygon);
    flag_accessors!(lines, line, set_line);
    flag_accessors!(endpoints, endpoint, set_endpoint);
    flag_accessors!(sides, side, set_side);

    /// Polygons carrying `flag`, ascending
    pub fn polygons_with(&self, flag: RenderFlag) -> impl Iterator<Item = usize> + '_ {
        self.polygons
            .iter()
            .enumerate()
            .filter(move |(_, f)| **f & flag as u16 != 0)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderFlag, RenderFlags};
    use crate::fixtures;

    #[test]
    fn set_and_clear() {
        let map = fixtures::two_rooms().unwrap();
        let mut flags = RenderFlags::new(&map);
        assert!(!flags.polygon(1, RenderFlag::PolygonIsVisible));

        flags.set_polygon(1, RenderFlag::PolygonIsVisible);
        flags.set_endpoint(0, RenderFlag::EndpointHasBeenVisited);
        flags.set_endpoint(0, RenderFlag::EndpointHasClipData);
        assert!(flags.polygon(1, RenderFlag::PolygonIsVisible));
        assert!(flags.endpoint(0, RenderFlag::EndpointHasBeenVisited));
        assert!(flags.endpoint(0, RenderFlag::EndpointHasClipData));
        assert!(!flags.endpoint(0, RenderFlag::EndpointHasBeenTransformed));
        assert_eq!(
            flags.polygons_with(RenderFlag::PolygonIsVisible).collect::<Vec<_>>(),
            vec![1]
        );

        flags.clear();
        assert!(!flags.polygon(1, RenderFlag::PolygonIsVisible));
        assert!(!flags.endpoint(0, RenderFlag::EndpointHasBeenVisited));
    }

    #[test]
    fn sized_to_map() {
        let map = fixtures::corridor(4).unwrap();
        let flags = RenderFlags::new(&map);
        assert_eq!(flags.polygons.len(), map.polygons().len());
        assert_eq!(flags.lines.len(), map.lines().len());
        assert_eq!(flags.endpoints.len(), map.endpoints().len());
        assert_eq!(flags.sides.len(), map.side_count());
        assert!(flags.fits(&map));
    }

    #[test]
    fn fits_only_its_own_map() {
        let small = fixtures::corridor(2).unwrap();
        let large = fixtures::corridor(4).unwrap();
        let mut flags = RenderFlags::new(&small);
        assert!(!flags.fits(&large));
        assert!(!RenderFlags::default().fits(&small));

        flags.resize(&large);
        assert!(flags.fits(&large));
    }
}

mod sort_tests;

use glam::IVec2;
use level::{MapData, RenderFlags};
use math::Angle;
use render_trait::{ScreenSize, SeenMap};

use crate::{PolygonSorter, ViewData, VisTree};

pub(super) const SCREEN: ScreenSize = ScreenSize::new(640, 480);

/// Looking along +x with a 90 degree cone
pub(super) fn view_from(x: i32, y: i32, polygon: usize) -> ViewData {
    ViewData::new(
        IVec2::new(x, y),
        32,
        polygon,
        Angle::default(),
        Angle::from_degrees(90.0),
        Angle::default(),
        SCREEN,
    )
}

pub(super) struct Frame {
    pub tree: VisTree,
    pub sorter: PolygonSorter,
    pub flags: RenderFlags,
    pub seen: SeenMap,
}

impl Frame {
    pub fn new(map: &MapData, nodes: usize) -> Self {
        let mut tree = VisTree::with_capacity(nodes);
        tree.resize(map.endpoints().len(), map.lines().len());
        let mut sorter = PolygonSorter::new();
        sorter.resize(map.polygons().len());
        Self {
            tree,
            sorter,
            flags: RenderFlags::new(map),
            seen: SeenMap::default(),
        }
    }

    pub fn render(&mut self, map: &MapData, view: ViewData) {
        self.flags.clear();
        self.seen.clear();
        self.tree.set_view(view);
        self.tree
            .build_tree(map, &mut self.flags, &mut self.seen)
            .unwrap();
        self.sorter.sort_tree(&self.tree);
    }

    pub fn sorted_polygons(&self) -> Vec<usize> {
        self.sorter
            .sorted_nodes()
            .iter()
            .map(|n| n.polygon_index)
            .collect()
    }

    pub fn child_polygons(&self, node: usize) -> Vec<usize> {
        self.tree
            .children(node)
            .map(|c| self.tree.node(c).polygon_index)
            .collect()
    }
}

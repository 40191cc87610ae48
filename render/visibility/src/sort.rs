#[cfg(feature = "hprof")]
use coarse_prof::profile;
use level::{RenderFlag, RenderFlags};
use log::trace;

use crate::VisTree;
use crate::defs::{ClippingWindow, MAXIMUM_CLIPPING_WINDOWS, MAXIMUM_NODES, SortedNode};
use crate::windows::{ClipAccumulator, build_clipping_windows, merge_clipping_windows};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unsorted,
    InProgress,
    Sorted,
}

/// A polygon whose children are still being visited. The alias and child
/// ranges index in to the sorter's stacks.
#[derive(Debug, Clone, Copy)]
struct Frame {
    alias_start: usize,
    alias_end: usize,
    child_start: usize,
    child_end: usize,
    cursor: usize,
}

/// Orders the polygons of a `VisTree` for drawing back to front and works
/// out the screen windows each one may be drawn in.
#[derive(Debug, Default)]
pub struct PolygonSorter {
    sorted_nodes: Vec<SortedNode>,
    clipping_windows: Vec<ClippingWindow>,
    polygon_index_to_sorted_node: Vec<usize>,
    node_state: Vec<NodeState>,
    frames: Vec<Frame>,
    alias_stack: Vec<usize>,
    child_stack: Vec<usize>,
    scratch: ClipAccumulator,
}

impl PolygonSorter {
    pub fn new() -> Self {
        Self {
            sorted_nodes: Vec::with_capacity(MAXIMUM_NODES),
            clipping_windows: Vec::with_capacity(MAXIMUM_CLIPPING_WINDOWS),
            node_state: Vec::with_capacity(MAXIMUM_NODES),
            ..Self::default()
        }
    }

    /// Make room to look up `polygon_count` polygons. Never shrinks.
    pub fn resize(&mut self, polygon_count: usize) {
        if self.polygon_index_to_sorted_node.len() < polygon_count {
            self.polygon_index_to_sorted_node.resize(polygon_count, 0);
        }
    }

    pub fn reset(&mut self) {
        self.sorted_nodes.clear();
        self.clipping_windows.clear();
        self.node_state.clear();
        self.frames.clear();
        self.alias_stack.clear();
        self.child_stack.clear();
    }

    /// Order the tree's polygons so each comes after every polygon found
    /// through any of its nodes, with the viewer's own polygon last. Sibling
    /// polygons are taken in ascending index order.
    pub fn sort_tree(&mut self, tree: &VisTree) {
        #[cfg(feature = "hprof")]
        profile!("sort_tree");
        self.reset();
        if tree.nodes().is_empty() {
            return;
        }
        self.node_state.resize(tree.nodes().len(), NodeState::Unsorted);

        self.enter_polygon(tree, 0);
        while let Some(frame) = self.frames.last_mut() {
            if frame.cursor < frame.child_end {
                let child = self.child_stack[frame.cursor];
                frame.cursor += 1;
                // In progress is a loop back to an ancestor, skip it
                if self.node_state[child] == NodeState::Unsorted {
                    self.enter_polygon(tree, child);
                }
            } else if let Some(frame) = self.frames.pop() {
                self.emit_polygon(tree, frame);
                self.alias_stack.truncate(frame.alias_start);
                self.child_stack.truncate(frame.child_start);
            }
        }

        trace!(
            "Sorted {} polygons with {} clipping windows",
            self.sorted_nodes.len(),
            self.clipping_windows.len()
        );
    }

    /// Mark every node of the polygon as in progress and stack up the
    /// children of all of them.
    fn enter_polygon(&mut self, tree: &VisTree, node: usize) {
        let alias_start = self.alias_stack.len();
        for alias in tree.aliases(node) {
            self.node_state[alias] = NodeState::InProgress;
            self.alias_stack.push(alias);
        }
        let alias_end = self.alias_stack.len();

        let child_start = self.child_stack.len();
        for &alias in &self.alias_stack[alias_start..alias_end] {
            self.child_stack.extend(tree.children(alias));
        }
        let child_end = self.child_stack.len();
        self.child_stack[child_start..child_end]
            .sort_unstable_by_key(|&c| (tree.node(c).polygon_index, c));

        self.frames.push(Frame {
            alias_start,
            alias_end,
            child_start,
            child_end,
            cursor: child_start,
        });
    }

    fn emit_polygon(&mut self, tree: &VisTree, frame: Frame) {
        let polygon_index = tree.node(self.alias_stack[frame.alias_start]).polygon_index;
        let window_start = self.clipping_windows.len();
        for &alias in &self.alias_stack[frame.alias_start..frame.alias_end] {
            self.node_state[alias] = NodeState::Sorted;
            build_clipping_windows(tree, alias, &mut self.scratch, &mut self.clipping_windows);
        }
        merge_clipping_windows(&mut self.clipping_windows, window_start);

        self.resize(polygon_index + 1);
        self.polygon_index_to_sorted_node[polygon_index] = self.sorted_nodes.len();
        self.sorted_nodes.push(SortedNode {
            polygon_index,
            interior_objects: None,
            exterior_objects: None,
            clipping_windows: window_start..self.clipping_windows.len(),
        });
    }

    /// Back to front
    pub fn sorted_nodes(&self) -> &[SortedNode] {
        &self.sorted_nodes
    }

    /// For the object pass to attach its handles
    pub fn sorted_nodes_mut(&mut self) -> &mut [SortedNode] {
        &mut self.sorted_nodes
    }

    pub fn front_to_back(&self) -> impl Iterator<Item = &SortedNode> {
        self.sorted_nodes.iter().rev()
    }

    pub fn clipping_windows(&self, node: &SortedNode) -> &[ClippingWindow] {
        &self.clipping_windows[node.clipping_windows.clone()]
    }

    pub fn all_clipping_windows(&self) -> &[ClippingWindow] {
        &self.clipping_windows
    }

    /// Raw position in `sorted_nodes` last recorded for the polygon.
    ///
    /// The table is not cleared between frames, so for a polygon that is not
    /// visible this frame the value is stale (or 0 if it was never sorted).
    /// `None` only means the index is past the end of the table. Use
    /// `sorted_node_for_polygon` unless the polygon is known to be visible.
    pub fn polygon_index_to_sorted_node(&self, polygon_index: usize) -> Option<usize> {
        self.polygon_index_to_sorted_node.get(polygon_index).copied()
    }

    /// The sorted node for a polygon, if it is visible this frame
    pub fn sorted_node_for_polygon(
        &self,
        polygon_index: usize,
        flags: &RenderFlags,
    ) -> Option<&SortedNode> {
        if !flags.polygon(polygon_index, RenderFlag::PolygonIsVisible) {
            return None;
        }
        self.polygon_index_to_sorted_node(polygon_index)
            .and_then(|i| self.sorted_nodes.get(i))
            .filter(|node| node.polygon_index == polygon_index)
    }
}

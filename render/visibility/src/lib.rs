//! Visibility and depth ordering for a polygon and portal map.
//!
//! Each frame a [`VisTree`] is built by casting rays from the viewer at the
//! edges of the view cone and at every endpoint of every polygon found so
//! far. The tree records which polygons were reached from which, along with
//! the screen-space clips made by solid vertices and by floor or ceiling
//! steps. A [`PolygonSorter`] then flattens the tree in to a back to front
//! list of polygons, each with the screen windows it may be drawn in.
//!
//! ```ignore
//! tree.set_view(view);
//! tree.build_tree(&map, &mut flags, &mut automap)?;
//! sorter.sort_tree(&tree);
//! for node in sorter.sorted_nodes() {
//!     draw(node, sorter.clipping_windows(node));
//! }
//! ```

mod clip;
mod defs;
mod nodes;
mod ray;
mod sort;
mod view;
mod vis_tree;
mod windows;

#[cfg(test)]
mod tests;

pub use defs::*;
pub use nodes::{NodeLinks, VisNode};
pub use sort::PolygonSorter;
pub use view::ViewData;
pub use vis_tree::VisTree;

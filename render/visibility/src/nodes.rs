use std::cmp::Ordering;

use crate::VisTree;
use crate::defs::{MAXIMUM_CLIPPING_ENDPOINTS_PER_NODE, MAXIMUM_CLIPPING_LINES_PER_NODE, VisError};

/// One polygon as reached from one parent polygon. All links are indexes in
/// to the tree's node arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisNode {
    pub polygon_index: usize,
    pub parent: Option<usize>,
    /// Next child of the same parent
    pub siblings: Option<usize>,
    /// First child
    pub children: Option<usize>,
    last_child: Option<usize>,
    /// Polygon search tree, smaller polygon indexes
    pub less: Option<usize>,
    /// Polygon search tree, larger polygon indexes
    pub greater: Option<usize>,
    /// Next node with the same polygon index
    pub shared: Option<usize>,
    clipping_lines: [usize; MAXIMUM_CLIPPING_LINES_PER_NODE],
    clipping_line_count: usize,
    clipping_endpoints: [usize; MAXIMUM_CLIPPING_ENDPOINTS_PER_NODE],
    clipping_endpoint_count: usize,
}

impl VisNode {
    pub(crate) const fn new(polygon_index: usize, parent: Option<usize>) -> Self {
        Self {
            polygon_index,
            parent,
            siblings: None,
            children: None,
            last_child: None,
            less: None,
            greater: None,
            shared: None,
            clipping_lines: [0; MAXIMUM_CLIPPING_LINES_PER_NODE],
            clipping_line_count: 0,
            clipping_endpoints: [0; MAXIMUM_CLIPPING_ENDPOINTS_PER_NODE],
            clipping_endpoint_count: 0,
        }
    }

    /// Indexes in to `VisTree::line_clips`
    #[inline]
    pub fn clipping_lines(&self) -> &[usize] {
        &self.clipping_lines[..self.clipping_line_count]
    }

    /// Indexes in to `VisTree::endpoint_clips`
    #[inline]
    pub fn clipping_endpoints(&self) -> &[usize] {
        &self.clipping_endpoints[..self.clipping_endpoint_count]
    }

    /// False if the clip is new and there is no room left
    pub(crate) fn add_clipping_line(&mut self, clip: usize) -> bool {
        if self.clipping_lines().contains(&clip) {
            return true;
        }
        if self.clipping_line_count == MAXIMUM_CLIPPING_LINES_PER_NODE {
            return false;
        }
        self.clipping_lines[self.clipping_line_count] = clip;
        self.clipping_line_count += 1;
        true
    }

    /// False if the clip is new and there is no room left
    pub(crate) fn add_clipping_endpoint(&mut self, clip: usize) -> bool {
        if self.clipping_endpoints().contains(&clip) {
            return true;
        }
        if self.clipping_endpoint_count == MAXIMUM_CLIPPING_ENDPOINTS_PER_NODE {
            return false;
        }
        self.clipping_endpoints[self.clipping_endpoint_count] = clip;
        self.clipping_endpoint_count += 1;
        true
    }
}

/// Walks a linked list of nodes through one of the link fields
pub struct NodeLinks<'a> {
    nodes: &'a [VisNode],
    next: Option<usize>,
    link: fn(&VisNode) -> Option<usize>,
}

impl Iterator for NodeLinks<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = (self.link)(&self.nodes[current]);
        Some(current)
    }
}

impl VisTree {
    /// Append a node for `polygon_index` as the last child of `parent` and
    /// thread it in to the polygon search tree.
    pub(crate) fn add_node(&mut self, polygon_index: usize, parent: usize) -> usize {
        let index = self.nodes.len();
        self.nodes.push(VisNode::new(polygon_index, Some(parent)));

        match self.nodes[parent].last_child {
            Some(last) => self.nodes[last].siblings = Some(index),
            None => self.nodes[parent].children = Some(index),
        }
        self.nodes[parent].last_child = Some(index);

        // The root is always node 0 and heads the search tree
        let mut current = 0;
        loop {
            let node = &mut self.nodes[current];
            match polygon_index.cmp(&node.polygon_index) {
                Ordering::Greater => match node.greater {
                    Some(next) => current = next,
                    None => {
                        node.greater = Some(index);
                        break;
                    }
                },
                Ordering::Less => match node.less {
                    Some(next) => current = next,
                    None => {
                        node.less = Some(index);
                        break;
                    }
                },
                Ordering::Equal => {
                    let next = node.shared.replace(index);
                    self.nodes[index].shared = next;
                    break;
                }
            }
        }
        index
    }

    /// The search tree node holding `polygon_index`, the head of its
    /// same-polygon chain.
    fn tree_node_for(&self, polygon_index: usize) -> Option<usize> {
        let mut current = if self.nodes.is_empty() { None } else { Some(0) };
        while let Some(i) = current {
            let node = &self.nodes[i];
            current = match polygon_index.cmp(&node.polygon_index) {
                Ordering::Greater => node.greater,
                Ordering::Less => node.less,
                Ordering::Equal => return Some(i),
            };
        }
        None
    }

    /// The child of `parent` for `polygon_index`, if that transition has been
    /// seen this frame.
    pub fn find_child(&self, parent: usize, polygon_index: usize) -> Option<usize> {
        let head = self.tree_node_for(polygon_index)?;
        self.shared_chain(head)
            .find(|&i| self.nodes[i].parent == Some(parent))
    }

    /// Every node for the same polygon as `node`, itself included
    pub fn aliases(&self, node: usize) -> NodeLinks<'_> {
        let head = self.tree_node_for(self.nodes[node].polygon_index);
        NodeLinks {
            nodes: &self.nodes,
            next: head,
            link: |n| n.shared,
        }
    }

    /// Children of `node` in the order they were discovered
    pub fn children(&self, node: usize) -> NodeLinks<'_> {
        NodeLinks {
            nodes: &self.nodes,
            next: self.nodes[node].children,
            link: |n| n.siblings,
        }
    }

    fn shared_chain(&self, head: usize) -> NodeLinks<'_> {
        NodeLinks {
            nodes: &self.nodes,
            next: Some(head),
            link: |n| n.shared,
        }
    }

    /// Walk the whole node graph and check it is consistent: links in range,
    /// children agree with their parent, every node is reachable exactly once
    /// through the polygon search tree and the tree is ordered.
    pub fn validate(&self) -> Result<(), VisError> {
        let count = self.nodes.len();
        if count == 0 {
            return Ok(());
        }
        let in_range = |link: Option<usize>| link.is_none_or(|l| l < count);

        for (i, node) in self.nodes.iter().enumerate() {
            if ![
                node.parent,
                node.siblings,
                node.children,
                node.last_child,
                node.less,
                node.greater,
                node.shared,
            ]
            .into_iter()
            .all(in_range)
            {
                return Err(VisError::DanglingLink { node: i });
            }
            if node.clipping_lines().iter().any(|&l| l >= self.line_clips.len())
                || node
                    .clipping_endpoints()
                    .iter()
                    .any(|&e| e >= self.endpoint_clips.len())
            {
                return Err(VisError::DanglingLink { node: i });
            }
            // Parents always precede their children in the arena
            match node.parent {
                Some(p) if p >= i => return Err(VisError::ParentMismatch { node: p }),
                None if i != 0 => return Err(VisError::ParentMismatch { node: i }),
                _ => {}
            }
        }

        let mut child_total = 0;
        for i in 0..count {
            let mut last = None;
            let mut child = self.nodes[i].children;
            while let Some(c) = child {
                child_total += 1;
                if self.nodes[c].parent != Some(i) || child_total >= count {
                    return Err(VisError::ParentMismatch { node: i });
                }
                last = Some(c);
                child = self.nodes[c].siblings;
            }
            if last != self.nodes[i].last_child {
                return Err(VisError::ParentMismatch { node: i });
            }
        }
        if child_total != count - 1 {
            return Err(VisError::ParentMismatch { node: 0 });
        }

        let mut seen = vec![false; count];
        let mut seen_count = 0;
        // (node, exclusive lower bound, exclusive upper bound)
        let mut stack = vec![(0, None, None)];
        while let Some((i, low, high)) = stack.pop() {
            let node = &self.nodes[i];
            let polygon = node.polygon_index;
            if low.is_some_and(|l| polygon <= l) || high.is_some_and(|h| polygon >= h) {
                return Err(VisError::TreeOrder { node: i });
            }
            let mut shared = Some(i);
            while let Some(s) = shared {
                let alias = &self.nodes[s];
                if seen[s] || alias.polygon_index != polygon {
                    return Err(VisError::TreeOrder { node: s });
                }
                if s != i && (alias.less.is_some() || alias.greater.is_some()) {
                    return Err(VisError::TreeOrder { node: s });
                }
                seen[s] = true;
                seen_count += 1;
                shared = alias.shared;
            }
            if let Some(less) = node.less {
                stack.push((less, low, Some(polygon)));
            }
            if let Some(greater) = node.greater {
                stack.push((greater, Some(polygon), high));
            }
        }
        if seen_count != count {
            let missing = seen.iter().position(|s| !s).unwrap_or(0);
            return Err(VisError::TreeOrder { node: missing });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::VisTree;
    use crate::defs::VisError;
    use crate::nodes::VisNode;

    fn tree_with_root(polygon: usize) -> VisTree {
        let mut tree = VisTree::new();
        tree.nodes.push(VisNode::new(polygon, None));
        tree
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = tree_with_root(4);
        let a = tree.add_node(9, 0);
        let b = tree.add_node(2, 0);
        let c = tree.add_node(6, 0);
        assert_eq!(tree.children(0).collect::<Vec<_>>(), vec![a, b, c]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn find_child_checks_parent() {
        let mut tree = tree_with_root(0);
        let a = tree.add_node(1, 0);
        let b = tree.add_node(2, a);
        let c = tree.add_node(2, 0);
        assert_eq!(tree.find_child(a, 2), Some(b));
        assert_eq!(tree.find_child(0, 2), Some(c));
        assert_eq!(tree.find_child(b, 2), None);
        assert_eq!(tree.find_child(0, 7), None);
    }

    #[test]
    fn aliases_share_polygon() {
        let mut tree = tree_with_root(3);
        let a = tree.add_node(5, 0);
        let b = tree.add_node(1, a);
        let c = tree.add_node(5, b);
        let d = tree.add_node(5, 0);
        let mut aliases: Vec<_> = tree.aliases(c).collect();
        aliases.sort_unstable();
        assert_eq!(aliases, vec![a, c, d]);
        assert_eq!(tree.aliases(b).collect::<Vec<_>>(), vec![b]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn root_aliases() {
        let mut tree = tree_with_root(0);
        let a = tree.add_node(0, 0);
        assert_eq!(tree.aliases(0).collect::<Vec<_>>(), vec![0, a]);
    }

    #[test]
    fn clip_lists_dedup_and_fill() {
        let mut node = VisNode::new(0, None);
        assert!(node.add_clipping_line(3));
        assert!(node.add_clipping_line(3));
        assert_eq!(node.clipping_lines(), &[3]);
        for i in 10..15 {
            assert!(node.add_clipping_line(i));
        }
        assert!(!node.add_clipping_line(99));
        assert!(node.add_clipping_line(3));

        for i in 0..4 {
            assert!(node.add_clipping_endpoint(i));
        }
        assert!(!node.add_clipping_endpoint(4));
        assert_eq!(node.clipping_endpoints(), &[0, 1, 2, 3]);
    }

    #[test]
    fn validate_catches_bad_links() {
        let mut tree = tree_with_root(0);
        let a = tree.add_node(1, 0);
        tree.nodes[a].siblings = Some(40);
        assert_eq!(tree.validate(), Err(VisError::DanglingLink { node: a }));

        let mut tree = tree_with_root(0);
        let a = tree.add_node(1, 0);
        let b = tree.add_node(2, a);
        tree.nodes[b].parent = Some(0);
        assert!(matches!(
            tree.validate(),
            Err(VisError::ParentMismatch { .. })
        ));

        let mut tree = tree_with_root(5);
        let a = tree.add_node(7, 0);
        tree.nodes[a].polygon_index = 2;
        assert_eq!(tree.validate(), Err(VisError::TreeOrder { node: a }));
    }
}

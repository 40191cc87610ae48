use crate::VisTree;
use crate::defs::{
    ClipFlag, ClippingWindow, EndpointClip, LEFT_SIDE_OF_SCREEN, RIGHT_SIDE_OF_SCREEN,
    TOP_AND_BOTTOM_OF_SCREEN,
};

/// Scratch lists reused between calls to `build_clipping_windows`
#[derive(Debug, Default)]
pub(crate) struct ClipAccumulator {
    endpoints: Vec<usize>,
    lines: Vec<usize>,
}

impl ClipAccumulator {
    fn gather(&mut self, tree: &VisTree, node: usize) {
        self.endpoints.clear();
        self.lines.clear();
        self.endpoints.push(LEFT_SIDE_OF_SCREEN);
        self.endpoints.push(RIGHT_SIDE_OF_SCREEN);

        let mut current = Some(node);
        while let Some(n) = current {
            let node = tree.node(n);
            for &e in node.clipping_endpoints() {
                if !self.endpoints.contains(&e) {
                    self.endpoints.push(e);
                }
            }
            for &l in node.clipping_lines() {
                if !self.lines.contains(&l) {
                    self.lines.push(l);
                }
            }
            current = node.parent;
        }
    }
}

/// Turn the clips on `node` and all of its ancestors in to screen windows
/// and append them to `windows`.
///
/// Endpoint clips are swept left to right. A window opens at the last left
/// clip seen and closes at the next right clip. Each window then takes the
/// tightest top and bottom of the line clips overlapping it.
pub(crate) fn build_clipping_windows(
    tree: &VisTree,
    node: usize,
    scratch: &mut ClipAccumulator,
    windows: &mut Vec<ClippingWindow>,
) {
    scratch.gather(tree, node);
    // Right before left where they meet, so touching clips close a window
    // before opening the next
    scratch.endpoints.sort_by_key(|&e| {
        let clip = tree.endpoint_clip(e);
        (clip.x, clip.is_left())
    });

    let screen = tree.line_clip(TOP_AND_BOTTOM_OF_SCREEN);
    let mut left: Option<&EndpointClip> = None;
    for &e in &scratch.endpoints {
        let clip = tree.endpoint_clip(e);
        if clip.is_left() {
            left = Some(clip);
            continue;
        }
        let Some(open) = left.take() else {
            continue;
        };
        if open.x >= clip.x {
            continue;
        }

        let mut window = ClippingWindow {
            x0: open.x,
            x1: clip.x,
            left: open.vector,
            right: clip.vector,
            y0: screen.top_y,
            y1: screen.bottom_y,
            top: screen.top_vector,
            bottom: screen.bottom_vector,
        };
        for &l in &scratch.lines {
            let line = tree.line_clip(l);
            if line.x0 >= window.x1 || line.x1 <= window.x0 {
                continue;
            }
            if line.flags & ClipFlag::Down as u16 != 0 && line.top_y > window.y0 {
                window.y0 = line.top_y;
                window.top = line.top_vector;
            }
            if line.flags & ClipFlag::Up as u16 != 0 && line.bottom_y < window.y1 {
                window.y1 = line.bottom_y;
                window.bottom = line.bottom_vector;
            }
        }
        windows.push(window);
    }
}

/// Sort the windows from `start` on by screen x and fold together any that
/// overlap, so a polygon reached through several nodes is drawn once per
/// column. A merged window takes the outermost edge on every side.
pub(crate) fn merge_clipping_windows(windows: &mut Vec<ClippingWindow>, start: usize) {
    if windows.len() <= start + 1 {
        return;
    }
    windows[start..].sort_unstable_by_key(|w| (w.x0, w.x1));

    let mut last = start;
    for i in start + 1..windows.len() {
        let next = windows[i];
        let current = &mut windows[last];
        if next.x0 >= current.x1 {
            last += 1;
            windows[last] = next;
            continue;
        }
        if next.x1 > current.x1 {
            current.x1 = next.x1;
            current.right = next.right;
        }
        if next.y0 < current.y0 {
            current.y0 = next.y0;
            current.top = next.top;
        }
        if next.y1 > current.y1 {
            current.y1 = next.y1;
            current.bottom = next.bottom;
        }
    }
    windows.truncate(last + 1);
}

#[cfg(test)]
mod tests {
    use glam::I64Vec2;

    use super::{ClipAccumulator, build_clipping_windows, merge_clipping_windows};
    use crate::VisTree;
    use crate::defs::{ClipFlag, EndpointClip, LineClip};
    use crate::nodes::VisNode;

    fn tree() -> VisTree {
        let mut tree = VisTree::new();
        tree.endpoint_clips = vec![
            EndpointClip {
                flags: ClipFlag::Left as u16,
                vector: I64Vec2::new(320, -320),
                x: 0,
            },
            EndpointClip {
                flags: ClipFlag::Right as u16,
                vector: I64Vec2::new(320, 320),
                x: 640,
            },
        ];
        tree.line_clips = vec![LineClip {
            flags: ClipFlag::Up as u16 | ClipFlag::Down as u16,
            x0: 0,
            x1: 640,
            top_vector: I64Vec2::new(-320, -240),
            top_y: 0,
            bottom_vector: I64Vec2::new(320, -240),
            bottom_y: 480,
        }];
        tree.nodes.push(VisNode::new(0, None));
        tree
    }

    fn windows(tree: &VisTree, node: usize) -> Vec<crate::ClippingWindow> {
        let mut out = Vec::new();
        build_clipping_windows(tree, node, &mut ClipAccumulator::default(), &mut out);
        out
    }

    #[test]
    fn whole_screen() {
        let tree = tree();
        let w = windows(&tree, 0);
        assert_eq!(w.len(), 1);
        assert_eq!((w[0].x0, w[0].x1, w[0].y0, w[0].y1), (0, 640, 0, 480));
    }

    #[test]
    fn inherited_clips_narrow_window() {
        let mut tree = tree();
        tree.endpoint_clips.push(EndpointClip {
            flags: ClipFlag::Left as u16,
            vector: I64Vec2::new(100, -10),
            x: 200,
        });
        tree.endpoint_clips.push(EndpointClip {
            flags: ClipFlag::Right as u16,
            vector: I64Vec2::new(-100, -5),
            x: 500,
        });
        tree.line_clips.push(LineClip {
            flags: ClipFlag::Up as u16,
            x0: 100,
            x1: 300,
            bottom_vector: I64Vec2::new(50, 8),
            bottom_y: 400,
            ..LineClip::default()
        });
        // Out of the window's span
        tree.line_clips.push(LineClip {
            flags: ClipFlag::Down as u16,
            x0: 500,
            x1: 640,
            top_y: 100,
            ..LineClip::default()
        });

        tree.nodes[0].add_clipping_endpoint(2);
        let child = tree.add_node(1, 0);
        tree.nodes[child].add_clipping_endpoint(3);
        tree.nodes[child].add_clipping_line(1);
        tree.nodes[child].add_clipping_line(2);

        let w = windows(&tree, child);
        assert_eq!(w.len(), 1);
        assert_eq!((w[0].x0, w[0].x1), (200, 500));
        assert_eq!((w[0].y0, w[0].y1), (0, 400));
        assert_eq!(w[0].bottom, I64Vec2::new(50, 8));
        assert_eq!(w[0].left, I64Vec2::new(100, -10));

        // The root only has its own left clip
        let w = windows(&tree, 0);
        assert_eq!((w[0].x0, w[0].x1), (200, 640));
    }

    #[test]
    fn right_then_left_makes_two_windows() {
        let mut tree = tree();
        tree.endpoint_clips.push(EndpointClip {
            flags: ClipFlag::Right as u16,
            vector: I64Vec2::new(-1, 0),
            x: 300,
        });
        tree.endpoint_clips.push(EndpointClip {
            flags: ClipFlag::Left as u16,
            vector: I64Vec2::new(1, 0),
            x: 300,
        });
        tree.nodes[0].add_clipping_endpoint(2);
        tree.nodes[0].add_clipping_endpoint(3);

        let w = windows(&tree, 0);
        assert_eq!(w.len(), 2);
        assert_eq!((w[0].x0, w[0].x1), (0, 300));
        assert_eq!((w[1].x0, w[1].x1), (300, 640));
    }

    fn span(x0: i32, x1: i32, y0: i32, y1: i32) -> crate::ClippingWindow {
        crate::ClippingWindow {
            x0,
            x1,
            y0,
            y1,
            left: I64Vec2::new(x0 as i64, -1),
            right: I64Vec2::new(x1 as i64, 1),
            ..Default::default()
        }
    }

    #[test]
    fn overlapping_windows_merge() {
        let mut w = vec![span(0, 640, 0, 480), span(400, 600, 10, 300), span(100, 200, 50, 300)];
        merge_clipping_windows(&mut w, 1);
        // Nothing before `start` takes part, the rest is sorted
        assert_eq!(w.len(), 3);
        assert_eq!((w[0].x0, w[0].x1), (0, 640));
        assert_eq!((w[1].x0, w[1].x1), (100, 200));
        assert_eq!((w[2].x0, w[2].x1), (400, 600));

        let mut w = vec![span(300, 500, 50, 300), span(0, 400, 20, 200), span(500, 640, 0, 480)];
        merge_clipping_windows(&mut w, 0);
        assert_eq!(w.len(), 2);
        assert_eq!((w[0].x0, w[0].x1, w[0].y0, w[0].y1), (0, 500, 20, 300));
        assert_eq!(w[0].left, I64Vec2::new(0, -1));
        assert_eq!(w[0].right, I64Vec2::new(500, 1));
        // Touching is not overlapping
        assert_eq!((w[1].x0, w[1].x1), (500, 640));
    }

    #[test]
    fn identical_windows_collapse() {
        let mut w = vec![span(0, 640, 0, 480), span(0, 640, 0, 480)];
        merge_clipping_windows(&mut w, 0);
        assert_eq!(w, vec![span(0, 640, 0, 480)]);
    }
}

use glam::I64Vec2;
use level::{RenderFlag, fixtures};

use super::{Frame, SCREEN, view_from};
use crate::ClipFlag;

#[test]
fn siblings_in_polygon_order() {
    for (upper, lower) in [(5, 12), (12, 5)] {
        let map = fixtures::two_portals(upper, lower).unwrap();
        let mut frame = Frame::new(&map, 16);
        frame.render(&map, view_from(512, 512, 0));

        let mut children = frame.child_polygons(0);
        children.sort_unstable();
        assert_eq!(children, vec![5, 12]);
        // Same answer however many times it is asked
        for _ in 0..3 {
            frame.render(&map, view_from(512, 512, 0));
            assert_eq!(frame.sorted_polygons(), vec![5, 12, 0]);
        }
    }
}

#[test]
fn viewer_polygon_drawn_last() {
    let map = fixtures::corridor(6).unwrap();
    let mut frame = Frame::new(&map, 16);
    frame.render(&map, view_from(128, 256, 0));

    let sorted = frame.sorted_polygons();
    assert_eq!(sorted.last(), Some(&0));
    assert_eq!(frame.sorter.front_to_back().next().map(|n| n.polygon_index), Some(0));
    // Straight corridor, so strictly far to near
    assert_eq!(sorted, vec![5, 4, 3, 2, 1, 0]);
}

#[test]
fn every_node_drawn_before_its_parent() {
    let map = fixtures::junction().unwrap();
    let mut frame = Frame::new(&map, 16);
    frame.render(&map, view_from(768, 256, 0));
    let tree = &frame.tree;

    let position = |polygon| {
        frame
            .sorter
            .polygon_index_to_sorted_node(polygon)
            .unwrap()
    };
    for node in tree.nodes().iter().skip(1) {
        let parent = tree.node(node.parent.unwrap());
        if parent.polygon_index != node.polygon_index {
            assert!(position(node.polygon_index) < position(parent.polygon_index));
        }
    }
}

#[test]
fn raised_floor_window() {
    let map = fixtures::two_rooms().unwrap();
    let mut frame = Frame::new(&map, 16);
    frame.render(&map, view_from(256, 512, 0));
    let sorter = &frame.sorter;

    assert_eq!(frame.sorted_polygons(), vec![1, 0]);

    let far = sorter.sorted_node_for_polygon(1, &frame.flags).unwrap();
    let windows = sorter.clipping_windows(far);
    assert_eq!(windows.len(), 1);
    assert_eq!((windows[0].x0, windows[0].x1), (0, SCREEN.width()));
    assert_eq!((windows[0].y0, windows[0].y1), (0, 227));

    let near = sorter.sorted_node_for_polygon(0, &frame.flags).unwrap();
    let windows = sorter.clipping_windows(near);
    assert_eq!(windows.len(), 1);
    assert_eq!(
        (windows[0].y0, windows[0].y1),
        (0, SCREEN.height())
    );
}

#[test]
fn lookup_guarded_by_visibility() {
    let map = fixtures::two_portals(5, 12).unwrap();
    let mut frame = Frame::new(&map, 16);
    frame.render(&map, view_from(512, 512, 0));

    assert!(frame.flags.polygon(5, RenderFlag::PolygonIsVisible));
    assert!(frame.sorter.sorted_node_for_polygon(5, &frame.flags).is_some());
    // A padding room nobody can see
    assert!(!frame.flags.polygon(3, RenderFlag::PolygonIsVisible));
    assert!(frame.sorter.sorted_node_for_polygon(3, &frame.flags).is_none());
}

#[test]
fn object_handles_stick() {
    let map = fixtures::two_rooms().unwrap();
    let mut frame = Frame::new(&map, 16);
    frame.render(&map, view_from(256, 512, 0));

    for (i, node) in frame.sorter.sorted_nodes_mut().iter_mut().enumerate() {
        node.interior_objects = Some(i);
    }
    let near = frame.sorter.sorted_node_for_polygon(0, &frame.flags).unwrap();
    assert_eq!(near.interior_objects, Some(1));
    assert_eq!(near.exterior_objects, None);
}

#[test]
fn polygon_seen_twice_has_no_overlapping_windows() {
    let map = fixtures::junction().unwrap();
    let mut frame = Frame::new(&map, 16);
    frame.render(&map, view_from(768, 256, 0));

    // Polygon 2 is reached both from the root and through polygon 1
    let head = frame
        .tree
        .nodes()
        .iter()
        .position(|n| n.polygon_index == 2)
        .unwrap();
    assert!(frame.tree.aliases(head).count() > 1);

    for node in frame.sorter.sorted_nodes() {
        let windows = frame.sorter.clipping_windows(node);
        for pair in windows.windows(2) {
            assert!(
                pair[0].x1 <= pair[1].x0,
                "polygon {} windows {:?} overlap",
                node.polygon_index,
                windows.iter().map(|w| (w.x0, w.x1)).collect::<Vec<_>>()
            );
        }
    }
    let far = frame.sorter.sorted_node_for_polygon(2, &frame.flags).unwrap();
    let windows = frame.sorter.clipping_windows(far);
    assert_eq!(windows.len(), 1);
    assert_eq!((windows[0].x0, windows[0].x1), (0, SCREEN.width()));
}

#[test]
fn solid_jambs_narrow_doorway_windows() {
    let map = fixtures::two_portals(5, 12).unwrap();
    let mut frame = Frame::new(&map, 16);
    frame.render(&map, view_from(512, 512, 0));
    let tree = &frame.tree;

    // Looking along +x the upper doorway is on the left of the screen, so
    // its lower jamb at (1024, 384) bounds it on the right
    let upper = tree.find_child(0, 5).unwrap();
    let clips = tree.node(upper).clipping_endpoints();
    assert_eq!(clips.len(), 1);
    let jamb = tree.endpoint_clip(clips[0]);
    assert_eq!(jamb.flags, ClipFlag::Right as u16);
    assert_eq!(jamb.x, 240);
    assert_eq!(jamb.vector, I64Vec2::new(-512, 128));

    let lower = tree.find_child(0, 12).unwrap();
    let clips = tree.node(lower).clipping_endpoints();
    assert_eq!(clips.len(), 1);
    let jamb = tree.endpoint_clip(clips[0]);
    assert_eq!(jamb.flags, ClipFlag::Left as u16);
    assert_eq!(jamb.x, 400);
    assert_eq!(jamb.vector, I64Vec2::new(512, 128));

    let window = |polygon| {
        let node = frame.sorter.sorted_node_for_polygon(polygon, &frame.flags).unwrap();
        let windows = frame.sorter.clipping_windows(node);
        assert_eq!(windows.len(), 1, "polygon {polygon}");
        let w = windows[0];
        (w.x0, w.x1, w.y0, w.y1)
    };
    assert_eq!(window(5), (0, 240, 0, SCREEN.height()));
    assert_eq!(window(12), (400, SCREEN.width(), 0, SCREEN.height()));
}

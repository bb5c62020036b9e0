use super::*;
use serde_json::json;

fn doc(layers: serde_json::Value) -> DocumentDef {
    serde_json::from_value(json!({
        "file": "Screen.psd",
        "bounds": {"left": 0.0, "top": 0.0, "right": 200.0, "bottom": 100.0},
        "layers": layers
    }))
    .unwrap()
}

fn bounds(left: f64, top: f64, right: f64, bottom: f64) -> serde_json::Value {
    json!({"left": left, "top": top, "right": right, "bottom": bottom})
}

#[test]
fn guide_layers_emit_nothing() {
    let doc = doc(json!([
        {"name": "guide margins", "id": 1, "bounds": bounds(0.0, 0.0, 10.0, 10.0), "layers": [
            {"name": "inner", "id": 2, "bounds": bounds(0.0, 0.0, 10.0, 10.0)}
        ]},
        {"name": "guide_center", "id": 3, "bounds": bounds(0.0, 0.0, 10.0, 10.0)}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();
    assert!(description.children.is_empty());
    assert!(queue.is_empty());
}

#[test]
fn options_layer_emits_nothing() {
    let doc = doc(json!([
        {"name": "options", "id": 1, "bounds": bounds(0.0, 0.0, 10.0, 10.0)}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();
    assert!(description.children.is_empty());
    assert!(queue.is_empty());
}

#[test]
fn children_are_emitted_back_to_front() {
    let doc = doc(json!([
        {"name": "top", "id": 1, "bounds": bounds(0.0, 0.0, 10.0, 10.0)},
        {"name": "bottom", "id": 2, "bounds": bounds(0.0, 0.0, 10.0, 10.0)}
    ]));
    let (description, _) = build_scene(&doc, CoordMode::Centered).unwrap();
    let names: Vec<_> = description.children.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["bottom", "top"]);
}

#[test]
fn root_positions_equal_absolute_positions() {
    let doc = doc(json!([
        {"name": "sprite", "id": 1, "bounds": bounds(120.0, 20.0, 160.0, 40.0)}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();
    let SceneNode::Image { position, size, .. } = &description.children[0] else {
        panic!("expected image");
    };
    assert_eq!(*position, [40.0, 20.0]);
    assert_eq!(*size, Some([40.0, 20.0]));
    assert_eq!(queue, vec![RenderRequest { name: "sprite".into(), layer_id: crate::document::model::LayerId(1) }]);
}

#[test]
fn container_consumes_its_pivot_child() {
    let doc = doc(json!([
        {"name": "container_panel", "id": 1, "bounds": bounds(0.0, 0.0, 1.0, 1.0), "layers": [
            {"name": "pivot_anchor", "id": 2, "bounds": bounds(90.0, 40.0, 110.0, 60.0)},
            {"name": "image_icon", "id": 3, "bounds": bounds(120.0, 20.0, 160.0, 40.0)}
        ]}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();

    assert_eq!(description.children.len(), 1);
    let SceneNode::Container {
        name,
        position,
        size,
        pivot,
        children,
    } = &description.children[0]
    else {
        panic!("expected container");
    };

    assert_eq!(name, "container_panel");
    // Deep bounds = union of both leaves, so the center sits at [25, 10].
    assert_eq!(*size, [70.0, 40.0]);
    // The pivot's absolute position becomes the container's position...
    assert_eq!(*position, [0.0, 0.0]);
    // ...and the recorded pivot is the negative of the pivot's offset from
    // the container's geometric center.
    assert_eq!(*pivot, Some([25.0, 10.0]));

    // The pivot child is gone; only the image remains, relative to the
    // container center.
    assert_eq!(children.len(), 1);
    let SceneNode::Image { name, position, .. } = &children[0] else {
        panic!("expected image child");
    };
    assert_eq!(name, "image_icon");
    assert_eq!(*position, [15.0, 10.0]);

    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].name, "image_icon");
}

#[test]
fn flatten_group_splices_children_into_parent() {
    let doc = doc(json!([
        {"name": "backdrop", "id": 1, "bounds": bounds(0.0, 0.0, 200.0, 100.0)},
        {"name": "group1", "id": 2, "bounds": bounds(0.0, 0.0, 1.0, 1.0), "layers": [
            {"name": "a", "id": 3, "bounds": bounds(90.0, 40.0, 110.0, 60.0)},
            {"name": "b", "id": 4, "bounds": bounds(0.0, 0.0, 20.0, 20.0)}
        ]}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();

    let names: Vec<_> = description.children.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["b", "a", "backdrop"]);
    assert_eq!(queue.len(), 3);

    // Spliced children are positioned against the actual parent (the root
    // here), not the dissolved group.
    let SceneNode::Image { position, .. } = &description.children[1] else {
        panic!("expected image");
    };
    assert_eq!(*position, [0.0, 0.0]);
}

#[test]
fn flatten_inside_container_uses_container_context() {
    let doc = doc(json!([
        {"name": "container_hud", "id": 1, "bounds": bounds(0.0, 0.0, 1.0, 1.0), "layers": [
            {"name": "stuff", "id": 2, "bounds": bounds(0.0, 0.0, 1.0, 1.0), "layers": [
                {"name": "gem", "id": 3, "bounds": bounds(90.0, 40.0, 110.0, 60.0)}
            ]}
        ]}
    ]));
    let (description, _) = build_scene(&doc, CoordMode::Centered).unwrap();

    let SceneNode::Container { children, .. } = &description.children[0] else {
        panic!("expected container");
    };
    // The container's deep bounds equal the gem's bounds, so the spliced gem
    // sits at the container's own center.
    assert_eq!(children.len(), 1);
    let SceneNode::Image { name, position, .. } = &children[0] else {
        panic!("expected image");
    };
    assert_eq!(name, "gem");
    assert_eq!(*position, [0.0, 0.0]);
}

#[test]
fn text_alignment_shifts_x_per_mode() {
    let layers = json!([
        {"name": "text title", "id": 1, "bounds": bounds(10.0, 10.0, 50.0, 30.0),
         "text": {
            "textKey": "hi",
            "textStyleRange": [{"textStyle": {"size": 18.0}}],
            "paragraphStyleRange": [{"paragraphStyle": {"align": "right"}}]
         }}
    ]);
    let doc100 = |layers: &serde_json::Value| -> DocumentDef {
        serde_json::from_value(json!({
            "file": "T.psd",
            "bounds": {"left": 0.0, "top": 0.0, "right": 100.0, "bottom": 60.0},
            "layers": layers
        }))
        .unwrap()
    };

    let (description, _) = build_scene(&doc100(&layers), CoordMode::Centered).unwrap();
    let SceneNode::Text { position, .. } = &description.children[0] else {
        panic!("expected text");
    };
    // centerX would be -20; right alignment adds width/2.
    assert_eq!(position[0], 0.0);

    let (description, _) = build_scene(&doc100(&layers), CoordMode::TopLeft).unwrap();
    let SceneNode::Text { position, name, .. } = &description.children[0] else {
        panic!("expected text");
    };
    assert_eq!(name, "title");
    // left + width.
    assert_eq!(position[0], 50.0);
}

#[test]
fn alias_emits_node_but_no_render_request() {
    let doc = doc(json!([
        {"name": "alias_hero", "id": 1, "bounds": bounds(0.0, 0.0, 20.0, 20.0)}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();

    let SceneNode::Image { name, size, .. } = &description.children[0] else {
        panic!("expected image");
    };
    assert_eq!(name, "hero");
    assert_eq!(*size, None);
    assert!(queue.is_empty());
}

#[test]
fn tile_becomes_placeholder_with_full_name() {
    let doc = doc(json!([
        {"name": "tile grass", "id": 1, "bounds": bounds(0.0, 0.0, 20.0, 20.0)}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();

    let SceneNode::Placeholder { name, .. } = &description.children[0] else {
        panic!("expected placeholder");
    };
    assert_eq!(name, "tile_grass");
    assert!(queue.is_empty());
}

#[test]
fn empty_container_still_emits_a_node() {
    let doc = doc(json!([
        {"name": "container_empty", "id": 1, "bounds": bounds(80.0, 30.0, 120.0, 70.0), "layers": []}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();

    let SceneNode::Container { children, size, .. } = &description.children[0] else {
        panic!("expected container");
    };
    assert!(children.is_empty());
    assert_eq!(*size, [40.0, 40.0]);
    assert!(queue.is_empty());
}

#[test]
fn effects_bounds_are_preferred_for_leaves() {
    let doc = doc(json!([
        {"name": "glowy", "id": 1,
         "bounds": bounds(95.0, 45.0, 105.0, 55.0),
         "boundsWithFX": bounds(90.0, 40.0, 110.0, 60.0)}
    ]));
    let (description, _) = build_scene(&doc, CoordMode::TopLeft).unwrap();
    let SceneNode::Image { position, size, .. } = &description.children[0] else {
        panic!("expected image");
    };
    assert_eq!(*position, [90.0, 40.0]);
    assert_eq!(*size, Some([20.0, 20.0]));
}

#[test]
fn text_without_rich_text_renders_as_image() {
    let doc = doc(json!([
        {"name": "texture", "id": 1, "bounds": bounds(0.0, 0.0, 20.0, 20.0)}
    ]));
    let (description, queue) = build_scene(&doc, CoordMode::Centered).unwrap();
    assert!(matches!(description.children[0], SceneNode::Image { .. }));
    assert_eq!(queue.len(), 1);
}

#[test]
fn same_input_builds_identical_json() {
    let layers = json!([
        {"name": "btn_go", "id": 1, "bounds": bounds(0.0, 0.0, 1.0, 1.0), "layers": [
            {"name": "pivot_p", "id": 2, "bounds": bounds(90.0, 40.0, 110.0, 60.0)},
            {"name": "face", "id": 3, "bounds": bounds(80.0, 30.0, 120.0, 70.0)}
        ]},
        {"name": "bg", "id": 4, "bounds": bounds(0.0, 0.0, 200.0, 100.0)}
    ]);
    let build = || {
        let (description, _) = build_scene(&doc(layers.clone()), CoordMode::Centered).unwrap();
        serde_json::to_string(&description).unwrap()
    };
    assert_eq!(build(), build());
}

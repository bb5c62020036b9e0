use crate::document::model::{DocumentDef, LayerDef};
use crate::foundation::error::LayercastResult;
use crate::foundation::geom::RootSize;
use crate::scene::coords::{self, CoordMode};
use crate::scene::model::{RenderRequest, SceneDescription, SceneNode, Vec2a};
use crate::scene::name::{self, GroupRole, LayerRole};
use crate::scene::text;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Build the scene description and render queue for one export.
///
/// The walk is pure and deterministic: the same document and mode always
/// produce byte-identical serialized output. Root dimensions are computed
/// once here and fixed for the whole traversal.
#[tracing::instrument(skip(doc))]
pub fn build_scene(
    doc: &DocumentDef,
    mode: CoordMode,
) -> LayercastResult<(SceneDescription, Vec<RenderRequest>)> {
    let root = RootSize::from_bounds(doc.bounds)?;

    let (children, requests) = build_children(&doc.layers, [0.0, 0.0], root, mode);
    let children = children
        .into_iter()
        .filter_map(|child| match child {
            ChildOut::Node(node) => Some(node),
            ChildOut::Pivot { .. } => {
                warn!("pivot layer outside a container group, dropping");
                None
            }
        })
        .collect();

    let description = SceneDescription {
        root_width: root.width,
        root_height: root.height,
        coordinate_system: mode,
        children,
    };
    debug!(queue = requests.len(), "scene graph built");
    Ok((description, requests))
}

/// A child produced by the recursion: either a finished scene node, or a
/// pivot marker waiting to be consumed by the calling container.
enum ChildOut {
    Node(SceneNode),
    Pivot { abs: Vec2a },
}

/// Convert a sibling list into scene children, positioned relative to
/// `parent_abs` (the parent container's absolute position; the zero origin at
/// root, so root-level relative positions equal absolute ones).
///
/// Children are traversed back-to-front (reverse raw order) so a runtime can
/// attach them in sequence; this ordering is part of the output contract.
fn build_children(
    layers: &[LayerDef],
    parent_abs: Vec2a,
    root: RootSize,
    mode: CoordMode,
) -> (Vec<ChildOut>, Vec<RenderRequest>) {
    let mut children = Vec::new();
    let mut requests = Vec::new();

    for layer in layers.iter().rev() {
        match &layer.layers {
            Some(sub_layers) => match name::classify_group(&layer.name) {
                GroupRole::Ignored => {}
                GroupRole::Flatten => {
                    // The group contributes no node: its children are built
                    // against the caller's parent context and spliced in
                    // place. A pivot marker inside a flatten group has no
                    // container to anchor and is discarded.
                    let (spliced, reqs) = build_children(sub_layers, parent_abs, root, mode);
                    for child in spliced {
                        match child {
                            ChildOut::Node(node) => children.push(ChildOut::Node(node)),
                            ChildOut::Pivot { .. } => {
                                warn!(group = %layer.name, "pivot inside flatten group, dropping");
                            }
                        }
                    }
                    requests.extend(reqs);
                }
                GroupRole::Container => {
                    let (node, reqs) = build_container(layer, sub_layers, parent_abs, root, mode);
                    children.push(ChildOut::Node(node));
                    requests.extend(reqs);
                }
            },
            None => {
                if let Some((child, request)) = build_leaf(layer, parent_abs, root, mode) {
                    children.push(child);
                    requests.extend(request);
                }
            }
        }
    }

    warn_on_name_collisions(&children);

    (children, requests)
}

fn build_container(
    layer: &LayerDef,
    sub_layers: &[LayerDef],
    parent_abs: Vec2a,
    root: RootSize,
    mode: CoordMode,
) -> (SceneNode, Vec<RenderRequest>) {
    // Containers take deep bounds (union of descendant leaves) so that layer
    // visibility toggles cannot change the exported metadata.
    let rect = coords::placed_rect(layer.deep_bounds(), root, mode);
    let own_abs = rect.position;

    let (raw_children, requests) = build_children(sub_layers, own_abs, root, mode);

    // At most one pivot child: the first (in output order) wins, extras are
    // dropped because the output model has nowhere to put them.
    let mut pivot_abs = None;
    let mut children = Vec::with_capacity(raw_children.len());
    for child in raw_children {
        match child {
            ChildOut::Node(node) => children.push(node),
            ChildOut::Pivot { abs } => {
                if pivot_abs.is_none() {
                    pivot_abs = Some(abs);
                } else {
                    warn!(group = %layer.name, "container has more than one pivot child, dropping extra");
                }
            }
        }
    }

    let rel = sub(own_abs, parent_abs);
    let (position, pivot) = match pivot_abs {
        // The pivot's position becomes the container's anchor; the delta back
        // to the geometric center rides along so runtimes can reconstruct it.
        Some(abs) => {
            let pivot_rel = sub(abs, parent_abs);
            (pivot_rel, Some(sub(rel, pivot_rel)))
        }
        None => (rel, None),
    };

    let node = SceneNode::Container {
        name: GroupRole::Container.display_name(&layer.name),
        position,
        size: rect.size,
        pivot,
        children,
    };
    (node, requests)
}

fn build_leaf(
    layer: &LayerDef,
    parent_abs: Vec2a,
    root: RootSize,
    mode: CoordMode,
) -> Option<(ChildOut, Option<RenderRequest>)> {
    let role = name::classify_layer(&layer.name, layer.text.is_some());
    if role == LayerRole::Ignored {
        return None;
    }

    let rect = coords::placed_rect(layer.effective_bounds(), root, mode);

    let out = match role {
        LayerRole::Pivot => (ChildOut::Pivot { abs: rect.position }, None),
        LayerRole::Text => {
            let text = layer
                .text
                .as_ref()
                .expect("text role implies rich-text data");
            let style = text::extract(text, layer.blend_options.as_ref());
            let abs = coords::align_text_x(rect.position, rect.size, style.justification, mode);
            let node = SceneNode::Text {
                name: role.display_name(&layer.name),
                position: sub(abs, parent_abs),
                size: rect.size,
                color: style.color,
                font: style.font,
                justification: style.justification,
                font_size: style.font_size,
                text: style.text,
                alpha: style.alpha,
            };
            (ChildOut::Node(node), None)
        }
        LayerRole::Placeholder | LayerRole::Tile => {
            let node = SceneNode::Placeholder {
                name: role.display_name(&layer.name),
                position: sub(rect.position, parent_abs),
                size: rect.size,
            };
            (ChildOut::Node(node), None)
        }
        LayerRole::Alias => {
            let node = SceneNode::Image {
                name: role.display_name(&layer.name),
                position: sub(rect.position, parent_abs),
                size: None,
            };
            (ChildOut::Node(node), None)
        }
        LayerRole::Image => {
            let display = role.display_name(&layer.name);
            let request = RenderRequest {
                name: display.clone(),
                layer_id: layer.id,
            };
            let node = SceneNode::Image {
                name: display,
                position: sub(rect.position, parent_abs),
                size: Some(rect.size),
            };
            (ChildOut::Node(node), Some(request))
        }
        LayerRole::Ignored => unreachable!("handled above"),
    };

    Some(out)
}

/// Sibling name collisions are not deduplicated (last write wins at the
/// consumer), but they are almost always an authoring mistake worth surfacing.
fn warn_on_name_collisions(children: &[ChildOut]) {
    let mut seen = HashSet::new();
    for child in children {
        if let ChildOut::Node(node) = child
            && !seen.insert(node.name())
        {
            warn!(name = node.name(), "sibling layers share a sanitized name");
        }
    }
}

fn sub(a: Vec2a, b: Vec2a) -> Vec2a {
    [a[0] - b[0], a[1] - b[1]]
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;

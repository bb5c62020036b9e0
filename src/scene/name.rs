//! Layer/group naming-convention parser.
//!
//! Roles are assigned by literal prefix match on the authored layer name,
//! tested in a fixed priority order; the parser itself never fails, and any
//! unrecognized leaf name defaults to an image export.

/// Group-name first tokens that produce a container node. Any other group
/// name takes the legacy flatten path (children promoted to the parent).
pub const CONTAINER_ALIASES: [&str; 7] = [
    "container",
    "progress",
    "scale9",
    "btn",
    "scalebtn",
    "tab",
    "paragraph",
];

/// Role of a group (non-leaf) node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupRole {
    /// Authoring-only guide folder; emits nothing and is not recursed into.
    Ignored,
    Container,
    /// Organizational group whose children are spliced into the parent.
    Flatten,
}

/// Role of a leaf layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRole {
    /// Guide layer or the reserved `options` layer; emits nothing.
    Ignored,
    Text,
    Pivot,
    Placeholder,
    /// `tile_<image>` placeholder; keeps its full name so the runtime can
    /// resolve the referenced texture.
    Tile,
    /// Reference to an image produced elsewhere; emits a node but no render
    /// request.
    Alias,
    Image,
}

/// Replace every space with an underscore.
pub fn sanitize(name: &str) -> String {
    name.replace(' ', "_")
}

/// Classify a group by its authored name.
pub fn classify_group(name: &str) -> GroupRole {
    if name.starts_with("guide") {
        return GroupRole::Ignored;
    }
    let sanitized = sanitize(name);
    let first_token = sanitized.split('_').next().unwrap_or("");
    if CONTAINER_ALIASES.contains(&first_token) {
        GroupRole::Container
    } else {
        GroupRole::Flatten
    }
}

/// Classify a leaf by its authored name.
///
/// `has_text` reports whether the layer carries rich-text data; a `text`
/// prefix without it falls through to the image role.
pub fn classify_layer(name: &str, has_text: bool) -> LayerRole {
    if name.starts_with("guide") {
        return LayerRole::Ignored;
    }
    if name.starts_with("text") && has_text {
        return LayerRole::Text;
    }
    if name.starts_with("pivot") {
        return LayerRole::Pivot;
    }
    if name.starts_with("placeholder") {
        return LayerRole::Placeholder;
    }
    if name.starts_with("tile") {
        return LayerRole::Tile;
    }
    if name.starts_with("alias") {
        return LayerRole::Alias;
    }
    if name == "options" {
        return LayerRole::Ignored;
    }
    LayerRole::Image
}

impl LayerRole {
    /// Characters stripped from the front of the authored name before
    /// underscore substitution. Tile and image names keep the role token.
    fn strip_len(self) -> usize {
        match self {
            Self::Text => 5,
            Self::Pivot => 6,
            Self::Placeholder => 12,
            Self::Alias => 6,
            Self::Tile | Self::Image | Self::Ignored => 0,
        }
    }

    /// Sanitized display name for a leaf with this role.
    pub fn display_name(self, raw: &str) -> String {
        sanitize(raw.get(self.strip_len()..).unwrap_or(""))
    }
}

impl GroupRole {
    /// Sanitized display name for a group; group names are never stripped
    /// because the leading alias token tells the runtime which widget to
    /// build.
    pub fn display_name(self, raw: &str) -> String {
        sanitize(raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/name.rs"]
mod tests;

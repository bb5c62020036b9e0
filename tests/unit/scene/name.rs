use super::*;

#[test]
fn guide_groups_and_layers_are_ignored() {
    assert_eq!(classify_group("guide margins"), GroupRole::Ignored);
    assert_eq!(classify_group("guides"), GroupRole::Ignored);
    assert_eq!(classify_layer("guide center", false), LayerRole::Ignored);
    // Prefix match is case-sensitive.
    assert_eq!(classify_group("Guide margins"), GroupRole::Flatten);
}

#[test]
fn container_aliases_match_on_first_token() {
    for name in [
        "container_panel",
        "progress_health",
        "scale9_frame",
        "btn_play",
        "scalebtn_buy",
        "tab_settings",
        "paragraph_rules",
    ] {
        assert_eq!(classify_group(name), GroupRole::Container, "{name}");
    }
    // Spaces are normalized before the token split.
    assert_eq!(classify_group("btn play"), GroupRole::Container);
}

#[test]
fn unknown_group_names_flatten() {
    assert_eq!(classify_group("group1"), GroupRole::Flatten);
    assert_eq!(classify_group("buttons"), GroupRole::Flatten);
    // The alias must be the whole first token, not a prefix of it.
    assert_eq!(classify_group("btnx_play"), GroupRole::Flatten);
}

#[test]
fn leaf_roles_in_priority_order() {
    assert_eq!(classify_layer("text title", true), LayerRole::Text);
    assert_eq!(classify_layer("pivot_base", false), LayerRole::Pivot);
    assert_eq!(classify_layer("placeholder slot", false), LayerRole::Placeholder);
    assert_eq!(classify_layer("tile_grass", false), LayerRole::Tile);
    assert_eq!(classify_layer("alias_hero", false), LayerRole::Alias);
    assert_eq!(classify_layer("options", false), LayerRole::Ignored);
    assert_eq!(classify_layer("anything else", false), LayerRole::Image);
}

#[test]
fn text_without_rich_text_data_falls_through_to_image() {
    assert_eq!(classify_layer("text title", false), LayerRole::Image);
}

#[test]
fn options_must_match_exactly() {
    assert_eq!(classify_layer("options panel", false), LayerRole::Image);
}

#[test]
fn display_names_strip_role_prefixes() {
    assert_eq!(LayerRole::Text.display_name("text big title"), "big_title");
    assert_eq!(LayerRole::Pivot.display_name("pivot_anchor"), "anchor");
    assert_eq!(
        LayerRole::Placeholder.display_name("placeholder_avatar slot"),
        "avatar_slot"
    );
    assert_eq!(LayerRole::Alias.display_name("alias_hero"), "hero");
}

#[test]
fn tile_and_image_names_are_kept_whole() {
    assert_eq!(LayerRole::Tile.display_name("tile grass"), "tile_grass");
    assert_eq!(LayerRole::Image.display_name("hero shot"), "hero_shot");
}

#[test]
fn group_names_keep_their_alias_token() {
    assert_eq!(
        GroupRole::Container.display_name("btn play again"),
        "btn_play_again"
    );
}

#[test]
fn short_names_strip_to_empty() {
    assert_eq!(LayerRole::Placeholder.display_name("placeholder"), "");
}

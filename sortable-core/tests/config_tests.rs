use pretty_assertions::assert_eq;
use sortable_core::{FALLBACK_MIN_SORT_ORDER, PluginConfig, SortError};
use sortable_model::{Attribute, ContentTypeSchema};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults() {
    let config = PluginConfig::default();
    assert_eq!(config.sort_order_field, "sort");
    assert_eq!(
        config.sort_field_candidates,
        ["sort", "sortOrder", "order", "orderIndex"]
    );
    assert_eq!(config.min_sort_order, None);
    assert_eq!(config.entries_page_size, None);
}

#[test]
fn load_full_config() {
    let file = write_config(
        r#"
sortOrderField = "position"
sortFieldCandidates = ["position", "rank"]
minSortOrder = 0
entriesPageSize = 500
"#,
    );

    let config = PluginConfig::load_from(file.path());

    assert_eq!(config.sort_order_field, "position");
    assert_eq!(config.sort_field_candidates, ["position", "rank"]);
    assert_eq!(config.min_sort_order, Some(0));
    assert_eq!(config.entries_page_size, Some(500));
}

#[test]
fn partial_config_keeps_other_defaults() {
    let config = PluginConfig::from_toml_str("minSortOrder = 10").unwrap();
    assert_eq!(config.min_sort_order, Some(10));
    assert_eq!(config.sort_order_field, "sort");
    assert_eq!(config.sort_field_candidates.len(), 4);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = PluginConfig::load_from(&dir.path().join("sortable.toml"));
    assert_eq!(config, PluginConfig::default());
}

#[test]
fn invalid_file_falls_back_to_defaults() {
    let file = write_config("minSortOrder = \"zero\"");
    assert_eq!(PluginConfig::load_from(file.path()), PluginConfig::default());
}

#[test]
fn empty_sort_field_is_rejected() {
    let err = PluginConfig::from_toml_str("sortOrderField = \"  \"").unwrap_err();
    assert!(matches!(err, SortError::Config(_)));
}

#[test]
fn zero_page_size_is_rejected() {
    let err = PluginConfig::from_toml_str("entriesPageSize = 0").unwrap_err();
    assert!(matches!(err, SortError::Config(ref m) if m.contains("entriesPageSize")));
}

#[test]
fn minimum_resolution_order() {
    let declared = ContentTypeSchema::collection("api::a.a")
        .with_attribute("sort", Attribute::integer().with_min(-5));
    let undeclared =
        ContentTypeSchema::collection("api::a.a").with_attribute("sort", Attribute::integer());
    let configured = PluginConfig::default().with_min_sort_order(3);

    assert_eq!(configured.min_sort_order_for(Some(&declared), "sort"), -5);
    assert_eq!(configured.min_sort_order_for(Some(&undeclared), "sort"), 3);
    assert_eq!(configured.min_sort_order_for(None, "sort"), 3);
    assert_eq!(
        PluginConfig::default().min_sort_order_for(Some(&undeclared), "sort"),
        FALLBACK_MIN_SORT_ORDER
    );
}

#[test]
fn resolver_follows_configured_candidates() {
    let config = PluginConfig::from_toml_str(r#"sortFieldCandidates = ["rank"]"#).unwrap();
    let schema = ContentTypeSchema::collection("api::a.a")
        .with_attribute("rank", Attribute::integer())
        .with_attribute("sort", Attribute::integer());

    let resolver = config.sort_field_resolver();
    assert_eq!(resolver.resolve_for_schema(&schema).as_deref(), Some("rank"));
}

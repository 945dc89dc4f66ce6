//! Configuration loading tests against the bundled config files

use forage_server::config::Config;

#[test]
fn test_development_config_keeps_site_names() {
    std::env::set_var("FORAGE_ENVIRONMENT", "development");
    let config = Config::load().unwrap();

    assert_eq!(config.environment, "development");
    assert_eq!(config.session.ttl_seconds, 3600);

    let elevations = config.elevation_table();
    assert_eq!(elevations.len(), 4);
    assert_eq!(elevations.elevation_or_zero("Barcia"), 70.0);
    assert_eq!(elevations.elevation_or_zero("Xinzo"), 610.0);
    // Lookups are case-sensitive
    assert_eq!(elevations.elevation_or_zero("barcia"), 0.0);

    let schema = config.feature_schema();
    assert_eq!(schema.site_categories.encode("Barcia"), Some(0));
}

use beanpath::{Bean, Settings, TypeKind};

#[test]
fn defaults_apply_without_a_file() {
    let settings = Settings::load(None).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.max_parent_depth, 64);
    assert_eq!(settings.log_filter, "info");
    assert!(settings.use_original_names);
}

#[test]
fn missing_files_are_ignored() {
    let settings = Settings::load(Some("test_beanpath_missing.toml")).expect("settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let path = "test_beanpath_settings.toml";
    let _ = std::fs::remove_file(path);
    std::fs::write(path, "max_parent_depth = 2\nlog_filter = \"debug\"\n").expect("write config");
    let settings = Settings::load(Some(path)).expect("settings");
    let _ = std::fs::remove_file(path);

    assert_eq!(settings.max_parent_depth, 2);
    assert_eq!(settings.log_filter, "debug");
    assert!(settings.use_original_names, "unset keys keep their default");
}

#[test]
fn beans_use_the_configured_parent_depth() {
    let settings = Settings {
        max_parent_depth: 1,
        ..Settings::default()
    };
    let mut bean = Bean::with_settings(settings);
    assert_eq!(bean.types().max_parent_depth(), 1);
    bean.set_data_type("a.b.c", "int", false, None).unwrap();
    assert_eq!(bean.get_data_type("a.b"), Some(&TypeKind::Array));
    assert_eq!(bean.get_data_type("a"), None);
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! JSON round-trips through the filesystem store.

use fieldgrid_config_fs::FsConfigStore;
use fieldgrid_core::{
    ConfigError, ConfigService, ConfigStore, GridConfig, ScanConfig, Vec3, GRID_CONFIG_KEY,
};

#[test]
fn missing_key_is_not_found_and_service_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsConfigStore::with_base(dir.path().join("nested")).expect("store");
    assert!(matches!(store.load_raw("grid"), Err(ConfigError::NotFound)));

    let svc = ConfigService::new(store);
    let grid = svc.load_grid_config().expect("default grid");
    assert_eq!(grid, GridConfig::default());
    let scan = svc.load_scan_config().expect("default scan");
    assert_eq!(scan, ScanConfig::default());
}

#[test]
fn grid_config_round_trips_as_json_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = ConfigService::new(FsConfigStore::with_base(dir.path()).expect("store"));
    let origin = Vec3::new(-10.0, 0.0, 5.0);
    let cfg = GridConfig::volumetric(origin, 80.0, 40.0, 20.0, 4.0).symmetric(true);
    svc.save(GRID_CONFIG_KEY, &cfg).expect("save");

    let on_disk = std::fs::read_to_string(dir.path().join("grid.json")).expect("file");
    assert!(on_disk.contains("\"cell_size\": 4.0"));
    assert_eq!(svc.load_grid_config().expect("load"), cfg);
}

#[test]
fn invalid_file_contents_surface_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsConfigStore::with_base(dir.path()).expect("store");
    store.save_raw(GRID_CONFIG_KEY, b"{ not json").expect("write");
    let svc = ConfigService::new(store);
    assert!(matches!(svc.load_grid_config(), Err(ConfigError::Serde(_))));

    let store = svc.into_inner();
    let negative = br#"{ "cell_size": -1.0 }"#;
    store.save_raw(GRID_CONFIG_KEY, negative).expect("write");
    let svc = ConfigService::new(store);
    assert!(matches!(svc.load_grid_config(), Err(ConfigError::Invalid(_))));
}

#[test]
fn keys_cannot_escape_the_base_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsConfigStore::with_base(dir.path()).expect("store");
    for key in ["", "..", "../grid", "a/b", "a\\b"] {
        assert!(
            matches!(store.save_raw(key, b"{}"), Err(ConfigError::Other(_))),
            "key {key:?}"
        );
    }
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::path::PathBuf;
use std::time::Duration;

use holo_isis_lsdb::config::Config;
use holo_isis_lsdb::error::ConfigError;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("holo-isis-lsdb-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.max_age, 1200);
    assert_eq!(config.refresh_interval, 900);
    assert_eq!(config.init_seqno, 1);
    assert_eq!(config.tick_interval(), Duration::from_secs(1));
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_partial() {
    let path = write_config("partial", "max_age = 60\nrefresh_interval = 45\n");
    let config = Config::load(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.max_age, 60);
    assert_eq!(config.refresh_interval, 45);
    assert_eq!(config.queue_capacity, Config::DFLT_QUEUE_CAPACITY);
    assert_eq!(config.tick_interval_ms, Config::DFLT_TICK_INTERVAL_MS);
}

#[test]
fn test_load_errors() {
    let result = Config::load("/nonexistent/holo-isis-lsdb.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));

    let path = write_config("unknown", "max_lifetime = 60\n");
    let result = Config::load(path.to_str().unwrap());
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(ConfigError::Parse(_))));

    let path = write_config("invalid", "max_age = 60\n");
    let result = Config::load(path.to_str().unwrap());
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate() {
    let invalid = [
        Config {
            max_age: 0,
            ..Default::default()
        },
        Config {
            refresh_interval: 0,
            ..Default::default()
        },
        Config {
            refresh_interval: 1200,
            ..Default::default()
        },
        Config {
            queue_capacity: 0,
            ..Default::default()
        },
        Config {
            tick_interval_ms: 0,
            ..Default::default()
        },
    ];
    for config in invalid {
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

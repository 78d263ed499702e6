//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// LSDB aging engine configuration.
//
// Protocol timers are injected here rather than hardcoded so that tests can
// run against a shortened aging cycle. The defaults match ISO 10589.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    // LSP maximum age, in seconds. Also the number of aging bins.
    pub max_age: u16,
    // Seconds before MaxAge at which self-originated LSPs are refreshed.
    pub refresh_interval: u16,
    // First sequence number handed out for self-originated LSPs.
    pub init_seqno: u32,
    // Capacity of the aging and topology notification queues.
    pub queue_capacity: usize,
    // Aging tick period, in milliseconds.
    pub tick_interval_ms: u64,
}

// ===== impl Config =====

impl Config {
    pub const DFLT_MAX_AGE: u16 = 1200;
    pub const DFLT_REFRESH_INTERVAL: u16 = 900;
    pub const DFLT_INIT_SEQNO: u32 = 0x00000001;
    pub const DFLT_QUEUE_CAPACITY: usize = 1024;
    pub const DFLT_TICK_INTERVAL_MS: u64 = 1000;

    // Loads the configuration from a TOML file.
    pub fn load(path: &str) -> Result<Config, ConfigError> {
        let config_str =
            std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Config =
            toml::from_str(&config_str).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    // Checks the consistency of the configured timers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_age == 0 {
            return Err(ConfigError::Invalid("max_age must be non-zero"));
        }
        if self.refresh_interval == 0 || self.refresh_interval >= self.max_age
        {
            return Err(ConfigError::Invalid(
                "refresh_interval must be non-zero and lower than max_age",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be non-zero"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be non-zero",
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_age: Self::DFLT_MAX_AGE,
            refresh_interval: Self::DFLT_REFRESH_INTERVAL,
            init_seqno: Self::DFLT_INIT_SEQNO,
            queue_capacity: Self::DFLT_QUEUE_CAPACITY,
            tick_interval_ms: Self::DFLT_TICK_INTERVAL_MS,
        }
    }
}

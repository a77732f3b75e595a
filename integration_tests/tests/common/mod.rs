#![allow(dead_code)]

use std::sync::Once;

use blight_core::{load_engine_config_from_env, EngineConfig};

pub use integration_tests::fixture_dir;

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = fixture_dir("test_engine_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test engine config at {}",
            config_path.display()
        );

        std::env::set_var("BLIGHT_ENGINE_CONFIG_PATH", &config_path);
    });
}

pub fn test_engine_config() -> EngineConfig {
    ensure_test_config();
    load_engine_config_from_env().0
}

//! Configuration loading tests

use ntetris::core::{Game, GameConfig, SimError};

#[test]
fn test_json_round_trip() {
    let config = GameConfig {
        scene_width: 30,
        seed: 77,
        initial_divider: false,
        ..GameConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = GameConfig::from_json_str(r#"{"player_step_ms": 500}"#).unwrap();
    assert_eq!(config.player_step_ms, 500);
    assert_eq!(config.rubble_step_ms, GameConfig::default().rubble_step_ms);
}

#[test]
fn test_invalid_config_cannot_start_a_game() {
    let config = GameConfig {
        scene_height: 200,
        ..GameConfig::default()
    };
    assert!(matches!(Game::new(config), Err(SimError::Config(_))));
}

#[test]
fn test_env_overrides_fall_back_on_garbage() {
    std::env::set_var("NTETRIS_WIDTH", "30");
    std::env::set_var("NTETRIS_SEED", "not-a-number");
    std::env::set_var("NTETRIS_DIVIDER", "false");
    let config = GameConfig::from_env();
    std::env::remove_var("NTETRIS_WIDTH");
    std::env::remove_var("NTETRIS_SEED");
    std::env::remove_var("NTETRIS_DIVIDER");

    assert_eq!(config.scene_width, 30);
    assert_eq!(config.seed, GameConfig::default().seed);
    assert!(!config.initial_divider);
}

//! Textual snapshot tests

use ntetris::core::{Scene, Shape, SimError, SnapshotError};
use ntetris::types::Player;

#[test]
fn test_snapshot_round_trips_mixed_rubble() {
    let text = "[ O ][>03][   ][   ][<00]\n\
                [   ][   ][ O ][<--][   ]\n\
                [ O ][ O ][ O ][ O ][ O ]";
    let scene = Scene::from_pretty_print(text).unwrap();
    assert_eq!((scene.width(), scene.height()), (5, 3));
    assert_eq!(scene.rubble_count(), 10);
    assert_eq!(scene.pretty_print(), text);
    assert_eq!(
        scene.rubble_at(1, 0),
        Some(&Shape::falling_rubble(1, 0, 1, Some(3), Some(Player::Left)))
    );
}

#[test]
fn test_initialise_replaces_contents() {
    let mut scene = Scene::from_pretty_print("[ O ][ O ]\n[ O ][   ]").unwrap();
    scene
        .initialise_from_pretty_print("[   ][   ]\n[   ][<00]")
        .unwrap();
    assert_eq!(scene.rubble_count(), 1);
    assert!(scene.has_falling_rubble());
    assert!(scene.drain_events().is_empty());
}

#[test]
fn test_initialise_rejects_other_dimensions() {
    let mut scene = Scene::new(2, 2).unwrap();
    assert_eq!(
        scene.initialise_from_pretty_print("[   ][   ][   ]\n[   ][   ][   ]"),
        Err(SimError::InvalidDimensions {
            width: 3,
            height: 2
        })
    );
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    let scene = Scene::from_pretty_print("\n   [ O ][   ]\n   [   ][ O ]\n\n").unwrap();
    assert_eq!(scene.pretty_print(), "[ O ][   ]\n[   ][ O ]");
}

#[test]
fn test_snapshot_errors_are_readable() {
    let err = Scene::from_pretty_print("[ O ][ X ]").unwrap_err();
    assert_eq!(
        err,
        SimError::Snapshot(SnapshotError::BadToken {
            line: 0,
            cell: 1,
            token: "[ X ]".to_string()
        })
    );
    assert_eq!(
        err.to_string(),
        "snapshot: unrecognised token \"[ X ]\" at line 0, cell 1"
    );
}

#[test]
fn test_piece_tokens_keep_their_gaps() {
    let scene = Scene::from_pretty_print("[ L ][ R ][ L ]").unwrap();
    let left = scene.player_shape(Player::Left).unwrap();
    assert_eq!(left.fall_extent(), 3);
    assert_eq!(left.pattern().cell_count(), 2);
    assert_eq!(scene.pretty_print_with_players(), "[ L ][ R ][ L ]");
}

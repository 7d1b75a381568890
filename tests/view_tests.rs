//! Terminal view tests - board layout, interpolation, overlays, diff encoding

use ntetris::core::{Game, GameConfig, Pattern, ScriptedRng, Shape};
use ntetris::term::{encode_diff_into, encode_full_into, GameView, Viewport};
use ntetris::types::{GameControl, Player};

fn game(text: &str) -> Game<ScriptedRng> {
    Game::from_snapshot(
        GameConfig::default(),
        ScriptedRng::new(vec![0]),
        text,
        None,
        None,
    )
    .unwrap()
}

#[test]
fn test_falling_rubble_is_drawn_between_cells() {
    let mut game = game("[   ][   ][<00]\n[   ][   ][   ]");
    let view = GameView::default();
    let viewport = view.required_viewport(3, 2);
    assert_eq!(viewport, Viewport::new(8, 5));

    game.frame(0, &[]).unwrap();
    game.frame(200, &[]).unwrap();
    assert_eq!(view.render(&game, viewport).row_text(1), "│····▓▓│");

    game.frame(250, &[]).unwrap();
    assert_eq!(view.render(&game, viewport).row_text(1), "│···▓▓·│");

    game.frame(300, &[]).unwrap();
    assert_eq!(view.render(&game, viewport).row_text(1), "│··▓▓··│");
}

#[test]
fn test_board_is_centred_in_larger_viewports() {
    let game = game("[ O ][   ][   ][   ][   ][   ]\n[   ][   ][   ][   ][   ][   ]");
    let view = GameView::default();
    let fb = view.render(&game, Viewport::new(20, 9));
    assert_eq!(fb.row_text(1).trim(), "");
    assert_eq!(fb.row_text(2), "   ┌────────────┐   ");
    assert_eq!(fb.row_text(3), "   │▓▓··········│   ");
}

#[test]
fn test_penalty_is_marked_in_the_status_line() {
    let mut game = Game::from_snapshot(
        GameConfig::default(),
        ScriptedRng::new(vec![0]),
        &vec!["[   ]".repeat(6); 2].join("\n"),
        Some(Shape::player(Pattern::single_block(), 4, 0, Player::Left.fall_speed())),
        None,
    )
    .unwrap();
    game.frame(0, &[]).unwrap();
    game.frame(1000, &[]).unwrap();
    assert!(game.on_penalty(Player::Left));

    let view = GameView::default();
    let fb = view.render(&game, view.required_viewport(6, 2));
    assert_eq!(fb.row_text(4), "left!    right");
}

#[test]
fn test_game_over_overlay() {
    let mut game = Game::from_snapshot(
        GameConfig {
            player_penalty_ms: 0,
            ..GameConfig::default()
        },
        ScriptedRng::new(vec![0]),
        "[ O ][ O ][   ][   ][ L ][   ]\n\
         [ O ][ O ][   ][   ][   ][   ]",
        None,
        None,
    )
    .unwrap();
    game.frame(0, &[]).unwrap();
    game.frame(1000, &[]).unwrap();
    assert!(game.is_game_over());

    let view = GameView::default();
    let fb = view.render(&game, view.required_viewport(6, 2));
    assert!(fb.row_text(2).contains("GAME OVER"));
    // pieces are cleared once the game is over
    assert!(!fb.row_text(1).contains('█'));
}

#[test]
fn test_diff_after_one_step_is_smaller_than_full_redraw() {
    let mut game = game("[ L ][   ][   ][   ][   ][   ]\n[   ][   ][   ][   ][   ][   ]");
    let view = GameView::default();
    let viewport = view.required_viewport(6, 2);

    game.frame(0, &[]).unwrap();
    let before = view.render(&game, viewport);
    game.frame(16, &[GameControl::LeftPlayerDown]).unwrap();
    let after = view.render(&game, viewport);
    assert_ne!(before, after);

    let mut full = Vec::new();
    encode_full_into(&after, &mut full).unwrap();
    let mut diff = Vec::new();
    encode_diff_into(&before, &after, &mut diff).unwrap();
    assert!(diff.len() < full.len());
}

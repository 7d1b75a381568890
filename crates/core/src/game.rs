//! Game module - the per-frame orchestrator
//!
//! Each call to [`Game::frame`] runs, in order:
//!
//! 1. real time to game time (paused spans removed), speed acceleration
//! 2. clock updates for both player slots and the rubble
//! 3. controls: pause toggles, vertical shifts, rotations, hard drops
//! 4. rubble resolution for every due rubble step
//! 5. one lowering pass per player in [`Player::ALL`] order, respawning
//!    players without a piece once their penalty has passed
//!
//! A player that cannot spawn ends the game. Contract violations from the
//! scene abort the frame with an error.

use log::{debug, info, warn};

use crate::clock::{PauseClock, SpeedSchedule, StepClock};
use crate::config::GameConfig;
use crate::error::{Result, SimError};
use crate::pieces::pattern_for;
use crate::rng::{RandomSource, SimpleRng};
use crate::scene::{LoweringResult, RubbleEvent, Scene};
use crate::shape::Shape;
use crate::types::{GameControl, PieceKind, Player};

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub game_time: u64,
    pub paused: bool,
    pub game_over: bool,
    /// Rubble steps resolved this frame.
    pub rubble_steps: u32,
    /// Lowering results in the order they happened (hard drops included).
    pub lowerings: Vec<(Player, LoweringResult)>,
    /// Rubble events drained from the scene.
    pub events: Vec<RubbleEvent>,
}

/// A shape to draw, with where it was before the last step.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTransition {
    pub source: Option<Shape>,
    pub destination: Shape,
    /// Interpolation weight of `destination`, in `[0, 1]`.
    pub progress: f32,
}

impl ShapeTransition {
    /// Interpolated `(column, row)` of the destination's bounding box origin.
    pub fn origin(&self) -> (f32, f32) {
        let dest = (
            self.destination.horizontal_offset() as f32,
            self.destination.vertical_offset() as f32,
        );
        match &self.source {
            Some(src) => {
                let from = (src.horizontal_offset() as f32, src.vertical_offset() as f32);
                (
                    from.0 + (dest.0 - from.0) * self.progress,
                    from.1 + (dest.1 - from.1) * self.progress,
                )
            }
            None => dest,
        }
    }
}

#[derive(Debug, Clone)]
struct PlayerSlot {
    enabled: bool,
    clock: StepClock,
    source_shape: Option<Shape>,
    penalty_deadline: Option<u64>,
}

impl PlayerSlot {
    fn new(step_ms: u64, enabled: bool) -> Self {
        Self {
            enabled,
            clock: StepClock::new(step_ms),
            source_shape: None,
            penalty_deadline: None,
        }
    }
}

pub struct Game<R: RandomSource = SimpleRng> {
    config: GameConfig,
    scene: Scene,
    rng: R,
    pause: PauseClock,
    speed: SpeedSchedule,
    slots: [PlayerSlot; 2],
    rubble_clock: StepClock,
    /// `(from, to)` moves made by the last rubble step.
    rubble_moves: Vec<(Shape, Shape)>,
    game_over: bool,
    game_time: u64,
}

impl Game<SimpleRng> {
    /// New game seeded from `config.seed`.
    pub fn new(config: GameConfig) -> Result<Self> {
        let rng = SimpleRng::new(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> Game<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let mut scene = Scene::new(config.scene_width, config.scene_height)?;
        if config.initial_divider {
            scene.add_rubble_column_with_hole(config.scene_width / 2, config.scene_height / 2)?;
            scene.drain_events();
        }
        Ok(Self::assemble(config, scene, rng, [true, true]))
    }

    /// Game over a scene described by a textual snapshot.
    ///
    /// Scene dimensions come from the text. Player pieces come from `[ L ]` /
    /// `[ R ]` tokens or from `left` / `right`; only players holding a piece
    /// take part, so nothing is spawned for the others.
    pub fn from_snapshot(
        config: GameConfig,
        rng: R,
        text: &str,
        left: Option<Shape>,
        right: Option<Shape>,
    ) -> Result<Self> {
        let mut scene = Scene::from_pretty_print(text)?;
        for (player, shape) in [(Player::Left, left), (Player::Right, right)] {
            if let Some(shape) = shape {
                if !scene.attempt_add_player_shape(player, shape)? {
                    return Err(SimError::Config(format!(
                        "player {} shape overlaps the snapshot",
                        player
                    )));
                }
            }
        }
        let config = GameConfig {
            scene_width: scene.width(),
            scene_height: scene.height(),
            ..config
        };
        let enabled = Player::ALL.map(|p| scene.player_shape(p).is_some());
        Ok(Self::assemble(config, scene, rng, enabled))
    }

    fn assemble(config: GameConfig, scene: Scene, rng: R, enabled: [bool; 2]) -> Self {
        Self {
            slots: enabled.map(|on| PlayerSlot::new(config.player_step_ms, on)),
            rubble_clock: StepClock::new(config.rubble_step_ms),
            speed: SpeedSchedule::new(config.acceleration_per_minute),
            pause: PauseClock::default(),
            rubble_moves: Vec::new(),
            game_over: false,
            game_time: 0,
            config,
            scene,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn game_time(&self) -> u64 {
        self.game_time
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed.multiplier()
    }

    /// Whether `player` is waiting out a respawn penalty.
    pub fn on_penalty(&self, player: Player) -> bool {
        self.slots[player.index()]
            .penalty_deadline
            .is_some_and(|deadline| self.game_time < deadline)
    }

    /// Advance the game to `real_time_ms` with this frame's controls.
    pub fn frame(&mut self, real_time_ms: u64, controls: &[GameControl]) -> Result<FrameReport> {
        let now = self.pause.game_time(real_time_ms);
        self.game_time = now;

        if self.speed.update(now) {
            let step_ms = self.speed.scaled_step_ms(self.config.player_step_ms);
            for slot in &mut self.slots {
                slot.clock.set_step_ms(step_ms);
            }
        }
        for slot in &mut self.slots {
            slot.clock.on_frame_start(now);
        }
        self.rubble_clock.on_frame_start(now);

        let mut report = FrameReport {
            game_time: now,
            ..FrameReport::default()
        };

        if !self.game_over {
            self.process_controls(real_time_ms, now, controls, &mut report)?;

            if !self.pause.is_paused() {
                report.rubble_steps = self.resolve_rubble(now)?;

                for player in Player::ALL {
                    if !self.lower_player(player, now, &mut report)? {
                        info!("game over at {}ms: player {} cannot spawn", now, player);
                        self.game_over = true;
                        break;
                    }
                }
            }
        }

        if self.game_over {
            for player in Player::ALL {
                self.scene.remove_player_shape(player);
                self.slots[player.index()].source_shape = None;
            }
        }

        report.paused = self.pause.is_paused();
        report.game_over = self.game_over;
        report.events = self.scene.drain_events();
        Ok(report)
    }

    fn process_controls(
        &mut self,
        real_time_ms: u64,
        now: u64,
        controls: &[GameControl],
        report: &mut FrameReport,
    ) -> Result<()> {
        for &control in controls {
            if control == GameControl::Pause {
                self.pause.toggle(real_time_ms);
                continue;
            }
            if self.pause.is_paused() {
                continue;
            }
            let Some(player) = control.player() else {
                continue;
            };
            match control {
                GameControl::LeftPlayerUp | GameControl::RightPlayerUp => {
                    self.scene.move_player_shape_vertically(player, -1)?;
                }
                GameControl::LeftPlayerDown | GameControl::RightPlayerDown => {
                    self.scene.move_player_shape_vertically(player, 1)?;
                }
                GameControl::LeftPlayerRotate | GameControl::RightPlayerRotate => {
                    self.scene.rotate_players_shape(player);
                }
                GameControl::LeftPlayerDrop | GameControl::RightPlayerDrop => {
                    if !self.slots[player.index()].enabled {
                        continue;
                    }
                    if let Some(result) = self.scene.drop_shape(player)? {
                        self.record_lowering(player, result, now, report);
                    }
                }
                GameControl::Pause => {}
            }
        }
        Ok(())
    }

    /// Run every due rubble step; returns how many ran.
    fn resolve_rubble(&mut self, now: u64) -> Result<u32> {
        if !self.scene.has_falling_rubble() {
            // keep the last moves until their transition has played out
            if self.rubble_clock.since_last_step() >= self.config.transition_step_ms {
                self.rubble_clock.mark_stepped(now);
                self.rubble_moves.clear();
            }
            return Ok(0);
        }
        let due = self.rubble_clock.due_steps();
        if due == 0 {
            return Ok(0);
        }
        self.rubble_clock.mark_stepped(now);
        self.rubble_moves.clear();

        let first_event = self.scene.pending_events().len();
        let mut steps = 0;
        for _ in 0..due {
            if !self.scene.has_falling_rubble() {
                break;
            }
            let changes = self.scene.advance_rubble()?;
            debug!("{}ms: rubble step moved or stopped {} cells", now, changes);
            steps += 1;
        }

        for event in &self.scene.pending_events()[first_event..] {
            let RubbleEvent::Amended { old, new } = event else {
                continue;
            };
            if let Some(chain) = self.rubble_moves.iter_mut().find(|(_, to)| to == old) {
                chain.1 = new.clone();
            } else if old.horizontal_offset() != new.horizontal_offset() {
                self.rubble_moves.push((old.clone(), new.clone()));
            }
        }
        Ok(steps)
    }

    /// Lower one player's piece for every due step, then respawn if needed.
    ///
    /// Returns `false` when the player needed a piece and none fit.
    fn lower_player(&mut self, player: Player, now: u64, report: &mut FrameReport) -> Result<bool> {
        let idx = player.index();
        if !self.slots[idx].enabled {
            return Ok(true);
        }

        let due = self.slots[idx].clock.due_steps();
        if due > 0 {
            self.slots[idx].clock.mark_stepped(now);
            self.slots[idx].source_shape = self.scene.player_shape(player).cloned();
            for _ in 0..due {
                match self.scene.lower_shape(player)? {
                    Some(result) => self.record_lowering(player, result, now, report),
                    None => break,
                }
            }
        } else if self.slots[idx].clock.since_last_step() >= self.config.transition_step_ms {
            self.slots[idx].source_shape = None;
        }

        if self.scene.player_shape(player).is_some() {
            return Ok(true);
        }
        self.slots[idx].source_shape = None;

        let slot = &mut self.slots[idx];
        match slot.penalty_deadline {
            Some(deadline) if now < deadline => return Ok(true),
            Some(_) => slot.penalty_deadline = None,
            None => {}
        }
        if self.spawn(player)? {
            return Ok(true);
        }
        warn!("player {} has nowhere to spawn", player);
        Ok(false)
    }

    fn record_lowering(
        &mut self,
        player: Player,
        result: LoweringResult,
        now: u64,
        report: &mut FrameReport,
    ) {
        if result == LoweringResult::ReachedBottom {
            let deadline = now + self.config.player_penalty_ms;
            self.slots[player.index()].penalty_deadline = Some(deadline);
            info!("player {} reached the far edge, penalty until {}ms", player, deadline);
        }
        report.lowerings.push((player, result));
    }

    /// Spawn a random piece at the player's edge, trying random free rows.
    fn spawn(&mut self, player: Player) -> Result<bool> {
        let kind = PieceKind::ALL[self.rng.next_int(PieceKind::ALL.len() as u32) as usize];
        let pattern = pattern_for(kind);
        let width = self.scene.width() as i32;
        let horizontal_offset = match player {
            Player::Left => 0,
            Player::Right => width - pattern.height() as i32,
        };

        let slot_count = (self.scene.height() + 1).saturating_sub(pattern.width());
        let mut tried = vec![false; slot_count];
        for attempt in 0..slot_count {
            let pick = self.rng.next_int((slot_count - attempt) as u32) as usize;
            let Some(vertical_offset) = (0..slot_count).filter(|&i| !tried[i]).nth(pick) else {
                break;
            };
            tried[vertical_offset] = true;
            let shape = Shape::player(
                pattern.clone(),
                horizontal_offset,
                vertical_offset as i32,
                player.fall_speed(),
            );
            if self.scene.attempt_add_player_shape(player, shape)? {
                debug!("player {} spawned {} at row {}", player, kind.as_str(), vertical_offset);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The player's piece with its pre-step position for interpolation.
    pub fn player_view(&self, player: Player) -> Option<ShapeTransition> {
        let destination = self.scene.player_shape(player)?.clone();
        let slot = &self.slots[player.index()];
        Some(ShapeTransition {
            source: slot.source_shape.clone(),
            destination,
            progress: slot
                .clock
                .transition_progress(self.config.transition_step_ms),
        })
    }

    /// Rubble cells with their pre-step positions for interpolation.
    pub fn rubble_view(&self) -> Vec<ShapeTransition> {
        let progress = self
            .rubble_clock
            .transition_progress(self.config.transition_step_ms);
        self.scene
            .rubble()
            .map(|cell| ShapeTransition {
                source: self
                    .rubble_moves
                    .iter()
                    .find(|(_, to)| to == cell)
                    .map(|(from, _)| from.clone()),
                destination: cell.clone(),
                progress,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn config() -> GameConfig {
        GameConfig {
            initial_divider: false,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_first_frame_spawns_both_players() {
        let mut game = Game::with_rng(config(), ScriptedRng::new(vec![0])).unwrap();
        let report = game.frame(0, &[]).unwrap();
        assert!(!report.game_over);
        let left = game.scene().player_shape(Player::Left).unwrap();
        let right = game.scene().player_shape(Player::Right).unwrap();
        // Q piece, first free row
        assert_eq!((left.horizontal_offset(), left.vertical_offset()), (0, 0));
        assert_eq!((right.horizontal_offset(), right.vertical_offset()), (18, 0));
        assert_eq!(right.horizontal_speed(), -1);
    }

    #[test]
    fn test_divider_is_placed() {
        let game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.scene().rubble_count(), 11);
        assert!(game.scene().rubble_at(10, 6).is_none());
    }

    #[test]
    fn test_player_lowers_once_per_step() {
        let mut game = Game::with_rng(config(), ScriptedRng::new(vec![0])).unwrap();
        game.frame(0, &[]).unwrap();
        let report = game.frame(999, &[]).unwrap();
        assert!(report.lowerings.is_empty());
        let report = game.frame(1000, &[]).unwrap();
        assert_eq!(
            report.lowerings,
            vec![
                (Player::Left, LoweringResult::Lowered),
                (Player::Right, LoweringResult::Lowered)
            ]
        );
        let view = game.player_view(Player::Left).unwrap();
        assert_eq!(view.source.as_ref().map(Shape::horizontal_offset), Some(0));
        assert_eq!(view.origin(), (0.0, 0.0));
    }

    #[test]
    fn test_pause_stops_time() {
        let mut game = Game::with_rng(config(), ScriptedRng::new(vec![0])).unwrap();
        game.frame(0, &[]).unwrap();
        let report = game.frame(10, &[GameControl::Pause]).unwrap();
        assert!(report.paused);
        let report = game.frame(5000, &[GameControl::LeftPlayerDown]).unwrap();
        assert!(report.lowerings.is_empty());
        assert_eq!(report.game_time, 10);
        let left = game.scene().player_shape(Player::Left).unwrap();
        assert_eq!(left.vertical_offset(), 0);
        let report = game.frame(5010, &[GameControl::Pause]).unwrap();
        assert!(!report.paused);
        let report = game.frame(5020, &[]).unwrap();
        assert_eq!(report.game_time, 20);
    }
}

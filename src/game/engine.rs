use tracing::{debug, info};

use super::{
    config::GameConfig,
    direction::Direction,
    error::GameError,
    navigator::{select_target, Navigator},
    snapshot::{hook_frames, Capture, HookFrame, Snapshot},
    spawner::{RandomSpawner, TargetSpawner},
    state::{GameState, GameStatus, Position, TerminationReason},
};

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Heading the snake moved in (or tried to)
    pub heading: Direction,
    /// Target collected this step, if any
    pub capture: Option<Capture>,
    /// Status after the step
    pub status: GameStatus,
    /// Board after the step
    pub snapshot: Snapshot,
    /// Hook animation for the capture; empty when nothing was collected
    pub hook: Vec<HookFrame>,
}

impl StepResult {
    pub fn terminated(&self) -> bool {
        self.status != GameStatus::Running
    }
}

/// The game engine that drives the self-playing snake
pub struct GameEngine<S: TargetSpawner = RandomSpawner> {
    config: GameConfig,
    spawner: S,
}

impl GameEngine<RandomSpawner> {
    /// Create an engine placing targets at random
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let spawner = RandomSpawner::new(config.spawn_attempts);
        Self::with_spawner(config, spawner)
    }

    /// Create an engine whose random placement is reproducible
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        let spawner = RandomSpawner::seeded(seed, config.spawn_attempts);
        Self::with_spawner(config, spawner)
    }
}

impl<S: TargetSpawner> GameEngine<S> {
    /// Create an engine with a custom target source
    pub fn with_spawner(config: GameConfig, spawner: S) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self { config, spawner })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh game
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let snake = self.config.initial_snake();
        let mut state = GameState::new(
            snake,
            Vec::with_capacity(self.config.target_count),
            self.config.initial_radius,
            self.config.grid_width,
            self.config.grid_height,
        );

        for _ in 0..self.config.target_count {
            let blocked: Vec<Position> = state
                .snake
                .body
                .iter()
                .chain(state.targets.iter())
                .copied()
                .collect();
            let target = self.spawn_avoiding(&blocked)?;
            state.targets.push(target);
        }

        debug!(head = ?state.snake.head(), targets = ?state.targets, "game reset");
        Ok(state)
    }

    /// Board view for renderers
    pub fn snapshot(&self, state: &GameState) -> Snapshot {
        Snapshot::capture(state, self.config.max_radius)
    }

    /// Advance the game by one tick.
    ///
    /// Collisions end the game through [`GameStatus::Terminated`]; the only
    /// error is running out of room for a replacement target.
    pub fn step(&mut self, state: &mut GameState) -> Result<StepResult, GameError> {
        if !state.is_running() {
            let heading = state.snake.direction;
            return Ok(self.result(state, heading, None));
        }

        let head = state.snake.head();
        let selection = select_target(head, &state.targets, state.radius);

        let heading = Navigator::for_state(state).next_direction(
            head,
            selection.pursuit,
            state.snake.direction,
            &state.snake.body,
            state.radius,
        );
        let tick = state.steps + 1;
        let new_head = head.moved_in_direction(heading);
        debug!(tick, heading = heading.as_str(), ?new_head, "snake moves");

        if let Some(reason) = self.check_collision(state, new_head) {
            state.snake.direction = heading;
            state.steps = tick;
            state.status = GameStatus::Terminated(reason);
            info!(
                reason = reason.as_str(),
                score = state.score,
                ticks = state.steps,
                "game over"
            );
            return Ok(self.result(state, heading, None));
        }

        // Capture is resolved against the target chosen before the move. The
        // replacement is placed before anything changes, so a failed spawn
        // leaves the state as it was.
        let replacement = match selection.capture {
            Some(target) => {
                let kept = state.snake.len() - 1;
                let blocked: Vec<Position> = std::iter::once(new_head)
                    .chain(state.snake.body[..kept].iter().copied())
                    .chain(state.targets.iter().copied().filter(|&t| t != target))
                    .collect();
                Some((target, self.spawn_avoiding(&blocked)?))
            }
            None => None,
        };

        state.snake.direction = heading;
        state.steps = tick;
        state.snake.advance(new_head);

        let capture = replacement
            .map(|(target, replacement)| self.collect(state, head, target, replacement));

        Ok(self.result(state, heading, capture))
    }

    /// Check if the new head position ends the game
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<TerminationReason> {
        if !state.is_in_bounds(pos) {
            return Some(TerminationReason::WallCollision);
        }

        if state.snake.occupies(pos) {
            return Some(TerminationReason::SelfCollision);
        }

        None
    }

    /// Reel in `target`: grow the radius, score, and add its replacement
    fn collect(
        &self,
        state: &mut GameState,
        origin: Position,
        target: Position,
        replacement: Position,
    ) -> Capture {
        state.targets.retain(|&t| t != target);
        state.targets.push(replacement);
        state.radius = (state.radius + 1).min(self.config.max_radius);
        state.score += 1;

        info!(
            ?target,
            ?replacement,
            radius = state.radius,
            score = state.score,
            "target captured"
        );

        Capture {
            origin,
            target,
            radius: state.radius,
            score: state.score,
        }
    }

    /// Place a target inside the spawn region, off every blocked cell
    fn spawn_avoiding(&mut self, blocked: &[Position]) -> Result<Position, GameError> {
        Ok(self.spawner.spawn(self.config.spawn_region(), blocked)?)
    }

    fn result(
        &self,
        state: &GameState,
        heading: Direction,
        capture: Option<Capture>,
    ) -> StepResult {
        let hook = capture
            .as_ref()
            .map(|c| hook_frames(c, self.config.hook_frames))
            .unwrap_or_default();

        StepResult {
            heading,
            capture,
            status: state.status,
            snapshot: self.snapshot(state),
            hook,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        error::{ConfigError, SpawnError},
        spawner::ScriptedSpawner,
        state::Snake,
    };

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn scripted(config: GameConfig, cells: &[Position]) -> GameEngine<ScriptedSpawner> {
        GameEngine::with_spawner(config, ScriptedSpawner::new(cells.iter().copied())).unwrap()
    }

    fn state_with(snake: Snake, targets: Vec<Position>, radius: u32) -> GameState {
        GameState::new(snake, targets, radius, 10, 10)
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::seeded(GameConfig::default(), 1).unwrap();
        let state = engine.reset().unwrap();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.radius, 1);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), p(20, 15));
        assert_eq!(state.snake.direction, Direction::Up);
        assert_eq!(state.targets.len(), 1);
        assert!(engine.config().spawn_region().contains(state.targets[0]));
        assert!(!state.snake.occupies(state.targets[0]));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::small();
        config.max_radius = 0;
        assert!(matches!(
            GameEngine::new(config),
            Err(GameError::Config(ConfigError::RadiusRange { .. }))
        ));
    }

    #[test]
    fn test_oversized_config_rejected() {
        let mut config = GameConfig::small();
        config.initial_snake_length = 1 << 32;
        assert!(matches!(
            GameEngine::new(config),
            Err(GameError::Config(ConfigError::SnakeTooLong { .. }))
        ));

        assert!(matches!(
            GameEngine::new(GameConfig::new(usize::MAX, 10)),
            Err(GameError::Config(ConfigError::GridTooLarge { .. }))
        ));
    }

    #[test]
    fn test_capture_adjacent_target() {
        let mut engine = scripted(GameConfig::small(), &[p(3, 3)]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(5, 4)],
            1,
        );

        let result = engine.step(&mut state).unwrap();

        assert_eq!(result.heading, Direction::Up);
        assert!(!result.terminated());
        assert_eq!(state.snake.body, vec![p(5, 4)]);
        assert_eq!(state.radius, 2);
        assert_eq!(state.score, 1);
        assert_eq!(state.targets, vec![p(3, 3)]);

        let capture = result.capture.unwrap();
        assert_eq!(capture.origin, p(5, 5));
        assert_eq!(capture.target, p(5, 4));
        assert_eq!(result.hook.len(), 6);
        assert_eq!(result.hook[0].cell(), p(5, 5));
        assert_eq!(result.hook[5].cell(), p(5, 4));
        assert_eq!(result.snapshot.score, 1);
    }

    #[test]
    fn test_replacement_never_on_snake() {
        // The first scripted cell is where the head lands, so it is skipped
        let mut engine = scripted(GameConfig::small(), &[p(5, 4), p(6, 6)]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(5, 4)],
            1,
        );

        engine.step(&mut state).unwrap();
        assert_eq!(state.targets, vec![p(6, 6)]);
    }

    #[test]
    fn test_capture_resolved_before_move() {
        let mut engine = scripted(GameConfig::small(), &[p(7, 7)]);
        // Target at distance 2 sits in range; the head only gets one cell
        // closer but the hook still collects it
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(5, 3)],
            2,
        );

        let result = engine.step(&mut state).unwrap();
        assert_eq!(state.snake.head(), p(5, 4));
        assert_eq!(result.capture.map(|c| c.target), Some(p(5, 3)));
        assert_eq!(state.targets, vec![p(7, 7)]);
    }

    #[test]
    fn test_out_of_range_target_not_collected() {
        let mut engine = scripted(GameConfig::small(), &[]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(5, 2)],
            1,
        );

        let result = engine.step(&mut state).unwrap();
        assert_eq!(result.capture, None);
        assert!(result.hook.is_empty());
        assert_eq!(state.snake.head(), p(5, 4));
        assert_eq!(state.score, 0);
        assert_eq!(state.targets, vec![p(5, 2)]);
    }

    #[test]
    fn test_radius_capped() {
        let mut config = GameConfig::small();
        config.max_radius = 2;
        let mut engine = scripted(config, &[p(4, 4), p(6, 4), p(6, 6)]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(5, 4)],
            2,
        );

        engine.step(&mut state).unwrap();
        assert_eq!(state.radius, 2);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = scripted(GameConfig::small(), &[]);
        // Every neighbour but the wall is body, so the heading is kept
        let mut state = state_with(
            Snake {
                body: vec![p(0, 5), p(1, 5), p(1, 4), p(0, 4), p(0, 6), p(1, 6)],
                direction: Direction::Left,
            },
            vec![p(5, 5)],
            1,
        );

        let result = engine.step(&mut state).unwrap();

        assert!(result.terminated());
        assert_eq!(
            state.status,
            GameStatus::Terminated(TerminationReason::WallCollision)
        );
        assert_eq!(state.snake.head(), p(0, 5));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = scripted(GameConfig::small(), &[]);
        // Boxed in at the inner margin corner: the only way forward is the body
        let mut state = state_with(
            Snake {
                body: vec![p(1, 1), p(2, 1), p(2, 2), p(1, 2)],
                direction: Direction::Right,
            },
            vec![p(5, 5)],
            1,
        );

        let result = engine.step(&mut state).unwrap();

        assert_eq!(result.heading, Direction::Right);
        assert_eq!(
            state.status,
            GameStatus::Terminated(TerminationReason::SelfCollision)
        );
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_margin_cell_is_not_a_wall() {
        let mut engine = scripted(GameConfig::small(), &[]);
        // Head boxed in with only the margin column open to the left
        let mut state = state_with(
            Snake {
                body: vec![p(1, 1), p(2, 1), p(1, 2)],
                direction: Direction::Left,
            },
            vec![p(5, 5)],
            1,
        );

        let result = engine.step(&mut state).unwrap();

        assert_eq!(result.heading, Direction::Left);
        assert!(state.is_running());
        assert_eq!(state.snake.head(), p(0, 1));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = scripted(GameConfig::small(), &[]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(5, 4)],
            1,
        );
        state.status = GameStatus::Terminated(TerminationReason::SelfCollision);
        let before = state.clone();

        let result = engine.step(&mut state).unwrap();

        assert!(result.terminated());
        assert_eq!(state, before);
        assert!(result.capture.is_none());
    }

    #[test]
    fn test_no_space_for_replacement() {
        let mut engine = scripted(GameConfig::small(), &[]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(5, 4)],
            1,
        );

        let before = state.clone();

        assert_eq!(
            engine.step(&mut state),
            Err(GameError::Spawn(SpawnError::Exhausted))
        );
        // A failed replacement leaves the tick unapplied
        assert_eq!(state, before);
        assert_eq!(state.targets, vec![p(5, 4)]);
    }

    #[test]
    fn test_replacement_uses_post_move_body() {
        // Body cells that stay are blocked; the vacated tail is free
        let mut engine = scripted(GameConfig::small(), &[p(5, 6), p(5, 7)]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 3),
            vec![p(5, 4)],
            1,
        );

        let result = engine.step(&mut state).unwrap();

        assert_eq!(state.snake.body, vec![p(5, 4), p(5, 5), p(5, 6)]);
        assert_eq!(result.capture.map(|c| c.target), Some(p(5, 4)));
        assert_eq!(state.targets, vec![p(5, 7)]);
    }

    #[test]
    fn test_multiple_targets_pursue_nearest() {
        let mut config = GameConfig::small();
        config.target_count = 2;
        let mut engine = scripted(config, &[p(2, 7)]);
        let mut state = state_with(
            Snake::new(p(5, 5), Direction::Up, 1),
            vec![p(7, 7), p(5, 6)],
            1,
        );

        let result = engine.step(&mut state).unwrap();
        assert_eq!(result.heading, Direction::Down);
        assert_eq!(result.capture.map(|c| c.target), Some(p(5, 6)));
        assert_eq!(state.targets, vec![p(7, 7), p(2, 7)]);
    }

    #[test]
    fn test_run_invariants() {
        let mut config = GameConfig::new(20, 16);
        config.initial_snake_length = 4;
        config.max_radius = 6;
        let mut engine = GameEngine::seeded(config.clone(), 99).unwrap();
        let mut state = engine.reset().unwrap();
        let length = state.snake.len();
        let mut last_radius = state.radius;

        for _ in 0..2000 {
            let before_score = state.score;
            let before_targets = state.targets.clone();
            let head = state.snake.head();
            let safe = Navigator::for_state(&state).safe_moves(head, &state.snake.body);

            let result = engine.step(&mut state).unwrap();

            if !safe.is_empty() {
                assert!(safe.contains(&result.heading));
            }
            assert_eq!(state.snake.len(), length);
            assert!(state.radius >= last_radius);
            assert!(state.radius <= config.max_radius);
            last_radius = state.radius;
            assert_eq!(state.targets.len(), config.target_count);

            match result.capture {
                Some(capture) => {
                    assert_eq!(state.score, before_score + 1);
                    assert!(before_targets.contains(&capture.target));
                    assert_eq!(capture.radius, state.radius);
                }
                None => {
                    assert_eq!(state.score, before_score);
                    if state.is_running() {
                        assert_eq!(state.targets, before_targets);
                    }
                }
            }

            if result.terminated() {
                break;
            }
        }
    }

    #[test]
    fn test_determinism_with_fixed_targets() {
        let cells: Vec<Position> = (0..50).map(|i| p(2 + i % 6, 2 + (i * 3) % 6)).collect();
        let mut config = GameConfig::small();
        config.initial_snake_length = 3;

        let run = |cells: &[Position]| {
            let mut engine = scripted(config.clone(), cells);
            let mut state = engine.reset().unwrap();
            let mut trace = Vec::new();
            for _ in 0..60 {
                match engine.step(&mut state) {
                    Ok(result) => {
                        let done = result.terminated();
                        trace.push((result.heading, result.snapshot));
                        if done {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            trace
        };

        let first = run(&cells);
        assert!(!first.is_empty());
        assert_eq!(first, run(&cells));
    }
}

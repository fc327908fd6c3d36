use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info, trace, warn};

use super::{
    action::{Command, Direction},
    config::{GameConfig, GridSize},
    error::GameError,
    state::{CollisionType, Phase, Position, Snake, Snapshot},
};

/// Random draws per cell before food placement falls back to scanning the grid
const SAMPLES_PER_CELL: usize = 4;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The round is not running, nothing moved
    Idle,
    /// The snake moved one cell without eating
    Moved,
    /// The snake ate food and grew by one segment
    Ate,
    /// The snake hit something and the round is over
    Collided(CollisionType),
}

/// The game engine that owns and advances all game state
///
/// The engine does no I/O. An external driver calls [`GameEngine::advance_tick`]
/// at a fixed interval and reads [`GameEngine::snapshot`] to draw; input
/// handling forwards intents through [`GameEngine::apply`] or the individual
/// methods at any time in between.
pub struct GameEngine<R = StdRng> {
    grid: GridSize,
    rng: R,
    phase: Phase,
    snake: Snake,
    food: Option<Position>,
    direction: Direction,
    pending_direction: Direction,
    high_score: u32,
}

impl GameEngine<StdRng> {
    /// Create a new engine seeded from OS entropy
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing food positions from `rng`
    pub fn with_rng(config: &GameConfig, rng: R) -> Result<Self, GameError> {
        let grid = config.validate()?;

        let mut engine = Self {
            grid,
            rng,
            phase: Phase::NotStarted,
            snake: Snake::new(grid.center()),
            food: None,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            high_score: 0,
        };
        engine.reset();

        let (width_px, height_px) = grid.pixel_bounds();
        debug!(
            cols = grid.cols,
            rows = grid.rows,
            width_px,
            height_px,
            "engine created"
        );
        Ok(engine)
    }

    /// Put a single-segment snake on the center cell, heading right, with fresh food.
    ///
    /// The phase and the high score are left alone.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.grid.center());
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.food = self.place_food();
    }

    /// Record a direction for the next tick.
    ///
    /// Reversing straight into the neck is ignored. The check is against the
    /// direction applied on the last tick, so two quick turns cannot sneak a
    /// reversal through.
    pub fn submit_direction(&mut self, direction: Direction) {
        if direction.is_opposite(self.direction) {
            trace!(?direction, current = ?self.direction, "reversal ignored");
            return;
        }
        self.pending_direction = direction;
    }

    /// NotStarted -> Running
    pub fn toggle_start(&mut self) {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::Running;
            info!("round started");
        }
    }

    /// GameOver -> NotStarted, with a fresh board
    pub fn request_restart(&mut self) {
        if self.phase == Phase::GameOver {
            self.phase = Phase::NotStarted;
            self.reset();
            info!(high_score = self.high_score, "round reset");
        }
    }

    /// Forward an input intent to the matching operation
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => self.submit_direction(direction),
            Command::Start => self.toggle_start(),
            Command::Restart => self.request_restart(),
        }
    }

    /// Advance the simulation by one step
    pub fn advance_tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Idle;
        }

        self.direction = self.pending_direction;
        let new_head = self.snake.head().moved_in_direction(self.direction);
        self.snake.push_head(new_head);

        if self.food == Some(new_head) {
            self.food = self.place_food();
            debug!(score = self.score(), food = ?self.food, "food eaten");
            return TickOutcome::Ate;
        }

        if let Some(collision) = self.check_collision() {
            // the lethal head is never shown
            self.snake.pop_head();
            self.phase = Phase::GameOver;
            self.high_score = self.high_score.max(self.score());
            info!(
                ?collision,
                score = self.score(),
                high_score = self.high_score,
                "game over"
            );
            return TickOutcome::Collided(collision);
        }

        self.snake.pop_tail();
        TickOutcome::Moved
    }

    /// Owned copy of the current state for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            grid: self.grid,
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.direction,
            score: self.score(),
            high_score: self.high_score,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Direction applied on the last tick
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction the next tick will apply
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Food eaten since the last reset
    pub fn score(&self) -> u32 {
        (self.snake.len() - 1) as u32
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Check the freshly pushed head against the walls and the rest of the body
    fn check_collision(&self) -> Option<CollisionType> {
        if !self.grid.contains(self.snake.head()) {
            return Some(CollisionType::Wall);
        }

        if self.snake.head_overlaps_body() {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a random cell not covered by the snake.
    ///
    /// Rejection sampling is bounded; after that the free cells are listed and
    /// one is chosen from them. Returns `None` only when the grid is full.
    fn place_food(&mut self) -> Option<Position> {
        if self.snake.len() >= self.grid.cell_count() {
            warn!(length = self.snake.len(), "no free cell left for food");
            return None;
        }

        let attempts = self.grid.cell_count().saturating_mul(SAMPLES_PER_CELL);
        for _ in 0..attempts {
            let x = self.rng.gen_range(0..self.grid.cols);
            let y = self.rng.gen_range(0..self.grid.rows);
            let pos = Position::new(x, y);

            if !self.snake.occupies(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = self
            .grid
            .cells()
            .filter(|&pos| !self.snake.occupies(pos))
            .collect();
        debug!(free = free.len(), "food sampling exhausted, scanning grid");
        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn running_engine(config: GameConfig) -> GameEngine {
        let mut engine = GameEngine::with_seed(&config, 7).unwrap();
        engine.toggle_start();
        engine
    }

    fn set_snake(engine: &mut GameEngine, segments: &[(i32, i32)]) {
        engine.snake =
            Snake::from_segments(segments.iter().map(|&(x, y)| Position::new(x, y))).unwrap();
    }

    #[test]
    fn test_new_engine_is_snapshotable() {
        let engine = GameEngine::with_seed(&GameConfig::small(), 1).unwrap();
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.phase, Phase::NotStarted);
        assert_eq!(snapshot.snake, vec![Position::new(5, 5)]);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.high_score, 0);
        assert_eq!(snapshot.direction, Direction::Right);
        let food = snapshot.food.unwrap();
        assert_ne!(food, Position::new(5, 5));
        assert!(engine.grid().contains(food));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let result = GameEngine::new(&GameConfig::new(100, 95, 10));
        assert!(matches!(result, Err(GameError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_tick_is_noop_until_started() {
        let mut engine = GameEngine::with_seed(&GameConfig::small(), 1).unwrap();
        let before = engine.snapshot();

        assert_eq!(engine.advance_tick(), TickOutcome::Idle);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = running_engine(GameConfig::small());
        engine.food = Some(Position::new(0, 0));

        for _ in 0..4 {
            assert_eq!(engine.advance_tick(), TickOutcome::Moved);
        }

        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.snake().head(), Position::new(9, 5));
        assert_eq!(engine.snake().head().to_pixels(10), (90, 50));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = running_engine(GameConfig::small());
        set_snake(&mut engine, &[(5, 5), (4, 5)]);
        engine.food = Some(Position::new(6, 5));

        let outcome = engine.advance_tick();

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.score(), 2);
        assert_eq!(engine.snake().head(), Position::new(6, 5));
        assert_eq!(engine.snake().tail(), Position::new(4, 5));
        let food = engine.food().unwrap();
        assert!(!engine.snake().occupies(food));
    }

    #[test]
    fn test_wall_collision_drops_lethal_head() {
        let mut engine = running_engine(GameConfig::small());
        set_snake(&mut engine, &[(9, 5), (8, 5), (7, 5)]);
        engine.food = Some(Position::new(0, 0));

        let outcome = engine.advance_tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Wall));
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(
            engine.snapshot().snake,
            vec![Position::new(9, 5), Position::new(8, 5), Position::new(7, 5)]
        );
        assert_eq!(engine.high_score(), 2);
    }

    #[test]
    fn test_wall_collision_on_every_side() {
        for (start, direction) in [
            ((0, 5), Direction::Left),
            ((9, 5), Direction::Right),
            ((5, 0), Direction::Up),
            ((5, 9), Direction::Down),
        ] {
            let mut engine = running_engine(GameConfig::small());
            set_snake(&mut engine, &[start]);
            engine.food = Some(Position::new(2, 2));
            engine.direction = direction;
            engine.pending_direction = direction;

            assert_eq!(
                engine.advance_tick(),
                TickOutcome::Collided(CollisionType::Wall)
            );
            assert_eq!(engine.snake().head(), Position::new(start.0, start.1));
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = running_engine(GameConfig::small());
        // Body: (5,5), (4,5), (3,5), (2,5)
        set_snake(&mut engine, &[(5, 5), (4, 5), (3, 5), (2, 5)]);
        engine.food = Some(Position::new(9, 9));

        // Right: (6,5), (5,5), (4,5), (3,5)
        assert_eq!(engine.advance_tick(), TickOutcome::Moved);
        // Down: (6,6), (6,5), (5,5), (4,5)
        engine.submit_direction(Direction::Down);
        assert_eq!(engine.advance_tick(), TickOutcome::Moved);
        // Left: (5,6), (6,6), (6,5), (5,5)
        engine.submit_direction(Direction::Left);
        assert_eq!(engine.advance_tick(), TickOutcome::Moved);
        // Up: (5,5) is still body
        engine.submit_direction(Direction::Up);
        let outcome = engine.advance_tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.snake().head(), Position::new(5, 6));
    }

    #[test]
    fn test_moving_into_tail_cell_is_fatal() {
        let mut engine = running_engine(GameConfig::small());
        // a closed 2x2 loop: the head's next cell is the tail
        set_snake(&mut engine, &[(5, 5), (5, 6), (6, 6), (6, 5)]);
        engine.food = Some(Position::new(0, 0));
        engine.direction = Direction::Up;
        engine.submit_direction(Direction::Right);

        assert_eq!(
            engine.advance_tick(),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = running_engine(GameConfig::small());

        engine.submit_direction(Direction::Left);
        assert_eq!(engine.pending_direction(), Direction::Right);

        engine.submit_direction(Direction::Up);
        engine.submit_direction(Direction::Left);
        // Left is checked against the applied direction, not the pending one
        assert_eq!(engine.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_reversal_blocked_across_two_quick_turns() {
        let mut engine = running_engine(GameConfig::small());
        set_snake(&mut engine, &[(5, 5), (4, 5)]);
        engine.food = Some(Position::new(0, 0));

        engine.submit_direction(Direction::Down);
        engine.submit_direction(Direction::Left);
        assert_eq!(engine.pending_direction(), Direction::Down);

        engine.advance_tick();
        assert_eq!(engine.direction(), Direction::Down);
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_direction_recorded_before_start() {
        let mut engine = GameEngine::with_seed(&GameConfig::small(), 3).unwrap();
        engine.submit_direction(Direction::Down);
        assert_eq!(engine.pending_direction(), Direction::Down);
        assert_eq!(engine.advance_tick(), TickOutcome::Idle);
        assert_eq!(engine.direction(), Direction::Right);
    }

    #[test]
    fn test_phase_transitions_ignore_wrong_phase() {
        let mut engine = GameEngine::with_seed(&GameConfig::small(), 3).unwrap();

        engine.request_restart();
        assert_eq!(engine.phase(), Phase::NotStarted);

        engine.apply(Command::Start);
        assert_eq!(engine.phase(), Phase::Running);

        engine.apply(Command::Start);
        engine.apply(Command::Restart);
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_reset_keeps_phase_and_high_score() {
        let mut engine = running_engine(GameConfig::small());
        engine.high_score = 12;
        set_snake(&mut engine, &[(1, 1), (1, 2)]);
        engine.submit_direction(Direction::Up);

        engine.reset();

        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.high_score(), 12);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.snake().head(), Position::new(5, 5));
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut engine = running_engine(GameConfig::small());
        set_snake(&mut engine, &[(9, 5), (8, 5), (7, 5), (6, 5)]);
        engine.food = Some(Position::new(0, 0));
        engine.advance_tick();
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.high_score(), 3);

        engine.request_restart();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, Phase::NotStarted);
        assert_eq!(snapshot.snake, vec![Position::new(5, 5)]);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.high_score, 3);
    }

    #[test]
    fn test_high_score_never_decreases() {
        let mut engine = running_engine(GameConfig::small());

        for (length, expected) in [(4, 3), (2, 3), (6, 5)] {
            let segments: Vec<(i32, i32)> = (0..length).map(|i| (9 - i, 5)).collect();
            set_snake(&mut engine, &segments);
            engine.food = Some(Position::new(0, 0));
            engine.direction = Direction::Right;
            engine.pending_direction = Direction::Right;

            engine.advance_tick();
            assert_eq!(engine.phase(), Phase::GameOver);
            assert_eq!(engine.high_score(), expected);

            engine.request_restart();
            engine.toggle_start();
        }
    }

    #[test]
    fn test_full_grid_leaves_no_food() {
        // one column, two rows: the snake starts at (0, 1), food must be (0, 0)
        let mut engine = running_engine(GameConfig::new(10, 20, 10));
        assert_eq!(engine.food(), Some(Position::new(0, 0)));

        engine.submit_direction(Direction::Up);
        assert_eq!(engine.advance_tick(), TickOutcome::Ate);
        assert_eq!(engine.food(), None);
        assert_eq!(engine.score(), 1);

        assert_eq!(
            engine.advance_tick(),
            TickOutcome::Collided(CollisionType::Wall)
        );
        assert_eq!(engine.high_score(), 1);
    }

    #[test]
    fn test_food_fallback_finds_last_free_cell() {
        let mut engine = running_engine(GameConfig::new(30, 30, 10));
        // every cell but (2, 2)
        set_snake(
            &mut engine,
            &[(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1), (0, 2), (1, 2)],
        );

        for _ in 0..20 {
            assert_eq!(engine.place_food(), Some(Position::new(2, 2)));
        }
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut driver = StdRng::seed_from_u64(42);
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        let mut engine = GameEngine::with_seed(&GameConfig::new(60, 60, 10), 99).unwrap();
        let mut best = 0;

        for _ in 0..5_000 {
            match engine.phase() {
                Phase::NotStarted => engine.toggle_start(),
                Phase::GameOver => {
                    best = best.max(engine.score());
                    assert_eq!(engine.high_score(), best);
                    engine.request_restart();
                }
                Phase::Running => {
                    let direction = *directions.choose(&mut driver).unwrap();
                    engine.submit_direction(direction);
                    let length = engine.snake().len();

                    match engine.advance_tick() {
                        TickOutcome::Ate => assert_eq!(engine.snake().len(), length + 1),
                        _ => assert_eq!(engine.snake().len(), length),
                    }
                }
            }

            let snapshot = engine.snapshot();
            assert!(!snapshot.snake.is_empty());
            assert_eq!(snapshot.score as usize, snapshot.snake.len() - 1);
            if snapshot.phase != Phase::GameOver {
                let distinct: HashSet<_> = snapshot.snake.iter().collect();
                assert_eq!(distinct.len(), snapshot.snake.len());
            }
            if let Some(food) = snapshot.food {
                assert!(!snapshot.snake.contains(&food));
            }
        }
    }
}

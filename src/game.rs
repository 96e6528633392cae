use std::collections::HashSet;
use std::mem;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{
    FOOD_SCORE, GameConfig, GridSize, INITIAL_SNAKE_LENGTH, MIN_GRID_SIDE, level_for_score,
};
use crate::error::GameError;
use crate::food;
use crate::grid::{Direction, GridPoint};
use crate::particle::{Particle, ParticleSystem};
use crate::snake::Snake;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    /// The snake filled every cell, so no food could be placed.
    BoardFilled,
}

/// Notifications for audio, haptics, persistence and the HUD.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    ScoreUpdated { score: u32, level: u32 },
    GameOver {
        final_score: u32,
        reason: DeathReason,
    },
}

/// What a single call to [`GameSession::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// Session was not running.
    Skipped,
    Moved,
    Ate,
    Ended(DeathReason),
}

/// Owned copy of everything the render adapter needs for one frame.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub segments: Vec<GridPoint>,
    pub heading: Direction,
    pub food: GridPoint,
    pub particles: Vec<Particle>,
    pub score: u32,
    pub level: u32,
    pub status: SessionStatus,
    pub death_reason: Option<DeathReason>,
    pub bounds: GridSize,
    pub tick_interval: Duration,
}

/// Complete mutable state for one game.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub snake: Snake,
    pub food: GridPoint,
    pub particles: ParticleSystem,
    pub score: u32,
    pub level: u32,
    pub tick_count: u64,
    status: SessionStatus,
    death_reason: Option<DeathReason>,
    tick_interval: Duration,
    config: GameConfig,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl GameSession {
    /// Creates an idle session seeded from system entropy.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, GameError> {
        let bounds = config.bounds;
        if bounds.width < MIN_GRID_SIDE || bounds.height < MIN_GRID_SIDE {
            return Err(GameError::GridTooSmall {
                width: bounds.width,
                height: bounds.height,
                min: MIN_GRID_SIDE,
            });
        }

        let snake = initial_snake(bounds);
        let food = food::place(&mut rng, bounds, &occupied_cells(&snake))?;

        Ok(Self {
            snake,
            food,
            particles: ParticleSystem::new(),
            score: 0,
            level: 1,
            tick_count: 0,
            status: SessionStatus::Idle,
            death_reason: None,
            tick_interval: config.speed.interval_for_level(1),
            config,
            events: Vec::new(),
            rng,
        })
    }

    /// Idle or paused sessions start running; anything else is unchanged.
    pub fn start(&mut self) {
        if matches!(self.status, SessionStatus::Idle | SessionStatus::Paused) {
            tracing::debug!(from = ?self.status, "session running");
            self.status = SessionStatus::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.status == SessionStatus::Running {
            tracing::debug!(tick = self.tick_count, "session paused");
            self.status = SessionStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            tracing::debug!(tick = self.tick_count, "session resumed");
            self.status = SessionStatus::Running;
        }
    }

    /// Flips between running and paused.
    pub fn toggle_pause(&mut self) {
        match self.status {
            SessionStatus::Running => self.pause(),
            SessionStatus::Paused => self.resume(),
            SessionStatus::Idle | SessionStatus::GameOver => {}
        }
    }

    /// Throws away the current game and returns to a fresh idle session.
    ///
    /// The random stream carries over so consecutive games differ.
    pub fn restart(&mut self) {
        let bounds = self.config.bounds;
        self.snake = initial_snake(bounds);
        self.particles.clear();
        self.score = 0;
        self.level = 1;
        self.tick_count = 0;
        self.death_reason = None;
        self.tick_interval = self.config.speed.interval_for_level(1);
        self.events.clear();
        self.status = SessionStatus::Idle;

        match food::place(&mut self.rng, bounds, &occupied_cells(&self.snake)) {
            Ok(food) => self.food = food,
            Err(error) => self.end(DeathReason::BoardFilled, Some(error)),
        }
        tracing::info!(difficulty = %self.config.difficulty, "session restarted");
    }

    /// Buffers a heading change; ignored unless the session is running.
    pub fn submit_direction(&mut self, direction: Direction) {
        if self.status == SessionStatus::Running {
            self.snake.request_direction(direction);
        }
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != SessionStatus::Running {
            return TickOutcome::Skipped;
        }

        self.tick_count += 1;
        let candidate = self.snake.advance();

        if !candidate.is_within_bounds(self.config.bounds) {
            self.end(DeathReason::WallCollision, None);
            return TickOutcome::Ended(DeathReason::WallCollision);
        }

        // Checked against the pre-move body, so the tail cell still counts
        // even though a plain move would vacate it.
        if self.snake.occupies(candidate) {
            self.end(DeathReason::SelfCollision, None);
            return TickOutcome::Ended(DeathReason::SelfCollision);
        }

        let outcome = if candidate == self.food {
            self.snake.grow(candidate);
            self.score += FOOD_SCORE;
            self.level = level_for_score(self.score);
            self.tick_interval = self.config.speed.interval_for_level(self.level);
            self.particles.burst(&mut self.rng, candidate);
            self.events.push(GameEvent::ScoreUpdated {
                score: self.score,
                level: self.level,
            });

            let occupied = occupied_cells(&self.snake);
            match food::place(&mut self.rng, self.config.bounds, &occupied) {
                Ok(food) => self.food = food,
                Err(error) => {
                    self.particles.update();
                    self.end(DeathReason::BoardFilled, Some(error));
                    return TickOutcome::Ended(DeathReason::BoardFilled);
                }
            }

            TickOutcome::Ate
        } else {
            self.snake.slide(candidate);
            TickOutcome::Moved
        };

        self.particles.update();
        outcome
    }

    /// Takes all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Copies the render-relevant state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            segments: self.snake.segments().copied().collect(),
            heading: self.snake.current_direction(),
            food: self.food,
            particles: self.particles.as_slice().to_vec(),
            score: self.score,
            level: self.level,
            status: self.status,
            death_reason: self.death_reason,
            bounds: self.config.bounds,
            tick_interval: self.tick_interval,
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    /// Current delay between simulation ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.config.bounds
    }

    fn end(&mut self, reason: DeathReason, error: Option<GameError>) {
        if let Some(error) = error {
            tracing::warn!(%error, "ending session");
        }
        tracing::info!(score = self.score, ?reason, ticks = self.tick_count, "game over");

        self.status = SessionStatus::GameOver;
        self.death_reason = Some(reason);
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
            reason,
        });
    }
}

fn initial_snake(bounds: GridSize) -> Snake {
    let head = GridPoint::new(i32::from(bounds.width / 2), i32::from(bounds.height / 2));
    Snake::straight(head, Direction::Right, INITIAL_SNAKE_LENGTH)
}

fn occupied_cells(snake: &Snake) -> HashSet<GridPoint> {
    snake.segments().copied().collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{
        Difficulty, GameConfig, GridSize, PARTICLE_BURST_COUNT, PARTICLE_LIFETIME_TICKS,
    };
    use crate::error::GameError;
    use crate::grid::{Direction, GridPoint};
    use crate::snake::Snake;

    use super::{DeathReason, GameEvent, GameSession, SessionStatus, TickOutcome};

    fn config(width: u16, height: u16) -> GameConfig {
        GameConfig::new(GridSize { width, height }, Difficulty::Medium)
    }

    fn running(width: u16, height: u16, seed: u64) -> GameSession {
        let mut session = GameSession::new_with_seed(config(width, height), seed)
            .expect("grid is large enough");
        session.start();
        session
    }

    #[test]
    fn new_session_is_idle_with_centered_snake() {
        let session = GameSession::new_with_seed(config(20, 20), 1).expect("valid grid");

        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.snake.len(), 3);
        assert_eq!(session.snake.head(), GridPoint::new(10, 10));
        assert!(!session.snake.occupies(session.food));
        assert_eq!(session.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let error = GameSession::new_with_seed(config(4, 20), 1).expect_err("grid too small");
        assert!(matches!(error, GameError::GridTooSmall { width: 4, .. }));
    }

    #[test]
    fn idle_session_does_not_tick() {
        let mut session = GameSession::new_with_seed(config(10, 10), 1).expect("valid grid");
        let head = session.snake.head();

        assert_eq!(session.tick(), TickOutcome::Skipped);
        assert_eq!(session.snake.head(), head);
        assert_eq!(session.tick_count, 0);
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut session = running(10, 10, 2);
        session.snake = Snake::straight(GridPoint::new(5, 5), Direction::Right, 3);
        session.food = GridPoint::new(0, 0);

        assert_eq!(session.tick(), TickOutcome::Moved);
        assert_eq!(session.snake.len(), 3);
        assert_eq!(session.snake.head(), GridPoint::new(6, 5));
        assert_eq!(session.score, 0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn eating_food_grows_scores_and_bursts() {
        let mut session = running(10, 10, 3);
        session.snake = Snake::straight(GridPoint::new(5, 5), Direction::Right, 3);
        session.food = GridPoint::new(6, 5);

        assert_eq!(session.tick(), TickOutcome::Ate);

        assert_eq!(session.snake.len(), 4);
        assert_eq!(session.score, 10);
        assert_eq!(session.level, 1);
        assert!(!session.snake.occupies(session.food));
        assert_eq!(session.particles.len(), PARTICLE_BURST_COUNT);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::ScoreUpdated {
                score: 10,
                level: 1
            }]
        );
    }

    #[test]
    fn fifth_food_reaches_level_two_and_speeds_up() {
        let mut session = running(20, 5, 4);
        session.snake = Snake::new(GridPoint::new(0, 2), Direction::Right);

        for x in 1..=5 {
            session.food = GridPoint::new(x, 2);
            assert_eq!(session.tick(), TickOutcome::Ate);
        }

        assert_eq!(session.score, 50);
        assert_eq!(session.level, 2);
        assert_eq!(session.tick_interval(), Duration::from_millis(180));
    }

    #[test]
    fn wall_collision_ends_without_scoring() {
        let mut session = running(10, 10, 5);
        session.snake = Snake::straight(GridPoint::new(9, 5), Direction::Right, 3);
        let segments_before: Vec<_> = session.snake.segments().copied().collect();

        assert_eq!(
            session.tick(),
            TickOutcome::Ended(DeathReason::WallCollision)
        );
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(session.score, 0);
        assert_eq!(
            session.snake.segments().copied().collect::<Vec<_>>(),
            segments_before
        );
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::GameOver {
                final_score: 0,
                reason: DeathReason::WallCollision
            }]
        );
    }

    #[test]
    fn self_collision_ends_game() {
        let mut session = running(10, 10, 6);
        // U-shape heading Up; turning Left re-enters (4,5).
        session.snake = Snake::from_segments(
            vec![
                GridPoint::new(5, 5),
                GridPoint::new(5, 6),
                GridPoint::new(4, 6),
                GridPoint::new(4, 5),
                GridPoint::new(4, 4),
            ],
            Direction::Up,
        );
        session.food = GridPoint::new(0, 0);
        session.submit_direction(Direction::Left);

        assert_eq!(
            session.tick(),
            TickOutcome::Ended(DeathReason::SelfCollision)
        );
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(session.snake.len(), 5);
    }

    #[test]
    fn moving_into_current_tail_is_a_collision() {
        let mut session = running(10, 10, 7);
        // Square loop: head at (5,5) heading Down, tail at (5,6).
        session.snake = Snake::from_segments(
            vec![
                GridPoint::new(5, 5),
                GridPoint::new(6, 5),
                GridPoint::new(6, 6),
                GridPoint::new(5, 6),
            ],
            Direction::Down,
        );
        session.food = GridPoint::new(0, 0);

        assert_eq!(
            session.tick(),
            TickOutcome::Ended(DeathReason::SelfCollision)
        );
    }

    #[test]
    fn particles_decay_every_tick_and_freeze_on_game_over() {
        let mut session = running(10, 10, 8);
        session.snake = Snake::straight(GridPoint::new(2, 5), Direction::Right, 3);
        session.food = GridPoint::new(3, 5);
        session.tick();
        let lifetime = session.particles.as_slice()[0].remaining_lifetime();

        session.food = GridPoint::new(0, 0);
        session.tick();
        assert_eq!(
            session.particles.as_slice()[0].remaining_lifetime(),
            lifetime - 1
        );

        session.snake = Snake::straight(GridPoint::new(9, 5), Direction::Right, 3);
        session.tick();
        assert_eq!(
            session.particles.as_slice()[0].remaining_lifetime(),
            lifetime - 1
        );
    }

    #[test]
    fn filling_the_board_ends_the_session() {
        let mut session = running(5, 5, 9);
        let mut path = Vec::new();
        for y in 0..5 {
            let row: Vec<_> = (0..5).map(|x| GridPoint::new(x, y)).collect();
            if y % 2 == 0 {
                path.extend(row);
            } else {
                path.extend(row.into_iter().rev());
            }
        }
        // Serpentine covering every cell but (0,0); head at (1,0) heading Left.
        session.food = path[0];
        session.snake = Snake::from_segments(path[1..].to_vec(), Direction::Left);

        assert_eq!(session.tick(), TickOutcome::Ended(DeathReason::BoardFilled));
        assert_eq!(session.snake.len(), 25);
        assert_eq!(session.status(), SessionStatus::GameOver);
        // The burst from the last meal decays on the ending tick like any other.
        let remaining = session.particles.as_slice()[0].remaining_lifetime();
        assert_eq!(remaining, PARTICLE_LIFETIME_TICKS - 1);
        assert_eq!(
            session.drain_events(),
            vec![
                GameEvent::ScoreUpdated {
                    score: 10,
                    level: 1
                },
                GameEvent::GameOver {
                    final_score: 10,
                    reason: DeathReason::BoardFilled
                }
            ]
        );
    }

    #[test]
    fn direction_is_ignored_outside_running() {
        let mut session = GameSession::new_with_seed(config(10, 10), 10).expect("valid grid");
        session.submit_direction(Direction::Up);
        assert_eq!(session.snake.pending_direction(), Direction::Right);

        session.start();
        session.pause();
        session.submit_direction(Direction::Up);
        assert_eq!(session.snake.pending_direction(), Direction::Right);

        session.resume();
        session.submit_direction(Direction::Up);
        assert_eq!(session.snake.pending_direction(), Direction::Up);
    }

    #[test]
    fn pause_is_idempotent() {
        let mut session = running(10, 10, 11);

        session.pause();
        session.pause();
        assert_eq!(session.status(), SessionStatus::Paused);
        assert_eq!(session.tick(), TickOutcome::Skipped);

        session.resume();
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn game_over_ignores_start_until_restart() {
        let mut session = running(10, 10, 12);
        session.snake = Snake::straight(GridPoint::new(9, 5), Direction::Right, 3);
        session.tick();

        session.start();
        session.resume();
        assert_eq!(session.status(), SessionStatus::GameOver);

        session.restart();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
        assert_eq!(session.snake.len(), 3);
        assert!(session.particles.is_empty());
        assert!(session.death_reason().is_none());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn snapshot_mirrors_session() {
        let mut session = running(12, 8, 13);
        session.tick();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.segments.len(), session.snake.len());
        assert_eq!(snapshot.segments[0], session.snake.head());
        assert_eq!(snapshot.food, session.food);
        assert_eq!(snapshot.status, SessionStatus::Running);
        assert_eq!(
            snapshot.bounds,
            GridSize {
                width: 12,
                height: 8
            }
        );
    }
}

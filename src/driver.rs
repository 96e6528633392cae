use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::game::{GameEvent, GameSession, SessionSnapshot, SessionStatus};

/// Session shared between the simulation thread and the host.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Runs the fixed-rate simulation on a background thread.
///
/// All access to the session goes through its one mutex, so a render
/// snapshot never sees a half-applied tick. Stopping joins the thread
/// before returning.
#[derive(Debug)]
pub struct GameDriver {
    session: SharedSession,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    events: Receiver<GameEvent>,
}

impl GameDriver {
    /// Takes ownership of `session` and starts the simulation thread.
    pub fn spawn(session: GameSession) -> Self {
        let session = Arc::new(Mutex::new(session));
        let (stop_tx, stop_rx) = mpsc::channel();
        let (event_tx, events) = mpsc::channel();

        let shared = Arc::clone(&session);
        let handle = thread::spawn(move || run_simulation(&shared, &stop_rx, &event_tx));

        Self {
            session,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            events,
        }
    }

    /// Runs `f` with exclusive access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut GameSession) -> R) -> R {
        f(&mut lock(&self.session))
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    /// Events produced since the last call, oldest first.
    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.events.try_iter().collect()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Halts the simulation thread and waits for it to exit. The session
    /// keeps its state; a stopped driver cannot be restarted.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        // Dropping the sender also wakes the thread.
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if handle.join().is_err() {
            tracing::error!("simulation thread panicked");
        } else {
            tracing::debug!("simulation thread stopped");
        }
    }
}

impl Drop for GameDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_simulation(session: &SharedSession, stop_rx: &Receiver<()>, event_tx: &Sender<GameEvent>) {
    tracing::debug!("simulation thread started");
    let mut last_tick = Instant::now();

    loop {
        let (status, interval) = {
            let guard = lock(session);
            (guard.status(), guard.tick_interval())
        };

        if status != SessionStatus::Running {
            // Resuming should wait a full interval before the first move.
            last_tick = Instant::now();
        }

        let wait = interval.saturating_sub(last_tick.elapsed());
        match stop_rx.recv_timeout(wait) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        if last_tick.elapsed() < interval {
            continue;
        }
        last_tick = Instant::now();

        let events = {
            let mut guard = lock(session);
            guard.tick();
            guard.drain_events()
        };

        for event in events {
            if event_tx.send(event).is_err() {
                return;
            }
        }
    }
}

fn lock(session: &SharedSession) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::config::{Difficulty, GameConfig, GridSize, SpeedProfile};
    use crate::game::{GameEvent, GameSession, SessionStatus};
    use crate::grid::{Direction, GridPoint};
    use crate::snake::Snake;

    use super::GameDriver;

    fn fast_session() -> GameSession {
        let mut config = GameConfig::new(
            GridSize {
                width: 30,
                height: 10,
            },
            Difficulty::Medium,
        );
        config.speed = SpeedProfile::new(5, 0, 5);
        GameSession::new_with_seed(config, 99).expect("valid grid")
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn idle_session_is_not_advanced() {
        let mut driver = GameDriver::spawn(fast_session());
        thread::sleep(Duration::from_millis(40));

        assert_eq!(driver.with_session(|session| session.tick_count), 0);
        driver.stop();
        assert!(!driver.is_running());
    }

    #[test]
    fn running_session_ends_against_the_wall_and_reports_it() {
        let driver = GameDriver::spawn(fast_session());
        driver.with_session(|session| {
            session.snake = Snake::new(GridPoint::new(0, 5), Direction::Left);
            session.food = GridPoint::new(20, 1);
            session.start();
        });

        let game_over = || driver.snapshot().status == SessionStatus::GameOver;
        assert!(wait_until(game_over));

        let mut events = Vec::new();
        let reported = wait_until(|| {
            events.extend(driver.drain_events());
            !events.is_empty()
        });
        assert!(reported);

        let first = events[0];
        assert!(matches!(first, GameEvent::GameOver { final_score: 0, .. }));
    }

    #[test]
    fn stop_freezes_the_session() {
        let mut driver = GameDriver::spawn(fast_session());
        driver.with_session(|session| {
            session.snake = Snake::new(GridPoint::new(0, 5), Direction::Right);
            session.food = GridPoint::new(0, 0);
            session.start();
        });
        assert!(wait_until(|| driver.with_session(|s| s.tick_count) > 0));

        driver.stop();
        let frozen = driver.with_session(|session| session.tick_count);
        thread::sleep(Duration::from_millis(30));

        assert_eq!(driver.with_session(|session| session.tick_count), frozen);
        // Stopping twice is harmless.
        driver.stop();
    }

    #[test]
    fn pause_preserves_state() {
        let driver = GameDriver::spawn(fast_session());
        driver.with_session(|session| {
            session.snake = Snake::new(GridPoint::new(0, 5), Direction::Right);
            session.food = GridPoint::new(0, 0);
            session.start();
        });
        assert!(wait_until(|| driver.with_session(|s| s.tick_count) > 0));

        let paused_at = driver.with_session(|session| {
            session.pause();
            session.snake.head()
        });
        thread::sleep(Duration::from_millis(30));

        let snapshot = driver.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Paused);
        assert_eq!(snapshot.segments[0], paused_at);
    }
}

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

use crate::grid::Direction;

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Confirm,
    Restart,
    Quit,
}

/// Maps a drag from `start` to `end` onto a heading.
///
/// The larger axis displacement must exceed `threshold`; the dominant axis
/// decides, with ties going horizontal.
#[must_use]
pub fn swipe_direction(start: (f32, f32), end: (f32, f32), threshold: f32) -> Option<Direction> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;

    if dx.abs().max(dy.abs()) <= threshold {
        return None;
    }

    let direction = if dx.abs() >= dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };

    Some(direction)
}

/// Keyboard bindings: arrows/WASD steer, P/Space pause, Enter confirms,
/// R restarts, Q/Esc quits.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => {
            GameInput::Direction(Direction::Right)
        }
        KeyCode::Char('p' | 'P' | ' ') => GameInput::Pause,
        KeyCode::Enter => GameInput::Confirm,
        KeyCode::Char('r' | 'R') => GameInput::Restart,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

/// Turns left-button drags into swipes.
///
/// Terminal cells are about twice as tall as they are wide, so columns are
/// halved to keep both axes in square units.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold: f32,
    origin: Option<(f32, f32)>,
}

impl SwipeTracker {
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            origin: None,
        }
    }

    pub fn handle(&mut self, mouse: MouseEvent) -> Option<Direction> {
        let point = (f32::from(mouse.column) / 2.0, f32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some(point);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let origin = self.origin.take()?;
                swipe_direction(origin, point, self.threshold)
            }
            _ => None,
        }
    }
}

/// Polls crossterm for keyboard and mouse input.
#[derive(Debug)]
pub struct InputHandler {
    swipe: SwipeTracker,
}

impl InputHandler {
    #[must_use]
    pub fn new(swipe_threshold: f32) -> Self {
        Self {
            swipe: SwipeTracker::new(swipe_threshold),
        }
    }

    /// Waits up to `timeout` for the next relevant input.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let input = match event::read()? {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => self.swipe.handle(mouse).map(GameInput::Direction),
            _ => None,
        };

        Ok(input)
    }
}

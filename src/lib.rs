//! Neon Snake: grid snake with a tick-driven session state machine, food
//! placement, particle bursts and a ratatui front end.

pub mod config;
pub mod driver;
pub mod error;
pub mod feedback;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod particle;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;

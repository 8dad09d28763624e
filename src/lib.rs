//! Grid-based terminal Snake.
//!
//! [`game::GameState`] is the whole state machine; everything else turns
//! key presses into queued directions, drives ticks from a fixed timer, and
//! draws the board.

pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;

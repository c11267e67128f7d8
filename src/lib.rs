//! Grid movement and collision engine for a Snake game on open or rail-lattice
//! maps, plus the terminal front end that drives it.

pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod session;
pub mod snake;
pub mod snapshot;
pub mod terminal_runtime;
pub mod ui;

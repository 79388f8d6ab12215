//! ASCII-MAN: a side-scrolling platformer drawn with monospace glyphs.
//!
//! The library is the simulation only. A host owns the screen, feeds key
//! events into the engine's input source, calls [`engine::GameEngine::update`]
//! once per frame and draws from the engine's read-only views.

pub mod collision;
pub mod config;
pub mod effects;
pub mod engine;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod levels;
pub mod logging;
pub mod ticker;
pub mod weapons;

pub use config::GameConfig;
pub use engine::{GameCallbacks, GameEngine, GameEvent, NoCallbacks};
pub use error::GameError;

//! Core data types: configuration, frames, and local-metric geometry.

pub mod config;
pub mod frame;
pub mod geom;

pub use config::{FwiOverrides, SimulationConfig, Weather};
pub use frame::{FireType, Frame};
pub use geom::{LocalFrame, Vec2};

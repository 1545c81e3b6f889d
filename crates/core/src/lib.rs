//! Fire Spread Simulation Core Library
//!
//! A physically based wildfire growth simulator built on the Canadian fire
//! danger systems:
//! - Fire Weather Index (FWI) System: FFMC, DMC, DC, ISI, BUI, FWI from
//!   daily weather
//! - Fire Behavior Prediction (FBP) System: rate of spread, fuel
//!   consumption, and intensity for the 18 standard fuel types
//! - Van Wagner crown fire transition
//! - Huygens wavelet front propagation (Prometheus-style elliptical
//!   vertex expansion)
//!
//! The single public entry point is [`simulate`]: it consumes a
//! [`SimulationConfig`] and returns a lazy sequence of [`Frame`]
//! snapshots of the growing fire perimeter.

// Core types and utilities
pub mod core_types;

// Fire behavior calculators
pub mod fbp;

// Front propagation and the simulation driver
pub mod spread;

pub mod error;

// Re-export the public surface
pub use core_types::{FireType, Frame, FwiOverrides, SimulationConfig, Weather};
pub use error::FireSimError;
pub use fbp::{FbpOptions, FbpResult, FuelCode, FuelGroup, FuelParams, FwiCalculator, FwiState};
pub use spread::{simulate, FirePerimeter, FireVertex, Simulation};

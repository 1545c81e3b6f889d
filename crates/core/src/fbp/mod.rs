//! Canadian Fire Behavior Prediction (FBP) System: fuel parameters, fire
//! weather indices, crown fire transition, and the fire behavior
//! calculator.

pub mod calculator;
pub mod crown;
pub mod fuel;
pub mod fwi;

pub use calculator::{FbpOptions, FbpResult};
pub use fuel::{FuelCode, FuelGroup, FuelParams};
pub use fwi::{FwiCalculator, FwiState};

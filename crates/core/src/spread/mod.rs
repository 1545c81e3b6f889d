//! Huygens wavelet fire growth: ellipse geometry, directional slope,
//! perimeter ring maintenance, and the frame-producing driver.

pub mod ellipse;
pub mod perimeter;
pub mod simulator;
pub mod slope;

pub use perimeter::{FirePerimeter, FireVertex};
pub use simulator::{simulate, Simulation};

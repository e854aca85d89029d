//! Small helpers shared by the engine and bar modules

pub mod color;
pub mod throttle;

pub use color::HexColor;
pub use throttle::{Throttle, Throttled};

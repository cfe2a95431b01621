//! Input sources for the Starglow backdrop.
//!
//! The scene consumes a single normalized parallax vector. On wide devices
//! it comes from the pointer; on compact devices with an orientation sensor
//! it comes from tilt. Input handlers only ever write state fields; they
//! never touch scene entities.

mod pointer;
mod tilt;

pub use pointer::PointerState;
pub use tilt::{TiltReading, TiltSource, detect};

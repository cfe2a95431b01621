//! Application shell for the Starglow backdrop: window lifecycle, frame
//! clock, platform directories, and the winit event loop.

mod frame_clock;
mod platform;
mod window;

pub use frame_clock::{FrameClock, MAX_FRAME_TIME};
pub use platform::{PlatformDirs, PlatformError};
pub use window::{BackdropApp, run, window_attributes_from_config};

//! GPU rendering foundation for the Starglow backdrop.
//!
//! Owns device/surface initialization, surface-size normalization, the
//! parallax camera, buffer helpers, and render-pass plumbing. The sky
//! renderers in `starglow-sky` build on these primitives.

mod buffer;
mod camera;
mod gpu;
mod pass;
mod surface;

pub use buffer::{BufferAllocator, VertexPositionColor};
pub use camera::{Camera, CameraUniform};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, NIGHT_CLEAR, RenderPassBuilder};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};

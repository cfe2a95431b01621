//! The Starglow sky: simulation core and GPU renderers.
//!
//! Simulation modules (starfield, meteors, nebula, particle field, parallax,
//! scene controller) are pure CPU state machines, seeded from a single
//! ChaCha8 stream and testable without a GPU. Each has a sibling renderer
//! that consumes read-only views of its state.

mod meteor;
mod meteor_renderer;
mod nebula;
mod nebula_renderer;
mod parallax;
mod particle_renderer;
mod particles;
mod rng;
mod scene;
mod star_renderer;
mod starfield;

pub use meteor::{Meteor, MeteorShower};
pub use meteor_renderer::MeteorRenderer;
pub use nebula::{NebulaBank, NebulaPlane, NebulaTexture};
pub use nebula_renderer::NebulaRenderer;
pub use parallax::ParallaxRig;
pub use particle_renderer::ParticleFieldRenderer;
pub use particles::{LinkLine, Particle, ParticleField, pool_size};
pub use rng::{SkyRng, rng_from_seed};
pub use scene::SkyScene;
pub use star_renderer::StarfieldRenderer;
pub use starfield::{StarPoint, Starfield, StarfieldGenerator};

//! The deep-sky scene controller.
//!
//! [`SkyScene`] owns every simulation entity (starfield, nebula bank,
//! meteor shower, parallax rig) plus the elapsed-time clock, the resolved
//! device class and the reduced-motion flag. One instance per mount; all
//! state is per-instance, so scenes never share timing or RNG streams.
//!
//! Per frame the host calls [`set_parallax_target`](SkyScene::set_parallax_target)
//! then [`advance`](SkyScene::advance), and reads camera/entity state for
//! rendering. Updates run strictly sequentially in a fixed order; nothing
//! reads back from the render output.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};

use starglow_config::{DeviceClass, SkyConfig};

use crate::meteor::{Meteor, MeteorShower};
use crate::nebula::NebulaBank;
use crate::parallax::ParallaxRig;
use crate::rng::{SkyRng, rng_from_seed};
use crate::starfield::{Starfield, StarfieldGenerator};

/// The deep-sky scene: owned entities, clock, and adaptation flags.
pub struct SkyScene {
    elapsed: f32,
    mounted: bool,
    reduced_motion: bool,
    device_class: DeviceClass,
    seed: u64,
    starfield: Starfield,
    nebula: NebulaBank,
    shower: MeteorShower,
    rig: ParallaxRig,
}

impl SkyScene {
    /// Build a scene for the given viewport. The device class is resolved
    /// from the logical width once, here; the reduced-motion preference is
    /// read once from the config.
    pub fn new(sky: &SkyConfig, logical_width: f32) -> Self {
        let device_class = sky.classify(logical_width);
        let tuning = sky.tuning(device_class);
        let reduced_motion = sky.motion.resolve();

        let (mut rng, seed) = rng_from_seed(sky.seed);

        let rotation_speed = if reduced_motion {
            sky.rotation_speed * sky.reduced_rotation_factor
        } else {
            sky.rotation_speed
        };
        let points = StarfieldGenerator::new(tuning.star_count).generate(&mut rng);
        let starfield = Starfield::new(points, rotation_speed);

        let nebula = NebulaBank::generate(
            sky.nebula.plane_count,
            sky.nebula.base_spin,
            sky.nebula.opacity,
            &mut rng,
        );

        // The shower takes its own stream so spawn timing stays deterministic
        // regardless of how many stars or planes were drawn before it.
        let shower_rng = SkyRng::seed_from_u64(rng.random());
        let shower = MeteorShower::new(
            tuning.meteor_min_gap,
            tuning.meteor_max_gap,
            tuning.meteor_cap,
            shower_rng,
        );

        let rig = ParallaxRig::new(sky.parallax_scale, sky.parallax_easing);

        log::info!(
            "Sky scene mounted: {:?}, {} stars, cap {} meteors, reduced_motion={}",
            device_class,
            tuning.star_count,
            tuning.meteor_cap,
            reduced_motion
        );

        Self {
            elapsed: 0.0,
            mounted: true,
            reduced_motion,
            device_class,
            seed,
            starfield,
            nebula,
            shower,
            rig,
        }
    }

    /// Feed the normalized parallax input vector for this frame.
    pub fn set_parallax_target(&mut self, input: Vec2) {
        self.rig.set_target(input);
    }

    /// Advance the whole scene by `dt` seconds, in order: clock, starfield
    /// rotation, meteor spawn/update/retire, nebula rotation, camera blend.
    /// A no-op after [`unmount`](Self::unmount).
    pub fn advance(&mut self, dt: f32) {
        if !self.mounted {
            return;
        }

        self.elapsed += dt;
        self.starfield.advance(dt);
        self.shower.advance(self.elapsed, dt, !self.reduced_motion);
        self.nebula.advance(dt);
        self.rig.advance();
    }

    /// Tear the scene down. Active meteors are dropped and every subsequent
    /// [`advance`](Self::advance) is a no-op, so a callback that fires after
    /// unmount can never mutate entity state.
    pub fn unmount(&mut self) {
        self.shower.clear();
        self.mounted = false;
        log::info!("Sky scene unmounted");
    }

    /// Whether the scene is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Elapsed simulation time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The seed this scene runs on (drawn fresh unless configured).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The device class resolved at construction.
    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    /// Whether reduced motion is active.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// The starfield.
    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    /// The nebula plane bank.
    pub fn nebula(&self) -> &NebulaBank {
        &self.nebula
    }

    /// Active meteors.
    pub fn meteors(&self) -> &[Meteor] {
        self.shower.active()
    }

    /// Eased camera position for this frame.
    pub fn camera_position(&self) -> Vec3 {
        self.rig.camera_position()
    }

    /// The fixed look-at target behind the scene.
    pub fn look_target(&self) -> Vec3 {
        self.rig.look_target()
    }
}

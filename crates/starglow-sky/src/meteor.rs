//! Meteor lifecycle and spawn scheduling.
//!
//! Each meteor is one record owning its full state: head/tail endpoints,
//! velocity, life scalar, fade speed, opacity and color. The shower owns
//! the active list and the randomized spawn deadline; both are instance
//! state so multiple scenes never share timing.

use glam::Vec3;
use rand::Rng;

use crate::rng::SkyRng;

/// Horizontal spawn spread: x is drawn from ±half of this.
const SPAWN_SPREAD_X: f32 = 40.0;
/// Spawn height above the visible frustum.
const SPAWN_BASE_Y: f32 = 10.0;
/// Random extra spawn height.
const SPAWN_EXTRA_Y: f32 = 5.0;
/// Nearest spawn depth.
const SPAWN_BASE_Z: f32 = -5.0;
/// Random extra spawn depth (pushed further back).
const SPAWN_EXTRA_Z: f32 = 10.0;
/// Horizontal speed magnitude in units per second.
const SPEED_X: f32 = 12.0;
/// Vertical (falling) speed in units per second.
const SPEED_Y: f32 = -15.0;
/// Life lost per second: base.
const FADE_RATE_BASE: f32 = 0.9;
/// Life lost per second: random extra.
const FADE_RATE_EXTRA: f32 = 1.2;
/// The tail moves at this fraction of the head's displacement.
const TAIL_DRAG: f32 = 0.8;
/// Peak rendered opacity.
const MAX_OPACITY: f32 = 0.8;
/// Per-step lerp factor for the fade-in phase.
const RISE_LERP: f32 = 0.1;
/// Fraction of meteors drawn from the warm palette.
const WARM_RATIO: f64 = 0.15;
/// Warm streak color.
const WARM_COLOR: [f32; 3] = [1.0, 0.8, 0.667];
/// Pale blue-white streak color.
const PALE_COLOR: [f32; 3] = [0.8, 0.867, 0.933];

/// A single meteor streak.
#[derive(Clone, Debug)]
pub struct Meteor {
    /// Leading endpoint of the streak.
    pub head: Vec3,
    /// Trailing endpoint; lags the head to stretch the streak.
    pub tail: Vec3,
    /// Velocity of the head in units per second.
    pub velocity: Vec3,
    /// Remaining life in [0, 1]; strictly decreasing.
    pub life: f32,
    /// Life lost per second.
    pub fade_rate: f32,
    /// Current rendered opacity.
    pub opacity: f32,
    /// Linear RGB streak color.
    pub color: [f32; 3],
}

impl Meteor {
    /// Spawn a meteor at a randomized off-screen origin, invisible, with
    /// full life and a random left- or right-leaning fall direction.
    pub fn spawn(rng: &mut SkyRng) -> Self {
        let start = Vec3::new(
            (rng.random::<f32>() - 0.5) * SPAWN_SPREAD_X,
            SPAWN_BASE_Y + rng.random::<f32>() * SPAWN_EXTRA_Y,
            SPAWN_BASE_Z - rng.random::<f32>() * SPAWN_EXTRA_Z,
        );
        // Tail starts nearly coincident; the drag differential stretches it.
        let tail = start + Vec3::new(0.5, 0.5, 0.0);

        let dir_x = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let velocity = Vec3::new(dir_x * SPEED_X, SPEED_Y, 0.0);
        let fade_rate = FADE_RATE_BASE + rng.random::<f32>() * FADE_RATE_EXTRA;
        let color = if rng.random_bool(WARM_RATIO) {
            WARM_COLOR
        } else {
            PALE_COLOR
        };

        Self {
            head: start,
            tail,
            velocity,
            life: 1.0,
            fade_rate,
            opacity: 0.0,
            color,
        }
    }

    /// Advance by `dt` seconds. Returns whether the meteor is still alive;
    /// the caller must drop it the frame this returns `false`.
    pub fn update(&mut self, dt: f32) -> bool {
        self.life -= self.fade_rate * dt;

        let step = self.velocity * dt;
        self.head += step;
        self.tail += step * TAIL_DRAG;

        if self.life > 0.5 {
            // Fade-in: fast asymptotic approach to peak opacity.
            self.opacity += (MAX_OPACITY - self.opacity) * RISE_LERP;
        } else {
            // Fade-out: linear to zero exactly as life reaches zero.
            self.opacity = (self.life * 2.0 * MAX_OPACITY).max(0.0);
        }

        self.life > 0.0
    }
}

/// Owns active meteors and the randomized spawn schedule.
pub struct MeteorShower {
    active: Vec<Meteor>,
    next_spawn: f32,
    min_gap: f32,
    max_gap: f32,
    cap: usize,
    rng: SkyRng,
}

impl MeteorShower {
    /// Create a shower with device-class gap bounds and concurrency cap.
    pub fn new(min_gap: f32, max_gap: f32, cap: usize, mut rng: SkyRng) -> Self {
        let next_spawn = rng.random_range(min_gap..=max_gap);
        Self {
            active: Vec::with_capacity(cap),
            next_spawn,
            min_gap,
            max_gap,
            cap,
            rng,
        }
    }

    /// Advance the shower. `now` is scene-elapsed seconds, `dt` the frame
    /// delta. When `spawning` is false (reduced motion) the spawn check is
    /// skipped entirely; existing meteors still play out.
    pub fn advance(&mut self, now: f32, dt: f32, spawning: bool) {
        if spawning && now >= self.next_spawn && self.active.len() < self.cap {
            self.active.push(Meteor::spawn(&mut self.rng));
            self.next_spawn = now + self.rng.random_range(self.min_gap..=self.max_gap);
        }

        // Dead meteors leave the list this frame and are never touched again.
        self.active.retain_mut(|meteor| meteor.update(dt));
    }

    /// Currently active meteors.
    pub fn active(&self) -> &[Meteor] {
        &self.active
    }

    /// Number of active meteors.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no meteors are active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drop all active meteors (scene teardown).
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

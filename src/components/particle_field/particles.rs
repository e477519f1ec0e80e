//! The particle pool and its per-frame force/integration step.

use std::f64::consts::TAU;

use super::ripples::Ripple;
use super::state::Target;

/// Number of particles in the pool. The pool is recreated wholesale on
/// resize; individual particles are never destroyed.
pub const PARTICLE_COUNT: usize = 90;

/// Initial velocity spread.
const BASE_SPEED: f64 = 0.22;

/// Particles may drift this far past the surface before wrapping.
const WRAP_MARGIN: f64 = 40.0;

/// One moving point of the field.
///
/// `depth` in `[0, 1]` fakes distance: deeper (closer) particles are larger,
/// orbit wider and faster, snap to their orbit harder, and sit under
/// stronger damping.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	/// Phase seed desynchronizing oscillations across the pool.
	pub seed: f64,
	/// Swirl amplitude added to the orbit angle.
	pub swirl: f64,
	/// Oscillation speed of the swirl offset.
	pub osc_speed: f64,
	pub depth: f64,
	pub orbit_radius: f64,
	pub orbit_speed: f64,
	pub angle: f64,
	/// Ambient jitter magnitude; fades out with depth.
	pub jitter: f64,
}

/// Build a fresh pool with randomized positions and kinematics.
pub fn create_particles(
	width: f64,
	height: f64,
	rng: &mut dyn FnMut() -> f64,
) -> Vec<Particle> {
	let mut particles = Vec::with_capacity(PARTICLE_COUNT);
	for _ in 0..PARTICLE_COUNT {
		let depth = rng();
		let orbit_radius = (rng() * 160.0 + 40.0) * (0.4 + depth * 0.9);
		particles.push(Particle {
			x: rng() * width,
			y: rng() * height,
			vx: (rng() - 0.5) * BASE_SPEED,
			vy: (rng() - 0.5) * BASE_SPEED,
			radius: (depth * 2.4 + 0.5).max(0.35),
			seed: rng() * TAU,
			swirl: rng() * 0.6 + 0.2,
			osc_speed: rng() * 0.002 + 0.0005,
			depth,
			orbit_radius,
			orbit_speed: (rng() * 0.02 + 0.004) * (0.6 + depth * 0.9),
			angle: rng() * TAU,
			jitter: (0.08 + rng() * 0.08) * (1.0 - depth),
		});
	}
	particles
}

impl Particle {
	/// Advance this particle by one frame.
	///
	/// Order matters: orbit attraction and jitter accumulate into velocity,
	/// then ripple impulses, then damping, then integration and the toroidal
	/// wrap. Ripples must already be aged for this frame.
	pub fn step(
		&mut self,
		target: &Target,
		ripples: &[Ripple],
		tick: u64,
		width: f64,
		height: f64,
	) {
		let t = tick as f64;

		self.angle += self.orbit_speed;
		let swirl_offset = (t * self.osc_speed + self.seed).sin() * self.swirl;
		let orbit_x = target.x + (self.angle + swirl_offset).cos() * self.orbit_radius;
		let orbit_y = target.y + (self.angle + swirl_offset).sin() * self.orbit_radius;

		// Deeper particles snap to their orbit faster.
		let pull = 0.012 + self.depth * 0.03;
		self.vx += (orbit_x - self.x) * pull;
		self.vy += (orbit_y - self.y) * pull;

		self.vx += (self.seed + t * 0.0024).cos() * self.jitter;
		self.vy += (self.seed + t * 0.0021).sin() * self.jitter;

		for ripple in ripples {
			let dx = self.x - ripple.x;
			let dy = self.y - ripple.y;
			let mut dist = dx.hypot(dy);
			if dist == 0.0 {
				dist = 1.0;
			}
			let influence = (1.0 - dist / ripple.radius).max(0.0);
			if influence > 0.0 {
				let magnitude = influence * ripple.strength * (0.6 + self.depth * 0.9);
				self.vx += dx / dist * magnitude;
				self.vy += dy / dist * magnitude;
			}
		}

		// Depth-of-field: damping varies with depth.
		let damping = 0.89 - self.depth * 0.05;
		self.vx *= damping;
		self.vy *= damping;
		self.x += self.vx;
		self.y += self.vy;

		if self.x < -WRAP_MARGIN || self.x > width + WRAP_MARGIN {
			self.x = (self.x + width) % width;
		}
		if self.y < -WRAP_MARGIN || self.y > height + WRAP_MARGIN {
			self.y = (self.y + height) % height;
		}
	}
}

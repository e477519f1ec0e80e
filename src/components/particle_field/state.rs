//! Simulation state for the particle field.
//!
//! [`FieldState`] owns the particle pool, the ripple queue, and the
//! attraction target for the lifetime of one mount. The frame loop is its
//! only mutator; event handlers reach in solely through the pointer entry
//! points, which record intent consumed by the next [`FieldState::advance`].

use super::particles::{self, Particle};
use super::ripples::RippleQueue;

/// The point all particles orbit.
///
/// Eases toward the live pointer while one is active, otherwise toward a
/// slow autonomous path around the surface center.
#[derive(Clone, Copy, Debug, Default)]
pub struct Target {
	pub x: f64,
	pub y: f64,
}

/// Easing coefficient while tracking the pointer.
const POINTER_EASE: f64 = 0.18;

/// Easing coefficient on the ambient path; deliberately sluggish.
const AMBIENT_EASE: f64 = 0.05;

/// While ambient, a weak ripple fires every this many ticks.
const AMBIENT_PULSE_INTERVAL: u64 = 220;

/// Strength of the ambient keep-alive ripple.
const AMBIENT_PULSE_STRENGTH: f64 = 0.6;

/// Strength of the ripple spawned by a pointer press.
const PRESS_STRENGTH: f64 = 1.1;

/// Everything the frame loop mutates, in one place.
pub struct FieldState {
	pub particles: Vec<Particle>,
	pub ripples: RippleQueue,
	pub target: Target,
	pub width: f64,
	pub height: f64,
	pub tick: u64,
	pointer: Target,
	pointer_active: bool,
	reduced_motion: bool,
}

impl FieldState {
	/// Build the state for a surface of the given CSS size.
	pub fn new(
		width: f64,
		height: f64,
		reduced_motion: bool,
		rng: &mut dyn FnMut() -> f64,
	) -> Self {
		Self {
			particles: particles::create_particles(width, height, rng),
			ripples: RippleQueue::default(),
			target: Target {
				x: width / 2.0,
				y: height / 2.0,
			},
			width,
			height,
			tick: 0,
			pointer: Target::default(),
			pointer_active: false,
			reduced_motion,
		}
	}

	/// Adopt a new surface size: regenerate the pool and recenter the target.
	pub fn resize(&mut self, width: f64, height: f64, rng: &mut dyn FnMut() -> f64) {
		self.width = width;
		self.height = height;
		self.particles = particles::create_particles(width, height, rng);
		self.target = Target {
			x: width / 2.0,
			y: height / 2.0,
		};
	}

	/// Record the pointer position as the current easing goal.
	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		self.pointer = Target { x, y };
		self.pointer_active = true;
	}

	/// Revert to ambient target motion.
	pub fn pointer_left(&mut self) {
		self.pointer_active = false;
	}

	/// Spawn the strong press ripple at the given position.
	pub fn pointer_pressed(&mut self, x: f64, y: f64, rng: &mut dyn FnMut() -> f64) {
		self.ripples.spawn(x, y, PRESS_STRENGTH, rng);
	}

	/// Advance the simulation by one frame.
	///
	/// Eases the target, fires the ambient pulse when due, ages ripples, and
	/// only then lets particles consume the ripple forces: aging strictly
	/// precedes consumption within a frame.
	pub fn advance(&mut self, rng: &mut dyn FnMut() -> f64) {
		self.tick += 1;
		let t = self.tick as f64;

		let (base_x, base_y) = if self.pointer_active {
			(self.pointer.x, self.pointer.y)
		} else {
			(
				self.width / 2.0 + (t * 0.0032).cos() * self.width * 0.16,
				self.height / 2.0 + (t * 0.0026).sin() * self.height * 0.22,
			)
		};
		let ease = if self.pointer_active {
			POINTER_EASE
		} else {
			AMBIENT_EASE
		};
		self.target.x += (base_x - self.target.x) * ease;
		self.target.y += (base_y - self.target.y) * ease;

		if !self.pointer_active
			&& !self.reduced_motion
			&& self.tick % AMBIENT_PULSE_INTERVAL == 0
		{
			let pulse_x = self.target.x + (t * 0.025).cos() * self.width * 0.08;
			let pulse_y = self.target.y + (t * 0.02).sin() * self.height * 0.06;
			self.ripples.spawn(pulse_x, pulse_y, AMBIENT_PULSE_STRENGTH, rng);
		}

		self.ripples.advance();

		for particle in &mut self.particles {
			particle.step(
				&self.target,
				self.ripples.active(),
				self.tick,
				self.width,
				self.height,
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hash_rng() -> impl FnMut() -> f64 {
		let mut n: f64 = 0.0;
		move || {
			n += 1.0;
			let x = (n * 12.9898 + n * 78.233).sin() * 43758.5453;
			x - x.floor()
		}
	}

	#[test]
	fn ambient_target_stays_inside_the_path_envelope() {
		let mut rng = hash_rng();
		let mut state = FieldState::new(800.0, 600.0, false, &mut rng);
		for _ in 0..1000 {
			state.advance(&mut rng);
			assert!(
				(state.target.x - 400.0).abs() <= 800.0 * 0.16 + 1e-6,
				"target drifted outside the ambient ellipse on x"
			);
			assert!(
				(state.target.y - 300.0).abs() <= 600.0 * 0.22 + 1e-6,
				"target drifted outside the ambient ellipse on y"
			);
		}
	}

	#[test]
	fn ambient_pulse_fires_on_schedule() {
		let mut rng = hash_rng();
		let mut state = FieldState::new(800.0, 600.0, false, &mut rng);
		for _ in 0..219 {
			state.advance(&mut rng);
		}
		assert!(state.ripples.is_empty());
		state.advance(&mut rng);
		assert_eq!(state.tick, 220);
		assert_eq!(state.ripples.active().len(), 1);
	}

	#[test]
	fn ambient_pulse_is_suppressed_by_pointer_and_reduced_motion() {
		let mut rng = hash_rng();
		let mut state = FieldState::new(800.0, 600.0, false, &mut rng);
		state.pointer_moved(100.0, 100.0);
		for _ in 0..440 {
			state.advance(&mut rng);
		}
		assert!(state.ripples.is_empty());

		let mut reduced = FieldState::new(800.0, 600.0, true, &mut rng);
		for _ in 0..440 {
			reduced.advance(&mut rng);
		}
		assert!(reduced.ripples.is_empty());
	}

	#[test]
	fn pointer_easing_outpaces_ambient_easing() {
		let mut rng = hash_rng();
		let mut tracking = FieldState::new(800.0, 600.0, false, &mut rng);
		tracking.pointer_moved(100.0, 100.0);
		tracking.advance(&mut rng);
		// One step at 0.18 toward (100, 100) from the center.
		assert!((tracking.target.x - (400.0 - 300.0 * 0.18)).abs() < 1e-9);

		let mut ambient = FieldState::new(800.0, 600.0, false, &mut rng);
		ambient.advance(&mut rng);
		let ambient_step = (ambient.target.x - 400.0).abs();
		let tracking_step = (tracking.target.x - 400.0).abs();
		assert!(tracking_step > ambient_step);
	}

	#[test]
	fn pointer_leave_reverts_to_ambient_motion() {
		let mut rng = hash_rng();
		let mut state = FieldState::new(800.0, 600.0, false, &mut rng);
		state.pointer_moved(0.0, 0.0);
		assert!(state.pointer_active);
		state.pointer_left();
		assert!(!state.pointer_active);
		for _ in 0..500 {
			state.advance(&mut rng);
		}
		// Back on the ambient path envelope.
		assert!((state.target.x - 400.0).abs() <= 800.0 * 0.16 + 1e-6);
	}

	#[test]
	fn press_spawns_the_strong_ripple() {
		let mut rng = hash_rng();
		let mut state = FieldState::new(800.0, 600.0, false, &mut rng);
		state.pointer_pressed(100.0, 100.0, &mut rng);
		let ripple = &state.ripples.active()[0];
		assert_eq!(ripple.radius, 18.0);
		assert!((ripple.strength - 1.1).abs() < 1e-9);
		assert_eq!((ripple.x, ripple.y), (100.0, 100.0));
	}

	#[test]
	fn resize_regenerates_the_pool_and_recenters_the_target() {
		let mut rng = hash_rng();
		let mut state = FieldState::new(800.0, 600.0, false, &mut rng);
		for _ in 0..50 {
			state.advance(&mut rng);
		}
		state.resize(400.0, 300.0, &mut rng);
		assert_eq!(state.particles.len(), particles::PARTICLE_COUNT);
		for particle in &state.particles {
			assert!(particle.x >= 0.0 && particle.x <= 400.0);
			assert!(particle.y >= 0.0 && particle.y <= 300.0);
		}
		assert_eq!((state.target.x, state.target.y), (200.0, 150.0));
	}

	#[test]
	fn fresh_state_is_centered_idle_and_quiet() {
		let mut rng = hash_rng();
		let state = FieldState::new(800.0, 600.0, true, &mut rng);
		assert_eq!(state.tick, 0);
		assert!(!state.pointer_active);
		assert!(state.ripples.is_empty());
		assert_eq!(state.particles.len(), particles::PARTICLE_COUNT);
		assert_eq!((state.target.x, state.target.y), (400.0, 300.0));
	}
}

//! Expanding shockwaves spawned by pointer presses and ambient pulses.

/// A transient circular disturbance.
///
/// Grows and fades every frame until its alpha drops below the removal
/// threshold. While alive it pushes nearby particles radially outward.
#[derive(Clone, Debug)]
pub struct Ripple {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub strength: f64,
	pub alpha: f64,
	pub decay: f64,
	pub speed: f64,
}

/// Requested strength is clamped into this range at spawn.
pub const MIN_STRENGTH: f64 = 0.3;
pub const MAX_STRENGTH: f64 = 1.5;

/// Live ripples beyond this count evict the oldest at spawn.
const MAX_RIPPLES: usize = 8;

/// Starting radius of every ripple.
const SPAWN_RADIUS: f64 = 18.0;

/// Expansion speed multiplier per frame.
const DECELERATION: f64 = 0.98;

/// Ripples below this alpha are removed.
const MIN_ALPHA: f64 = 0.02;

/// Bounded, ordered collection of active ripples.
///
/// Owned by the frame loop; event handlers only reach it through
/// [`RippleQueue::spawn`].
#[derive(Debug, Default)]
pub struct RippleQueue {
	ripples: Vec<Ripple>,
}

impl RippleQueue {
	/// Add a ripple at the given origin, evicting the oldest entry first if
	/// the queue is full.
	///
	/// Strength is clamped into `[0.3, 1.5]`. Stronger ripples start more
	/// opaque and fade slightly faster. The expansion speed carries a random
	/// component so overlapping ripples desynchronize.
	pub fn spawn(&mut self, x: f64, y: f64, strength: f64, rng: &mut dyn FnMut() -> f64) {
		let strength = strength.clamp(MIN_STRENGTH, MAX_STRENGTH);
		if self.ripples.len() >= MAX_RIPPLES {
			self.ripples.remove(0);
		}
		self.ripples.push(Ripple {
			x,
			y,
			radius: SPAWN_RADIUS,
			strength,
			alpha: (0.42 + strength * 0.28).min(0.65),
			decay: 0.94 - (strength * 0.08).min(0.25),
			speed: 18.0 + rng() * 14.0,
		});
	}

	/// Age every ripple by one frame and drop the ones that have faded out.
	pub fn advance(&mut self) {
		for ripple in &mut self.ripples {
			ripple.radius += ripple.speed;
			ripple.speed *= DECELERATION;
			ripple.strength *= ripple.decay;
			ripple.alpha *= ripple.decay;
		}
		self.ripples.retain(|ripple| ripple.alpha >= MIN_ALPHA);
	}

	/// Currently live ripples, oldest first.
	pub fn active(&self) -> &[Ripple] {
		&self.ripples
	}

	pub fn is_empty(&self) -> bool {
		self.ripples.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fixed_rng() -> impl FnMut() -> f64 {
		|| 0.5
	}

	#[test]
	fn strength_is_clamped_at_spawn() {
		let mut queue = RippleQueue::default();
		let mut rng = fixed_rng();
		queue.spawn(0.0, 0.0, 5.0, &mut rng);
		queue.spawn(0.0, 0.0, -1.0, &mut rng);
		queue.spawn(0.0, 0.0, 1.0, &mut rng);
		let strengths: Vec<f64> = queue.active().iter().map(|r| r.strength).collect();
		assert_eq!(strengths, vec![1.5, 0.3, 1.0]);
	}

	#[test]
	fn spawn_derives_alpha_and_decay_from_strength() {
		let mut queue = RippleQueue::default();
		let mut rng = fixed_rng();
		queue.spawn(0.0, 0.0, 0.6, &mut rng);
		queue.spawn(0.0, 0.0, 1.5, &mut rng);
		let weak = &queue.active()[0];
		let strong = &queue.active()[1];
		assert!(strong.alpha > weak.alpha);
		assert!(strong.decay < weak.decay);
		// Strong ripples saturate the alpha cap.
		assert!((strong.alpha - 0.65).abs() < 1e-9);
		assert_eq!(weak.radius, 18.0);
	}

	#[test]
	fn queue_is_bounded_and_evicts_oldest() {
		let mut queue = RippleQueue::default();
		let mut rng = fixed_rng();
		for i in 0..8 {
			queue.spawn(i as f64, 0.0, 1.0, &mut rng);
		}
		assert_eq!(queue.active().len(), 8);

		// The ninth spawn evicts the oldest before appending.
		queue.spawn(100.0, 0.0, 1.0, &mut rng);
		assert_eq!(queue.active().len(), 8);
		assert_eq!(queue.active()[0].x, 1.0);
		assert_eq!(queue.active()[7].x, 100.0);
	}

	#[test]
	fn alpha_decreases_until_removal_threshold() {
		let mut queue = RippleQueue::default();
		let mut rng = fixed_rng();
		queue.spawn(0.0, 0.0, 1.0, &mut rng);
		let mut previous = queue.active()[0].alpha;
		let mut steps = 0;
		while !queue.is_empty() {
			let expected = previous * queue.active()[0].decay;
			queue.advance();
			if let Some(ripple) = queue.active().first() {
				assert!(ripple.alpha < previous);
				assert!(ripple.alpha >= MIN_ALPHA);
				previous = ripple.alpha;
			} else {
				// Removed exactly when the next decay step crossed the floor.
				assert!(expected < MIN_ALPHA);
			}
			steps += 1;
			assert!(steps < 200, "ripple never faded out");
		}
	}

	#[test]
	fn pointer_press_ripple_survives_a_plausible_lifetime() {
		let mut queue = RippleQueue::default();
		let mut rng = fixed_rng();
		queue.spawn(100.0, 100.0, 1.1, &mut rng);
		assert_eq!(queue.active()[0].radius, 18.0);
		assert!((queue.active()[0].strength - 1.1).abs() < 1e-9);

		for _ in 0..3 {
			queue.advance();
		}
		assert!(!queue.is_empty(), "ripple died too quickly");

		for _ in 3..60 {
			queue.advance();
		}
		assert!(queue.is_empty(), "ripple outlived its decay window");
	}

	#[test]
	fn radius_grows_while_expansion_decelerates() {
		let mut queue = RippleQueue::default();
		let mut rng = fixed_rng();
		queue.spawn(0.0, 0.0, 1.0, &mut rng);
		let speed_before = queue.active()[0].speed;
		queue.advance();
		let ripple = &queue.active()[0];
		assert_eq!(ripple.radius, 18.0 + speed_before);
		assert!(ripple.speed < speed_before);
	}
}

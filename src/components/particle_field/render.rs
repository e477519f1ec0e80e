//! Canvas rendering for the particle field.
//!
//! One frame is three passes over an already-advanced simulation:
//! 1. Trail fade: a low-alpha theme-tinted fill over the whole backing
//!    store instead of a hard clear, painted in untransformed pixel space.
//! 2. Particles and links under an additive composite with a soft glow.
//! 3. Ripple outlines.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::FieldState;
use super::theme::{Color, PrimaryColor};

/// Blur radius of the particle glow.
const GLOW_BLUR: f64 = 14.0;

/// Stroke width of ripple outlines.
const RIPPLE_LINE_WIDTH: f64 = 1.2;

/// Render the complete field to the canvas.
///
/// `device_width`/`device_height` are the backing-store pixel dimensions;
/// everything else draws in CSS units under the device-pixel-ratio
/// transform.
pub fn render(
	state: &FieldState,
	ctx: &CanvasRenderingContext2d,
	primary: &PrimaryColor,
	fade: Color,
	device_width: f64,
	device_height: f64,
) {
	draw_trail_fade(ctx, fade, device_width, device_height);
	draw_particles(state, ctx, primary);
	draw_ripples(state, ctx, primary);
}

/// Fade the previous frame instead of clearing it.
///
/// The fill covers the raw backing store, so the transform is reset to
/// identity for the duration of the fill and restored afterward.
fn draw_trail_fade(ctx: &CanvasRenderingContext2d, fade: Color, width: f64, height: f64) {
	ctx.save();
	let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
	ctx.set_global_alpha(1.0);
	ctx.set_fill_style_str(&fade.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.restore();
}

fn draw_particles(state: &FieldState, ctx: &CanvasRenderingContext2d, primary: &PrimaryColor) {
	ctx.save();
	let _ = ctx.set_global_composite_operation("lighter");
	ctx.set_shadow_color(primary.fill());
	ctx.set_shadow_blur(GLOW_BLUR);

	for (index, particle) in state.particles.iter().enumerate() {
		let alpha = 0.22 + particle.depth * 0.45;
		ctx.set_fill_style_str(&primary.at_alpha(alpha).to_css());
		ctx.begin_path();
		let _ = ctx.arc(particle.x, particle.y, particle.radius, 0.0, PI * 2.0);
		ctx.fill();

		// Pairwise links against later particles only, so no pair is
		// drawn twice.
		for neighbour in &state.particles[index + 1..] {
			let dx = particle.x - neighbour.x;
			let dy = particle.y - neighbour.y;
			let dist = dx.hypot(dy);
			let depth_mix = (particle.depth + neighbour.depth) / 2.0;
			let max_distance = 120.0 + depth_mix * 120.0;
			if dist < max_distance {
				let link_alpha =
					(0.18 + depth_mix * 0.25 - dist / (max_distance * 1.3)).max(0.0);
				if link_alpha > 0.01 {
					ctx.begin_path();
					ctx.set_stroke_style_str(&primary.at_alpha(link_alpha).to_css());
					ctx.set_line_width(link_alpha * (1.4 + depth_mix * 2.4));
					ctx.move_to(particle.x, particle.y);
					ctx.line_to(neighbour.x, neighbour.y);
					ctx.stroke();
				}
			}
		}
	}

	ctx.restore();
}

fn draw_ripples(state: &FieldState, ctx: &CanvasRenderingContext2d, primary: &PrimaryColor) {
	if state.ripples.is_empty() {
		return;
	}

	ctx.save();
	ctx.set_line_width(RIPPLE_LINE_WIDTH);
	let stroke = primary.at_alpha(0.6).to_css();
	for ripple in state.ripples.active() {
		if ripple.alpha <= 0.0 {
			continue;
		}
		ctx.set_global_alpha(ripple.alpha);
		ctx.set_stroke_style_str(&stroke);
		ctx.begin_path();
		let _ = ctx.arc(ripple.x, ripple.y, ripple.radius, 0.0, PI * 2.0);
		ctx.stroke();
	}
	ctx.restore();
}

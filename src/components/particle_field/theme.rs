//! Theme definitions and color resolution for the particle field.
//!
//! The page exposes its palette through CSS custom properties and a
//! `data-theme` attribute on the document root. This module owns the pure
//! side of that contract: the known theme identities, the per-theme trail
//! fade colors, and the cached primary-color triple parsed from the
//! `--color-primary` custom property.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Identity of a page theme, as supplied by the theme authority.
///
/// Only `id` participates in behavior; `label` and `description` exist for
/// host pages that render a theme switcher around this component.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ThemeInfo {
	/// Stable identifier, mirrored onto the document root as `data-theme`.
	pub id: String,
	/// Human-readable name.
	#[serde(default)]
	pub label: String,
	/// One-line description.
	#[serde(default)]
	pub description: String,
}

impl ThemeInfo {
	/// Default vibrant night mode.
	pub fn dark_neon() -> Self {
		Self {
			id: "dark-neon".into(),
			label: "Dark Neon".into(),
			description: "Default vibrant night mode".into(),
		}
	}

	/// Retro phosphor glow.
	pub fn terminal_green() -> Self {
		Self {
			id: "terminal-green".into(),
			label: "Terminal".into(),
			description: "Retro phosphor glow".into(),
		}
	}

	/// Soft daylight palette.
	pub fn solar_light() -> Self {
		Self {
			id: "solar-light".into(),
			label: "Solar".into(),
			description: "Soft daylight palette".into(),
		}
	}

	/// All built-in themes, default first.
	pub fn all() -> Vec<ThemeInfo> {
		vec![
			Self::dark_neon(),
			Self::terminal_green(),
			Self::solar_light(),
		]
	}

	/// Look up a built-in theme by id.
	pub fn from_id(id: &str) -> Option<ThemeInfo> {
		Self::all().into_iter().find(|theme| theme.id == id)
	}
}

impl Default for ThemeInfo {
	fn default() -> Self {
		Self::dark_neon()
	}
}

/// Trail-fade color for a theme id.
///
/// The fade is the low-alpha rectangle painted over the previous frame in
/// place of a hard clear; its tint must match the page background or the
/// trails discolor. Unknown ids fall back to the `dark-neon` entry.
pub fn fade_color(theme_id: &str) -> Color {
	match theme_id {
		"terminal-green" => Color::rgba(3, 15, 8, 0.24),
		"solar-light" => Color::rgba(255, 255, 255, 0.16),
		// "dark-neon" and anything unmapped
		_ => Color::rgba(4, 7, 17, 0.22),
	}
}

/// Alpha of the translucent glow fill derived from the primary color.
const GLOW_FILL_ALPHA: f64 = 0.38;

/// Cached primary color, refreshed on theme changes.
///
/// Holds the last successfully parsed `--color-primary` triple plus a
/// precomputed translucent fill string so the render step never formats
/// colors per frame. A failed parse keeps the previous value; the neutral
/// default applies only before the first successful refresh.
#[derive(Clone, Debug)]
pub struct PrimaryColor {
	channels: [u8; 3],
	fill: String,
}

impl PrimaryColor {
	/// Red/green/blue channels of the cached color.
	pub fn channels(&self) -> [u8; 3] {
		self.channels
	}

	/// Translucent fill string, used as the particle glow shadow color.
	pub fn fill(&self) -> &str {
		&self.fill
	}

	/// The cached color at the given alpha.
	pub fn at_alpha(&self, alpha: f64) -> Color {
		let [r, g, b] = self.channels;
		Color::rgba(r, g, b, alpha)
	}

	/// Replace the cache from a raw custom-property value.
	///
	/// The expected format is three whitespace-separated numeric channels,
	/// e.g. `"94 234 212"`. Returns `false` (retaining the previous cache)
	/// unless all three parse as finite numbers. Trailing tokens beyond the
	/// first three are ignored.
	pub fn update(&mut self, raw: &str) -> bool {
		let Some(channels) = parse_channels(raw) else {
			return false;
		};
		let [r, g, b] = channels;
		self.channels = channels;
		self.fill = Color::rgba(r, g, b, GLOW_FILL_ALPHA).to_css();
		true
	}
}

impl Default for PrimaryColor {
	fn default() -> Self {
		Self {
			channels: [255, 255, 255],
			fill: "rgba(255, 255, 255, 0.35)".into(),
		}
	}
}

/// Parse the first three whitespace-separated channels of a custom-property
/// value. `None` if fewer than three tokens are present or any fails to
/// parse as a finite number.
fn parse_channels(raw: &str) -> Option<[u8; 3]> {
	let mut tokens = raw.split_whitespace();
	let mut channels = [0u8; 3];
	for channel in &mut channels {
		let value: f64 = tokens.next()?.parse().ok()?;
		if !value.is_finite() {
			return None;
		}
		*channel = value as u8;
	}
	Some(channels)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_numeric_triple() {
		let mut color = PrimaryColor::default();
		assert!(color.update("18 18 18"));
		assert_eq!(color.channels(), [18, 18, 18]);
		assert_eq!(color.fill(), "rgba(18, 18, 18, 0.38)");
	}

	#[test]
	fn malformed_value_retains_previous_cache() {
		let mut color = PrimaryColor::default();
		assert!(color.update("18 18 18"));
		assert!(!color.update("var(--oops)"));
		assert!(!color.update(""));
		assert!(!color.update("12 34"));
		assert!(!color.update("1e999 0 0"));
		assert_eq!(color.channels(), [18, 18, 18]);
	}

	#[test]
	fn default_is_neutral_until_first_refresh() {
		let color = PrimaryColor::default();
		assert_eq!(color.channels(), [255, 255, 255]);
		assert_eq!(color.fill(), "rgba(255, 255, 255, 0.35)");
	}

	#[test]
	fn trailing_tokens_are_ignored() {
		let mut color = PrimaryColor::default();
		assert!(color.update("  94 234 212 !important "));
		assert_eq!(color.channels(), [94, 234, 212]);
	}

	#[test]
	fn unknown_theme_falls_back_to_dark_fade() {
		assert_eq!(fade_color("no-such-theme"), fade_color("dark-neon"));
		assert_ne!(fade_color("solar-light"), fade_color("dark-neon"));
	}

	#[test]
	fn theme_lookup_round_trips() {
		for theme in ThemeInfo::all() {
			assert_eq!(ThemeInfo::from_id(&theme.id), Some(theme));
		}
		assert_eq!(ThemeInfo::from_id("plasma"), None);
	}
}

//! Pan/zoom state and screen ⇄ canvas coordinate conversion.
//!
//! Nodes live in a large virtual canvas; the viewport maps it onto the
//! visible container with a translate-then-scale affine transform.

/// Fixed zoom ceiling.
pub const MAX_SCALE: f64 = 2.0;

/// Used until the first `setup` computes the real fit-to-view floor.
const FALLBACK_MIN_SCALE: f64 = 0.1;

/// The virtual canvas is this multiple of the larger viewport dimension,
/// which leaves generous pan room in every direction.
pub const CANVAS_VIEWPORT_FACTOR: f64 = 5.0;

/// Exponent applied per wheel tick: `scale * exp(±0.1)`.
pub const WHEEL_ZOOM_EXPONENT: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pub scale: f64,
	pub pan_x: f64,
	pub pan_y: f64,
	pub min_scale: f64,
	/// Side length of the square virtual canvas.
	pub canvas_size: f64,
	pub view_width: f64,
	pub view_height: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			scale: 1.0,
			pan_x: 0.0,
			pan_y: 0.0,
			min_scale: FALLBACK_MIN_SCALE,
			canvas_size: 0.0,
			view_width: 0.0,
			view_height: 0.0,
		}
	}
}

impl Viewport {
	/// Re-provisions the virtual canvas for a (possibly resized) container.
	///
	/// `min_scale` is chosen so the whole canvas can always be zoomed out to
	/// fit inside the view. Resets zoom and centers the canvas.
	pub fn setup(&mut self, view_width: f64, view_height: f64) {
		self.view_width = view_width;
		self.view_height = view_height;
		self.canvas_size = view_width.max(view_height) * CANVAS_VIEWPORT_FACTOR;
		self.min_scale = if self.canvas_size > 0.0 {
			(view_width / self.canvas_size).min(view_height / self.canvas_size)
		} else {
			FALLBACK_MIN_SCALE
		};
		self.reset();
	}

	/// Scale back to 1.0 with the canvas centered in the view.
	pub fn reset(&mut self) {
		self.scale = 1.0;
		self.pan_x = (self.view_width - self.canvas_size) / 2.0;
		self.pan_y = (self.view_height - self.canvas_size) / 2.0;
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.pan_x += dx;
		self.pan_y += dy;
	}

	/// Zooms by `steps` wheel ticks keeping the canvas point under the
	/// cursor fixed on screen. A result outside `[min_scale, MAX_SCALE]`
	/// makes the whole operation a no-op; returns whether it applied.
	pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, steps: f64) -> bool {
		let next = self.scale * (WHEEL_ZOOM_EXPONENT * steps).exp();
		if next < self.min_scale || next > MAX_SCALE {
			return false;
		}
		let (cx, cy) = self.screen_to_canvas(screen_x, screen_y);
		self.scale = next;
		self.pan_x = screen_x - cx * next;
		self.pan_y = screen_y - cy * next;
		true
	}

	pub fn screen_to_canvas(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.pan_x) / self.scale, (sy - self.pan_y) / self.scale)
	}

	pub fn canvas_to_screen(&self, cx: f64, cy: f64) -> (f64, f64) {
		(cx * self.scale + self.pan_x, cy * self.scale + self.pan_y)
	}

	/// Canvas point currently under the middle of the view.
	pub fn view_center(&self) -> (f64, f64) {
		self.screen_to_canvas(self.view_width / 2.0, self.view_height / 2.0)
	}

	/// CSS transform consumed by the canvas element (translate then scale).
	pub fn transform_css(&self) -> String {
		format!(
			"translate({}px, {}px) scale({})",
			self.pan_x, self.pan_y, self.scale
		)
	}

	pub fn zoom_percent(&self) -> i32 {
		(self.scale * 100.0).round() as i32
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn viewport() -> Viewport {
		let mut v = Viewport::default();
		v.setup(800.0, 600.0);
		v
	}

	#[test]
	fn setup_sizes_canvas_and_min_scale() {
		let v = viewport();
		assert_eq!(v.canvas_size, 4000.0);
		assert!((v.min_scale - 600.0 / 4000.0).abs() < 1e-12);
	}

	#[test]
	fn reset_centers_canvas() {
		let v = viewport();
		assert_eq!(v.scale, 1.0);
		assert_eq!(v.pan_x, (800.0 - 4000.0) / 2.0);
		assert_eq!(v.pan_y, (600.0 - 4000.0) / 2.0);
	}

	#[test]
	fn whole_canvas_fits_at_min_scale() {
		let v = viewport();
		assert!(v.canvas_size * v.min_scale <= v.view_width + 1e-9);
		assert!(v.canvas_size * v.min_scale <= v.view_height + 1e-9);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut v = viewport();
		let (sx, sy) = (123.0, 456.0);
		let before = v.screen_to_canvas(sx, sy);
		assert!(v.zoom_at(sx, sy, 1.0));
		let after = v.canvas_to_screen(before.0, before.1);
		assert!((after.0 - sx).abs() < 1e-9);
		assert!((after.1 - sy).abs() < 1e-9);

		assert!(v.zoom_at(sx, sy, -3.0));
		let after = v.canvas_to_screen(before.0, before.1);
		assert!((after.0 - sx).abs() < 1e-9);
		assert!((after.1 - sy).abs() < 1e-9);
	}

	#[test]
	fn zoom_beyond_bounds_is_a_noop() {
		let mut v = viewport();
		v.scale = MAX_SCALE;
		let before = v.clone();
		assert!(!v.zoom_at(100.0, 100.0, 1.0));
		assert_eq!(v, before);

		v.scale = v.min_scale;
		let before = v.clone();
		assert!(!v.zoom_at(100.0, 100.0, -1.0));
		assert_eq!(v, before);
	}

	#[test]
	fn zoom_factor_is_exponential() {
		let mut v = viewport();
		assert!(v.zoom_at(0.0, 0.0, 1.0));
		assert!((v.scale - WHEEL_ZOOM_EXPONENT.exp()).abs() < 1e-12);
	}

	#[test]
	fn pan_translates_directly() {
		let mut v = viewport();
		let (px, py) = (v.pan_x, v.pan_y);
		v.pan_by(10.0, -5.0);
		assert_eq!((v.pan_x, v.pan_y), (px + 10.0, py - 5.0));
	}

	#[test]
	fn screen_canvas_round_trip() {
		let mut v = viewport();
		v.zoom_at(40.0, 40.0, 2.0);
		v.pan_by(13.0, -7.0);
		let (cx, cy) = v.screen_to_canvas(200.0, 300.0);
		let (sx, sy) = v.canvas_to_screen(cx, cy);
		assert!((sx - 200.0).abs() < 1e-9);
		assert!((sy - 300.0).abs() < 1e-9);
	}
}

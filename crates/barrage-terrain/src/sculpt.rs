//! Monotonic terrain sculpting primitives.
//!
//! `destroy`-family ops only ever lower the surface (increase stored
//! heights); `raise`-family ops only ever lift it. Column indices are
//! clamped to the field, so no call can write out of bounds.

use rand::Rng;

use barrage_core::constants::{MIN_SURFACE_Y, WORLD_BOTTOM_Y};

use crate::heightfield::Heightfield;

impl Heightfield {
    /// Carve a circular crater centered at (`cx`, `cy`) with radius `r`.
    ///
    /// Each column within `r` of `cx` drops to the crater underside
    /// `cy + sqrt(r² − dx²)` if that is below its current surface.
    pub fn destroy(&mut self, cx: f64, cy: f64, r: f64) {
        if r <= 0.0 {
            return;
        }
        let Some((lo, hi)) = self.clamp_span(cx - r, cx + r) else {
            return;
        };
        for col in lo..=hi {
            let dx = col as f64 - cx;
            let crater_bottom = cy + (r * r - dx * dx).max(0.0).sqrt();
            let h = &mut self.heights_mut()[col];
            *h = h.max(crater_bottom).min(WORLD_BOTTOM_Y);
        }
    }

    /// Pile a circular mound centered at (`cx`, `cy`) with radius `r`.
    ///
    /// The mirror of `destroy`: columns rise to the mound top
    /// `cy − sqrt(r² − dx²)`, clamped to the minimum safe surface y.
    pub fn raise(&mut self, cx: f64, cy: f64, r: f64) {
        if r <= 0.0 {
            return;
        }
        let Some((lo, hi)) = self.clamp_span(cx - r, cx + r) else {
            return;
        };
        for col in lo..=hi {
            let dx = col as f64 - cx;
            let mound_top = (cy - (r * r - dx * dx).max(0.0).sqrt()).max(MIN_SURFACE_Y);
            let h = &mut self.heights_mut()[col];
            *h = h.min(mound_top);
        }
    }

    /// Lift an irregular rampart: the silhouette is interpolated between
    /// `points` randomized control offsets instead of a smooth arc.
    pub fn raise_jagged(&mut self, cx: f64, cy: f64, r: f64, points: usize, rng: &mut impl Rng) {
        let targets = jagged_profile(cy, r, points, -1.0, rng);
        self.apply_jagged(cx, r, &targets, true);
    }

    /// Tear an irregular pit, possibly down to `floor_y` (the void line).
    pub fn dig_jagged(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        points: usize,
        floor_y: f64,
        rng: &mut impl Rng,
    ) {
        let mut targets = jagged_profile(cy, r, points, 1.0, rng);
        for t in &mut targets {
            *t = t.min(floor_y);
        }
        self.apply_jagged(cx, r, &targets, false);
    }

    /// Cut a linear trench from (`x0`, `y0`) to (`x1`, `y1`).
    pub fn carve_fissure(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let (x0, y0, x1, y1) = if x0 <= x1 {
            (x0, y0, x1, y1)
        } else {
            (x1, y1, x0, y0)
        };
        let Some((lo, hi)) = self.clamp_span(x0, x1) else {
            return;
        };
        let run = x1 - x0;
        for col in lo..=hi {
            let t = if run < 1e-9 {
                0.0
            } else {
                (col as f64 - x0) / run
            };
            let line_y = y0 + (y1 - y0) * t;
            let h = &mut self.heights_mut()[col];
            *h = h.max(line_y).min(WORLD_BOTTOM_Y);
        }
    }

    /// Slow erosion around `cx`: lowers the surface by up to
    /// `rate * dt` per call, tapering toward the edge of `r`.
    pub fn burn(&mut self, cx: f64, r: f64, rate: f64, dt: f64) {
        if r <= 0.0 || rate <= 0.0 {
            return;
        }
        let Some((lo, hi)) = self.clamp_span(cx - r, cx + r) else {
            return;
        };
        for col in lo..=hi {
            let dx = (col as f64 - cx).abs();
            let taper = 1.0 - dx / r;
            let h = &mut self.heights_mut()[col];
            *h = (*h + rate * dt * taper).min(WORLD_BOTTOM_Y);
        }
    }

    /// Interpolate `targets` across the span and apply monotonically.
    /// `lifting` selects the raise direction (take the min) vs dig (max).
    fn apply_jagged(&mut self, cx: f64, r: f64, targets: &[f64], lifting: bool) {
        if targets.len() < 2 {
            return;
        }
        let Some((lo, hi)) = self.clamp_span(cx - r, cx + r) else {
            return;
        };
        let span = 2.0 * r;
        let segments = (targets.len() - 1) as f64;
        for col in lo..=hi {
            let t = ((col as f64 - (cx - r)) / span).clamp(0.0, 1.0) * segments;
            let i0 = (t.floor() as usize).min(targets.len() - 2);
            let frac = t - i0 as f64;
            let target = targets[i0] * (1.0 - frac) + targets[i0 + 1] * frac;
            let h = &mut self.heights_mut()[col];
            if lifting {
                *h = h.min(target.max(MIN_SURFACE_Y));
            } else {
                *h = h.max(target).min(WORLD_BOTTOM_Y);
            }
        }
    }
}

/// Build `points` randomized control heights around `cy`.
///
/// `sign` is −1.0 for lifting profiles (smaller y) and +1.0 for digging.
/// Ends taper so the silhouette blends into the surrounding surface.
fn jagged_profile(cy: f64, r: f64, points: usize, sign: f64, rng: &mut impl Rng) -> Vec<f64> {
    let points = points.max(3);
    let mut targets = Vec::with_capacity(points);
    for i in 0..points {
        let t = i as f64 / (points - 1) as f64;
        let envelope = (std::f64::consts::PI * t).sin();
        let magnitude = rng.gen_range(0.25..1.0) * r * envelope;
        targets.push(cy + sign * magnitude);
    }
    targets
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use barrage_core::constants::{MIN_SURFACE_Y, WORLD_BOTTOM_Y};

    use crate::heightfield::Heightfield;

    #[test]
    fn test_destroy_never_raises() {
        let mut field = Heightfield::flat(100, 400.0);
        let before = field.heights().to_vec();
        field.destroy(50.0, 400.0, 30.0);
        for (col, (&b, &a)) in before.iter().zip(field.heights()).enumerate() {
            assert!(a >= b, "destroy raised column {col}: {b} -> {a}");
        }
        // The crater is deepest at its center.
        assert!((field.heights()[50] - 430.0).abs() < 1e-9);
        // Columns outside the radius are untouched.
        assert!((field.heights()[10] - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_destroy_clamps_to_world_bottom() {
        let mut field = Heightfield::flat(10, WORLD_BOTTOM_Y - 5.0);
        field.destroy(5.0, WORLD_BOTTOM_Y, 50.0);
        for &h in field.heights() {
            assert!(h <= WORLD_BOTTOM_Y);
        }
    }

    #[test]
    fn test_destroy_out_of_range_is_noop() {
        let mut field = Heightfield::flat(10, 400.0);
        field.destroy(-500.0, 400.0, 30.0);
        field.destroy(5000.0, 400.0, 30.0);
        assert!(field.heights().iter().all(|&h| (h - 400.0).abs() < 1e-9));
    }

    #[test]
    fn test_raise_never_lowers() {
        let mut field = Heightfield::flat(100, 400.0);
        let before = field.heights().to_vec();
        field.raise(50.0, 400.0, 30.0);
        for (col, (&b, &a)) in before.iter().zip(field.heights()).enumerate() {
            assert!(a <= b, "raise lowered column {col}: {b} -> {a}");
        }
        assert!((field.heights()[50] - 370.0).abs() < 1e-9);
    }

    #[test]
    fn test_raise_clamped_to_min_surface() {
        let mut field = Heightfield::flat(100, MIN_SURFACE_Y + 10.0);
        field.raise(50.0, MIN_SURFACE_Y, 80.0);
        for &h in field.heights() {
            assert!(h >= MIN_SURFACE_Y, "column rose past the ceiling: {h}");
        }
    }

    #[test]
    fn test_jagged_ops_stay_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = Heightfield::flat(200, 500.0);
        let before = field.heights().to_vec();
        field.dig_jagged(100.0, 500.0, 60.0, 7, WORLD_BOTTOM_Y, &mut rng);
        for (&b, &a) in before.iter().zip(field.heights()) {
            assert!(a >= b, "dig_jagged raised a column");
        }

        let dug = field.heights().to_vec();
        field.raise_jagged(100.0, 500.0, 60.0, 7, &mut rng);
        for (&b, &a) in dug.iter().zip(field.heights()) {
            assert!(a <= b, "raise_jagged lowered a column");
        }
    }

    #[test]
    fn test_dig_jagged_respects_void_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = Heightfield::flat(200, 500.0);
        let floor = 520.0;
        field.dig_jagged(100.0, 500.0, 80.0, 7, floor, &mut rng);
        for &h in field.heights() {
            assert!(h <= floor + 1e-9, "dig cut past the void line: {h}");
        }
    }

    #[test]
    fn test_carve_fissure_linear() {
        let mut field = Heightfield::flat(100, 400.0);
        field.carve_fissure(20.0, 420.0, 40.0, 460.0);
        assert!((field.heights()[20] - 420.0).abs() < 1e-9);
        assert!((field.heights()[40] - 460.0).abs() < 1e-9);
        assert!((field.heights()[30] - 440.0).abs() < 1e-9);
        // Untouched outside the span.
        assert!((field.heights()[10] - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_burn_erodes_slowly() {
        let mut field = Heightfield::flat(100, 400.0);
        field.burn(50.0, 20.0, 10.0, 0.5);
        // Center eroded by rate * dt.
        assert!((field.heights()[50] - 405.0).abs() < 1e-9);
        // Edge of the radius barely moved.
        assert!(field.heights()[69] - 400.0 < 1.0);
    }
}

//! Heightfield generation: layered noise, edge fade, spawn fairness.

use rand::Rng;

use barrage_core::constants::{
    MIN_SURFACE_Y, SPAWN_BAND_MAX_DIFF, SPAWN_FLATTEN_RADIUS, WORLD_BOTTOM_Y, WORLD_HEIGHT,
};
use barrage_terrain::Heightfield;

/// Noise octaves: (wavelength in columns, amplitude in world units).
const OCTAVES: [(usize, f64); 3] = [(400, 180.0), (130, 80.0), (40, 30.0)];

/// Generated surface stays inside this band before shaping.
const SURFACE_MIN_Y: f64 = MIN_SURFACE_Y + 160.0;
const SURFACE_MAX_Y: f64 = WORLD_HEIGHT - 220.0;

/// Base surface level the noise oscillates around.
const BASE_SURFACE_Y: f64 = WORLD_HEIGHT * 0.55;

/// Build a match terrain profile.
///
/// `spawn_xs` are the combatant spawn columns; the surface near each is
/// pulled toward a common band so no one starts with a dominant perch.
/// Columns within `edge_margin` of either wall fade down to the world
/// bottom so wall-banked shots are not intercepted at the boundary.
pub fn generate(width: usize, spawn_xs: &[f64], edge_margin: f64, rng: &mut impl Rng) -> Heightfield {
    let mut heights = vec![BASE_SURFACE_Y; width];

    for (wavelength, amplitude) in OCTAVES {
        add_octave(&mut heights, wavelength, amplitude, rng);
    }
    for h in &mut heights {
        *h = h.clamp(SURFACE_MIN_Y, SURFACE_MAX_Y);
    }

    fade_edges(&mut heights, edge_margin);
    level_spawns(&mut heights, spawn_xs);

    Heightfield::new(heights)
}

/// Add one octave of value noise: random control points every
/// `wavelength` columns, smoothly interpolated between them.
fn add_octave(heights: &mut [f64], wavelength: usize, amplitude: f64, rng: &mut impl Rng) {
    if heights.is_empty() {
        return;
    }
    let wavelength = wavelength.max(2);
    let control_count = heights.len() / wavelength + 2;
    let controls: Vec<f64> = (0..control_count)
        .map(|_| rng.gen_range(-1.0..1.0) * amplitude)
        .collect();

    for (col, h) in heights.iter_mut().enumerate() {
        let t = col as f64 / wavelength as f64;
        let i0 = t.floor() as usize;
        let frac = t - i0 as f64;
        // Smoothstep between control points avoids visible creases.
        let s = frac * frac * (3.0 - 2.0 * frac);
        let i1 = (i0 + 1).min(controls.len() - 1);
        *h += controls[i0] * (1.0 - s) + controls[i1] * s;
    }
}

/// Fade the surface down to the world bottom inside the edge margins.
fn fade_edges(heights: &mut [f64], edge_margin: f64) {
    if edge_margin <= 0.0 {
        return;
    }
    let width = heights.len();
    for (col, h) in heights.iter_mut().enumerate() {
        let from_edge = col.min(width - 1 - col) as f64;
        if from_edge < edge_margin {
            let t = from_edge / edge_margin;
            let s = t * t * (3.0 - 2.0 * t);
            *h = WORLD_BOTTOM_Y * (1.0 - s) + *h * s;
        }
    }
}

/// Pull the columns around each spawn toward a common height band.
fn level_spawns(heights: &mut [f64], spawn_xs: &[f64]) {
    if spawn_xs.is_empty() || heights.is_empty() {
        return;
    }

    let sample = |heights: &[f64], x: f64| -> f64 {
        let col = (x.round() as usize).min(heights.len() - 1);
        heights[col]
    };

    let band_center =
        spawn_xs.iter().map(|&x| sample(heights, x)).sum::<f64>() / spawn_xs.len() as f64;
    let half_band = SPAWN_BAND_MAX_DIFF / 2.0;

    for &x in spawn_xs {
        let current = sample(heights, x);
        let target = current.clamp(band_center - half_band, band_center + half_band);
        let center = x.round() as i64;

        for offset in -(SPAWN_FLATTEN_RADIUS as i64)..=(SPAWN_FLATTEN_RADIUS as i64) {
            let col = center + offset;
            if col < 0 || col as usize >= heights.len() {
                continue;
            }
            let t = offset.unsigned_abs() as f64 / SPAWN_FLATTEN_RADIUS as f64;
            // Flat platform at the center, blending out toward the rim.
            let weight = if t < 0.35 {
                1.0
            } else {
                1.0 - (t - 0.35) / 0.65
            };
            let h = &mut heights[col as usize];
            *h = *h * (1.0 - weight) + target * weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use barrage_core::constants::{EDGE_MARGIN, SPAWN_BAND_MAX_DIFF, WORLD_BOTTOM_Y};

    use super::generate;

    #[test]
    fn test_generate_width_and_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let field = generate(2400, &[400.0, 2000.0], EDGE_MARGIN, &mut rng);
        assert_eq!(field.width(), 2400);
        for &h in field.heights() {
            assert!(h > 0.0 && h <= WORLD_BOTTOM_Y, "height out of world: {h}");
        }
    }

    #[test]
    fn test_generate_deterministic() {
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let a = generate(1200, &[300.0, 900.0], EDGE_MARGIN, &mut rng_a);
        let b = generate(1200, &[300.0, 900.0], EDGE_MARGIN, &mut rng_b);
        assert_eq!(a.heights(), b.heights());
    }

    #[test]
    fn test_edges_fade_to_bottom() {
        let mut rng = StdRng::seed_from_u64(17);
        let field = generate(2400, &[400.0, 2000.0], EDGE_MARGIN, &mut rng);
        assert!((field.heights()[0] - WORLD_BOTTOM_Y).abs() < 1.0);
        assert!((field.heights()[2399] - WORLD_BOTTOM_Y).abs() < 1.0);
        // Interior terrain sits well above the bottom.
        assert!(field.heights()[1200] < WORLD_BOTTOM_Y - 100.0);
    }

    #[test]
    fn test_spawn_platforms_in_common_band() {
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let spawns = [400.0, 1200.0, 2000.0];
            let field = generate(2400, &spawns, EDGE_MARGIN, &mut rng);
            let hs: Vec<f64> = spawns
                .iter()
                .map(|&x| field.heights()[x as usize])
                .collect();
            let max = hs.iter().cloned().fold(f64::MIN, f64::max);
            let min = hs.iter().cloned().fold(f64::MAX, f64::min);
            assert!(
                max - min <= SPAWN_BAND_MAX_DIFF + 1e-6,
                "seed {seed}: spawn spread {} exceeds band",
                max - min
            );
        }
    }
}

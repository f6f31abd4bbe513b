//! Animated fBm terrain field.
//!
//! 3D gradient noise summed over octaves, each octave at `lacunarity` times
//! the previous frequency and `persistence` times the previous amplitude:
//!
//! ```text
//! fbm(p) = Σ persistence^i · perlin(p · lacunarity^i, seed + i)   i < octaves
//!          ─────────────────────────────────────────────────────
//!                      Σ persistence^i
//! ```
//!
//! [`NoiseField`] scrolls the noise domain with time and adds a vertical ramp
//! so the surface reads as terrain rather than floating blobs.

use glam::Vec3;

use super::{DensityField, FieldContext};

/// Single octave of 3D Perlin noise, roughly in `[-1, 1]`.
#[inline(always)]
pub fn perlin_noise_3d(x: f32, y: f32, z: f32, seed: u32) -> f32 {
  let xi = x.floor() as i32;
  let yi = y.floor() as i32;
  let zi = z.floor() as i32;

  let xf = x - x.floor();
  let yf = y - y.floor();
  let zf = z - z.floor();

  let u = fade(xf);
  let v = fade(yf);
  let w = fade(zf);

  let aaa = grad3d(hash3d(xi, yi, zi, seed), xf, yf, zf);
  let baa = grad3d(hash3d(xi + 1, yi, zi, seed), xf - 1.0, yf, zf);
  let aba = grad3d(hash3d(xi, yi + 1, zi, seed), xf, yf - 1.0, zf);
  let bba = grad3d(hash3d(xi + 1, yi + 1, zi, seed), xf - 1.0, yf - 1.0, zf);
  let aab = grad3d(hash3d(xi, yi, zi + 1, seed), xf, yf, zf - 1.0);
  let bab = grad3d(hash3d(xi + 1, yi, zi + 1, seed), xf - 1.0, yf, zf - 1.0);
  let abb = grad3d(hash3d(xi, yi + 1, zi + 1, seed), xf, yf - 1.0, zf - 1.0);
  let bbb = grad3d(
    hash3d(xi + 1, yi + 1, zi + 1, seed),
    xf - 1.0,
    yf - 1.0,
    zf - 1.0,
  );

  lerp(
    lerp(lerp(aaa, baa, u), lerp(aba, bba, u), v),
    lerp(lerp(aab, bab, u), lerp(abb, bbb, u), v),
    w,
  )
}

/// Fractal Brownian motion over `octaves` Perlin octaves, normalized by the
/// total amplitude. Zero octaves yield `0.0`.
#[inline]
pub fn fbm_noise_3d(
  x: f32,
  y: f32,
  z: f32,
  seed: u32,
  octaves: u32,
  lacunarity: f32,
  persistence: f32,
) -> f32 {
  let mut value = 0.0;
  let mut amplitude = 1.0;
  let mut frequency = 1.0;
  let mut max_value = 0.0;

  for i in 0..octaves {
    value += amplitude
      * perlin_noise_3d(
        x * frequency,
        y * frequency,
        z * frequency,
        seed.wrapping_add(i),
      );
    max_value += amplitude;
    amplitude *= persistence;
    frequency *= lacunarity;
  }

  if max_value > 0.0 {
    value / max_value
  } else {
    0.0
  }
}

#[inline(always)]
fn fade(t: f32) -> f32 {
  t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
  a + t * (b - a)
}

#[inline(always)]
fn hash3d(x: i32, y: i32, z: i32, seed: u32) -> u32 {
  let mut h = seed;
  h ^= x as u32;
  h = h.wrapping_mul(0x85EB_CA6B);
  h ^= y as u32;
  h = h.wrapping_mul(0xC2B2_AE35);
  h ^= z as u32;
  h = h.wrapping_mul(0x27D4_EB2D);
  h ^= h >> 16;
  h
}

#[inline(always)]
fn grad3d(hash: u32, x: f32, y: f32, z: f32) -> f32 {
  let h = hash & 15;
  let u = if h < 8 { x } else { y };
  let v = match h {
    0..=3 => y,
    12 | 14 => x,
    _ => z,
  };
  let g1 = if h & 1 == 0 { u } else { -u };
  let g2 = if h & 2 == 0 { v } else { -v };
  g1 + g2
}

/// Scrolling fBm terrain.
///
/// ```text
/// density(p, t) = amplitude · fbm(p · frequency + scroll · t)
///               + height_bias · (base_height − p.y)
/// ```
///
/// The octave count comes from [`FieldContext::octave_count`], so the same
/// field can be extracted at different detail levels.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
  pub seed: u32,
  /// Base frequency of the first octave.
  pub frequency: f32,
  pub amplitude: f32,
  pub lacunarity: f32,
  pub persistence: f32,
  /// Domain velocity per unit of time.
  pub scroll: Vec3,
  /// Height where the vertical ramp is zero.
  pub base_height: f32,
  /// Ramp slope. Zero gives free-floating noise.
  pub height_bias: f32,
}

impl Default for NoiseField {
  fn default() -> Self {
    Self {
      seed: 1337,
      frequency: 0.1,
      amplitude: 4.0,
      lacunarity: 2.0,
      persistence: 0.5,
      scroll: Vec3::ZERO,
      base_height: 0.0,
      height_bias: 1.0,
    }
  }
}

impl NoiseField {
  pub fn new(seed: u32) -> Self {
    Self {
      seed,
      ..Self::default()
    }
  }

  pub fn with_frequency(mut self, frequency: f32) -> Self {
    self.frequency = frequency;
    self
  }

  pub fn with_amplitude(mut self, amplitude: f32) -> Self {
    self.amplitude = amplitude;
    self
  }

  pub fn with_lacunarity(mut self, lacunarity: f32) -> Self {
    self.lacunarity = lacunarity;
    self
  }

  pub fn with_persistence(mut self, persistence: f32) -> Self {
    self.persistence = persistence;
    self
  }

  /// Animate along `axis` at `speed` domain units per unit of time.
  pub fn with_scroll(mut self, axis: Vec3, speed: f32) -> Self {
    self.scroll = axis.normalize_or_zero() * speed;
    self
  }

  pub fn with_height_bias(mut self, base_height: f32, height_bias: f32) -> Self {
    self.base_height = base_height;
    self.height_bias = height_bias;
    self
  }
}

impl DensityField for NoiseField {
  #[inline]
  fn density(&self, p: Vec3, ctx: &FieldContext) -> f32 {
    let q = p * self.frequency + self.scroll * ctx.time;
    let noise = fbm_noise_3d(
      q.x,
      q.y,
      q.z,
      self.seed,
      ctx.octave_count,
      self.lacunarity,
      self.persistence,
    );
    self.amplitude * noise + self.height_bias * (self.base_height - p.y)
  }
}

#[cfg(test)]
#[path = "noise_test.rs"]
mod noise_test;

use super::*;

#[test]
fn test_perlin_range() {
  let mut min = f32::MAX;
  let mut max = f32::MIN;

  for i in 0..1000 {
    let x = (i as f32) * 0.1;
    let y = (i as f32) * 0.13;
    let z = (i as f32) * 0.17;
    let n = perlin_noise_3d(x, y, z, 42);
    min = min.min(n);
    max = max.max(n);
  }

  assert!(min >= -1.5);
  assert!(max <= 1.5);
  assert!(max - min > 0.1, "noise should vary, got [{}, {}]", min, max);
}

#[test]
fn test_perlin_zero_at_lattice_points() {
  // Gradient noise vanishes on integer coordinates
  for i in -3..3 {
    assert_eq!(perlin_noise_3d(i as f32, 2.0, -5.0, 9), 0.0);
  }
}

#[test]
fn test_perlin_seed_changes_output() {
  let a = perlin_noise_3d(1.3, 2.7, 3.1, 1);
  let b = perlin_noise_3d(1.3, 2.7, 3.1, 2);
  assert_ne!(a, b);
}

#[test]
fn test_fbm_bounded() {
  for i in 0..200 {
    let t = i as f32 * 0.37;
    let n = fbm_noise_3d(t, t * 0.5, -t, 42, 4, 2.0, 0.5);
    assert!((-1.5..=1.5).contains(&n), "fbm out of range: {}", n);
  }
}

#[test]
fn test_fbm_zero_octaves() {
  assert_eq!(fbm_noise_3d(1.5, 2.5, 3.5, 42, 0, 2.0, 0.5), 0.0);
}

#[test]
fn test_fbm_single_octave_is_perlin() {
  let p = (1.37, -2.21, 0.77);
  assert_eq!(
    fbm_noise_3d(p.0, p.1, p.2, 5, 1, 2.0, 0.5),
    perlin_noise_3d(p.0, p.1, p.2, 5)
  );
}

#[test]
fn test_noise_field_height_ramp() {
  // Without noise amplitude the field is a plane at base_height
  let field = NoiseField::new(3)
    .with_amplitude(0.0)
    .with_height_bias(2.0, 1.0);
  let ctx = FieldContext::new(0.0, 4);
  assert!(field.density(Vec3::new(0.0, 1.0, 0.0), &ctx) > 0.0);
  assert!(field.density(Vec3::new(0.0, 3.0, 0.0), &ctx) < 0.0);
}

#[test]
fn test_noise_field_scrolls_with_time() {
  let field = NoiseField::new(11)
    .with_frequency(0.5)
    .with_height_bias(0.0, 0.0)
    .with_scroll(Vec3::X, 1.0);
  let p = Vec3::new(0.3, 0.6, 0.9);

  // Scrolling by t along X equals sampling at p + t / frequency
  let shifted = field.density(p, &FieldContext::new(1.0, 3));
  let moved = field.density(p + Vec3::X * 2.0, &FieldContext::new(0.0, 3));
  assert!((shifted - moved).abs() < 1e-4, "{} vs {}", shifted, moved);
}

#[test]
fn test_noise_field_octaves_from_context() {
  let field = NoiseField::new(5).with_height_bias(0.0, 0.0);
  let p = Vec3::new(12.3, 4.5, 6.7);
  let coarse = field.density(p, &FieldContext::new(0.0, 1));
  let fine = field.density(p, &FieldContext::new(0.0, 6));
  assert_ne!(coarse, fine);
  assert_eq!(field.density(p, &FieldContext::new(0.0, 0)), 0.0);
}

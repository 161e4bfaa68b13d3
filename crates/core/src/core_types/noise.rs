//! Deterministic 2D value noise used for forest placement
//!
//! Placement samples a smooth noise field over the terrain and keeps every
//! coordinate whose value falls under the density threshold, which produces
//! clustered stands of trees with clearings in between. The field is a pure
//! function of its inputs, so a fixed offset always yields the same forest.

/// Lattice hashing primes
const SEED_X: i32 = 1619;
const SEED_Z: i32 = 31337;

/// Maximum positive i32 as f64 for the [0, 1] conversion
const MAX_I32_POSITIVE: f64 = 0x7fff_ffff as f64;

/// Hash a lattice point to a pseudo-random value in [0, 1]
#[inline]
fn lattice_value(x: i32, z: i32, seed: u32) -> f32 {
    let mut n = x
        .wrapping_mul(SEED_X)
        .wrapping_add(z.wrapping_mul(SEED_Z))
        .wrapping_add(seed as i32);
    n = (n << 13) ^ n;
    n = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789221))
        .wrapping_add(1376312589);
    (f64::from(n & 0x7fff_ffff) / MAX_I32_POSITIVE) as f32
}

/// Hermite fade curve
#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Smooth value noise in [0, 1] with one lattice point per unit.
///
/// Inputs are in noise space, not world space: callers scale world
/// coordinates themselves (see `NoisePlacement`).
#[must_use]
pub fn value_noise_2d(x: f32, z: f32, seed: u32) -> f32 {
    let x0 = x.floor() as i32;
    let z0 = z.floor() as i32;

    let fx = smoothstep(x - x.floor());
    let fz = smoothstep(z - z.floor());

    let v00 = lattice_value(x0, z0, seed);
    let v10 = lattice_value(x0 + 1, z0, seed);
    let v01 = lattice_value(x0, z0 + 1, seed);
    let v11 = lattice_value(x0 + 1, z0 + 1, seed);

    let v0 = v00 + fx * (v10 - v00);
    let v1 = v01 + fx * (v11 - v01);
    v0 + fz * (v1 - v0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_in_unit_range() {
        for i in 0..200 {
            let x = i as f32 * 0.37;
            let z = i as f32 * 0.91;
            let v = value_noise_2d(x, z, 7);
            assert!((0.0..=1.0).contains(&v), "noise out of range: {v}");
        }
    }

    #[test]
    fn test_noise_deterministic() {
        assert_eq!(value_noise_2d(12.5, 3.25, 1), value_noise_2d(12.5, 3.25, 1));
    }

    #[test]
    fn test_noise_matches_lattice_at_integers() {
        assert_eq!(value_noise_2d(4.0, 9.0, 3), lattice_value(4, 9, 3));
    }

    #[test]
    fn test_noise_is_continuous() {
        let a = value_noise_2d(10.0, 10.0, 0);
        let b = value_noise_2d(10.001, 10.0, 0);
        assert!((a - b).abs() < 0.01);
    }
}

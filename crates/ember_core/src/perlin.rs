//! Gradient (Perlin) noise.

use ember_math::Vec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const POINT_COUNT: usize = 256;

/// Default seed so procedural textures look identical from run to run.
pub const DEFAULT_NOISE_SEED: u64 = 0x5eed_5eed;

/// Perlin noise with random gradient vectors on a 256-entry lattice.
#[derive(Clone, Debug)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build a generator from the given random source.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| {
                let v = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                v.try_normalize().unwrap_or(Vec3::X)
            })
            .collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Build a generator from a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    /// Noise value at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[wrap(i + di as i64)]
                        ^ self.perm_y[wrap(j + dj as i64)]
                        ^ self.perm_z[wrap(k + dk as i64)];
                    *cell = self.gradients[idx];
                }
            }
        }

        trilinear_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves of absolute noise, each at double frequency
    /// and half weight.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::with_seed(DEFAULT_NOISE_SEED)
    }
}

#[inline]
fn wrap(i: i64) -> usize {
    (i & (POINT_COUNT as i64 - 1)) as usize
}

fn generate_perm<R: Rng + ?Sized>(rng: &mut R) -> Vec<usize> {
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    p.shuffle(rng);
    p
}

/// Hermite-smoothed trilinear blend of the eight corner gradients.
fn trilinear_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}

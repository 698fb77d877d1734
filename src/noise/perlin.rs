//! Seeded 2D gradient noise.
//!
//! The permutation table is shuffled once from an integer seed with a
//! linear-congruential generator, so a given seed always reproduces the same
//! noise field. After construction the source is immutable and `Sync`, which
//! lets height-field workers share one instance across threads.

/// Multiplier of the permutation shuffle LCG.
const LCG_MULTIPLIER: u32 = 1_664_525;
/// Increment of the permutation shuffle LCG.
const LCG_INCREMENT: u32 = 1_013_904_223;
/// 2^32, the LCG modulus as a float divisor.
const LCG_MODULUS: f64 = 4_294_967_296.0;

/// Linear-congruential generator used only to shuffle the permutation table.
#[derive(Debug, Clone)]
struct Lcg {
    state: u32,
}

impl Lcg {
    /// Seeds the generator with the low 32 bits of `seed`.
    fn new(seed: i64) -> Self {
        Self { state: seed as u32 }
    }

    /// Advances the state and returns a uniform draw in [0, 1).
    fn next_unit(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state as f64 / LCG_MODULUS
    }
}

/// Deterministic 2D gradient noise source.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    /// Shuffled 0..=255 permutation, repeated twice so lookups never wrap.
    perm: [u8; 512],
}

impl SeededNoise {
    /// Builds a noise source whose permutation is shuffled from `seed`.
    pub fn new(seed: i64) -> Self {
        let mut permutation: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut lcg = Lcg::new(seed);

        // Fisher-Yates, from the top of the table down to index 1.
        for i in (1..256).rev() {
            let j = (lcg.next_unit() * (i + 1) as f64).floor() as usize;
            permutation.swap(i, j);
        }

        Self {
            perm: std::array::from_fn(|i| permutation[i & 255]),
        }
    }

    /// Returns the doubled 512-entry permutation table.
    pub fn permutation(&self) -> &[u8; 512] {
        &self.perm
    }

    /// Samples the noise field at `(x, y)`.
    ///
    /// This is the `z = 0` slice of classic 3D gradient noise. The result is
    /// in approximately [-1, 1] and is exactly zero on integer lattice points.
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = lattice_index(x_floor);
        let yi = lattice_index(y_floor);

        let x = x - x_floor;
        let y = y - y_floor;
        let u = fade(x);
        let v = fade(y);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize;
        let ab = p[a + 1] as usize;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize;
        let bb = p[b + 1] as usize;

        lerp(
            v,
            lerp(u, grad(p[aa], x, y, 0.0), grad(p[ba], x - 1.0, y, 0.0)),
            lerp(
                u,
                grad(p[ab], x, y - 1.0, 0.0),
                grad(p[bb], x - 1.0, y - 1.0, 0.0),
            ),
        )
    }
}

/// Wraps a floored coordinate onto the 256-cell lattice (two's complement).
#[inline]
fn lattice_index(floored: f64) -> usize {
    ((floored as i64) & 255) as usize
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset with the gradient selected by `hash`.
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

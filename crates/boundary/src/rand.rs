//! Random site boundaries (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic sampler of simple, star-shaped rings around a centre point,
//!   used by property tests and benchmarks.
//!
//! Model
//! - Start from `n` equally spaced bearings, add bounded angular and radial
//!   jitter, project each vertex from the centre with `destination`, round.
//!   Bearings increase clockwise, so rings come out clockwise on a north-up map.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geodesic::destination;
use crate::ring::{normalize, round_coord};
use crate::{coord, Coord};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing 360°/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii are `radius_m * (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`, clamped to [0, 0.9].
    pub radial_jitter: f64,
    /// Base radius in metres (at least 5 m so rounding cannot fold the ring).
    pub radius_m: f64,
    pub center: Coord,
    /// Random starting bearing?
    pub random_phase: bool,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            radius_m: 40.0,
            center: coord(-0.1276, 51.5072),
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a closed, normalized, simple ring.
pub fn draw_ring_radial(cfg: RadialCfg, tok: ReplayToken) -> Vec<Coord> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.radius_m.max(5.0);
    let delta = 360.0 / n as f64;
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 360.0
    } else {
        0.0
    };
    let pts: Vec<Coord> = (0..n)
        .map(|k| {
            let b = phase + k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = r0 * (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj);
            round_coord(destination(cfg.center, r, b))
        })
        .collect();
    normalize(&pts).ring
}

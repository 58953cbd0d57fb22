//! Lightweight xorshift32 PRNG for bounce jitter and face recoloring

use crate::types::Color;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct GasketRng {
    state: u32,
}

impl GasketRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the wall clock. Used for interactive sessions; tests pass fixed seeds.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(0x9E37_79B9);
        Self::new(nanos)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a heading in [0, 2π)
    pub fn angle(&mut self) -> f64 {
        self.range(0.0, std::f64::consts::TAU)
    }

    /// Returns an opaque color with uniformly random channels
    pub fn color(&mut self) -> Color {
        Color::rgb(
            self.next_f64() as f32,
            self.next_f64() as f32,
            self.next_f64() as f32,
        )
    }
}

impl Default for GasketRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

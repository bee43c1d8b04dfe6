// Licensed under the Apache-2.0 license

use keelstone_rom::hil::RandomDelay;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Software stand-in for a hardware entropy-driven delay block. Burns a
/// random number of spin iterations per request so back-to-back boots do not
/// hit verification checks at the same instant.
pub struct JitterEngine {
    rng: StdRng,
    served: u32,
}

impl JitterEngine {
    /// Deterministic engine for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            served: 0,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            served: 0,
        }
    }

    /// Number of delays served so far.
    pub fn served(&self) -> u32 {
        self.served
    }
}

impl RandomDelay for JitterEngine {
    fn random_delay(&mut self) {
        let spins = self.rng.gen_range(1_000..10_000);
        for _ in 0..spins {
            core::hint::spin_loop();
        }
        self.served = self.served.wrapping_add(1);
    }
}

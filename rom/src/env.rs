// Licensed under the Apache-2.0 license

//! Collaborator bundle handed to the boot flow by the platform.

use keelstone_config::BootConfig;

use crate::hil::{DataVault, DigestEngine, FlashStorage, RandomDelay, SystemControl};

/// Everything the boot flow touches. Platforms build one of these from their
/// drivers; emulated runs build it from `emulator-periph` software devices.
pub struct RomEnv<'a> {
    pub flash: &'a dyn FlashStorage,
    pub digest: &'a mut dyn DigestEngine,
    pub jitter: &'a mut dyn RandomDelay,
    pub vault: &'a mut dyn DataVault,
    pub ctrl: &'a mut dyn SystemControl,
}

/// Per-boot parameters.
pub struct BootParams<'a> {
    pub config: &'a BootConfig,
    /// Rehearsed fault for emulated glitch scenarios.
    #[cfg(any(test, feature = "glitch-sim"))]
    pub glitch: crate::verify::GlitchPlan,
}

impl<'a> BootParams<'a> {
    pub fn new(config: &'a BootConfig) -> Self {
        BootParams {
            config,
            #[cfg(any(test, feature = "glitch-sim"))]
            glitch: crate::verify::GlitchPlan::default(),
        }
    }
}

// Licensed under the Apache-2.0 license

//! Sparse error codes shared by the Keelstone boot ROM and its tooling.
//!
//! Codes are non-zero 32-bit words grouped by component in the upper half,
//! with the low byte kept unique across terminal codes so that emulated runs
//! can surface them as process exit codes without aliasing.

#![cfg_attr(not(test), no_std)]

use core::num::NonZeroU32;

/// A non-zero error word reported by the boot ROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RomError(pub NonZeroU32);

pub type RomResult<T> = Result<T, RomError>;

impl RomError {
    const fn new_const(code: u32) -> Self {
        match NonZeroU32::new(code) {
            Some(code) => Self(code),
            None => panic!("RomError code cannot be zero"),
        }
    }

    /// Raw 32-bit code.
    pub const fn code(self) -> u32 {
        self.0.get()
    }

    // Image loader (0x0101_xxxx)
    pub const ROM_LOADER_READ_FAILED: RomError = RomError::new_const(0x0101_0011);
    pub const ROM_LOADER_BAD_MAGIC: RomError = RomError::new_const(0x0101_0022);
    pub const ROM_LOADER_BAD_VERSION: RomError = RomError::new_const(0x0101_0033);
    pub const ROM_LOADER_IMAGE_OVERSIZE: RomError = RomError::new_const(0x0101_0044);
    pub const ROM_LOADER_BAD_ENTRY: RomError = RomError::new_const(0x0101_0055);

    // Digest oracle (0x0102_xxxx)
    pub const ROM_FUSE_DIGEST_UNAVAILABLE: RomError = RomError::new_const(0x0102_0066);
    pub const ROM_DIGEST_ENGINE_FAILURE: RomError = RomError::new_const(0x0102_0077);

    // Boot decision flow (0x0103_xxxx). These are the halt codes an emulated
    // run maps onto its exit status, so their low bytes must stay distinct.
    pub const ROM_BOOT_NO_VALID_IMAGE: RomError = RomError::new_const(0x0103_000B);
    pub const ROM_VERIFY_FAULT_SUSPECTED: RomError = RomError::new_const(0x0103_00AD);
}

impl From<RomError> for u32 {
    fn from(e: RomError) -> u32 {
        e.code()
    }
}

// Licensed under the Apache-2.0 license

//! XOR-masked jump target accumulator.
//!
//! The candidate entry address starts out combined with a word folded from
//! the expected digest and two independent flag bits. Each successful check
//! in the verification sequence strips exactly one mask; skipping or forcing
//! any single check leaves the address corrupted and the counter non-zero,
//! so the value fails closed instead of open.

use keelstone_image::Digest;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub(crate) const MASK_FLAG_A: u32 = 1 << 14;
pub(crate) const MASK_FLAG_B: u32 = 1 << 15;

// Stand-in address carried by targets whose verification never completed.
const POISON_ADDR: u32 = 0xFFFF_FFFF;

/// Folds a digest into the 32-bit mask word tied to it.
pub(crate) fn digest_mask_word(digest: &Digest) -> u32 {
    let bytes = digest.as_bytes();
    let mut word = 0u32;
    let mut i = 0;
    while i + 4 <= bytes.len() {
        word ^= u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        i += 4;
    }
    word
}

/// A candidate jump address while checks are still in flight. Owned by the
/// verifier, handed to the caller by value, scrubbed on drop.
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct MaskedTarget {
    value: u32,
    masks_left: u8,
}

impl MaskedTarget {
    pub(crate) fn new(entry: u32, digest_mask: u32) -> Self {
        MaskedTarget {
            value: entry ^ digest_mask ^ MASK_FLAG_A ^ MASK_FLAG_B,
            masks_left: 3,
        }
    }

    /// A target that can never convert; used on paths where verification did
    /// not run to completion.
    pub(crate) fn poisoned() -> Self {
        MaskedTarget {
            value: POISON_ADDR,
            masks_left: u8::MAX,
        }
    }

    pub(crate) fn unmask(&mut self, mask: u32) {
        self.value ^= mask;
        self.masks_left = self.masks_left.saturating_sub(1);
    }

    /// Converts into a launchable target, only if every mask was removed.
    pub fn into_target(self) -> Option<BootTarget> {
        if self.masks_left != 0 {
            return None;
        }
        Some(BootTarget { addr: self.value })
    }
}

/// A fully unmasked, authenticated entry address. The type is the
/// authenticity flag: it has no public constructor, cannot be copied, and is
/// consumed by [`crate::hil::Launcher::launch`] exactly once.
///
/// ```compile_fail
/// // Targets cannot be forged outside the verification path.
/// let target = keelstone_rom::BootTarget { addr: 0x4000_0000 };
/// ```
#[derive(Debug)]
pub struct BootTarget {
    addr: u32,
}

impl BootTarget {
    pub fn addr(&self) -> u32 {
        self.addr
    }
}

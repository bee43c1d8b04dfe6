// Licensed under the Apache-2.0 license

//! Hardware interface layer consumed by the boot flow.
//!
//! The ROM never talks to a concrete peripheral; platforms supply these trait
//! implementations through [`crate::RomEnv`]. Software implementations for
//! emulated runs live in the `emulator-periph` crate, and an in-memory flash
//! ships in [`crate::flash`].

use keelstone_config::SlotId;
use keelstone_error::RomResult;
use keelstone_image::Digest;

use crate::loader::LoadedImage;
use crate::masked::BootTarget;
use crate::status::RomBootStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashDrvError {
    /// Device-level failure.
    FAIL,
    /// Address or length outside the device.
    INVAL,
    /// Request larger than the device supports.
    SIZE,
}

pub trait FlashStorage {
    /// Read from the flash storage, filling the provided buffer with data.
    fn read(&self, buffer: &mut [u8], address: usize) -> Result<(), FlashDrvError>;

    /// Write the full contents of the buffer starting at the specified address.
    fn write(&self, buffer: &[u8], address: usize) -> Result<(), FlashDrvError>;

    /// Erase `length` bytes starting at address `address`.
    fn erase(&self, address: usize, length: usize) -> Result<(), FlashDrvError>;

    /// Size of the flash storage in bytes.
    fn capacity(&self) -> usize;
}

/// Digest oracle: the reference value from protected fuse storage plus the
/// digest of a candidate payload streamed out of flash.
///
/// Errors from either operation make the affected image unverifiable; the
/// verifier folds them into its failure outcome and never into success.
pub trait DigestEngine {
    /// Expected payload digest provisioned for `slot`.
    fn reference_digest(&mut self, slot: SlotId) -> RomResult<Digest>;

    /// Digest of the candidate payload currently in flash. Computed fresh on
    /// every call; implementations must not cache across attempts.
    fn image_digest(
        &mut self,
        flash: &dyn FlashStorage,
        image: &LoadedImage,
    ) -> RomResult<Digest>;
}

/// Randomized busy-wait used to desynchronize glitch timing.
pub trait RandomDelay {
    /// Block for a non-zero, attacker-unpredictable duration.
    fn random_delay(&mut self);
}

/// Scrub and erase operations, best-effort and fire-and-forget.
pub trait DataVault {
    /// Clear transient boot working state (candidate addresses, digest
    /// copies). Invoked before every terminal halt.
    fn scrub_boot_state(&mut self);

    /// Destroy device secrets. Invoked only when a fault attack is suspected.
    fn erase_sensitive_data(&mut self);
}

/// Boot progress reporting into platform status registers.
pub trait SystemControl {
    fn set_flow_checkpoint(&mut self, checkpoint: RomBootStatus);
}

/// Hands control to a verified image. There is deliberately no way to build
/// a [`BootTarget`] outside the verification path, so an implementation can
/// trust the address it is given.
pub trait Launcher {
    fn launch(&mut self, target: BootTarget) -> !;
}

pub trait FatalErrorHandler {
    fn fatal_error(&mut self, code: u32) -> !;
}

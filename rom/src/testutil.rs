// Licensed under the Apache-2.0 license

//! Shared fixtures for the in-crate unit tests.

use keelstone_config::{BootConfig, BootSlotConfig, SlotId};
use keelstone_error::{RomError, RomResult};
use keelstone_image::{build_image, payload_digest, Digest, ImageHeader};

use crate::flash::SimpleFlash;
use crate::hil::{
    DataVault, DigestEngine, FlashStorage, RandomDelay, SystemControl,
};
use crate::loader::{load_image, LoadedImage};
use crate::status::RomBootStatus;

pub(crate) const TEST_PRIMARY: BootSlotConfig = BootSlotConfig {
    id: SlotId::Primary,
    name: "primary",
    base: 0x1000,
    size: 0x4000,
};

pub(crate) const TEST_BACKUP: BootSlotConfig = BootSlotConfig {
    id: SlotId::Backup,
    name: "backup",
    base: 0x5000,
    size: 0x4000,
};

pub(crate) const TEST_CONFIG: BootConfig = BootConfig {
    primary: TEST_PRIMARY,
    backup: Some(TEST_BACKUP),
};

/// A 64 KiB flash with the given images written at the slot bases. Empty
/// slices leave the slot erased.
pub(crate) fn flash_with_images(primary: &[u8], backup: &[u8]) -> SimpleFlash {
    let flash = SimpleFlash::new(Box::leak(vec![0u8; 0x1_0000].into_boxed_slice()));
    if !primary.is_empty() {
        flash.write(primary, TEST_PRIMARY.base as usize).unwrap();
    }
    if !backup.is_empty() {
        flash.write(backup, TEST_BACKUP.base as usize).unwrap();
    }
    flash
}

/// Flash holding `payload` as a valid primary image, the loaded view of it,
/// and an engine whose primary fuses match.
pub(crate) fn provisioned_primary(payload: &[u8]) -> (SimpleFlash, LoadedImage, TestDigestEngine) {
    let image = build_image(payload, ImageHeader::SIZE as u32).unwrap();
    let flash = flash_with_images(&image, &[]);
    let loaded = load_image(&flash, &TEST_PRIMARY).unwrap();
    let engine = TestDigestEngine::provisioned(payload_digest(payload), None);
    (flash, loaded, engine)
}

/// Digest oracle double: preset per-slot reference values, real SHA-256 of
/// whatever flash holds, and switchable failure modes.
pub(crate) struct TestDigestEngine {
    pub reference: [Option<Digest>; 2],
    pub fail_reference: bool,
    pub fail_compute: bool,
    pub reference_calls: usize,
    pub compute_calls: usize,
}

impl TestDigestEngine {
    pub fn provisioned(primary: Digest, backup: Option<Digest>) -> Self {
        TestDigestEngine {
            reference: [Some(primary), backup],
            fail_reference: false,
            fail_compute: false,
            reference_calls: 0,
            compute_calls: 0,
        }
    }
}

impl DigestEngine for TestDigestEngine {
    fn reference_digest(&mut self, slot: SlotId) -> RomResult<Digest> {
        self.reference_calls += 1;
        if self.fail_reference {
            return Err(RomError::ROM_FUSE_DIGEST_UNAVAILABLE);
        }
        let idx = match slot {
            SlotId::Primary => 0,
            SlotId::Backup => 1,
        };
        self.reference[idx]
            .clone()
            .ok_or(RomError::ROM_FUSE_DIGEST_UNAVAILABLE)
    }

    fn image_digest(
        &mut self,
        flash: &dyn FlashStorage,
        image: &LoadedImage,
    ) -> RomResult<Digest> {
        self.compute_calls += 1;
        if self.fail_compute {
            return Err(RomError::ROM_DIGEST_ENGINE_FAILURE);
        }
        let mut payload = vec![0u8; image.payload_len as usize];
        flash
            .read(&mut payload, image.payload_addr as usize)
            .map_err(|_| RomError::ROM_DIGEST_ENGINE_FAILURE)?;
        Ok(payload_digest(&payload))
    }
}

#[derive(Default)]
pub(crate) struct CountingJitter {
    pub calls: usize,
}

impl RandomDelay for CountingJitter {
    fn random_delay(&mut self) {
        self.calls += 1;
    }
}

#[derive(Default)]
pub(crate) struct RecordingVault {
    pub scrubs: usize,
    pub erases: usize,
}

impl DataVault for RecordingVault {
    fn scrub_boot_state(&mut self) {
        self.scrubs += 1;
    }

    fn erase_sensitive_data(&mut self) {
        self.erases += 1;
    }
}

#[derive(Default)]
pub(crate) struct RecordingCtrl {
    pub trace: Vec<RomBootStatus>,
}

impl SystemControl for RecordingCtrl {
    fn set_flow_checkpoint(&mut self, checkpoint: RomBootStatus) {
        self.trace.push(checkpoint);
    }
}

// Licensed under the Apache-2.0 license

//! SHA-256 digest engine over emulated flash.

use keelstone_config::SlotId;
use keelstone_error::{RomError, RomResult};
use keelstone_image::Digest;
use keelstone_rom::hil::{DigestEngine, FlashStorage};
use keelstone_rom::LoadedImage;
use sha2::{Digest as _, Sha256};

use crate::fuses::FuseBank;

/// How much payload is pulled out of flash per hash update. Hardware engines
/// stream in fixed bursts; modeling that keeps the read path honest about
/// partial-chunk handling.
const STREAM_CHUNK: usize = 256;

pub struct Sha256Engine {
    fuses: FuseBank,
}

impl Sha256Engine {
    pub fn new(fuses: FuseBank) -> Self {
        Self { fuses }
    }
}

impl DigestEngine for Sha256Engine {
    fn reference_digest(&mut self, slot: SlotId) -> RomResult<Digest> {
        self.fuses
            .digest(slot)
            .ok_or(RomError::ROM_FUSE_DIGEST_UNAVAILABLE)
    }

    fn image_digest(
        &mut self,
        flash: &dyn FlashStorage,
        image: &LoadedImage,
    ) -> RomResult<Digest> {
        let mut hasher = Sha256::new();
        let mut addr = image.payload_addr as usize;
        let mut remaining = image.payload_len as usize;
        let mut chunk = [0u8; STREAM_CHUNK];

        while remaining > 0 {
            let n = remaining.min(STREAM_CHUNK);
            flash
                .read(&mut chunk[..n], addr)
                .map_err(|_| RomError::ROM_DIGEST_ENGINE_FAILURE)?;
            hasher.update(&chunk[..n]);
            addr += n;
            remaining -= n;
        }

        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Ok(Digest(out))
    }
}

// Licensed under the Apache-2.0 license

//! Candidate image loading and header validation.

use keelstone_config::{BootSlotConfig, SlotId};
use keelstone_error::{RomError, RomResult};
use keelstone_image::{ImageError, ImageHeader};
use zerocopy::FromBytes;

use crate::hil::FlashStorage;

/// A candidate image described in place: the payload stays in flash and is
/// only ever streamed out for digesting. Not yet trusted; only the verifier
/// can turn this into something launchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub slot: SlotId,
    /// Slot base address in flash.
    pub base: u32,
    /// Absolute entry address, validated to land inside the payload.
    pub entry: u32,
    /// Absolute address of the first payload byte.
    pub payload_addr: u32,
    pub payload_len: u32,
}

impl LoadedImage {
    pub fn payload_end(&self) -> u32 {
        self.payload_addr + self.payload_len
    }

    /// Whether `addr` is a believable entry point for this image. A success
    /// verdict carrying an address that fails this is a fault signature, not
    /// a launchable result.
    pub fn is_plausible_entry(&self, addr: u32) -> bool {
        addr % 4 == 0 && addr >= self.payload_addr && addr < self.payload_end()
    }
}

/// Reads and validates the image header in `slot`.
///
/// Any failure here means the slot holds nothing bootable; the boot flow
/// treats that as a rejection and moves on without invoking the verifier.
pub fn load_image(flash: &dyn FlashStorage, slot: &BootSlotConfig) -> RomResult<LoadedImage> {
    let mut raw = [0u8; ImageHeader::SIZE];
    flash
        .read(&mut raw, slot.base as usize)
        .map_err(|_| RomError::ROM_LOADER_READ_FAILED)?;
    let header =
        ImageHeader::read_from_bytes(&raw).map_err(|_| RomError::ROM_LOADER_READ_FAILED)?;

    header.validate().map_err(|e| match e {
        ImageError::BadMagic => RomError::ROM_LOADER_BAD_MAGIC,
        ImageError::UnsupportedVersion => RomError::ROM_LOADER_BAD_VERSION,
        ImageError::PayloadOversize => RomError::ROM_LOADER_IMAGE_OVERSIZE,
        ImageError::EntryOutOfRange | ImageError::EntryMisaligned => RomError::ROM_LOADER_BAD_ENTRY,
    })?;

    let header_len = ImageHeader::SIZE as u32;
    let image_len = header_len
        .checked_add(header.length)
        .ok_or(RomError::ROM_LOADER_IMAGE_OVERSIZE)?;
    if image_len > slot.size {
        return Err(RomError::ROM_LOADER_IMAGE_OVERSIZE);
    }

    let payload_addr = slot
        .base
        .checked_add(header_len)
        .ok_or(RomError::ROM_LOADER_IMAGE_OVERSIZE)?;
    let payload_end = payload_addr
        .checked_add(header.length)
        .ok_or(RomError::ROM_LOADER_IMAGE_OVERSIZE)?;
    if payload_end as usize > flash.capacity() {
        return Err(RomError::ROM_LOADER_IMAGE_OVERSIZE);
    }

    let entry = slot
        .base
        .checked_add(header.entry_offset)
        .ok_or(RomError::ROM_LOADER_BAD_ENTRY)?;

    Ok(LoadedImage {
        slot: slot.id,
        base: slot.base,
        entry,
        payload_addr,
        payload_len: header.length,
    })
}

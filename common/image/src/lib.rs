// Licensed under the Apache-2.0 license

//! Keelstone boot image container format.
//!
//! A bootable slot holds a fixed 16-byte little-endian header followed by the
//! payload. Integrity digests cover the payload only, so reference values in
//! fuse storage stay valid across header-level retagging.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "builder")]
extern crate std;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[cfg(feature = "builder")]
mod builder;
#[cfg(feature = "builder")]
pub use builder::{build_image, payload_digest};

/// Image header marker, "KIMG".
pub const IMAGE_MAGIC: u32 = 0x4B49_4D47;

/// Current header format version.
pub const IMAGE_FORMAT_VERSION: u32 = 1;

pub const DIGEST_LEN: usize = 32;

/// SHA-256 digest of an image payload.
#[derive(Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl core::fmt::Debug for Digest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Errors from header validation and image building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    BadMagic,
    UnsupportedVersion,
    PayloadOversize,
    EntryOutOfRange,
    EntryMisaligned,
}

/// On-flash image header. All fields little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ImageHeader {
    pub magic: u32,
    pub version: u32,
    /// Payload length in bytes, not counting this header.
    pub length: u32,
    /// Entry point offset from the slot base. Must land inside the payload
    /// and be 4-byte aligned.
    pub entry_offset: u32,
}

impl ImageHeader {
    pub const SIZE: usize = core::mem::size_of::<ImageHeader>();

    /// Format-level validation, independent of which slot holds the image.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.magic != IMAGE_MAGIC {
            return Err(ImageError::BadMagic);
        }
        if self.version != IMAGE_FORMAT_VERSION {
            return Err(ImageError::UnsupportedVersion);
        }
        let payload_start = Self::SIZE as u32;
        let payload_end = payload_start
            .checked_add(self.length)
            .ok_or(ImageError::PayloadOversize)?;
        if self.entry_offset < payload_start || self.entry_offset >= payload_end {
            return Err(ImageError::EntryOutOfRange);
        }
        if self.entry_offset % 4 != 0 {
            return Err(ImageError::EntryMisaligned);
        }
        Ok(())
    }
}

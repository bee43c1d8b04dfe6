// Licensed under the Apache-2.0 license

//! Host-side image assembly helpers for tooling and tests.

use sha2::{Digest as _, Sha256};
use std::vec::Vec;
use zerocopy::IntoBytes;

use crate::{Digest, ImageError, ImageHeader, DIGEST_LEN, IMAGE_FORMAT_VERSION, IMAGE_MAGIC};

/// Assemble a bootable image: header followed by `payload`.
///
/// `entry_offset` is measured from the slot base, exactly as the header
/// stores it, so passing `ImageHeader::SIZE as u32` points entry at the
/// first payload byte.
pub fn build_image(payload: &[u8], entry_offset: u32) -> Result<Vec<u8>, ImageError> {
    let length = u32::try_from(payload.len()).map_err(|_| ImageError::PayloadOversize)?;
    let header = ImageHeader {
        magic: IMAGE_MAGIC,
        version: IMAGE_FORMAT_VERSION,
        length,
        entry_offset,
    };
    header.validate()?;

    let mut image = Vec::with_capacity(ImageHeader::SIZE + payload.len());
    image.extend_from_slice(header.as_bytes());
    image.extend_from_slice(payload);
    Ok(image)
}

/// SHA-256 over the payload bytes, the value provisioned into fuse storage.
pub fn payload_digest(payload: &[u8]) -> Digest {
    let mut bytes = [0u8; DIGEST_LEN];
    bytes.copy_from_slice(&Sha256::digest(payload));
    Digest(bytes)
}

// Licensed under the Apache-2.0 license

use keelstone_config::SlotId;
use keelstone_image::Digest;

/// Emulated fuse bank holding the provisioned reference digest for each
/// boot slot. A slot with no provisioned digest reads back as empty, the
/// same way unprogrammed fuses would.
#[derive(Default)]
pub struct FuseBank {
    primary: Option<Digest>,
    backup: Option<Digest>,
}

impl FuseBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provision(&mut self, slot: SlotId, digest: Digest) {
        match slot {
            SlotId::Primary => self.primary = Some(digest),
            SlotId::Backup => self.backup = Some(digest),
        }
    }

    pub fn digest(&self, slot: SlotId) -> Option<Digest> {
        match slot {
            SlotId::Primary => self.primary.clone(),
            SlotId::Backup => self.backup.clone(),
        }
    }
}

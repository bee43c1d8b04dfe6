// Licensed under the Apache-2.0 license

/// Identity of a bootable flash slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    Primary,
    Backup,
}

impl SlotId {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotId::Primary => "primary",
            SlotId::Backup => "backup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct BootSlotConfig {
    pub id: SlotId,
    pub name: &'static str, // name of the slot
    pub base: u32,          // slot base address in flash, bytes
    pub size: u32,          // size in bytes
}

impl BootSlotConfig {
    /// End of the slot, one past the last byte.
    pub const fn end(&self) -> u32 {
        self.base + self.size
    }

    pub const fn contains(&self, addr: u32) -> bool {
        addr >= self.base && addr < self.end()
    }
}

/// Boot slot layout for one device. The backup slot is optional; platforms
/// without a recovery region leave it `None` and a rejected primary halts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootConfig {
    pub primary: BootSlotConfig,
    pub backup: Option<BootSlotConfig>,
}

impl BootConfig {
    /// Slots in the order the boot flow tries them.
    pub fn attempt_order(&self) -> impl Iterator<Item = &BootSlotConfig> {
        core::iter::once(&self.primary).chain(self.backup.as_ref())
    }
}

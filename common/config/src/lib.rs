// Licensed under the Apache-2.0 license

//! Static configuration shared between the Keelstone boot ROM and platforms.

#![no_std]

mod flash;

pub use flash::{BootConfig, BootSlotConfig, SlotId};

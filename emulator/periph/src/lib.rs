/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Host-side peripheral models backing the boot ROM's hardware traits.

--*/

mod console;
mod ctrl;
mod digest;
mod fuses;
mod jitter;
mod vault;

pub use console::StdoutConsole;
pub use ctrl::{EmuCtrl, HaltPort, JumpPort};
pub use digest::Sha256Engine;
pub use fuses::FuseBank;
pub use jitter::JitterEngine;
pub use vault::EmulatedVault;

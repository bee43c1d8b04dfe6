/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Keelstone boot ROM: fault-injection-hardened image verification and the
    boot decision flow around it.

--*/

#![cfg_attr(not(test), no_std)]

pub mod env;
pub use env::{BootParams, RomEnv};
pub mod flash;
pub use flash::*;
pub mod hil;
mod loader;
pub use loader::{load_image, LoadedImage};
mod masked;
pub use masked::{BootTarget, MaskedTarget};
pub mod status;
pub use status::*;
mod verify;
#[cfg(any(test, feature = "glitch-sim"))]
pub use verify::GlitchPlan;
pub use verify::{ImageVerifier, VerifyCheck};

mod flow;
pub use flow::{boot, decide, BootDisposition, VerifyOutcome};

#[cfg(test)]
mod testutil;

// Nothing sensible can continue after a ROM panic on hardware; park the core
// until a hardware reset. Hosted builds use the platform panic runtime.
#[panic_handler]
#[inline(never)]
#[cfg(all(not(test), target_os = "none"))]
fn rom_panic(_: &core::panic::PanicInfo) -> ! {
    loop {
        core::hint::spin_loop();
    }
}

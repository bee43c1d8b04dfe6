/*++

Licensed under the Apache-2.0 license.

File Name:

    ctrl.rs

Abstract:

    Emulated system control: boot checkpoint register, the jump port that
    stands in for transferring execution, and the fatal halt line.

--*/

use std::process::exit;

use keelstone_rom::hil::{FatalErrorHandler, Launcher, SystemControl};
use keelstone_rom::{BootTarget, RomBootStatus};

/// Boot status register model. Checkpoints land in an in-memory trace that
/// harnesses can read back.
#[derive(Default)]
pub struct EmuCtrl {
    trace: Vec<RomBootStatus>,
}

impl EmuCtrl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(&self) -> &[RomBootStatus] {
        &self.trace
    }
}

impl SystemControl for EmuCtrl {
    fn set_flow_checkpoint(&mut self, checkpoint: RomBootStatus) {
        log::debug!("checkpoint {:#06x} ({checkpoint:?})", u16::from(checkpoint));
        self.trace.push(checkpoint);
    }
}

/// Jump port: "transfers execution" by reporting the entry address and
/// exiting cleanly. A real ROM would never return from this.
pub struct JumpPort;

impl Launcher for JumpPort {
    fn launch(&mut self, target: BootTarget) -> ! {
        println!("[emu] execution transferred to {:#010x}", target.addr());
        exit(0);
    }
}

/// Fatal halt line: terminates the emulator process with the ROM error code.
pub struct HaltPort;

impl HaltPort {
    /// Ensure non-zero values produce non-zero exit codes.
    /// (Unix exit codes are masked to 8 bits, so 0x000F0000 would become 0.)
    fn exit_code(val: u32) -> i32 {
        if val != 0 && (val & 0xFF) == 0 {
            1
        } else {
            val as i32
        }
    }
}

impl FatalErrorHandler for HaltPort {
    fn fatal_error(&mut self, code: u32) -> ! {
        println!("[emu] boot halted, code {code:#010x}");
        exit(Self::exit_code(code));
    }
}

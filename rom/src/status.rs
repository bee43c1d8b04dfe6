// Licensed under the Apache-2.0 license

//! Wire-level status words and boot flow checkpoints.

/// Verification status word for "every check agreed". Sparse on purpose: a
/// glitched or random word is overwhelmingly unlikely to land on it, and it
/// sits far from [`VERIFY_FAIL`] in Hamming distance so no single-bit upset
/// can turn one into the other.
pub const VERIFY_PASS: u32 = 0xDEAD_F00D;

/// Verification status word for an observed digest mismatch.
pub const VERIFY_FAIL: u32 = 0xF411_0911;

/// Boot flow checkpoints, reported through
/// [`crate::hil::SystemControl::set_flow_checkpoint`] as the flow advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum RomBootStatus {
    FlowStarted = 0x0001,
    ImageLoadStarted = 0x0010,
    ImageLoadComplete = 0x0011,
    ImageRejected = 0x0012,
    VerifyStarted = 0x0020,
    VerifyComplete = 0x0021,
    BackupSelected = 0x0030,
    LaunchArmed = 0x0040,
    FaultEscalation = 0x00F0,
    BootHalted = 0x00FF,
}

impl From<RomBootStatus> for u16 {
    fn from(status: RomBootStatus) -> u16 {
        status as u16
    }
}

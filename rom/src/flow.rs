/*++

Licensed under the Apache-2.0 license.

File Name:

    flow.rs

Abstract:

    Boot decision flow: drives the loader and verifier per slot and owns the
    verified / rejected / faulted split.

--*/

use keelstone_config::SlotId;
use keelstone_error::RomError;
use romcon::HexWord;

use crate::env::{BootParams, RomEnv};
use crate::hil::{FatalErrorHandler, Launcher};
use crate::loader::{self, LoadedImage};
use crate::masked::{BootTarget, MaskedTarget};
use crate::status::{RomBootStatus, VERIFY_FAIL, VERIFY_PASS};
use crate::verify::ImageVerifier;

/// Closed interpretation of one verification attempt.
pub enum VerifyOutcome {
    /// Success word and a target that unmasked to a believable address.
    Success(BootTarget),
    /// The recognized failure word: a plain integrity rejection.
    Failure,
    /// Anything else. Unrecognized words and inconsistent success results
    /// both land here and are treated as fault signatures.
    Ambiguous,
}

/// Terminal answer of the decision flow. `Halt` has no outgoing transitions;
/// [`boot`] maps it onto the platform's fatal handler.
pub enum BootDisposition {
    Launch(BootTarget),
    Halt(RomError),
}

fn classify(word: u32, target: MaskedTarget, image: &LoadedImage) -> VerifyOutcome {
    match word {
        VERIFY_PASS => match target.into_target() {
            Some(target) if image.is_plausible_entry(target.addr()) => {
                VerifyOutcome::Success(target)
            }
            _ => VerifyOutcome::Ambiguous,
        },
        VERIFY_FAIL => VerifyOutcome::Failure,
        _ => VerifyOutcome::Ambiguous,
    }
}

/// Runs the boot decision state machine to its terminal disposition.
///
/// Slots are attempted in configuration order, each through the identical
/// full verification path. A rejection moves to the next slot; a fault
/// signature erases sensitive data and halts immediately, with no backup
/// attempt.
pub fn decide(env: &mut RomEnv<'_>, params: &BootParams<'_>) -> BootDisposition {
    env.ctrl.set_flow_checkpoint(RomBootStatus::FlowStarted);
    romcon::println!("[ks-rom] boot flow start");

    let primary_base = params.config.primary.base;
    for slot in params.config.attempt_order() {
        if slot.id == SlotId::Backup {
            if slot.base == primary_base {
                romcon::println!("[ks-rom] backup slot aliases primary, skipping");
                continue;
            }
            env.ctrl.set_flow_checkpoint(RomBootStatus::BackupSelected);
        }

        env.ctrl.set_flow_checkpoint(RomBootStatus::ImageLoadStarted);
        let image = match loader::load_image(env.flash, slot) {
            Ok(image) => {
                env.ctrl.set_flow_checkpoint(RomBootStatus::ImageLoadComplete);
                image
            }
            Err(e) => {
                romcon::println!(
                    "[ks-rom] {} image load failed: 0x{}",
                    slot.name,
                    HexWord(e.code())
                );
                env.ctrl.set_flow_checkpoint(RomBootStatus::ImageRejected);
                continue;
            }
        };

        env.ctrl.set_flow_checkpoint(RomBootStatus::VerifyStarted);
        romcon::println!("[ks-rom] verifying {} image", slot.name);
        env.jitter.random_delay();

        let (word, masked) = {
            #[cfg(any(test, feature = "glitch-sim"))]
            let mut verifier = ImageVerifier::new(&mut *env.digest, &mut *env.jitter)
                .with_glitch_plan(params.glitch);
            #[cfg(not(any(test, feature = "glitch-sim")))]
            let mut verifier = ImageVerifier::new(&mut *env.digest, &mut *env.jitter);
            verifier.verify(env.flash, &image)
        };
        #[cfg(any(test, feature = "glitch-sim"))]
        let word = params.glitch.forge_status.unwrap_or(word);

        match classify(word, masked, &image) {
            VerifyOutcome::Success(target) => {
                env.ctrl.set_flow_checkpoint(RomBootStatus::VerifyComplete);
                romcon::println!(
                    "[ks-rom] {} image verified, entry 0x{}",
                    slot.name,
                    HexWord(target.addr())
                );
                return BootDisposition::Launch(target);
            }
            VerifyOutcome::Failure => {
                romcon::println!("[ks-rom] {} image rejected", slot.name);
                env.vault.scrub_boot_state();
                env.ctrl.set_flow_checkpoint(RomBootStatus::ImageRejected);
            }
            VerifyOutcome::Ambiguous => {
                romcon::println!(
                    "[ks-rom] verification result inconsistent (status 0x{}), treating as fault",
                    HexWord(word)
                );
                env.ctrl.set_flow_checkpoint(RomBootStatus::FaultEscalation);
                env.vault.scrub_boot_state();
                env.vault.erase_sensitive_data();
                env.ctrl.set_flow_checkpoint(RomBootStatus::BootHalted);
                return BootDisposition::Halt(RomError::ROM_VERIFY_FAULT_SUSPECTED);
            }
        }
    }

    romcon::println!("[ks-rom] no bootable image");
    env.vault.scrub_boot_state();
    env.ctrl.set_flow_checkpoint(RomBootStatus::BootHalted);
    BootDisposition::Halt(RomError::ROM_BOOT_NO_VALID_IMAGE)
}

/// Runs [`decide`] and performs the irreversible half: hand off to the
/// verified image or halt through the platform's fatal handler.
pub fn boot(
    env: &mut RomEnv<'_>,
    params: &BootParams<'_>,
    launcher: &mut dyn Launcher,
    fatal: &mut dyn FatalErrorHandler,
) -> ! {
    match decide(env, params) {
        BootDisposition::Launch(target) => {
            env.ctrl.set_flow_checkpoint(RomBootStatus::LaunchArmed);
            env.jitter.random_delay();
            launcher.launch(target)
        }
        BootDisposition::Halt(code) => fatal.fatal_error(code.into()),
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    verify.rs

Abstract:

    Fault-injection-hardened image verification.

--*/

use constant_time_eq::constant_time_eq;
use core::hint::black_box;
use keelstone_image::Digest;

use crate::hil::{DigestEngine, FlashStorage, RandomDelay};
use crate::loader::LoadedImage;
use crate::masked::{digest_mask_word, MaskedTarget, MASK_FLAG_A, MASK_FLAG_B};
use crate::status::{VERIFY_FAIL, VERIFY_PASS};

/// The named evaluation points of the redundant check sequence, in order.
///
/// `Gate*` points observe "digests differ" and abort; `Unmask*` points
/// observe "digests agree" and strip one mask each; `Commit` releases the
/// success word. The two phrasings test the same condition from opposite
/// directions so a glitch that forces one branch direction does not satisfy
/// the complementary checks elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyCheck {
    GateOne,
    UnmaskFlagA,
    UnmaskFlagB,
    GateTwo,
    UnmaskDigest,
    GateThree,
    Commit,
}

impl VerifyCheck {
    pub const ALL: [VerifyCheck; 7] = [
        VerifyCheck::GateOne,
        VerifyCheck::UnmaskFlagA,
        VerifyCheck::UnmaskFlagB,
        VerifyCheck::GateTwo,
        VerifyCheck::UnmaskDigest,
        VerifyCheck::GateThree,
        VerifyCheck::Commit,
    ];

    pub fn from_index(index: u8) -> Option<VerifyCheck> {
        Self::ALL.get(index as usize).copied()
    }
}

/// A rehearsed fault: flip the observed outcome of one check point and/or
/// corrupt the status word after the routine returns.
#[cfg(any(test, feature = "glitch-sim"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlitchPlan {
    pub flip_check: Option<VerifyCheck>,
    pub forge_status: Option<u32>,
}

pub struct ImageVerifier<'a> {
    digest: &'a mut dyn DigestEngine,
    jitter: &'a mut dyn RandomDelay,
    #[cfg(any(test, feature = "glitch-sim"))]
    glitch: GlitchPlan,
}

impl<'a> ImageVerifier<'a> {
    pub fn new(digest: &'a mut dyn DigestEngine, jitter: &'a mut dyn RandomDelay) -> Self {
        ImageVerifier {
            digest,
            jitter,
            #[cfg(any(test, feature = "glitch-sim"))]
            glitch: GlitchPlan::default(),
        }
    }

    #[cfg(any(test, feature = "glitch-sim"))]
    pub fn with_glitch_plan(mut self, glitch: GlitchPlan) -> Self {
        self.glitch = glitch;
        self
    }

    /// Verifies the candidate image and derives its jump target.
    ///
    /// # Arguments
    /// * `flash` - storage holding the payload to digest
    /// * `image` - the loaded, not yet trusted candidate
    ///
    /// # Returns
    /// The raw status word ([`VERIFY_PASS`] or [`VERIFY_FAIL`]) together with
    /// the masked target. The target converts to a launchable address only
    /// when every check agreed; on all other paths it stays corrupted.
    ///
    /// The digests are obtained once and the comparison outcome re-evaluated
    /// at seven points; re-deriving the digest per check would harden further
    /// at the cost of one flash sweep per point.
    pub fn verify(&mut self, flash: &dyn FlashStorage, image: &LoadedImage) -> (u32, MaskedTarget) {
        let expected = match self.digest.reference_digest(image.slot) {
            Ok(digest) => digest,
            Err(_) => return (VERIFY_FAIL, MaskedTarget::poisoned()),
        };
        let actual = match self.digest.image_digest(flash, image) {
            Ok(digest) => digest,
            Err(_) => return (VERIFY_FAIL, MaskedTarget::poisoned()),
        };

        let digest_mask = digest_mask_word(&expected);
        let mut target = MaskedTarget::new(image.entry, digest_mask);

        if self.observe_mismatch(VerifyCheck::GateOne, &expected, &actual) {
            return (VERIFY_FAIL, target);
        }
        if self.observe_match(VerifyCheck::UnmaskFlagA, &expected, &actual) {
            target.unmask(MASK_FLAG_A);
        }
        self.jitter.random_delay();
        if self.observe_match(VerifyCheck::UnmaskFlagB, &expected, &actual) {
            target.unmask(MASK_FLAG_B);
        }
        if self.observe_mismatch(VerifyCheck::GateTwo, &expected, &actual) {
            return (VERIFY_FAIL, target);
        }
        self.jitter.random_delay();
        if self.observe_match(VerifyCheck::UnmaskDigest, &expected, &actual) {
            target.unmask(digest_mask);
        }
        if self.observe_mismatch(VerifyCheck::GateThree, &expected, &actual) {
            return (VERIFY_FAIL, target);
        }
        if self.observe_match(VerifyCheck::Commit, &expected, &actual) {
            return (VERIFY_PASS, target);
        }
        // Unreached when control flow is intact. If it does run, the answer
        // is failure, never success.
        (VERIFY_FAIL, target)
    }

    /// One independent "digests agree" evaluation. Every call site performs
    /// its own constant-time comparison; `black_box` keeps the optimizer
    /// from collapsing the re-evaluations into a single test.
    fn observe_match(&mut self, point: VerifyCheck, expected: &Digest, actual: &Digest) -> bool {
        let agree = black_box(constant_time_eq(
            black_box(expected.as_bytes()),
            black_box(actual.as_bytes()),
        ));
        self.apply_glitch(point, agree)
    }

    /// One independent "digests differ" evaluation, the abort-phrased twin
    /// of [`Self::observe_match`].
    fn observe_mismatch(&mut self, point: VerifyCheck, expected: &Digest, actual: &Digest) -> bool {
        let differ = !black_box(constant_time_eq(
            black_box(expected.as_bytes()),
            black_box(actual.as_bytes()),
        ));
        self.apply_glitch(point, differ)
    }

    #[cfg(any(test, feature = "glitch-sim"))]
    fn apply_glitch(&self, point: VerifyCheck, observed: bool) -> bool {
        if self.glitch.flip_check == Some(point) {
            !observed
        } else {
            observed
        }
    }

    #[cfg(not(any(test, feature = "glitch-sim")))]
    fn apply_glitch(&self, _point: VerifyCheck, observed: bool) -> bool {
        observed
    }
}

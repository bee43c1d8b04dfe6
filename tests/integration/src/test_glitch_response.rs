// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test {
    use crate::harness::Scenario;
    use keelstone_image::payload_digest;

    const FW_PRIMARY: &[u8] = b"primary firmware build for glitch runs";
    const FW_BACKUP: &[u8] = b"backup firmware build for glitch runs";

    // --glitch-check indices in verifier order: 0/3/5 are the abort-phrased
    // gates, 1/2/4 strip one mask each, 6 releases the success word.
    const UNMASK_CHECKS: [u8; 3] = [1, 2, 4];
    const ABORT_CHECKS: [u8; 4] = [0, 3, 5, 6];

    fn both_slots_good() -> Scenario {
        Scenario::with_primary_payload(FW_PRIMARY)
            .backup_payload(FW_BACKUP)
            .seed(3)
    }

    #[test]
    fn flipped_unmask_checks_erase_and_halt() {
        for index in UNMASK_CHECKS {
            let run = both_slots_good().glitch_check(index).run();

            assert_eq!(run.exit, 0xAD, "check {index}, stderr:\n{}", run.stderr);
            run.expect_stdout("verification result inconsistent");
            run.expect_stdout("[vault] sensitive data erased");
            run.expect_stdout("[emu] boot halted, code 0x010300ad");
            // Suspected faults never get a second slot to attack.
            run.reject_stdout("verifying backup");
        }
    }

    #[test]
    fn flipped_abort_checks_reject_without_erasing() {
        for index in ABORT_CHECKS {
            let run = both_slots_good().glitch_check(index).run();

            // The same fault rehearsal applies to every attempt, so the
            // backup is rejected the same way and the flow runs dry.
            assert_eq!(run.exit, 0x0B, "check {index}, stderr:\n{}", run.stderr);
            run.expect_stdout("[ks-rom] no bootable image");
            run.reject_stdout("[vault] sensitive data erased");
            run.reject_stdout("execution transferred");
        }
    }

    #[test]
    fn forged_status_words_fault_on_first_attempt() {
        for word in [0x0000_0000u32, 0xFFFF_FFFF, 0xDEAD_F00C] {
            let run = both_slots_good().forge_status(word).run();

            assert_eq!(run.exit, 0xAD, "word {word:#x}, stderr:\n{}", run.stderr);
            run.expect_stdout("verification result inconsistent");
            run.expect_stdout("[vault] sensitive data erased");
            run.reject_stdout("verifying backup");
        }
    }

    #[test]
    fn forged_pass_word_cannot_launch_a_corrupt_image() {
        let run = Scenario::with_primary_payload(FW_PRIMARY)
            .backup_payload(FW_BACKUP)
            .fuse_primary(&payload_digest(b"not what flash holds"))
            .forge_status(0xDEAD_F00D)
            .seed(3)
            .run();

        assert_eq!(run.exit, 0xAD, "stderr:\n{}", run.stderr);
        run.expect_stdout("[vault] sensitive data erased");
        run.reject_stdout("execution transferred");
    }

    #[test]
    fn forged_fail_word_reads_as_plain_rejection() {
        let run = both_slots_good().forge_status(0xF411_0911).run();

        assert_eq!(run.exit, 0x0B, "stderr:\n{}", run.stderr);
        run.expect_stdout("[ks-rom] primary image rejected");
        run.expect_stdout("[ks-rom] no bootable image");
        run.reject_stdout("[vault] sensitive data erased");
    }
}

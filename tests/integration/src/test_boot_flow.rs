// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test {
    use crate::harness::Scenario;
    use keelstone_image::payload_digest;

    const FW_PRIMARY: &[u8] = b"primary firmware build for integration runs";
    const FW_BACKUP: &[u8] = b"backup firmware build for integration runs";

    #[test]
    fn boots_pristine_primary() {
        let run = Scenario::with_primary_payload(FW_PRIMARY)
            .backup_payload(FW_BACKUP)
            .seed(7)
            .run();

        assert_eq!(run.exit, 0, "stderr:\n{}", run.stderr);
        run.expect_stdout("[ks-rom] primary image verified");
        run.expect_stdout("[emu] execution transferred to 0x00010010");
        run.reject_stdout("backup");
        run.reject_stdout("[vault] sensitive data erased");
    }

    #[test]
    fn falls_back_to_backup_when_primary_fuses_mismatch() {
        let run = Scenario::with_primary_payload(FW_PRIMARY)
            .backup_payload(FW_BACKUP)
            .fuse_primary(&payload_digest(b"a different build entirely"))
            .seed(7)
            .run();

        assert_eq!(run.exit, 0, "stderr:\n{}", run.stderr);
        run.expect_stdout("[ks-rom] primary image rejected");
        run.expect_stdout("[ks-rom] verifying backup image");
        run.expect_stdout("[emu] execution transferred to 0x00050010");
        run.reject_stdout("[vault] sensitive data erased");
    }

    #[test]
    fn halts_when_no_slot_verifies() {
        let run = Scenario::with_primary_payload(FW_PRIMARY)
            .backup_payload(FW_BACKUP)
            .fuse_primary(&payload_digest(b"wrong for primary"))
            .fuse_backup(&payload_digest(b"wrong for backup"))
            .seed(7)
            .run();

        assert_eq!(run.exit, 0x0B, "stderr:\n{}", run.stderr);
        run.expect_stdout("[ks-rom] no bootable image");
        run.expect_stdout("[emu] boot halted, code 0x0103000b");
        run.reject_stdout("execution transferred");
        // Plain mismatches never cost the device its secrets.
        run.reject_stdout("[vault] sensitive data erased");
    }

    #[test]
    fn erased_backup_slot_is_a_plain_rejection() {
        let run = Scenario::with_primary_payload(FW_PRIMARY)
            .fuse_primary(&payload_digest(b"wrong for primary"))
            .seed(7)
            .run();

        assert_eq!(run.exit, 0x0B, "stderr:\n{}", run.stderr);
        run.expect_stdout("[ks-rom] backup image load failed");
        run.expect_stdout("[emu] boot halted, code 0x0103000b");
    }

    #[test]
    fn refuses_an_image_larger_than_its_slot() {
        let oversized = vec![0x77u8; 0x0004_0000];
        let run = Scenario::with_primary_payload(&oversized).run();

        assert_eq!(run.exit, 1, "stdout:\n{}", run.stdout);
        assert!(
            run.stderr.contains("does not fit the primary slot"),
            "stderr:\n{}",
            run.stderr
        );
    }
}

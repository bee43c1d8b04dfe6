// Licensed under the Apache-2.0 license

//! End-to-end boot scenarios, driven through the emulator binary exactly the
//! way an operator would run it.

mod test_boot_flow;
mod test_glitch_response;

#[cfg(test)]
mod harness {
    use keelstone_image::{build_image, Digest, ImageHeader};
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use std::sync::{LazyLock, Mutex};
    use tempfile::TempDir;

    pub static PROJECT_ROOT: LazyLock<PathBuf> = LazyLock::new(|| {
        Path::new(&env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .parent()
            .unwrap()
            .to_path_buf()
    });

    // The first run compiles the emulator; serialize runs so concurrent
    // tests do not race the build and stdout assertions stay per-scenario.
    pub static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    /// Entry offset used for every generated image: first payload word.
    pub fn entry_offset() -> u32 {
        ImageHeader::SIZE as u32
    }

    pub struct BootRun {
        pub exit: i32,
        pub stdout: String,
        pub stderr: String,
    }

    impl BootRun {
        pub fn expect_stdout(&self, needle: &str) {
            assert!(
                self.stdout.contains(needle),
                "expected {needle:?} in stdout:\n{}",
                self.stdout
            );
        }

        pub fn reject_stdout(&self, needle: &str) {
            assert!(
                !self.stdout.contains(needle),
                "unexpected {needle:?} in stdout:\n{}",
                self.stdout
            );
        }
    }

    /// One emulator invocation under construction. Image files live in a
    /// scenario-owned temp directory.
    pub struct Scenario {
        dir: TempDir,
        args: Vec<String>,
    }

    impl Scenario {
        pub fn with_primary_payload(payload: &[u8]) -> Self {
            let mut scenario = Scenario {
                dir: TempDir::new().unwrap(),
                args: Vec::new(),
            };
            let path = scenario.write_image("primary.bin", payload);
            scenario.arg("--primary-image", &path);
            scenario
        }

        fn write_image(&self, name: &str, payload: &[u8]) -> String {
            let image = build_image(payload, entry_offset()).unwrap();
            let path = self.dir.path().join(name);
            std::fs::write(&path, image).unwrap();
            path.to_str().unwrap().to_string()
        }

        fn arg(&mut self, flag: &str, value: &str) {
            self.args.push(flag.to_string());
            self.args.push(value.to_string());
        }

        pub fn backup_payload(mut self, payload: &[u8]) -> Self {
            let path = self.write_image("backup.bin", payload);
            self.arg("--backup-image", &path);
            self
        }

        pub fn fuse_primary(mut self, digest: &Digest) -> Self {
            self.arg("--fuse-digest-primary", &hex::encode(digest.as_bytes()));
            self
        }

        pub fn fuse_backup(mut self, digest: &Digest) -> Self {
            self.arg("--fuse-digest-backup", &hex::encode(digest.as_bytes()));
            self
        }

        pub fn glitch_check(mut self, index: u8) -> Self {
            self.arg("--glitch-check", &index.to_string());
            self
        }

        pub fn forge_status(mut self, word: u32) -> Self {
            self.arg("--forge-status", &format!("{word:#x}"));
            self
        }

        pub fn seed(mut self, seed: u64) -> Self {
            self.arg("--seed", &seed.to_string());
            self
        }

        pub fn run(self) -> BootRun {
            let _lock = TEST_LOCK.lock().unwrap();
            let output = Command::new("cargo")
                .args(["run", "-p", "emulator", "--quiet", "--"])
                .args(&self.args)
                .current_dir(&*PROJECT_ROOT)
                .output()
                .expect("failed to spawn emulator");
            BootRun {
                exit: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }
        }
    }
}

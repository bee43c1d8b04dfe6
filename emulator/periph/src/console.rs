// Licensed under the Apache-2.0 license

use std::io::Write as _;

/// Routes the ROM console to the emulator process stdout, unbuffered so
/// output interleaves correctly with device banners when the process exits
/// mid-line.
pub struct StdoutConsole;

impl core::fmt::Write for StdoutConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut out = std::io::stdout();
        out.write_all(s.as_bytes()).map_err(|_| core::fmt::Error)?;
        out.flush().map_err(|_| core::fmt::Error)
    }
}

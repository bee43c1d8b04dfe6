// Licensed under the Apache-2.0 license

use core::fmt::Write;

// There is only ever one boot context and no preemption before the ROM hands
// off control, so a plain static is sufficient here.
#[allow(static_mut_refs)]
static mut CONSOLE: Option<&'static mut dyn Write> = None;

/// Install the console writer. Later installs replace earlier ones.
pub fn set_console(writer: &'static mut dyn Write) {
    unsafe {
        CONSOLE = Some(writer);
    }
}

#[doc(hidden)]
#[allow(static_mut_refs)]
pub fn _print(args: core::fmt::Arguments) {
    unsafe {
        if let Some(console) = CONSOLE.as_mut() {
            // Console write errors are not actionable this early in boot.
            let _ = console.write_fmt(args);
        }
    }
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::_print(core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {{
        $crate::_print(core::format_args!($($arg)*));
        $crate::print!("\n");
    }};
}

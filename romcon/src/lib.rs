// Licensed under the Apache-2.0 license

//! Minimal console for Keelstone boot ROM output.
//!
//! Platforms install a [`core::fmt::Write`] implementation once at startup;
//! until then the `print!`/`println!` macros are no-ops, so ROM code can log
//! unconditionally.

#![cfg_attr(not(test), no_std)]

mod console;
mod hex;

pub use console::{set_console, _print};
pub use hex::{HexBytes, HexWord};

// Licensed under the Apache-2.0 license

//! Flash storage implementations.

mod memory;

pub use memory::SimpleFlash;

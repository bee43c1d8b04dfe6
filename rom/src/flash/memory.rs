// Licensed under the Apache-2.0 license

//! In-memory flash storage, used by emulated boots and tests.

use crate::hil::{FlashDrvError, FlashStorage};
use core::{cell::Cell, result::Result};

pub struct SimpleFlash {
    memory: Cell<&'static mut [u8]>,
}

impl SimpleFlash {
    /// Create a new SimpleFlash instance backed by the provided memory slice.
    pub fn new(memory: &'static mut [u8]) -> Self {
        SimpleFlash {
            memory: Cell::new(memory),
        }
    }

    fn range(len: usize, address: usize, count: usize) -> Result<usize, FlashDrvError> {
        let end = address.checked_add(count).ok_or(FlashDrvError::INVAL)?;
        if end > len {
            return Err(FlashDrvError::INVAL);
        }
        Ok(end)
    }
}

impl FlashStorage for SimpleFlash {
    fn read(&self, buffer: &mut [u8], address: usize) -> Result<(), FlashDrvError> {
        let mem = self.memory.take();
        let result = match Self::range(mem.len(), address, buffer.len()) {
            Ok(end) => {
                let slice = &mem[address..end];
                // Same as copy_from_slice, but without dragging its panic
                // path into the ROM image.
                unsafe {
                    core::ptr::copy_nonoverlapping(
                        slice.as_ptr(),
                        buffer.as_mut_ptr(),
                        buffer.len(),
                    );
                }
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.memory.set(mem);
        result
    }

    fn write(&self, buffer: &[u8], address: usize) -> Result<(), FlashDrvError> {
        let mem = self.memory.take();
        let result = match Self::range(mem.len(), address, buffer.len()) {
            Ok(end) => {
                mem[address..end].copy_from_slice(buffer);
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.memory.set(mem);
        result
    }

    /// Erased bytes read back as zero.
    fn erase(&self, address: usize, length: usize) -> Result<(), FlashDrvError> {
        let mem = self.memory.take();
        let result = match Self::range(mem.len(), address, length) {
            Ok(end) => {
                mem[address..end].fill(0);
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.memory.set(mem);
        result
    }

    fn capacity(&self) -> usize {
        let mem = self.memory.take();
        let len = mem.len();
        self.memory.set(mem);
        len
    }
}

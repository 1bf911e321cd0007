//! Named, sector-aligned regions of a single on-chip flash device.

use embedded_storage::nor_flash::{NorFlash, NorFlashError, ReadNorFlash};

use crate::error::PatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub name: &'static str,
    pub base_offset: u32,
    pub length: u32,
}

impl Partition {
    pub const fn new(name: &'static str, base_offset: u32, length: u32) -> Self {
        Self {
            name,
            base_offset,
            length,
        }
    }

    pub fn read<F: ReadNorFlash>(
        &self,
        flash: &mut F,
        offset: u32,
        buf: &mut [u8],
    ) -> Result<(), PatchError> {
        flash
            .read(self.base_offset + offset, buf)
            .map_err(|e| PatchError::FlashReadFailed(e.kind()))
    }

    /// Caller guarantees the target range is already erased.
    pub fn write<F: NorFlash>(
        &self,
        flash: &mut F,
        offset: u32,
        buf: &[u8],
    ) -> Result<(), PatchError> {
        flash
            .write(self.base_offset + offset, buf)
            .map_err(|e| PatchError::FlashWriteFailed(e.kind()))
    }

    /// `offset` and `len` must be sector-aligned.
    pub fn erase<F: NorFlash>(&self, flash: &mut F, offset: u32, len: u32) -> Result<(), PatchError> {
        let from = self.base_offset + offset;
        let to = from + len;
        flash
            .erase(from, to)
            .map_err(|e| PatchError::FlashEraseFailed(e.kind()))
    }
}

/// `sector_size` must be non-zero (enforced by every flash device's `ERASE_SIZE`).
pub const fn round_up_to_sector(value: u32, sector_size: u32) -> u32 {
    let rem = value % sector_size;
    if rem == 0 { value } else { value + (sector_size - rem) }
}

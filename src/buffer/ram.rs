use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
use heapless::Vec;

use super::CommitBuffer;
use crate::{error::PatchError, flash::Partition};

/// Variant B: the commit buffer lives in a fixed-capacity RAM region.
///
/// `N` must be chosen `>=` the old partition's sector size or the commit
/// protocol never sector-aligns a commit and can't terminate correctly.
pub struct RamBuffer<const N: usize> {
    data: Vec<u8, N>,
}

impl<const N: usize> RamBuffer<N> {
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }
}

impl<const N: usize> Default for RamBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: NorFlash + ReadNorFlash, const N: usize> CommitBuffer<F> for RamBuffer<N> {
    fn capacity(&self) -> u32 {
        N as u32
    }

    fn fill(&self) -> u32 {
        self.data.len() as u32
    }

    fn append(&mut self, _flash: &mut F, data: &[u8]) -> Result<(), PatchError> {
        self.data.extend_from_slice(data).map_err(|()| PatchError::BufferAllocFailed)
    }

    fn drain_to(&mut self, flash: &mut F, dst: Partition, dst_offset: u32) -> Result<(), PatchError> {
        dst.write(flash, dst_offset, &self.data)
    }

    fn reset(&mut self, _flash: &mut F) -> Result<(), PatchError> {
        self.data.clear();
        Ok(())
    }
}

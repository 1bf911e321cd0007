use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};

use super::CommitBuffer;
use crate::{error::PatchError, flash::Partition};

/// Variant A: the commit buffer lives in a dedicated swap partition.
///
/// `SCRATCH` sizes the fixed RAM scratch buffer `drain_to` uses to copy
/// swap -> old in chunks, commonly 4 KiB.
pub struct FlashSwapBuffer<const SCRATCH: usize = 4096> {
    swap: Partition,
    fill: u32,
}

impl<const SCRATCH: usize> FlashSwapBuffer<SCRATCH> {
    /// Construct the buffer for `swap` without touching flash. Callers must
    /// erase the swap region once up front (the orchestrator's init step
    /// does this via [`CommitBuffer::reset`]).
    pub const fn new(swap: Partition) -> Self {
        Self { swap, fill: 0 }
    }
}

impl<F: NorFlash + ReadNorFlash, const SCRATCH: usize> CommitBuffer<F> for FlashSwapBuffer<SCRATCH> {
    fn capacity(&self) -> u32 {
        self.swap.length
    }

    fn fill(&self) -> u32 {
        self.fill
    }

    fn append(&mut self, flash: &mut F, data: &[u8]) -> Result<(), PatchError> {
        self.swap.write(flash, self.fill, data)?;
        self.fill += data.len() as u32;
        Ok(())
    }

    fn drain_to(&mut self, flash: &mut F, dst: Partition, dst_offset: u32) -> Result<(), PatchError> {
        let mut scratch = [0u8; SCRATCH];
        let mut copied = 0u32;
        while copied < self.fill {
            let chunk = core::cmp::min(SCRATCH as u32, self.fill - copied) as usize;
            self.swap.read(flash, copied, &mut scratch[..chunk])?;
            dst.write(flash, dst_offset + copied, &scratch[..chunk])?;
            copied += chunk as u32;
        }
        Ok(())
    }

    fn reset(&mut self, flash: &mut F) -> Result<(), PatchError> {
        self.swap.erase(flash, 0, self.swap.length)?;
        self.fill = 0;
        Ok(())
    }
}

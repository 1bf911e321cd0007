//! The bounded side-buffer that decouples new-image writes from the old
//! image being read.
//!
//! The flash-swap and RAM variants share one `commit()`/write loop (see
//! [`crate::session`]) parameterised over this trait instead of each
//! implementing its own copy of the commit protocol.

mod flash_swap;
mod ram;

pub use flash_swap::FlashSwapBuffer;
pub use ram::RamBuffer;

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};

use crate::{error::PatchError, flash::Partition};

/// A bounded side-buffer that queues new-image bytes until a commit drains
/// them onto the old partition.
///
/// `F` is the flash device the buffer's storage (if any) lives on; `append`
/// and `drain_to` take `&mut F` explicitly rather than owning a reference to
/// it, so the same flash device can also be borrowed by the old/patch
/// partitions without conflicting borrows.
pub trait CommitBuffer<F: NorFlash + ReadNorFlash> {
    /// Total capacity in bytes. Fixed for the lifetime of the buffer.
    fn capacity(&self) -> u32;

    /// Bytes currently queued.
    fn fill(&self) -> u32;

    /// Queue `data` into the buffer. Caller guarantees
    /// `data.len() <= capacity() - fill()`.
    fn append(&mut self, flash: &mut F, data: &[u8]) -> Result<(), PatchError>;

    /// Drain the first `fill()` bytes of the buffer onto `dst` at
    /// `dst_offset`, sector-aligned writes already guaranteed by the caller.
    fn drain_to(&mut self, flash: &mut F, dst: Partition, dst_offset: u32) -> Result<(), PatchError>;

    /// Re-arm the buffer after a successful drain: reset `fill()` to zero
    /// and, for flash-backed buffers, erase the storage region so the next
    /// `append` lands on erased flash.
    fn reset(&mut self, flash: &mut F) -> Result<(), PatchError>;
}

/// Lets `&mut dyn CommitBuffer<F>` stand in for `B: CommitBuffer<F>`, so
/// [`crate::orchestrator::release_patch`] can select between
/// [`RamBuffer`]/[`FlashSwapBuffer`] at runtime via `PatchConfig` while
/// [`crate::session::SessionState`] stays generic over a single `B`.
impl<F: NorFlash + ReadNorFlash, T: CommitBuffer<F> + ?Sized> CommitBuffer<F> for &mut T {
    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn fill(&self) -> u32 {
        (**self).fill()
    }

    fn append(&mut self, flash: &mut F, data: &[u8]) -> Result<(), PatchError> {
        (**self).append(flash, data)
    }

    fn drain_to(&mut self, flash: &mut F, dst: Partition, dst_offset: u32) -> Result<(), PatchError> {
        (**self).drain_to(flash, dst, dst_offset)
    }

    fn reset(&mut self, flash: &mut F) -> Result<(), PatchError> {
        (**self).reset(flash)
    }
}

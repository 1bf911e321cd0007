//! The public entry point of the core, `release_patch`.

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};

use crate::{buffer::CommitBuffer, decoder::DeltaDecoder, error::PatchError, flash::Partition, session::SessionState};

/// Which commit-buffer strategy a call to [`release_patch`] uses: a sum
/// type over a borrowed [`CommitBuffer`], constructed by the caller as
/// either a [`crate::FlashSwapBuffer`] or a [`crate::RamBuffer`] and
/// type-erased here, since the two variants are driven through the
/// identical commit/write loop regardless of which concrete buffer backs
/// them.
pub enum PatchConfig<'b, F: NorFlash + ReadNorFlash> {
    FlashSwap(&'b mut dyn CommitBuffer<F>),
    Ram(&'b mut dyn CommitBuffer<F>),
}

impl<'b, F: NorFlash + ReadNorFlash> PatchConfig<'b, F> {
    fn into_buffer(self) -> &'b mut dyn CommitBuffer<F> {
        match self {
            PatchConfig::FlashSwap(b) | PatchConfig::Ram(b) => b,
        }
    }
}

/// Run one patch session to completion: `old` is overwritten in place
/// with the image `decoder` produces from `patch` against the bytes
/// `old` already holds.
///
/// Config validation happens here; the run, final flush, tail erase, and
/// length check live on [`SessionState`]. `patch_total_len` and
/// `newer_total_len` come from the update package header (outside this
/// crate's scope); `old` must already name the partition being updated.
///
/// # Errors
///
/// Returns [`PatchError::SwapPartitionMissing`] or
/// [`PatchError::BufferAllocFailed`] if the chosen buffer can't support
/// the commit protocol, any `Flash*Failed` variant on the first I/O
/// error, [`PatchError::DecoderFailed`] if the decoder reports failure,
/// or [`PatchError::LengthMismatch`] if the session completes with
/// `committed_len != newer_total_len`.
pub fn release_patch<F, D>(
    flash: &mut F,
    patch: Partition,
    patch_total_len: u32,
    old: Partition,
    newer_total_len: u32,
    config: PatchConfig<'_, F>,
    decoder: &mut D,
) -> Result<(), PatchError>
where
    F: NorFlash + ReadNorFlash,
    D: DeltaDecoder,
{
    let sector = F::ERASE_SIZE as u32;
    let buffer = config.into_buffer();

    if buffer.capacity() == 0 {
        return Err(PatchError::SwapPartitionMissing);
    }
    if buffer.capacity() < sector {
        return Err(PatchError::BufferAllocFailed);
    }
    buffer.reset(flash)?;

    let mut session = SessionState::new(flash, patch, patch_total_len, old, newer_total_len, buffer);

    // `decode` returns callback errors (flash I/O) unchanged and its own
    // failures as `DecoderFailed`.
    decoder.decode(&mut session)?;

    session.finish()
}

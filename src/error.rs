use embedded_storage::nor_flash::NorFlashErrorKind;

/// Error returned by [`crate::release_patch`] and the pieces it drives.
///
/// Carries `NorFlashErrorKind` on the I/O variants rather than a generic
/// flash error type, since callers only ever need to tell read/write/erase
/// failures apart, not recover the original error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    /// The configured swap partition is missing or zero-length.
    SwapPartitionMissing,
    /// The commit buffer's capacity is smaller than the flash sector size,
    /// so the commit protocol could never make progress.
    BufferAllocFailed,
    /// A flash `erase` call failed.
    FlashEraseFailed(NorFlashErrorKind),
    /// A flash `write` call failed.
    FlashWriteFailed(NorFlashErrorKind),
    /// A flash `read` call failed.
    FlashReadFailed(NorFlashErrorKind),
    /// The delta decoder reported failure.
    DecoderFailed,
    /// After a successful decode, `committed_len != newer_total_len`.
    LengthMismatch { expected: u32, committed: u32 },
}

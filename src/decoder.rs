//! The decoder that turns `old + patch -> new` is an external library; this
//! crate only specifies the three callbacks it drives and the shape of the
//! object that implements them. Both are plain traits rather than C-style
//! function pointers plus an opaque handle — [`crate::session::SessionState`]
//! implements [`DecoderCallbacks`] directly, since it already owns everything
//! the three callbacks touch (`patch_read_pos`, the old partition, the
//! commit buffer).

use crate::error::PatchError;

/// The three callbacks a delta decoder drives during a session.
///
/// Implemented by [`crate::session::SessionState`]. All three are
/// object-safe so a decoder can hold `&mut dyn DecoderCallbacks` without
/// needing to know the concrete flash/buffer types involved.
pub trait DecoderCallbacks {
    /// Sequential read of the next chunk of patch bytes. Returns the
    /// number of bytes actually placed in `buf`; `Ok(0)` signals end of the
    /// patch stream. Reads past the end of the patch window are benign and
    /// also report `Ok(0)` rather than an error.
    fn read_patch(&mut self, buf: &mut [u8]) -> Result<usize, PatchError>;

    /// Random-access read of the old image at absolute address `addr`.
    /// `addr + buf.len()` must not exceed the old partition's length.
    fn read_old(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), PatchError>;

    /// Strictly sequential append of new-image bytes. The sum of
    /// `buf.len()` across all calls in a session must equal the expected
    /// new-image length.
    fn write_new(&mut self, buf: &[u8]) -> Result<(), PatchError>;
}

/// The external delta-decoder library, invoked once per session.
///
/// A real implementation wraps a streaming binary-delta algorithm (e.g. an
/// `hdiff`/`bsdiff`-family decoder) bridged to this trait; this crate never
/// ships one. Tests drive the engine with a small scripted decoder under
/// `tests/support` instead.
pub trait DeltaDecoder {
    /// Run the decoder to completion against `callbacks`, or return
    /// [`PatchError::DecoderFailed`] on any internal decoder error. Errors
    /// propagated up from a callback should be returned unchanged.
    fn decode(&mut self, callbacks: &mut dyn DecoderCallbacks) -> Result<(), PatchError>;
}

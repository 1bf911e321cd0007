//! Session state for one patch run, plus the three decoder callbacks
//! (patch reader, old reader, new-writer) it implements.

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};

use crate::{
    buffer::CommitBuffer,
    decoder::DecoderCallbacks,
    error::PatchError,
    flash::{round_up_to_sector, Partition},
    progress::ProgressTracker,
};

/// All state for one patch session: the patch/old partitions, the commit
/// buffer, and the monotonically-advancing read/write positions.
///
/// Implements [`DecoderCallbacks`] directly rather than through a separate
/// adapter — it already owns everything the three callbacks touch.
pub struct SessionState<'f, F, B> {
    flash: &'f mut F,
    patch: Partition,
    patch_total_len: u32,
    patch_read_pos: u32,
    old: Partition,
    newer_total_len: u32,
    newer_write_pos: u32,
    committed_len: u32,
    buffer: B,
    progress: ProgressTracker,
}

impl<'f, F, B> SessionState<'f, F, B>
where
    F: NorFlash + ReadNorFlash,
    B: CommitBuffer<F>,
{
    pub(crate) fn new(
        flash: &'f mut F,
        patch: Partition,
        patch_total_len: u32,
        old: Partition,
        newer_total_len: u32,
        buffer: B,
    ) -> Self {
        Self {
            flash,
            patch,
            patch_total_len,
            patch_read_pos: 0,
            old,
            newer_total_len,
            newer_write_pos: 0,
            committed_len: 0,
            buffer,
            progress: ProgressTracker::new(),
        }
    }

    /// Drain the commit buffer onto `old` at `committed_len` and advance it:
    /// erase, flash-to-flash (or RAM) copy, re-arm, advance.
    fn commit(&mut self) -> Result<(), PatchError> {
        let fill = self.buffer.fill();
        if fill == 0 {
            return Ok(());
        }
        let sector = F::ERASE_SIZE as u32;
        let erase_len = core::cmp::min(
            round_up_to_sector(fill, sector),
            self.old.length - self.committed_len,
        );
        self.old.erase(self.flash, self.committed_len, erase_len)?;
        self.buffer.drain_to(self.flash, self.old, self.committed_len)?;
        self.buffer.reset(self.flash)?;
        self.committed_len += fill;
        #[cfg(feature = "log")]
        log::info!("commit: {fill} bytes, committed_len={}", self.committed_len);
        Ok(())
    }

    fn report_progress(&mut self) {
        if let Some(_pct) = self.progress.update(self.newer_write_pos, self.newer_total_len) {
            #[cfg(feature = "log")]
            log::info!("Buffering... {_pct}%");
        }
    }

    /// Final flush, tail erase, and length verification. Called by the
    /// orchestrator once the decoder returns successfully.
    pub(crate) fn finish(&mut self) -> Result<(), PatchError> {
        if self.buffer.fill() > 0 {
            self.commit()?;
        }

        if self.newer_total_len < self.old.length {
            let sector = F::ERASE_SIZE as u32;
            let erase_start = round_up_to_sector(self.newer_total_len, sector);
            if erase_start < self.old.length {
                if let Err(_e) = self.old.erase(self.flash, erase_start, self.old.length - erase_start) {
                    #[cfg(feature = "log")]
                    log::warn!("tail erase failed: {_e:?}");
                }
            }
        }

        if self.committed_len != self.newer_total_len {
            return Err(PatchError::LengthMismatch {
                expected: self.newer_total_len,
                committed: self.committed_len,
            });
        }
        Ok(())
    }
}

impl<F, B> DecoderCallbacks for SessionState<'_, F, B>
where
    F: NorFlash + ReadNorFlash,
    B: CommitBuffer<F>,
{
    fn read_patch(&mut self, buf: &mut [u8]) -> Result<usize, PatchError> {
        let remaining = self.patch_total_len - self.patch_read_pos;
        let len = core::cmp::min(buf.len() as u32, remaining) as usize;
        if len == 0 {
            return Ok(0);
        }
        self.patch.read(self.flash, self.patch_read_pos, &mut buf[..len])?;
        self.patch_read_pos += len as u32;
        Ok(len)
    }

    fn read_old(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), PatchError> {
        #[cfg(any(debug_assertions, feature = "strict"))]
        assert!(
            addr >= self.committed_len,
            "central safety invariant violated: read at {addr} precedes committed_len {}",
            self.committed_len
        );
        self.old.read(self.flash, addr, buf)
    }

    fn write_new(&mut self, mut data: &[u8]) -> Result<(), PatchError> {
        let original_len = data.len() as u32;
        while !data.is_empty() {
            let free = self.buffer.capacity() - self.buffer.fill();
            if (free as usize) < data.len() {
                if free > 0 {
                    let (head, tail) = data.split_at(free as usize);
                    self.buffer.append(self.flash, head)?;
                    data = tail;
                }
                self.commit()?;
            } else {
                self.buffer.append(self.flash, data)?;
                data = &[];
            }
        }
        self.newer_write_pos += original_len;
        self.report_progress();
        Ok(())
    }
}

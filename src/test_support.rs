//! Simulated NOR flash for the test suite: the blocking subset of
//! `embedded-storage` this crate actually uses, plus write-range tracking
//! so tests can assert the central safety invariant directly against the
//! flash rather than only through `SessionState`'s internal check.
//!
//! Public (not `#[cfg(test)]`) behind the `std` feature so both unit tests
//! in `src/` and the integration tests under `tests/` can share it.

extern crate std;

use std::vec::Vec;

use embedded_storage::nor_flash::{ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VecFlashError(pub NorFlashErrorKind);

impl NorFlashError for VecFlashError {
    fn kind(&self) -> NorFlashErrorKind {
        self.0
    }
}

pub struct VecFlash<const ERASE_SIZE: usize = 4096> {
    data: Vec<u8>,
    written_ranges: Vec<(u32, u32)>,
    read_calls: usize,
    write_calls: usize,
    erase_calls: usize,
    fail_read_at: Option<usize>,
    fail_write_at: Option<usize>,
    fail_erase_at: Option<usize>,
    /// When set, every `read` is checked against `written_ranges` and panics
    /// if it overlaps a range written since the flash was erased-fresh.
    pub assert_no_stale_read: bool,
}

impl<const ERASE_SIZE: usize> VecFlash<ERASE_SIZE> {
    pub fn new(size: usize, _sector_size: usize) -> Self {
        assert_eq!(size % ERASE_SIZE, 0, "flash size must be a multiple of ERASE_SIZE");
        Self {
            data: std::vec![0xFFu8; size],
            written_ranges: Vec::new(),
            read_calls: 0,
            write_calls: 0,
            erase_calls: 0,
            fail_read_at: None,
            fail_write_at: None,
            fail_erase_at: None,
            assert_no_stale_read: false,
        }
    }

    pub fn preload(&mut self, offset: u32, bytes: &[u8]) {
        let start = offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    pub fn fail_nth_read(&mut self, n: usize) {
        self.fail_read_at = Some(n);
    }

    pub fn fail_nth_write(&mut self, n: usize) {
        self.fail_write_at = Some(n);
    }

    pub fn fail_nth_erase(&mut self, n: usize) {
        self.fail_erase_at = Some(n);
    }

    fn overlaps_written(&self, addr: u32, len: u32) -> bool {
        let (start, end) = (addr, addr + len);
        self.written_ranges
            .iter()
            .any(|&(ws, we)| start < we && ws < end)
    }
}

impl<const ERASE_SIZE: usize> ErrorType for VecFlash<ERASE_SIZE> {
    type Error = VecFlashError;
}

impl<const ERASE_SIZE: usize> ReadNorFlash for VecFlash<ERASE_SIZE> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.read_calls += 1;
        if self.fail_read_at == Some(self.read_calls) {
            return Err(VecFlashError(NorFlashErrorKind::Other));
        }
        if self.assert_no_stale_read {
            assert!(
                !self.overlaps_written(offset, bytes.len() as u32),
                "central safety invariant violated: read at {offset} overlaps an already-committed range"
            );
        }
        let start = offset as usize;
        bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl<const ERASE_SIZE: usize> NorFlash for VecFlash<ERASE_SIZE> {
    const WRITE_SIZE: usize = 1;
    const ERASE_SIZE: usize = ERASE_SIZE;

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_calls += 1;
        if self.fail_write_at == Some(self.write_calls) {
            return Err(VecFlashError(NorFlashErrorKind::Other));
        }
        let start = offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        self.written_ranges.push((offset, offset + bytes.len() as u32));
        Ok(())
    }

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        self.erase_calls += 1;
        if self.fail_erase_at == Some(self.erase_calls) {
            return Err(VecFlashError(NorFlashErrorKind::Other));
        }
        let (start, end) = (from as usize, to as usize);
        self.data[start..end].fill(0xFF);
        // An erase un-writes the range for the stale-read check.
        self.written_ranges.retain(|&(ws, we)| we <= from || ws >= to);
        Ok(())
    }
}

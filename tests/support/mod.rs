//! A scripted decoder for the integration tests. Not a delta-compression
//! format: it plays back a fixed sequence of `Copy`/`Insert`/`PullPatch`
//! ops against the three callbacks a real decoder would drive.

use diffpatch_core::{DecoderCallbacks, DeltaDecoder, PatchError};

pub enum Op {
    /// Copy `len` bytes starting at `old_addr` in the old image into the
    /// new image, via `read_old` + `write_new`.
    Copy { old_addr: u32, len: u32 },
    /// Append literal bytes to the new image via `write_new`.
    Insert { bytes: Vec<u8> },
    /// Pull `len` bytes out of the patch stream via `read_patch` and
    /// discard them. Exists only to exercise that path, since the other
    /// two ops never call `read_patch`.
    PullPatch { len: u32 },
}

pub struct ScriptDecoder {
    ops: Vec<Op>,
    copy_chunk: u32,
    pull_chunk: u32,
}

impl ScriptDecoder {
    pub fn new(ops: Vec<Op>) -> Self {
        Self {
            ops,
            copy_chunk: 256,
            pull_chunk: 100,
        }
    }
}

impl DeltaDecoder for ScriptDecoder {
    fn decode(&mut self, callbacks: &mut dyn DecoderCallbacks) -> Result<(), PatchError> {
        let mut scratch = [0u8; 256];
        for op in &self.ops {
            match op {
                Op::Copy { old_addr, len } => {
                    let mut addr = *old_addr;
                    let mut remaining = *len;
                    while remaining > 0 {
                        let chunk = core::cmp::min(remaining, self.copy_chunk) as usize;
                        callbacks.read_old(addr, &mut scratch[..chunk])?;
                        callbacks.write_new(&scratch[..chunk])?;
                        addr += chunk as u32;
                        remaining -= chunk as u32;
                    }
                }
                Op::Insert { bytes } => {
                    callbacks.write_new(bytes)?;
                }
                Op::PullPatch { len } => {
                    let mut remaining = *len;
                    while remaining > 0 {
                        let chunk = core::cmp::min(remaining, self.pull_chunk) as usize;
                        let got = callbacks.read_patch(&mut scratch[..chunk])?;
                        if got == 0 {
                            break;
                        }
                        remaining -= got as u32;
                    }
                }
            }
        }
        Ok(())
    }
}

//! In-place differential firmware patch engine for single-flash bootloaders.
//!
//! This crate implements the core of an update mechanism that overwrites a
//! microcontroller's resident application partition with a new image, given
//! only a binary delta (patch) against the old image and a bounded side
//! buffer to break the read-while-write hazard: the delta decoder may still
//! need to read bytes from the old image at the same time the engine is
//! writing the new one over it.
//!
//! The delta decoder itself (the algorithm that turns `old + patch -> new`)
//! is an external collaborator — see [`decoder`] for the three-callback
//! contract it is expected to drive. Flash access is expressed through
//! `embedded-storage`'s [`embedded_storage::nor_flash::NorFlash`] /
//! [`embedded_storage::nor_flash::ReadNorFlash`] traits, so this crate works
//! against any flash device that implements them.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod boot;
pub mod buffer;
pub mod decoder;
pub mod error;
pub mod flash;
pub mod orchestrator;
mod progress;
pub mod session;
#[cfg(feature = "std")]
pub mod test_support;

pub use buffer::{CommitBuffer, FlashSwapBuffer, RamBuffer};
pub use decoder::{DecoderCallbacks, DeltaDecoder};
pub use error::PatchError;
pub use flash::Partition;
pub use orchestrator::{release_patch, PatchConfig};
pub use session::SessionState;

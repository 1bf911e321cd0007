//! End-to-end scenarios against both commit-buffer strategies and the
//! simulated flash in `test_support`.

mod support;

use diffpatch_core::test_support::VecFlash;
use diffpatch_core::{release_patch, FlashSwapBuffer, Partition, PatchConfig, RamBuffer};
use support::{Op, ScriptDecoder};

const SECTOR: usize = 4096;

fn layout(old_len: usize, patch_len: usize, swap_len: usize) -> (VecFlash, Partition, Partition, Partition) {
    let total = old_len + patch_len + swap_len;
    let flash = VecFlash::new(total, SECTOR);
    let old = Partition::new("old", 0, old_len as u32);
    let patch = Partition::new("patch", old_len as u32, patch_len as u32);
    let swap = Partition::new("swap", (old_len + patch_len) as u32, swap_len as u32);
    (flash, old, patch, swap)
}

fn run_ram(
    flash: &mut VecFlash,
    patch: Partition,
    old: Partition,
    newer_total_len: u32,
    ops: Vec<Op>,
) -> Result<(), diffpatch_core::PatchError> {
    let mut buffer = RamBuffer::<SECTOR>::new();
    let mut decoder = ScriptDecoder::new(ops);
    release_patch(
        flash,
        patch,
        patch.length,
        old,
        newer_total_len,
        PatchConfig::Ram(&mut buffer),
        &mut decoder,
    )
}

fn run_flash_swap(
    flash: &mut VecFlash,
    patch: Partition,
    old: Partition,
    swap: Partition,
    newer_total_len: u32,
    ops: Vec<Op>,
) -> Result<(), diffpatch_core::PatchError> {
    let mut buffer = FlashSwapBuffer::<256>::new(swap);
    let mut decoder = ScriptDecoder::new(ops);
    release_patch(
        flash,
        patch,
        patch.length,
        old,
        newer_total_len,
        PatchConfig::FlashSwap(&mut buffer),
        &mut decoder,
    )
}

#[test]
fn s1_identity_patch() {
    let (mut flash, old, patch, _swap) = layout(128 * 1024, 16, 0);
    flash.preload(old.base_offset, &[0xA5u8; 128 * 1024]);
    flash.assert_no_stale_read = true;

    let ops = vec![Op::Copy {
        old_addr: 0,
        len: 128 * 1024,
    }];
    run_ram(&mut flash, patch, old, 128 * 1024, ops).unwrap();

    assert!(flash.contents()[..128 * 1024].iter().all(|&b| b == 0xA5));
}

#[test]
fn s2_shrink_by_half_with_tail_erase() {
    let (mut flash, old, patch, _swap) = layout(128 * 1024, 16, 0);
    let mut source = Vec::with_capacity(128 * 1024);
    for i in 0..128 * 1024 {
        source.push((i % 251) as u8);
    }
    flash.preload(old.base_offset, &source);
    flash.assert_no_stale_read = true;

    let ops = vec![Op::Copy {
        old_addr: 0,
        len: 64 * 1024,
    }];
    run_ram(&mut flash, patch, old, 64 * 1024, ops).unwrap();

    assert_eq!(&flash.contents()[..64 * 1024], &source[..64 * 1024]);
    assert!(flash.contents()[64 * 1024..128 * 1024].iter().all(|&b| b == 0xFF));
}

#[test]
fn s3_non_sector_aligned_length() {
    let (mut flash, old, patch, _swap) = layout(128 * 1024, 16, 0);
    let mut source = Vec::with_capacity(128 * 1024);
    for i in 0..128 * 1024 {
        source.push((i % 197) as u8);
    }
    flash.preload(old.base_offset, &source);
    flash.assert_no_stale_read = true;

    let ops = vec![Op::Copy { old_addr: 0, len: 70000 }];
    run_ram(&mut flash, patch, old, 70000, ops).unwrap();

    assert_eq!(&flash.contents()[..70000], &source[..70000]);
    // round_up(70000, 4096) = 73728
    assert!(flash.contents()[73728..128 * 1024].iter().all(|&b| b == 0xFF));
}

#[test]
fn s4_injected_patch_read_failure() {
    let (mut flash, old, patch, _swap) = layout(4096 * 4, 4096, 0);
    flash.preload(old.base_offset, &[0u8; 4096 * 4]);
    // `PullPatch{300}` pulls in 100-byte chunks, so the 3rd flash read is
    // the 3rd read_patch call.
    flash.fail_nth_read(3);

    let ops = vec![Op::PullPatch { len: 300 }];
    let err = run_ram(&mut flash, patch, old, 0, ops).unwrap_err();
    assert!(matches!(err, diffpatch_core::PatchError::FlashReadFailed(_)));
}

#[test]
fn s5_injected_write_failure_mid_commit() {
    let (mut flash, old, patch, _swap) = layout(4096 * 4, 16, 0);
    flash.preload(old.base_offset, &[0u8; 4096 * 4]);

    // First commit's drain write succeeds, second fails.
    flash.fail_nth_write(2);

    let ops = vec![Op::Insert {
        bytes: vec![0x11u8; 4096],
    }, Op::Insert {
        bytes: vec![0x22u8; 4096],
    }];
    let err = run_ram(&mut flash, patch, old, 8192, ops).unwrap_err();
    assert!(matches!(err, diffpatch_core::PatchError::FlashWriteFailed(_)));
    assert!(flash.contents()[..4096].iter().all(|&b| b == 0x11));
}

#[test]
fn s6_variant_parity() {
    for (old_len, newer_len) in [(128 * 1024, 128 * 1024), (128 * 1024, 64 * 1024), (128 * 1024, 70000)] {
        let mut source = Vec::with_capacity(old_len);
        for i in 0..old_len {
            source.push((i % 233) as u8);
        }

        let (mut flash_a, old_a, patch_a, _swap_a) = layout(old_len, 16, 0);
        flash_a.preload(old_a.base_offset, &source);
        run_ram(
            &mut flash_a,
            patch_a,
            old_a,
            newer_len as u32,
            vec![Op::Copy {
                old_addr: 0,
                len: newer_len as u32,
            }],
        )
        .unwrap();

        let (mut flash_b, old_b, patch_b, swap_b) = layout(old_len, 16, 4096 * 4);
        flash_b.preload(old_b.base_offset, &source);
        run_flash_swap(
            &mut flash_b,
            patch_b,
            old_b,
            swap_b,
            newer_len as u32,
            vec![Op::Copy {
                old_addr: 0,
                len: newer_len as u32,
            }],
        )
        .unwrap();

        assert_eq!(
            &flash_a.contents()[..old_len],
            &flash_b.contents()[..old_len],
            "variant mismatch for newer_len={newer_len}"
        );
    }
}

#[test]
fn swap_partition_missing_is_rejected() {
    let (mut flash, old, patch, _swap) = layout(4096 * 4, 16, 0);
    let empty_swap = Partition::new("swap", 0, 0);
    let mut buffer = FlashSwapBuffer::<64>::new(empty_swap);
    let mut decoder = ScriptDecoder::new(vec![]);
    let err = release_patch(
        &mut flash,
        patch,
        patch.length,
        old,
        0,
        PatchConfig::FlashSwap(&mut buffer),
        &mut decoder,
    )
    .unwrap_err();
    assert_eq!(err, diffpatch_core::PatchError::SwapPartitionMissing);
}

#[test]
fn undersized_buffer_is_rejected() {
    let (mut flash, old, patch, _swap) = layout(4096 * 4, 16, 0);
    let mut buffer = RamBuffer::<128>::new();
    let mut decoder = ScriptDecoder::new(vec![]);
    let err = release_patch(
        &mut flash,
        patch,
        patch.length,
        old,
        0,
        PatchConfig::Ram(&mut buffer),
        &mut decoder,
    )
    .unwrap_err();
    assert_eq!(err, diffpatch_core::PatchError::BufferAllocFailed);
}

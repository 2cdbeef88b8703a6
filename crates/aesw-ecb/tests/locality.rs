mod common;

use aesw_core::{WINDOW_BYTES, WINDOW_WORDS};
use aesw_ecb::layout::{pack_blocks, unpack_blocks};
use aesw_ecb::{encrypt_ecb, EcbKernel, FinalRound, LaunchConfig};
use aesw_math::AES_TABLES;
use common::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::time::{Duration, Instant};

fn encrypt_bytes(cfg: LaunchConfig, keys: &aesw_core::RoundKeySchedule, pt: &[u8]) -> Vec<u8> {
    let input = pack_blocks(pt).unwrap();
    let mut output = vec![0u32; input.len()];
    encrypt_ecb(keys, &AES_TABLES, cfg, &input, &mut output).unwrap();
    unpack_blocks(&output).unwrap()
}

#[test]
fn test_matches_reference_random() {
    let mut rng = StdRng::seed_from_u64(0xecb);
    let key: [u8; 16] = rng.gen();
    let keys = expand_key(&key);

    let mut pt = vec![0u8; 5 * WINDOW_BYTES];
    rng.fill(&mut pt[..]);

    let ct = encrypt_bytes(LaunchConfig::default(), &keys, &pt);
    for (p, c) in pt.chunks_exact(16).zip(ct.chunks_exact(16)) {
        let p: [u8; 16] = p.try_into().unwrap();
        assert_eq!(c, &reference_encrypt(&keys, &p)[..]);
    }
}

#[test]
fn test_equal_blocks_equal_ciphertext() {
    let mut rng = StdRng::seed_from_u64(1);
    let keys = fips_keys();

    let mut pt = vec![0u8; 3 * WINDOW_BYTES];
    rng.fill(&mut pt[..]);
    // Same block in window 0 lane 3 and window 2 lane 30
    let dup: [u8; 16] = rng.gen();
    pt[3 * 16..4 * 16].copy_from_slice(&dup);
    pt[(64 + 30) * 16..(64 + 31) * 16].copy_from_slice(&dup);

    let ct = encrypt_bytes(LaunchConfig::default(), &keys, &pt);
    assert_eq!(ct[3 * 16..4 * 16], ct[(64 + 30) * 16..(64 + 31) * 16]);
}

#[test]
fn test_permutation_commutes() {
    let mut rng = StdRng::seed_from_u64(2);
    let keys = fips_keys();

    let mut pt = vec![0u8; 4 * WINDOW_BYTES];
    rng.fill(&mut pt[..]);
    let blocks = pt.len() / 16;
    let mut perm: Vec<usize> = (0..blocks).collect();
    perm.shuffle(&mut rng);

    let permuted: Vec<u8> = perm.iter().flat_map(|&i| pt[i * 16..(i + 1) * 16].to_vec()).collect();

    let ct = encrypt_bytes(LaunchConfig::default(), &keys, &pt);
    let ct_permuted = encrypt_bytes(LaunchConfig::default(), &keys, &permuted);

    for (dst, &src) in perm.iter().enumerate() {
        assert_eq!(ct_permuted[dst * 16..(dst + 1) * 16], ct[src * 16..(src + 1) * 16]);
    }
}

#[test]
fn test_launch_shape_does_not_change_output() {
    let mut rng = StdRng::seed_from_u64(3);
    let keys = fips_keys();

    let mut input = vec![0u32; 37 * WINDOW_WORDS];
    rng.fill(&mut input[..]);

    let baseline_cfg = LaunchConfig { lanes_per_group: 32, groups_in_flight: 1, ..LaunchConfig::default() };
    let mut baseline = vec![0u32; input.len()];
    encrypt_ecb(&keys, &AES_TABLES, baseline_cfg, &input, &mut baseline).unwrap();

    for (lanes, in_flight) in [(64, 1), (96, 2), (160, 3), (256, 4), (1024, 2)] {
        for final_round in [FinalRound::Table, FinalRound::Bitsliced] {
            let cfg = LaunchConfig {
                lanes_per_group: lanes,
                groups_in_flight: in_flight,
                final_round,
                ..LaunchConfig::default()
            };
            let mut output = vec![0u32; input.len()];
            let report = encrypt_ecb(&keys, &AES_TABLES, cfg, &input, &mut output).unwrap();
            assert_eq!(output, baseline, "lanes={} in_flight={}", lanes, in_flight);
            assert_eq!(report.blocks, 37 * 32);
            assert_eq!(report.warps, report.groups * lanes / 32);
        }
    }
}

#[test]
fn test_kernel_reusable() {
    let keys = fips_keys();
    let kernel = EcbKernel::new(&keys, &AES_TABLES, LaunchConfig::default()).unwrap();

    let input = vec![0u32; 2 * WINDOW_WORDS];
    let mut first = vec![0u32; input.len()];
    let mut second = vec![0u32; input.len()];
    kernel.launch(&input, &mut first).unwrap();
    kernel.launch(&input, &mut second).unwrap();
    assert_eq!(first, second);
    assert_ne!(first, input);
}

#[test]
fn test_wide_groups_do_not_stall() {
    // 32 warp threads per group, two groups at once: far more threads than
    // most machines have cores. Waiting warps must block, not spin.
    let mut rng = StdRng::seed_from_u64(6);
    let keys = fips_keys();
    let mut input = vec![0u32; 64 * WINDOW_WORDS];
    rng.fill(&mut input[..]);

    let narrow = LaunchConfig { lanes_per_group: 32, groups_in_flight: 1, ..LaunchConfig::default() };
    let mut expected = vec![0u32; input.len()];
    encrypt_ecb(&keys, &AES_TABLES, narrow, &input, &mut expected).unwrap();

    let wide = LaunchConfig { lanes_per_group: 1024, groups_in_flight: 2, ..LaunchConfig::default() };
    let kernel = EcbKernel::new(&keys, &AES_TABLES, wide).unwrap();
    let mut output = vec![0u32; input.len()];

    let start = Instant::now();
    for _ in 0..4 {
        kernel.launch(&input, &mut output).unwrap();
    }
    let elapsed = start.elapsed();

    assert_eq!(output, expected);
    assert!(elapsed < Duration::from_secs(5), "4 wide launches took {:?}", elapsed);
}

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use rand::RngCore;
use std::path::PathBuf;
use std::time::Instant;

use aesw_core::{Block, RoundKeySchedule, ROUND_KEY_WORDS, WARP_SIZE, WINDOW_BYTES, WINDOW_WORDS};
use aesw_ecb::layout::{pack_blocks, unpack_blocks};
use aesw_ecb::{EcbKernel, FinalRound, LaunchConfig, TailPolicy};
use aesw_math::{RoundTables, AES_TABLES};

/// FIPS-197 C.1 key 000102...0f, expanded.
const FIPS_SCHEDULE: [u32; ROUND_KEY_WORDS] = [
    0x03020100, 0x07060504, 0x0b0a0908, 0x0f0e0d0c,
    0xfd74aad6, 0xfa72afd2, 0xf178a6da, 0xfe76abd6,
    0x0bcf92b6, 0xf1bd3d64, 0x00c59bbe, 0xfeb33068,
    0x4e74ffb6, 0xbfc9c2d2, 0xbf0c596c, 0x41bf6904,
    0xbcf7f747, 0x033e3595, 0xbc326cf9, 0xfd8d05fd,
    0xe8a3aa3c, 0xeb9d9fa9, 0x57aff350, 0xaa22f6ad,
    0x7d0f395e, 0x9692a6f7, 0xc13d55a7, 0x6b1fa30a,
    0x1a70f914, 0x8ce25fe3, 0x4ddf0a44, 0x26c0a94e,
    0x35874347, 0xb9651ca4, 0xf4ba16e0, 0xd27abfae,
    0xd1329954, 0x685785f0, 0x9ced9310, 0x4e972cbe,
    0x7f1d1113, 0x174a94e3, 0x8ba707f3, 0xc5302b4d,
];

const FIPS_PLAINTEXT: [u8; 16] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
    0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
];

const FIPS_CIPHERTEXT: [u8; 16] = [
    0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30,
    0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5, 0x5a,
];

#[derive(Parser)]
#[command(name = "aesw-run", about = "Warp-layout AES-128 ECB")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encrypt a file of 16-byte blocks (whole 512-byte windows).
    Encrypt {
        #[arg(long)] input: PathBuf,
        #[arg(long)] output: PathBuf,
        /// 176 raw bytes: 44 little-endian round-key words.
        #[arg(long)] round_keys: Option<PathBuf>,
        /// Encrypt the aligned prefix and copy the tail through unchanged.
        #[arg(long)] aligned_prefix: bool,
        #[command(flatten)] launch: LaunchArgs,
    },
    /// Encrypt random data in memory and report throughput.
    Bench {
        #[arg(long, default_value_t = 64)] mib: usize,
        #[arg(long, default_value_t = 3)] iterations: usize,
        #[command(flatten)] launch: LaunchArgs,
    },
    /// FIPS-197 vector and S-box cross-check.
    Selftest,
}

#[derive(Args)]
struct LaunchArgs {
    #[arg(long, default_value_t = aesw_ecb::DEFAULT_LANES_PER_GROUP)] lanes: usize,
    #[arg(long)] groups_in_flight: Option<usize>,
    /// Constant-time bitsliced SubBytes in the final round.
    #[arg(long)] bitsliced_final: bool,
}

impl LaunchArgs {
    fn to_config(&self, tail: TailPolicy) -> LaunchConfig {
        let defaults = LaunchConfig::default();
        // Default keeps roughly one warp thread per core
        let groups_in_flight = self
            .groups_in_flight
            .unwrap_or_else(|| (defaults.groups_in_flight * defaults.lanes_per_group / self.lanes.max(WARP_SIZE)).max(1));
        LaunchConfig {
            lanes_per_group: self.lanes,
            groups_in_flight,
            tail,
            final_round: if self.bitsliced_final { FinalRound::Bitsliced } else { FinalRound::Table },
            ..defaults
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Encrypt { input, output, round_keys, aligned_prefix, launch } => {
            let tail = if aligned_prefix { TailPolicy::AlignedPrefix } else { TailPolicy::Reject };
            encrypt_file(&input, &output, round_keys.as_deref(), launch.to_config(tail))
        }
        Command::Bench { mib, iterations, launch } => bench(mib, iterations, launch.to_config(TailPolicy::Reject)),
        Command::Selftest => selftest(),
    }
}

fn load_keys(path: Option<&std::path::Path>) -> anyhow::Result<RoundKeySchedule> {
    match path {
        Some(p) => {
            let bytes = std::fs::read(p).with_context(|| format!("reading {}", p.display()))?;
            RoundKeySchedule::from_bytes(&bytes).with_context(|| format!("round keys in {}", p.display()))
        }
        None => {
            info!("No round keys given, using the FIPS-197 C.1 schedule");
            Ok(RoundKeySchedule::new(FIPS_SCHEDULE))
        }
    }
}

fn encrypt_file(
    input: &std::path::Path,
    output: &std::path::Path,
    round_keys: Option<&std::path::Path>,
    config: LaunchConfig,
) -> anyhow::Result<()> {
    let keys = load_keys(round_keys)?;
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;

    let aligned = data.len() - data.len() % WINDOW_BYTES;
    if aligned != data.len() && config.tail == TailPolicy::Reject {
        bail!(
            "{} is {} bytes, not a multiple of {} (use --aligned-prefix to pass the tail through)",
            input.display(),
            data.len(),
            WINDOW_BYTES
        );
    }

    let words = pack_blocks(&data[..aligned])?;
    let mut cipher = vec![0u32; words.len()];
    let kernel = EcbKernel::new(&keys, &AES_TABLES, config)?;
    debug!("Launch config: {:?}", kernel.config());

    let start = Instant::now();
    let report = kernel.launch(&words, &mut cipher)?;
    let elapsed = start.elapsed();

    let mut out = unpack_blocks(&cipher)?;
    out.extend_from_slice(&data[aligned..]);
    std::fs::write(output, &out).with_context(|| format!("writing {}", output.display()))?;

    info!(
        "Encrypted {} blocks in {:.2?} ({} groups, {} warps, {} idle); {} tail bytes copied",
        report.blocks,
        elapsed,
        report.groups,
        report.warps,
        report.warps - report.active_warps,
        data.len() - aligned
    );
    Ok(())
}

fn bench(mib: usize, iterations: usize, config: LaunchConfig) -> anyhow::Result<()> {
    if mib == 0 || iterations == 0 {
        bail!("--mib and --iterations must be positive");
    }
    let keys = RoundKeySchedule::new(FIPS_SCHEDULE);
    let words = mib * 1024 * 1024 / 4;
    debug_assert_eq!(words % WINDOW_WORDS, 0);

    let mut input = vec![0u32; words];
    let mut rng = rand::thread_rng();
    for w in input.iter_mut() {
        *w = rng.next_u32();
    }
    let mut output = vec![0u32; words];

    let kernel = EcbKernel::new(&keys, &AES_TABLES, config)?;
    info!(">>> BENCH: {} MiB x {} | {:?}", mib, iterations, kernel.config());

    let mut best = f64::MAX;
    for i in 0..iterations {
        let start = Instant::now();
        let report = kernel.launch(&input, &mut output)?;
        let secs = start.elapsed().as_secs_f64();
        best = best.min(secs);
        info!("Run {}: {} blocks in {:.3}s ({:.1} MiB/s)", i, report.blocks, secs, mib as f64 / secs);
    }
    println!("best: {:.1} MiB/s", mib as f64 / best);
    Ok(())
}

fn selftest() -> anyhow::Result<()> {
    let mut failures = 0;

    // 1. FIPS-197 through the kernel, both final-round strategies
    let keys = RoundKeySchedule::new(FIPS_SCHEDULE);
    let plain: Vec<u8> = FIPS_PLAINTEXT.iter().copied().cycle().take(WINDOW_BYTES).collect();
    let words = pack_blocks(&plain)?;
    for final_round in [FinalRound::Table, FinalRound::Bitsliced] {
        let config = LaunchConfig { final_round, ..LaunchConfig::default() };
        let mut cipher = vec![0u32; words.len()];
        EcbKernel::new(&keys, &AES_TABLES, config)?.launch(&words, &mut cipher)?;
        let out = unpack_blocks(&cipher)?;
        let ok = out.chunks_exact(16).all(|b| b == FIPS_CIPHERTEXT);
        failures += report(&format!("FIPS-197 C.1 window ({:?} final round)", final_round), ok);
    }

    // 2. Bitsliced circuit against the table for every byte
    let mut all: Vec<u8> = (0..=255u8).collect();
    aesw_sbox::sub_bytes(&mut all);
    let ok = all.iter().enumerate().all(|(v, &s)| s == AES_TABLES.sbox(v as u8));
    failures += report("Bitsliced S-box == table S-box (256 bytes)", ok);

    // 3. Layout round trip on the vector block
    let block = Block::from_bytes(&FIPS_PLAINTEXT);
    failures += report("Block word order", block.to_bytes() == FIPS_PLAINTEXT);

    if failures > 0 {
        bail!("{} self-test check(s) failed", failures);
    }
    Ok(())
}

fn report(name: &str, ok: bool) -> usize {
    if ok {
        println!("[{}] {}", "PASS".green().bold(), name);
        0
    } else {
        println!("[{}] {}", "FAIL".red().bold(), name);
        1
    }
}

//! Throughput benchmark for digest algorithms.

use std::time::{Duration, Instant};

use hashpal_digest::{oneshot, HashAlgId};

pub fn run(algorithm: &str, seconds: u64) -> Result<(), Box<dyn std::error::Error>> {
    let duration = Duration::from_secs(seconds);

    if algorithm.eq_ignore_ascii_case("all") {
        for alg in HashAlgId::ALL {
            bench_hash(alg, duration)?;
        }
        return Ok(());
    }

    let alg: HashAlgId = algorithm.parse().map_err(|_| {
        format!("unknown algorithm: {algorithm}\nValid: md5, sha1, sha256, sha384, sha512, all")
    })?;
    bench_hash(alg, duration)
}

fn bench_hash(alg: HashAlgId, duration: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let block = vec![0u8; 8192];
    let mut out = [0u8; 64];

    let start = Instant::now();
    let mut total_bytes: u64 = 0;
    let mut ops: u64 = 0;

    while start.elapsed() < duration {
        oneshot::digest_into(alg, &block, &mut out)?;
        total_bytes += block.len() as u64;
        ops += 1;
    }

    let elapsed = start.elapsed().as_secs_f64();
    let mb_per_sec = throughput_mb(total_bytes, elapsed);
    println!("{:24} {mb_per_sec:10.2} MB/s  ({ops} ops in {elapsed:.2}s)", alg.name());
    Ok(())
}

/// MB/s for `total_bytes` hashed in `elapsed` seconds; 0 when nothing ran.
fn throughput_mb(total_bytes: u64, elapsed: f64) -> f64 {
    if total_bytes == 0 || elapsed <= 0.0 {
        return 0.0;
    }
    total_bytes as f64 / (1024.0 * 1024.0) / elapsed
}

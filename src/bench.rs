//! Benchmark utilities and performance testing
//!
//! Simple timing loops over the bit accumulators, reporting operation and
//! bit throughput. Only available with std feature.

use std::time::{Duration, Instant};
use std::vec::Vec;

use crate::endpoint::SliceSource;
use crate::error::Result;
use crate::input::BitInput;
use crate::output::BitOutput;

/// Field widths of one record in the mixed-width workload
const RECORD_WIDTHS: [u32; 6] = [1, 5, 12, 3, 23, 20];

/// Bits per record in the mixed-width workload
const RECORD_BITS: u64 = 64;

/// Simple benchmark statistics
#[derive(Debug, Clone)]
pub struct BenchStats {
    /// Number of operations
    pub count: usize,
    /// Total duration
    pub total_duration: Duration,
    /// Average time per operation
    pub avg_ns_per_op: u64,
    /// Operations per second
    pub ops_per_sec: f64,
}

impl BenchStats {
    /// Create new stats from measurements
    pub fn new(count: usize, total_duration: Duration) -> Self {
        let total_ns = total_duration.as_nanos() as u64;
        let avg_ns_per_op = if count > 0 {
            total_ns / count as u64
        } else {
            0
        };
        let ops_per_sec = if total_ns > 0 {
            (count as f64) * 1_000_000_000.0 / (total_ns as f64)
        } else {
            0.0
        };

        Self {
            count,
            total_duration,
            avg_ns_per_op,
            ops_per_sec,
        }
    }

    /// Throughput in megabits per second for `bits_per_op` bits per operation
    pub fn mbit_per_sec(&self, bits_per_op: u64) -> f64 {
        self.ops_per_sec * bits_per_op as f64 / 1_000_000.0
    }
}

impl std::fmt::Display for BenchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ops, {:.2}ms total, {} ns/op, {:.0} ops/sec",
            self.count,
            self.total_duration.as_secs_f64() * 1000.0,
            self.avg_ns_per_op,
            self.ops_per_sec
        )
    }
}

fn write_record(output: &mut BitOutput<Vec<u8>>, i: usize) -> Result<()> {
    for (n, width) in RECORD_WIDTHS.iter().enumerate() {
        output.write_u32(*width, (i + n) as u32)?;
    }
    Ok(())
}

fn encode_records(count: usize) -> Result<Vec<u8>> {
    let mut output = BitOutput::new(Vec::with_capacity(count * 8));
    for i in 0..count {
        write_record(&mut output, i)?;
    }
    output.align(1)?;
    Ok(output.into_inner())
}

/// Benchmark packing mixed-width records
pub fn bench_record_pack(count: usize) -> Result<BenchStats> {
    let start = Instant::now();
    let bytes = encode_records(count)?;
    let duration = start.elapsed();
    std::hint::black_box(bytes);
    Ok(BenchStats::new(count, duration))
}

/// Benchmark unpacking mixed-width records
pub fn bench_record_unpack(count: usize) -> Result<BenchStats> {
    let bytes = encode_records(count)?;
    let mut input = BitInput::new(SliceSource::new(&bytes));

    let start = Instant::now();
    for _ in 0..count {
        for width in RECORD_WIDTHS {
            std::hint::black_box(input.read_u32(width)?);
        }
    }
    let duration = start.elapsed();
    Ok(BenchStats::new(count, duration))
}

/// Benchmark a reduced-shape f32 write + read roundtrip
pub fn bench_float_roundtrip(count: usize) -> Result<BenchStats> {
    let mut output = BitOutput::new(Vec::with_capacity(count * 2));
    let start = Instant::now();

    for i in 0..count {
        output.write_f32(5, 10, i as f32 * 0.25)?;
    }
    output.align(1)?;
    let bytes = output.into_inner();

    let mut input = BitInput::new(SliceSource::new(&bytes));
    for _ in 0..count {
        std::hint::black_box(input.read_f32(5, 10)?);
    }

    let duration = start.elapsed();
    Ok(BenchStats::new(count, duration))
}

/// Run simple performance test suite
pub fn run_perf_test() -> Result<()> {
    std::println!("bitio Performance Test Suite");
    std::println!("============================");

    const TEST_COUNT: usize = 100_000;

    std::println!("\nTesting with {} records...", TEST_COUNT);

    let pack_stats = bench_record_pack(TEST_COUNT)?;
    std::println!(
        "Record pack: {} ({:.1} Mbit/s)",
        pack_stats,
        pack_stats.mbit_per_sec(RECORD_BITS)
    );

    let unpack_stats = bench_record_unpack(TEST_COUNT)?;
    std::println!(
        "Record unpack: {} ({:.1} Mbit/s)",
        unpack_stats,
        unpack_stats.mbit_per_sec(RECORD_BITS)
    );

    let float_stats = bench_float_roundtrip(TEST_COUNT)?;
    std::println!("f32 (5/10) roundtrip: {}", float_stats);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_stats() {
        let stats = BenchStats::new(1000, Duration::from_nanos(1_000_000));
        assert_eq!(stats.count, 1000);
        assert_eq!(stats.avg_ns_per_op, 1000);
        assert!((stats.ops_per_sec - 1_000_000.0).abs() < 0.1);
        assert!((stats.mbit_per_sec(8) - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_record_width_total() {
        assert_eq!(RECORD_WIDTHS.iter().sum::<u32>() as u64, RECORD_BITS);
        assert_eq!(encode_records(10).unwrap().len(), 80);
    }

    #[test]
    fn test_record_benches() {
        let stats = bench_record_pack(100).unwrap();
        assert_eq!(stats.count, 100);

        let stats = bench_record_unpack(100).unwrap();
        assert_eq!(stats.count, 100);
    }

    #[test]
    fn test_float_roundtrip_bench() {
        let stats = bench_float_roundtrip(50).unwrap();
        assert_eq!(stats.count, 50);
    }
}

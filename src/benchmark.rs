//! Benchmark for frame evaluation throughput.

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::evaluate::FrameEvaluator;
use crate::lcg::{advance, state_at_frame};

/// Trainer ID used for benchmarking; any value exercises the same paths.
const BENCH_TRAINER_ID: u16 = 12345;

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub name: &'static str,
    pub frames_per_sec: u64,
    pub total_frames: u64,
    pub hits: u64,
    pub duration_secs: f64,
}

/// Walk `frames` consecutive frames per chunk and count hits.
fn evaluate_chunk(evaluator: &FrameEvaluator<'_>, start: u32, frames: u32) -> u64 {
    let mut state = state_at_frame(start);
    let mut hits = 0;
    for offset in 0..frames {
        if evaluator.evaluate(start.wrapping_add(offset), state).is_some() {
            hits += 1;
        }
        state = advance(state).0;
    }
    hits
}

/// Evaluate `frames` frames on one thread, then in parallel chunks.
pub fn measure(frames: u32) -> Result<Vec<BenchmarkResult>> {
    let evaluator = FrameEvaluator::new(BENCH_TRAINER_ID);

    // Warmup
    evaluate_chunk(&evaluator, 0, frames.min(1 << 16));

    let start = Instant::now();
    let hits = evaluate_chunk(&evaluator, 0, frames);
    let single = result("single_thread", frames as u64, hits, start.elapsed().as_secs_f64());

    let pool = rayon::ThreadPoolBuilder::new().build()?;
    let chunk = (frames / pool.current_num_threads().max(1) as u32).max(1);
    let start = Instant::now();
    let hits: u64 = pool.install(|| {
        (0..frames)
            .into_par_iter()
            .step_by(chunk as usize)
            .map(|first| evaluate_chunk(&evaluator, first, chunk.min(frames - first)))
            .sum()
    });
    let parallel = result("parallel", frames as u64, hits, start.elapsed().as_secs_f64());

    Ok(vec![single, parallel])
}

fn result(name: &'static str, total_frames: u64, hits: u64, duration_secs: f64) -> BenchmarkResult {
    let frames_per_sec = if duration_secs > 0.0 {
        (total_frames as f64 / duration_secs) as u64
    } else {
        0
    };
    BenchmarkResult {
        name,
        frames_per_sec,
        total_frames,
        hits,
        duration_secs,
    }
}

/// Run the benchmark and print the results.
pub fn run_benchmark(frames: u32, json: bool) -> Result<()> {
    if !json {
        println!("Running benchmark over {} frames...", frames);
    }

    let results = measure(frames)?;

    if json {
        println!("{}", serde_json::to_string(&results)?);
        return Ok(());
    }

    for r in &results {
        println!("------------------------------------------------");
        println!("{}: {:.2} Million frames/sec", r.name, r.frames_per_sec as f64 / 1_000_000.0);
        println!("Total:  {} frames in {:.2}s ({} hits)", r.total_frames, r.duration_secs, r.hits);
    }
    println!("------------------------------------------------");

    Ok(())
}

//! Metrics sampling test subcommand.
//!
//! Runs the sampler for N iterations and feeds the results through the
//! same rolling window a connected chart client keeps.

use std::time::Instant;

use anyhow::{bail, Result};

use crate::sampler::Sampler;
use crate::window::RollingWindow;

/// Tests metrics sampling and replays the client chart window.
pub fn command_test(iterations: usize, verbose: bool) -> Result<()> {
    println!("sysdash - Test Mode");
    println!("===================");

    let sampler = Sampler::new();
    let mut window = RollingWindow::default();
    let mut error_count = 0usize;

    for iteration in 1..=iterations {
        let start = Instant::now();
        match sampler.sample() {
            Ok(snapshot) => {
                println!(
                    "[{}/{}] CPU {:.1}%  Memory {:.1}%  Disk {:.1}%  ({:.0}ms)",
                    iteration,
                    iterations,
                    snapshot.cpu_percent,
                    snapshot.memory_percent,
                    snapshot.disk_usage_percent,
                    start.elapsed().as_secs_f64() * 1000.0
                );
                if verbose {
                    println!("        {}", serde_json::to_string(&snapshot)?);
                }
                window.push(snapshot);
            }
            Err(e) => {
                error_count += 1;
                println!("[{}/{}] ❌ Sampling failed: {}", iteration, iterations, e);
            }
        }
    }

    println!();
    println!(
        "Chart window holds {}/{} snapshots (capacity {})",
        window.len(),
        iterations,
        window.capacity()
    );
    if !window.is_empty() {
        if verbose {
            for snapshot in window.iter() {
                println!("   ├─ {}", snapshot.timestamp);
            }
        }
        if let (Some(oldest), Some(newest)) = (window.oldest(), window.newest()) {
            println!("   ├─ oldest: {}", oldest.timestamp);
            println!("   └─ newest: {}", newest.timestamp);
        }
    }
    println!("Errors: {error_count}");

    if iterations > 0 && error_count == iterations {
        bail!("all sampling iterations failed");
    }

    println!("\n✅ Test completed successfully");
    Ok(())
}

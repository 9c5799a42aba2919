//! System validation subcommand.
//!
//! Verifies that the effective configuration is usable and that host
//! statistics can actually be read on this system.

use anyhow::Result;

use crate::config::{validate_effective_config, Config};
use crate::sampler::Sampler;

/// Validates configuration and host statistics access.
pub fn command_check(verbose: bool, config: &Config) -> Result<()> {
    println!("sysdash - System Check");
    println!("======================");

    let mut all_ok = true;

    println!("\nChecking configuration...");
    match validate_effective_config(config) {
        Ok(()) => println!(
            "   ✅ Configuration is valid ({}:{})",
            config.bind_addr(),
            config.http_port()
        ),
        Err(e) => {
            println!("   ❌ Configuration invalid: {e}");
            all_ok = false;
        }
    }

    println!("\nChecking host statistics (blocks for the CPU measurement window)...");
    match Sampler::new().sample() {
        Ok(snapshot) => {
            println!("   ✅ Host statistics readable");
            if verbose {
                println!("      ├─ CPU:    {:.1}%", snapshot.cpu_percent);
                println!("      ├─ Memory: {:.1}%", snapshot.memory_percent);
                println!("      └─ Disk:   {:.1}%", snapshot.disk_usage_percent);
            }
        }
        Err(e) => {
            println!("   ❌ Sampling failed: {e}");
            all_ok = false;
        }
    }

    println!("\nSummary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}

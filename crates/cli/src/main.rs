//! Command-line driver for the `rv32ima-core` emulator.
//!
//! This binary supplies the collaborators the core declares out of scope:
//! a shell for picking kernel/DTB files off disk, a host thread that polls
//! stdin for guest keyboard input, and the sleep primitive that paces the
//! Step Loop against wall-clock time.

mod dtb;
mod keyboard;

use std::fs;
use std::io;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use rv32ima_core::config::Config;
use rv32ima_core::soc::{InputBuffer, StdBridge};
use rv32ima_core::{reset, RunStatus};

#[derive(Parser, Debug)]
#[command(name = "rv32ima", author, version, about = "A RISC-V RV32IMA interpreter")]
struct Cli {
    /// Path to a raw kernel binary to load at the RAM base.
    #[arg(long)]
    kernel: String,

    /// Path to a device tree blob. Falls back to a minimal built-in DTB.
    #[arg(long)]
    dtb: Option<String>,

    /// Kernel command line, copied into the DTB's `chosen` slot.
    #[arg(long, default_value = "")]
    cmdline: String,

    /// RAM size in bytes.
    #[arg(long, default_value_t = Config::default().system.ram_size)]
    ram_size: u32,

    /// Path to a JSON config file overriding the built-in defaults.
    #[arg(long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = cli.config.as_deref().map_or_else(
        || Config::default(),
        |path| {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error reading config {path}: {e}");
                std::process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("error parsing config {path}: {e}");
                std::process::exit(1);
            })
        },
    );
    config.system.ram_size = cli.ram_size;

    let kernel = fs::read(&cli.kernel).unwrap_or_else(|e| {
        eprintln!("error reading kernel {}: {e}", cli.kernel);
        std::process::exit(1);
    });
    let dtb = match &cli.dtb {
        Some(path) => fs::read(path).unwrap_or_else(|e| {
            eprintln!("error reading dtb {path}: {e}");
            std::process::exit(1);
        }),
        None => dtb::builtin_minimal_dtb(),
    };

    let input = InputBuffer::shared();
    keyboard::spawn_stdin_poller(input.clone());

    let bridge = StdBridge::with_sinks(
        Box::new(io::stdout()),
        Box::new(io::stdout()),
        input,
    );

    let mut emulator = match reset(
        config.system.ram_base,
        config.system.ram_size,
        &kernel,
        &dtb,
        &cli.cmdline,
        bridge,
        config.general.fail_on_all_faults,
        config.general.trace_instructions,
    ) {
        Ok(emulator) => emulator,
        Err(e) => {
            eprintln!("setup error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut last_tick = Instant::now();
    loop {
        let elapsed_ms = last_tick.elapsed().as_millis() as u64;
        let elapsed_us = elapsed_ms * u64::from(config.general.time_divisor);
        last_tick = Instant::now();

        match emulator.run(config.general.step_batch_size, elapsed_us) {
            RunStatus::Ok => {}
            RunStatus::Idle => std::thread::sleep(Duration::from_micros(500)),
            RunStatus::Halt => {
                println!();
                println!("{}", emulator.dump_state());
                return ExitCode::SUCCESS;
            }
            RunStatus::Restart => {
                emulator = match reset(
                    config.system.ram_base,
                    config.system.ram_size,
                    &kernel,
                    &dtb,
                    &cli.cmdline,
                    emulator.bridge,
                    config.general.fail_on_all_faults,
                    config.general.trace_instructions,
                ) {
                    Ok(emulator) => emulator,
                    Err(e) => {
                        eprintln!("setup error on restart: {e}");
                        return ExitCode::FAILURE;
                    }
                };
            }
            RunStatus::Error => {
                eprintln!("{}", emulator.dump_state());
                return ExitCode::FAILURE;
            }
        }
    }
}

//! Headless runner for test ROMs that report a status byte in memory.
//!
//! Exit code 0 on PASS (status 1), 1 on FAIL (status >= 2), 2 otherwise.

use nes_core::nes::NES;
use nes_core::nes::ppu::Ppu;
use std::env;
use std::fs;
use std::process;

enum RunMode {
    Frames { frames: u64 },
    Cycles { cycles: u64 },
}

struct Options {
    rom_path: String,
    run_mode: RunMode,
    result_addr: u16,
    verbose: bool,
}

fn parse_args() -> Options {
    let mut args = env::args().skip(1);
    let mut rom_path: Option<String> = None;
    let mut frames: Option<u64> = None;
    let mut cycles: Option<u64> = None;
    let mut result_addr: u16 = 0x00F8;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-f" | "--frames" => {
                let val = args.next().unwrap_or_default();
                frames = Some(parse_number(&val, "frames"));
            }
            "-c" | "--cycles" => {
                let val = args.next().unwrap_or_default();
                cycles = Some(parse_number(&val, "cycles"));
            }
            "-r" | "--result-addr" => {
                let val = args.next().unwrap_or_default();
                result_addr = u16::try_from(parse_number(&val, "result-addr")).unwrap_or_else(|_| {
                    eprintln!("Result address out of range: {val}");
                    print_usage_and_exit();
                });
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            _ => {
                if rom_path.is_none() {
                    rom_path = Some(arg);
                } else {
                    eprintln!("Unexpected argument: {arg}");
                    print_usage_and_exit();
                }
            }
        }
    }

    let rom_path = rom_path.unwrap_or_else(|| {
        eprintln!("Missing ROM path.");
        print_usage_and_exit();
    });
    let run_mode = match (frames, cycles) {
        (Some(_), Some(_)) => {
            eprintln!("Provide either --frames or --cycles, not both.");
            print_usage_and_exit();
        }
        (Some(frames), None) => RunMode::Frames { frames },
        (None, Some(cycles)) => RunMode::Cycles { cycles },
        (None, None) => {
            eprintln!("Missing required --frames (or use --cycles).");
            print_usage_and_exit();
        }
    };

    Options {
        rom_path,
        run_mode,
        result_addr,
        verbose,
    }
}

fn parse_number(value: &str, name: &str) -> u64 {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.unwrap_or_else(|_| {
        eprintln!("Invalid {name}: {value}");
        print_usage_and_exit();
    })
}

fn print_usage_and_exit() -> ! {
    eprintln!("Usage: rom-test-runner <rom_path> --frames <count> [options]");
    eprintln!("   or: rom-test-runner <rom_path> --cycles <count> [options]");
    eprintln!("Options:");
    eprintln!("  -f, --frames <count>        Number of PPU frames to run");
    eprintln!("  -c, --cycles <count>        Number of CPU cycles to run");
    eprintln!("  -r, --result-addr <addr>    Status byte address (default: 0x00F8)");
    eprintln!("  -v, --verbose               Debug logging and run statistics");
    process::exit(2);
}

fn run(nes: &mut NES<Ppu>, mode: &RunMode) -> u64 {
    let mut cycles = 0u64;
    match *mode {
        RunMode::Frames { frames } => {
            while nes.ppu.borrow().frame < frames {
                nes.step();
                cycles += 1;
            }
        }
        RunMode::Cycles { cycles: target } => {
            while cycles < target {
                nes.step();
                cycles += 1;
            }
        }
    }
    cycles
}

fn main() {
    let opts = parse_args();
    let level = if opts.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let rom_data = fs::read(&opts.rom_path).unwrap_or_else(|err| {
        eprintln!("Failed to read ROM '{}': {err}", opts.rom_path);
        process::exit(2);
    });

    let mut nes = match NES::from_rom_bytes(&rom_data) {
        Ok(nes) => nes,
        Err(err) => {
            eprintln!("ROM parse error: {err}");
            process::exit(2);
        }
    };

    let cycles = run(&mut nes, &opts.run_mode);
    nes_core::trace_dump!();

    let result = nes.cpu.bus.read(opts.result_addr);
    if opts.verbose {
        println!("Cycles: {cycles}");
        println!("Frames: {}", nes.ppu.borrow().frame);
        println!("Result addr: 0x{:04X}", opts.result_addr);
        println!("Result byte: 0x{result:02X}");
    }

    if result == 1 {
        println!("PASS");
        process::exit(0);
    }

    if result >= 2 {
        println!("FAIL #{}", result);
        process::exit(1);
    }

    println!("UNKNOWN (result=0x{result:02X})");
    process::exit(2);
}

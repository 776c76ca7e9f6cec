use std::process;

use clap::{value_parser, Arg, ArgAction, Command};
use colored::*;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dotmatrix::error::Result;
use dotmatrix::gb::bus::Bus;
use dotmatrix::gb::cartridge::Cartridge;
use dotmatrix::gb::cpu::CPU;
use dotmatrix::gb::registers::Registers;
use dotmatrix::trace;

/// Driver options.
struct Options {
    rom: String,
    entry: u16,
    steps: usize,
    trace: bool,
    info: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(options()) {
        eprintln!("{} {}", "error:".red(), err);
        process::exit(1);
    }
}

fn options() -> Options {
    // Validation function to test the existence of a file.
    let file_exists = |path: &str| {
        if std::fs::metadata(path).is_ok() {
            Ok(path.to_string())
        } else {
            Err(String::from("File doesn't exist."))
        }
    };
    let hex = |s: &str| u16::from_str_radix(s.trim_start_matches('$'), 16);

    let matches = Command::new("dotmatrix")
        .version("0.1.0")
        .about("Game Boy CPU core runner.")
        .arg(
            Arg::new("ROM")
                .required(true)
                .value_parser(file_exists)
                .help("The cartridge image to run"),
        )
        .arg(
            Arg::new("entry")
                .long("entry")
                .value_parser(hex)
                .default_value("0100")
                .help("Initial program counter, in hex"),
        )
        .arg(
            Arg::new("steps")
                .long("steps")
                .value_parser(value_parser!(usize))
                .default_value("1000")
                .help("Maximum number of instructions to execute"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .action(ArgAction::SetTrue)
                .help("Print every executed instruction"),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .action(ArgAction::SetTrue)
                .help("Print the cartridge header as JSON and exit"),
        )
        .get_matches();

    Options {
        rom: matches.get_one::<String>("ROM").cloned().unwrap_or_default(),
        entry: matches.get_one::<u16>("entry").copied().unwrap_or(0x0100),
        steps: matches.get_one::<usize>("steps").copied().unwrap_or(1000),
        trace: matches.get_flag("trace"),
        info: matches.get_flag("info"),
    }
}

fn run(options: Options) -> Result<()> {
    let cartridge = Cartridge::load(options.rom)?;

    if options.info {
        println!("{}", cartridge.header()?.to_json()?);
        return Ok(());
    }

    if !cartridge.validate_header_checksum()? {
        warn!("header checksum mismatch");
    }
    println!("{}", trace::header(&cartridge.title()?, "yellow"));

    let mut bus = Bus::new(cartridge);
    let mut cpu = CPU::new(Registers::with_pc(options.entry), &mut bus);

    for _ in 0..options.steps {
        let instruction = cpu.step()?;
        if options.trace {
            println!("{}", trace::line(&instruction, cpu.registers()));
        }
    }

    println!("{}", trace::state(cpu.registers()));
    Ok(())
}

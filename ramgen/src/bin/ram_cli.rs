use std::path::PathBuf;
use std::process::ExitCode;

use common::constants::*;
use common::diag::{Diagnostics, Logger};
use common::misc::parse_num;
use ram_lib::{create_ram, PayloadFormat, RamConfig};

use clap::Parser;

/// Flat RAM image builder
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Code file to place in the image
    #[arg(long, short, default_value = DEFAULT_CODE_PATH)]
    code: PathBuf,

    /// File name to output to
    #[arg(long, short, default_value = DEFAULT_RAM_PATH)]
    output: PathBuf,

    /// Offset of the code within the image (0x.. for hex)
    #[arg(long, short, default_value_t = DEFAULT_BASE_ADDRESS, value_parser = parse_num)]
    base: u64,

    /// Total image size in bytes
    #[arg(long, short, default_value_t = DEFAULT_IMAGE_SIZE, value_parser = parse_num)]
    size: u64,

    /// Treat the code file as an ELF executable and place its sections
    /// relative to .text
    #[arg(long)]
    elf: bool,
}

fn main() -> ExitCode {
    let mut log = Logger::init("ram_cli");

    let args = Args::parse();
    let config = RamConfig {
        code: args.code,
        output: args.output,
        base: args.base,
        size: args.size,
        format: if args.elf { PayloadFormat::Elf } else { PayloadFormat::Raw },
    };

    match create_ram(&config, &mut log) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

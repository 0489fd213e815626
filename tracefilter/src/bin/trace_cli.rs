use std::path::PathBuf;
use std::process::ExitCode;

use common::constants::*;
use common::diag::{Diagnostics, Logger};
use trace_lib::filter_input;

use clap::Parser;
use clap_stdin::FileOrStdin;

/// Instruction trace opcode filter
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Trace to read, "-" for stdin
    #[arg(default_value = DEFAULT_TRACE_PATH)]
    input: FileOrStdin,

    /// File name to output to
    #[arg(long, short, default_value = DEFAULT_OPCODES_PATH)]
    output: PathBuf,
}

fn main() -> ExitCode {
    let mut log = Logger::init("trace_cli");

    let args = Args::parse();
    match filter_input(args.input, &args.output, &mut log) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

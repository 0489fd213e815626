use std::fs;

use common::diag::Recorder;
use common::exit;
use clap_stdin::FileOrStdin;
use trace_lib::{filter_input, filter_text, filter_trace, TraceError};

use crate::{exists, Scratch};

const TRACE: &str = "\
insn:     0x0100d8                       -auipc gp, 16384;  // gp = pc + 16384
insn:     0x0100dc                       -addi gp, gp, 0xfffffa68;  // gp = gp + 0xfffffa68
core   0: 0x00000000000100e0 (0xd4818513) addi    a0, gp, -696
insn:     0x0100f0                       -jal ra, 3240;
insn:     0x010e0c                       -sb a1, 7(a4);
insn:     0x010e2c                       -jalr zero, ra, 0;
";

#[test]
fn writes_opcodes_one_per_line() {
    let s = Scratch::new();
    let input = s.file("trace.txt", TRACE);
    let output = s.path("simple_trace.txt");

    let mut rec = Recorder::new();
    let n = filter_trace(&input, &output, &mut rec).unwrap();
    assert_eq!(n, 5);
    assert_eq!(fs::read_to_string(&output).unwrap(), "auipc\naddi\njal\nsb\njalr");
}

#[test]
fn empty_trace_gives_empty_file() {
    let s = Scratch::new();
    let input = s.file("trace.txt", "");
    let output = s.path("simple_trace.txt");
    assert_eq!(filter_trace(&input, &output, &mut Recorder::new()).unwrap(), 0);
    assert_eq!(fs::read(&output).unwrap(), b"");
}

#[test]
fn overwrites_previous_output() {
    let s = Scratch::new();
    let input = s.file("trace.txt", "insn: 0x1 -sb a1, 7(a4);\nnotinsn: foo\ninsn: 0x2 -jalr zero, ra, 0;");
    let output = s.file("simple_trace.txt", "stale\nstale\nstale\n");
    filter_trace(&input, &output, &mut Recorder::new()).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "sb\njalr");
}

#[test]
fn missing_trace() {
    let s = Scratch::new();
    let output = s.path("simple_trace.txt");
    let err = filter_trace(&s.path("trace.txt"), &output, &mut Recorder::new()).unwrap_err();
    assert!(matches!(err, TraceError::InputNotFound { .. }));
    assert_eq!(err.exit_code(), exit::INPUT_NOT_FOUND);
    assert!(!exists(&output));
}

#[test]
fn unwritable_output() {
    let s = Scratch::new();
    let input = s.file("trace.txt", TRACE);
    let output = s.path("missing").join("simple_trace.txt");
    let err = filter_trace(&input, &output, &mut Recorder::new()).unwrap_err();
    assert!(matches!(err, TraceError::OutputWrite { .. }));
    assert_eq!(err.exit_code(), exit::OUTPUT_WRITE_ERROR);
}

#[test]
fn text_and_file_paths_agree() {
    let s = Scratch::new();
    let input = s.file("trace.txt", TRACE);
    let from_file = s.path("from_file.txt");
    let from_text = s.path("from_text.txt");
    let from_input = s.path("from_input.txt");

    filter_trace(&input, &from_file, &mut Recorder::new()).unwrap();
    filter_text(TRACE, &from_text, &mut Recorder::new()).unwrap();
    let arg: FileOrStdin = input.to_str().unwrap().parse().unwrap();
    assert_eq!(filter_input(arg, &from_input, &mut Recorder::new()).unwrap(), 5);

    let expected = fs::read(&from_file).unwrap();
    assert_eq!(fs::read(&from_text).unwrap(), expected);
    assert_eq!(fs::read(&from_input).unwrap(), expected);
}

#[test]
fn missing_input_argument() {
    let s = Scratch::new();
    let output = s.path("simple_trace.txt");
    let arg: FileOrStdin = s.path("trace.txt").to_str().unwrap().parse().unwrap();
    let err = filter_input(arg, &output, &mut Recorder::new()).unwrap_err();
    assert!(matches!(err, TraceError::Input(_)));
    assert_eq!(err.exit_code(), exit::INPUT_NOT_FOUND);
    assert!(!exists(&output));
}

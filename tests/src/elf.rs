use std::fs;

use common::diag::Recorder;
use common::exit;
use elfload::testing::{build_elf, TestSection};
use ram_lib::{create_ram, PayloadFormat, RamConfig, RamError};

use crate::{assert_zero, exists, Scratch};

const TEXT: &[u8] = &[
    0x97, 0x41, 0x00, 0x00, // auipc gp, 4
    0x93, 0x81, 0x81, 0xa6, // addi gp, gp, -1432
    0x73, 0x00, 0x10, 0x00, // ebreak
];

fn config(s: &Scratch, base: u64, size: u64) -> RamConfig {
    RamConfig {
        code: s.path("prog.elf"),
        output: s.path("ram.bin"),
        base,
        size,
        format: PayloadFormat::Elf,
    }
}

#[test]
fn sections_relative_to_text() {
    let s = Scratch::new();
    s.file("prog.elf", build_elf(&[
        TestSection { name: ".text", addr: 0x100b0, data: TEXT, nobits: false },
        TestSection { name: ".rodata", addr: 0x10100, data: b"hello\0", nobits: false },
        TestSection { name: ".data", addr: 0x11200, data: &[1, 2, 3, 4], nobits: false },
        TestSection { name: ".bss", addr: 0x11210, data: &[0; 64], nobits: true },
        TestSection { name: ".comment", addr: 0, data: b"GCC: 13.2", nobits: false },
    ]));

    let base = 0x10094;
    let mut rec = Recorder::new();
    create_ram(&config(&s, base, 0x40000), &mut rec).unwrap();

    let ram = fs::read(s.path("ram.bin")).unwrap();
    assert_eq!(ram.len(), 0x40000);

    let at = |addr: u64| (base + addr - 0x100b0) as usize;
    assert_zero(&ram[..at(0x100b0)], "below .text");
    assert_eq!(&ram[at(0x100b0)..at(0x100b0) + TEXT.len()], TEXT);
    assert_eq!(&ram[at(0x10100)..at(0x10100) + 6], b"hello\0");
    assert_eq!(&ram[at(0x11200)..at(0x11200) + 4], [1, 2, 3, 4]);
    assert_zero(&ram[at(0x11204)..], "past .data");

    // .comment isn't loaded, and each loaded section is reported.
    assert!(!ram.windows(3).any(|w| w == b"GCC"));
    assert_eq!(rec.entries.iter().filter(|(_, m)| m.starts_with("Section ")).count(), 4);
}

#[test]
fn not_an_elf() {
    let s = Scratch::new();
    s.file("prog.elf", TEXT);
    let err = create_ram(&config(&s, 0, 0x100), &mut Recorder::new()).unwrap_err();
    assert!(matches!(err, RamError::Elf(_)));
    assert_eq!(err.exit_code(), exit::MALFORMED_INPUT);
    assert!(!exists(&s.path("ram.bin")));
}

#[test]
fn bss_past_the_end() {
    let s = Scratch::new();
    s.file("prog.elf", build_elf(&[
        TestSection { name: ".text", addr: 0x1000, data: TEXT, nobits: false },
        TestSection { name: ".bss", addr: 0x1100, data: &[0; 0x100], nobits: true },
    ]));
    let err = create_ram(&config(&s, 0, 0x1ff), &mut Recorder::new()).unwrap_err();
    assert!(matches!(err, RamError::Size(_)));
    assert!(!exists(&s.path("ram.bin")));

    create_ram(&config(&s, 0, 0x200), &mut Recorder::new()).unwrap();
    assert_eq!(fs::read(s.path("ram.bin")).unwrap().len(), 0x200);
}

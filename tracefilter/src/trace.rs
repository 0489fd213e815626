use common::diag::Diagnostics;

use log::trace;
use thiserror::Error;

pub const INSN_PREFIX: &str = "insn:";

// Whitespace-separated field holding the mnemonic, e.g.
// `insn:     0x0100d8     -auipc gp, 16384;` has `-auipc` at index 2.
pub const OPCODE_FIELD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLine<'a> {
    Instruction(&'a str),
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("instruction line has {fields} fields, need at least {}", OPCODE_FIELD + 1)]
pub struct MalformedLine {
    pub fields: usize,
}

pub fn classify(line: &str) -> TraceLine<'_> {
    let line = line.trim();
    if line.starts_with(INSN_PREFIX) {
        TraceLine::Instruction(line)
    } else {
        TraceLine::Ignored
    }
}

// The mnemonic field carries a one character marker in front of it
// ("-auipc"), which is dropped.
pub fn opcode(line: &str) -> Result<&str, MalformedLine> {
    let Some(field) = line.split_whitespace().nth(OPCODE_FIELD) else {
        return Err(MalformedLine { fields: line.split_whitespace().count() });
    };

    let mut chars = field.chars();
    chars.next();
    Ok(chars.as_str())
}

/// Returns the opcode of every instruction line in `text`, in order.
///
/// Instruction lines too short to hold an opcode are skipped, with a warning
/// naming the (1-based) line.
pub fn extract_opcodes<'a>(text: &'a str, diag: &mut impl Diagnostics) -> Vec<&'a str> {
    let mut out = vec![];
    for (idx, line) in text.lines().enumerate() {
        let TraceLine::Instruction(insn) = classify(line) else {
            continue;
        };

        match opcode(insn) {
            Ok(op) => {
                trace!("Trace: line {}: {op}", idx + 1);
                out.push(op);
            }
            Err(e) => diag.warn(&format!("line {}: skipping \"{insn}\": {e}", idx + 1)),
        }
    }
    out
}

// One per line, no trailing newline.
pub fn render(opcodes: &[&str]) -> String {
    opcodes.join("\n")
}

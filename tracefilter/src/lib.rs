pub mod filter;
pub mod trace;

pub use filter::{filter_input, filter_text, filter_trace, read_trace, write_opcodes, TraceError};
pub use trace::{classify, extract_opcodes, opcode, render, MalformedLine, TraceLine, INSN_PREFIX};

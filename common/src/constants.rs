pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

pub const DEFAULT_IMAGE_SIZE: u64 = 8 * GIB; // Bytes
pub const DEFAULT_BASE_ADDRESS: u64 = 0x10094;

pub const DEFAULT_CODE_PATH: &str = "code.bin";
pub const DEFAULT_RAM_PATH: &str = "ram.bin";

pub const DEFAULT_TRACE_PATH: &str = "trace.txt";
pub const DEFAULT_OPCODES_PATH: &str = "simple_trace.txt";

// Largest single write issued while zero-filling an image.
pub const ZERO_CHUNK: usize = MIB as usize;

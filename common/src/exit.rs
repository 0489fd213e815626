// Process exit codes shared by the command line tools. 0 is success and clap
// exits with 2 on usage errors, so neither is used here.

pub const INPUT_NOT_FOUND: u8 = 3;
pub const SIZE_ERROR: u8 = 4;
pub const OUTPUT_WRITE_ERROR: u8 = 5;
pub const MALFORMED_INPUT: u8 = 6;

pub const ALL: &[u8] = &[INPUT_NOT_FOUND, SIZE_ERROR, OUTPUT_WRITE_ERROR, MALFORMED_INPUT];

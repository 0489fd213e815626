pub mod constants;
pub mod diag;
pub mod exit;
pub mod mem;
pub mod misc;

pub mod image;
pub mod ram;

pub use image::{build_image, Contents, ImageError, ImageLayout, Segment};
pub use ram::{create_ram, layout_elf, PayloadFormat, RamConfig, RamError};

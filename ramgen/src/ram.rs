use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use common::constants::*;
use common::diag::Diagnostics;
use common::exit;
use elfload::{ElfError, ElfImage};

use crate::image::{ImageError, ImageLayout};

use log::debug;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadFormat {
    // The code file is copied verbatim.
    #[default]
    Raw,
    // The code file is an ELF executable; its sections are placed relative to
    // .text.
    Elf,
}

#[derive(Debug, Clone)]
pub struct RamConfig {
    pub code: PathBuf,
    pub output: PathBuf,
    pub base: u64,
    pub size: u64,
    pub format: PayloadFormat,
}

impl Default for RamConfig {
    fn default() -> Self {
        RamConfig {
            code: DEFAULT_CODE_PATH.into(),
            output: DEFAULT_RAM_PATH.into(),
            base: DEFAULT_BASE_ADDRESS,
            size: DEFAULT_IMAGE_SIZE,
            format: PayloadFormat::Raw,
        }
    }
}

#[derive(Debug, Error)]
pub enum RamError {
    #[error("unable to read {}: {source}", .path.display())]
    InputNotFound { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Size(#[from] ImageError),

    #[error("malformed ELF payload: {0}")]
    Elf(#[from] ElfError),

    #[error("unable to write {}: {source}", .path.display())]
    OutputWrite { path: PathBuf, source: io::Error },
}

impl RamError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RamError::InputNotFound { .. } => exit::INPUT_NOT_FOUND,
            RamError::Size(_) => exit::SIZE_ERROR,
            RamError::Elf(_) => exit::MALFORMED_INPUT,
            RamError::OutputWrite { .. } => exit::OUTPUT_WRITE_ERROR,
        }
    }
}

/// Lays out the loadable sections of `elf` so that `.text` starts at `base` and
/// every other section keeps its distance from `.text`.
pub fn layout_elf<'data>(
    elf: &ElfImage<'data>,
    base: u64,
    size: u64,
    diag: &mut impl Diagnostics,
) -> Result<ImageLayout<'data>, RamError> {
    let text = elf.text_addr()?;
    debug!("ELF: .text at {text:#x}, sections end at {:#x}", elf.highest_addr());

    let mut layout = ImageLayout::new(size);
    for sec in &elf.sections {
        let delta = sec.addr.checked_sub(text).ok_or_else(|| ImageError::BelowText {
            name: sec.name.clone(),
            addr: sec.addr,
            text,
        })?;
        let offset = base
            .checked_add(delta)
            .ok_or(ImageError::DoesNotFit { base, len: sec.size, size })?;

        match sec.data {
            Some(data) => layout.place(offset, data)?,
            None => layout.reserve(offset, sec.size)?,
        }
        diag.info(&format!("Section {} placed at offset {offset:#x}", sec.name));
    }

    Ok(layout)
}

/// Reads the code file, builds the image and writes it out. Returns the number
/// of bytes written.
///
/// The layout is checked before the output file is touched, so a payload that
/// doesn't fit leaves no file behind.
pub fn create_ram(config: &RamConfig, diag: &mut impl Diagnostics) -> Result<u64, RamError> {
    let code = fs::read(&config.code).map_err(|source| RamError::InputNotFound {
        path: config.code.clone(),
        source,
    })?;

    let layout = match config.format {
        PayloadFormat::Raw => {
            let mut layout = ImageLayout::new(config.size);
            layout.place(config.base, &code)?;
            layout
        }
        PayloadFormat::Elf => {
            let elf = ElfImage::parse(&code)?;
            layout_elf(&elf, config.base, config.size, diag)?
        }
    };

    let written = write_image(&layout, &config.output, diag)?;
    diag.info(&format!(
        "Generated {} with size: {written} bytes",
        config.output.display()
    ));
    Ok(written)
}

fn write_image(layout: &ImageLayout, path: &Path, diag: &mut impl Diagnostics) -> Result<u64, RamError> {
    let output_err = |source: io::Error| RamError::OutputWrite { path: path.to_owned(), source };

    let file = File::create(path).map_err(output_err)?;
    let mut out = BufWriter::with_capacity(ZERO_CHUNK, file);
    let res = layout
        .write_to(&mut out)
        .and_then(|n| out.flush().map(|()| n));

    res.map_err(|source| {
        drop(out);
        if let Err(e) = fs::remove_file(path) {
            diag.warn(&format!("unable to remove partial image {}: {e}", path.display()));
        }
        output_err(source)
    })
}

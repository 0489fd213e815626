use std::io::{self, Write};

use common::mem::WriteZeros;
use common::misc::ToUsize;

use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("{len:#x} bytes at {base:#x} do not fit in an image of {size:#x} bytes")]
    DoesNotFit { base: u64, len: u64, size: u64 },

    #[error("segment at {offset:#x} overlaps segment at {other:#x}")]
    Overlap { offset: u64, other: u64 },

    #[error("section {name} at {addr:#x} lies below .text at {text:#x}")]
    BelowText { name: String, addr: u64, text: u64 },

    #[error("image of {0:#x} bytes cannot be held in memory on this host")]
    Unaddressable(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contents<'a> {
    Bytes(&'a [u8]),
    Zeroed(u64),
}

impl Contents<'_> {
    pub fn len(&self) -> u64 {
        match self {
            Contents::Bytes(b) => b.len() as u64,
            Contents::Zeroed(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub offset: u64,
    pub contents: Contents<'a>,
}

impl Segment<'_> {
    // Exclusive. Can't overflow once the segment is in a layout.
    pub fn end(&self) -> u64 {
        self.offset + self.contents.len()
    }

    fn overlaps(&self, other: &Segment) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A flat memory image of a fixed size: a set of non-overlapping segments, with
/// every byte outside them zero.
///
/// Segments borrow their bytes, so a layout for a multi-gigabyte image costs no
/// more than its payload. [`ImageLayout::write_to`] streams the whole image.
#[derive(Debug, Clone)]
pub struct ImageLayout<'a> {
    size: u64,
    // Sorted by offset, non-empty, non-overlapping.
    segments: Vec<Segment<'a>>,
}

impl<'a> ImageLayout<'a> {
    pub fn new(size: u64) -> ImageLayout<'a> {
        ImageLayout { size, segments: vec![] }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Places `bytes` at `offset`. Fails if they would extend past the end of
    /// the image or overlap an earlier placement.
    pub fn place(&mut self, offset: u64, bytes: &'a [u8]) -> Result<(), ImageError> {
        self.insert(Segment { offset, contents: Contents::Bytes(bytes) })
    }

    /// Claims `len` zero bytes at `offset`, with the same checks as `place`.
    pub fn reserve(&mut self, offset: u64, len: u64) -> Result<(), ImageError> {
        self.insert(Segment { offset, contents: Contents::Zeroed(len) })
    }

    fn insert(&mut self, seg: Segment<'a>) -> Result<(), ImageError> {
        let len = seg.contents.len();
        let fits = seg.offset.checked_add(len).is_some_and(|end| end <= self.size);
        if !fits {
            return Err(ImageError::DoesNotFit { base: seg.offset, len, size: self.size });
        }

        // Nothing to write, and it can't collide with anything.
        if len == 0 {
            return Ok(());
        }

        if let Some(other) = self.segments.iter().find(|s| s.overlaps(&seg)) {
            return Err(ImageError::Overlap { offset: seg.offset, other: other.offset });
        }

        let idx = self.segments.partition_point(|s| s.offset < seg.offset);
        self.segments.insert(idx, seg);
        Ok(())
    }

    /// Writes exactly `size()` bytes. Gaps are zero-filled a chunk at a time, so
    /// memory use doesn't grow with the image size.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<u64> {
        let mut cursor = 0;
        for seg in &self.segments {
            out.write_zeros(seg.offset - cursor)?;
            match seg.contents {
                Contents::Bytes(bytes) => out.write_all(bytes)?,
                Contents::Zeroed(len) => out.write_zeros(len)?,
            }
            debug!("Image: wrote {:#x} bytes at {:#x}", seg.contents.len(), seg.offset);
            cursor = seg.end();
        }
        out.write_zeros(self.size - cursor)?;
        Ok(self.size)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, ImageError> {
        let size = self.size.to_usize().ok_or(ImageError::Unaddressable(self.size))?;
        let mut buf = vec![0u8; size];
        for seg in &self.segments {
            if let Contents::Bytes(bytes) = seg.contents {
                // In bounds: the segment fits in `size`, which fits in usize.
                let start = seg.offset as usize;
                buf[start..start + bytes.len()].copy_from_slice(bytes);
            }
        }
        Ok(buf)
    }
}

/// Returns an `image_size` byte image holding `code` at `base_address` and
/// zeros everywhere else.
pub fn build_image(code: &[u8], base_address: u64, image_size: u64) -> Result<Vec<u8>, ImageError> {
    let mut layout = ImageLayout::new(image_size);
    layout.place(base_address, code)?;
    layout.to_vec()
}

////////////////////////////////////////////////////////////////////////////////

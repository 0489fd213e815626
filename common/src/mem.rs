use std::io::{self, Write};

use crate::constants::ZERO_CHUNK;

use log::trace;

static ZEROS: [u8; ZERO_CHUNK] = [0; ZERO_CHUNK];

pub trait WriteZeros {
    fn write_zeros(&mut self, count: u64) -> io::Result<()>;
}

impl<T: Write> WriteZeros for T {
    fn write_zeros(&mut self, count: u64) -> io::Result<()> {
        let mut left = count;
        while left > 0 {
            let n = usize::try_from(left).map_or(ZERO_CHUNK, |l| l.min(ZERO_CHUNK));
            self.write_all(&ZEROS[..n])?;
            left -= n as u64;
        }
        trace!("Zero fill: wrote {count:#x} bytes");
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

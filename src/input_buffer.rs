use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use memmap::{Mmap, MmapOptions};

use errors::Result;

/// The raw bytes of a map file, kept alive for as long as anything borrows from them.
///
/// Files are memory-mapped read-only; stdin (and empty files, which can't be mapped) are read into
/// memory instead.  Either way, `bytes()` gives back the whole thing as a slice.
pub enum InputBuffer {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl InputBuffer {
    /// Creates an `InputBuffer` and consumes all of `stdin`
    pub fn new_from_stdin() -> Result<InputBuffer> {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;

        Ok(InputBuffer::Owned(buf))
    }

    /// Creates an `InputBuffer` by memory-mapping a file
    pub fn new_from_file<P>(path: P) -> Result<InputBuffer>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(InputBuffer::Owned(Vec::new()));
        }
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        Ok(InputBuffer::Mapped(mmap))
    }

    /// Gets the stored buffer of bytes
    pub fn bytes(&self) -> &[u8] {
        match *self {
            InputBuffer::Owned(ref v) => &*v,
            InputBuffer::Mapped(ref m) => &*m,
        }
    }
}

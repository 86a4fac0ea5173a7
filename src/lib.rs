//! Reads the visible geometry out of Source engine (VBSP) map files.
//!
//! The pipeline is: validate the header, walk all 64 slots of the lump directory decoding the
//! vertex, edge, surface edge, and face lumps, then resolve each face's surface edges into a loop
//! of vertex indices.  The result is plain data for a renderer to upload; nothing here touches a
//! graphics API.

#[cfg(test)]
extern crate byteorder;
#[macro_use]
extern crate error_chain;
extern crate euclid;
#[macro_use]
extern crate log;
extern crate memmap;
#[macro_use]
extern crate nom;

use std::path::Path;

pub mod archive;
pub mod errors;
pub mod geom;
pub mod input_buffer;
pub mod map;
pub mod parse;
#[cfg(test)]
mod test_util;

pub use archive::bsp::{BareBSP, BareBSPHeader, BareLumpDescriptor, LumpType};
pub use errors::{Error, ErrorKind, Result};
pub use map::{FaceLoop, MapGeometry};
pub use parse::header::{parse_bare_bsp, parse_bsp_header};
pub use parse::lumps::{BareEdge, BareFace, BareGeometry, BareSurfEdge};

use input_buffer::InputBuffer;


/// Parse a whole BSP held in memory.  Either every geometry lump decodes and every face resolves,
/// or this fails and nothing is returned.
pub fn parse_bsp(buf: &[u8]) -> Result<MapGeometry> {
    let bsp = parse_bare_bsp(buf)?;
    let geometry = bsp.decode_geometry()?;
    MapGeometry::from_bare(&geometry, bsp.header.version, bsp.header.map_revision)
}

/// Read and parse a BSP from disk.  The file is only held open for the duration of the parse.
pub fn load_bsp<P: AsRef<Path>>(path: P) -> Result<MapGeometry> {
    let input = InputBuffer::new_from_file(path)?;
    parse_bsp(input.bytes())
}

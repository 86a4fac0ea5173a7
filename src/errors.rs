use std::io;

use nom;

error_chain! {
    foreign_links {
        Io(io::Error);
    }

    errors {
        ParseError(whence: &'static str, position: usize) {
            description("nonspecific parse error")
            display("parse error at byte {} while parsing {}", position, whence)
        }
        TruncatedData(whence: &'static str) {
            description("unexpected end of input")
            display("unexpected end of input while parsing {}", whence)
        }
        InvalidMagic(found: [u8; 4]) {
            description("invalid magic")
            display("invalid magic {:?}, expected {:?}", found, b"VBSP")
        }
        UnsupportedVersion(version: u32) {
            description("unsupported bsp version")
            display("unsupported bsp version {} (supported: 17 through 29)", version)
        }
        LumpOutOfBounds(lump: &'static str, offset: u32, size: u32, len: usize) {
            description("lump out of bounds")
            display("lump {} out of bounds: offset {} size {} in a buffer of {} bytes", lump, offset, size, len)
        }
        UnevenLump(lump: &'static str, size: u32, width: usize) {
            description("lump size is not a multiple of its element size")
            display("lump {} is {} bytes, which is not a multiple of its {}-byte elements", lump, size, width)
        }
        UnknownLumpType(index: usize) {
            description("unknown lump type")
            display("unknown lump type {}", index)
        }
        SurfaceEdgeRangeOutOfBounds(face: usize, first: u32, count: u16, len: usize) {
            description("face references out-of-range surface edges")
            display("face {} spans {} surface edges starting at {}, but there are only {}", face, count, first, len)
        }
        EdgeOutOfRange(face: usize, surfedge: i32, len: usize) {
            description("surface edge references out-of-range edge")
            display("face {} has surface edge {}, but there are only {} edges", face, surfedge, len)
        }
        VertexOutOfRange(face: usize, edge: usize, vertex: u16, len: usize) {
            description("edge references out-of-range vertex")
            display("face {} uses edge {} with vertex {}, but there are only {} vertices", face, edge, vertex, len)
        }
    }
}

impl ErrorKind {
    /// True for every kind that means the input itself is malformed, as opposed to the file being
    /// unreadable.
    pub fn is_format_error(&self) -> bool {
        match *self {
            ErrorKind::Io(_) | ErrorKind::Msg(_) => false,
            _ => true,
        }
    }
}

/// Convert a nom result into one of ours.  `buf` is the input the parser was originally handed,
/// used to work out where in it a failure happened.
pub fn nom_to_result<'a, T>(whence: &'static str, buf: &'a [u8], result: nom::IResult<&'a [u8], T>) -> Result<T> {
    match result {
        Ok((_leftovers, value)) => Ok(value),
        Err(nom::Err::Incomplete(_)) => {
            bail!(ErrorKind::TruncatedData(whence));
        }
        Err(nom::Err::Error(context)) | Err(nom::Err::Failure(context)) => {
            let position = match context {
                nom::Context::Code(rest, _) => buf.len() - rest.len(),
                _ => 0,
            };
            bail!(ErrorKind::ParseError(whence, position));
        }
    }
}

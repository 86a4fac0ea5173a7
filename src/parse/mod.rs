//! nom parsers for the on-disk records, and the decoders that run them over whole lumps.  All of
//! it reads explicit little-endian scalars, so it works the same on any host.

pub mod header;
pub mod lumps;

use nom::{le_u32};

use ::archive::bsp::{BareBSP, BareBSPHeader, BareLumpDescriptor, BSP_IDENT, HEADER_LUMPS, HEADER_SIZE, SUPPORTED_VERSIONS};
use ::errors::{ErrorKind, Result, nom_to_result};


named!(lump_descriptor<BareLumpDescriptor>, do_parse!(
    offset: le_u32 >>
    size: le_u32 >>
    version: le_u32 >>
    ident: take!(4) >>
    (BareLumpDescriptor{ offset, size, version, ident: [ident[0], ident[1], ident[2], ident[3]] })
));

named!(bsp_header<BareBSPHeader>, do_parse!(
    ident: le_u32 >>
    version: le_u32 >>
    lumps: count!(lump_descriptor, HEADER_LUMPS) >>
    map_revision: le_u32 >>
    (BareBSPHeader{ ident, version, lumps, map_revision })
));


/// Read and validate the fixed-size header at the start of a BSP.
pub fn parse_bsp_header(buf: &[u8]) -> Result<BareBSPHeader> {
    if buf.len() < HEADER_SIZE {
        bail!(ErrorKind::TruncatedData("bsp header"));
    }

    let header = nom_to_result("bsp header", buf, bsp_header(buf))?;
    if header.ident != BSP_IDENT {
        bail!(ErrorKind::InvalidMagic(header.ident.to_le_bytes()));
    }
    if !SUPPORTED_VERSIONS.contains(&header.version) {
        bail!(ErrorKind::UnsupportedVersion(header.version));
    }

    info!("bsp version {}, map revision {}", header.version, header.map_revision);
    Ok(header)
}

pub fn parse_bare_bsp(buf: &[u8]) -> Result<BareBSP> {
    let header = parse_bsp_header(buf)?;
    Ok(BareBSP{ buffer: buf, header })
}


#[cfg(test)]
mod tests {
    use super::*;
    use ::archive::bsp::LumpType;
    use ::test_util::BspBuilder;

    fn version_error(version: u32) -> Option<u32> {
        let buf = BspBuilder::new().version(version).build();
        match parse_bsp_header(&buf) {
            Ok(_) => None,
            Err(err) => match *err.kind() {
                ErrorKind::UnsupportedVersion(found) => Some(found),
                ref kind => panic!("unexpected error {:?}", kind),
            },
        }
    }

    #[test]
    fn version_boundaries() {
        assert_eq!(version_error(16), Some(16));
        assert_eq!(version_error(17), None);
        assert_eq!(version_error(20), None);
        assert_eq!(version_error(29), None);
        assert_eq!(version_error(30), Some(30));
    }

    #[test]
    fn magic_off_by_one_bit() {
        for bit in 0..32 {
            let buf = BspBuilder::new().ident(BSP_IDENT ^ (1 << bit)).build();
            let err = parse_bsp_header(&buf).unwrap_err();
            match *err.kind() {
                ErrorKind::InvalidMagic(_) => {}
                ref kind => panic!("unexpected error {:?}", kind),
            }
        }
    }

    #[test]
    fn short_buffer() {
        let buf = BspBuilder::new().build();
        let err = parse_bsp_header(&buf[..HEADER_SIZE - 1]).unwrap_err();
        match *err.kind() {
            ErrorKind::TruncatedData(_) => {}
            ref kind => panic!("unexpected error {:?}", kind),
        }
        assert!(err.kind().is_format_error());
        assert!(parse_bsp_header(&[]).is_err());
    }

    #[test]
    fn directory_in_slot_order() {
        let buf = BspBuilder::new()
            .map_revision(4242)
            .vertices(&[(1.0, 2.0, 3.0)])
            .edges(&[(0, 0)])
            .build();
        let header = parse_bsp_header(&buf).unwrap();

        assert_eq!(header.version, 20);
        assert_eq!(header.map_revision, 4242);
        assert_eq!(header.lumps.len(), HEADER_LUMPS);

        let vertexes = header.lumps[LumpType::Vertexes.index()];
        assert_eq!(vertexes.offset as usize, HEADER_SIZE);
        assert_eq!(vertexes.size, 12);
        let edges = header.lumps[LumpType::Edges.index()];
        assert_eq!(edges.offset as usize, HEADER_SIZE + 12);
        assert_eq!(edges.size, 4);
        assert_eq!(header.lumps[LumpType::Faces.index()], BareLumpDescriptor::default());
    }

    #[test]
    fn lump_descriptor_fields() {
        let bytes = [
            0x10, 0x00, 0x00, 0x00,
            0x20, 0x01, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            b'L', b'Z', b'M', b'A',
        ];
        let descriptor = nom_to_result("lump descriptor", &bytes, lump_descriptor(&bytes)).unwrap();
        assert_eq!(descriptor, BareLumpDescriptor{ offset: 0x10, size: 0x120, version: 2, ident: *b"LZMA" });
    }
}

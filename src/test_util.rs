//! Builds small synthetic BSPs in memory for tests.

use byteorder::{LittleEndian, WriteBytesExt};

use archive::bsp::{BareLumpDescriptor, LumpType, BSP_IDENT, HEADER_LUMPS, HEADER_SIZE};

pub struct BspBuilder {
    ident: u32,
    version: u32,
    map_revision: u32,
    lumps: Vec<(LumpType, Vec<u8>)>,
    overrides: Vec<(LumpType, u32, u32)>,
}

impl BspBuilder {
    pub fn new() -> Self {
        BspBuilder {
            ident: BSP_IDENT,
            version: 20,
            map_revision: 1,
            lumps: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// A single 64x64 square face on the z=0 plane, walked with all-positive surface edges.
    pub fn quad() -> Self {
        BspBuilder::new()
            .vertices(&[(0.0, 0.0, 0.0), (64.0, 0.0, 0.0), (64.0, 64.0, 0.0), (0.0, 64.0, 0.0)])
            .edges(&[(0, 1), (1, 2), (2, 3), (3, 0)])
            .surfedges(&[0, 1, 2, 3])
            .faces(&[(0, 4)])
    }

    pub fn ident(mut self, ident: u32) -> Self {
        self.ident = ident;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn map_revision(mut self, map_revision: u32) -> Self {
        self.map_revision = map_revision;
        self
    }

    /// Lumps are laid out after the header in the order they're added.
    pub fn raw_lump(mut self, lump: LumpType, data: Vec<u8>) -> Self {
        self.lumps.push((lump, data));
        self
    }

    pub fn vertices(self, vertices: &[(f32, f32, f32)]) -> Self {
        let mut data: Vec<u8> = Vec::new();
        for &(x, y, z) in vertices {
            data.write_f32::<LittleEndian>(x).unwrap();
            data.write_f32::<LittleEndian>(y).unwrap();
            data.write_f32::<LittleEndian>(z).unwrap();
        }
        self.raw_lump(LumpType::Vertexes, data)
    }

    pub fn edges(self, edges: &[(u16, u16)]) -> Self {
        let mut data: Vec<u8> = Vec::new();
        for &(v0, v1) in edges {
            data.write_u16::<LittleEndian>(v0).unwrap();
            data.write_u16::<LittleEndian>(v1).unwrap();
        }
        self.raw_lump(LumpType::Edges, data)
    }

    pub fn surfedges(self, surfedges: &[i32]) -> Self {
        let mut data: Vec<u8> = Vec::new();
        for &surfedge in surfedges {
            data.write_i32::<LittleEndian>(surfedge).unwrap();
        }
        self.raw_lump(LumpType::SurfEdges, data)
    }

    /// Faces given as (first surface edge, surface edge count); everything else is zero.
    pub fn faces(self, faces: &[(u32, u16)]) -> Self {
        let mut data: Vec<u8> = Vec::new();
        for &(first_edge, num_edges) in faces {
            data.write_u16::<LittleEndian>(0).unwrap();
            data.write_u8(0).unwrap();
            data.write_u8(0).unwrap();
            data.write_u32::<LittleEndian>(first_edge).unwrap();
            data.write_u16::<LittleEndian>(num_edges).unwrap();
            data.extend_from_slice(&[0; 56 - 10]);
        }
        self.raw_lump(LumpType::Faces, data)
    }

    /// Force a directory entry, after the real lumps have been placed.
    pub fn descriptor(mut self, lump: LumpType, offset: u32, size: u32) -> Self {
        self.overrides.push((lump, offset, size));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut directory = vec![BareLumpDescriptor::default(); HEADER_LUMPS];
        let mut body: Vec<u8> = Vec::new();
        for &(lump, ref data) in self.lumps.iter() {
            let descriptor = &mut directory[lump.index()];
            descriptor.offset = (HEADER_SIZE + body.len()) as u32;
            descriptor.size = data.len() as u32;
            body.extend_from_slice(data);
        }
        for &(lump, offset, size) in self.overrides.iter() {
            let descriptor = &mut directory[lump.index()];
            descriptor.offset = offset;
            descriptor.size = size;
        }

        let mut buf: Vec<u8> = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.write_u32::<LittleEndian>(self.ident).unwrap();
        buf.write_u32::<LittleEndian>(self.version).unwrap();
        for descriptor in directory.iter() {
            buf.write_u32::<LittleEndian>(descriptor.offset).unwrap();
            buf.write_u32::<LittleEndian>(descriptor.size).unwrap();
            buf.write_u32::<LittleEndian>(descriptor.version).unwrap();
            buf.extend_from_slice(&descriptor.ident);
        }
        buf.write_u32::<LittleEndian>(self.map_revision).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);

        buf.extend_from_slice(&body);
        buf
    }
}

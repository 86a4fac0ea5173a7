use std::ops::RangeInclusive;

use ::errors::{ErrorKind, Result};
use ::parse::lumps::{self, BareGeometry};

/// File identifier, the bytes "VBSP" read as a little-endian u32.
pub const BSP_IDENT: u32 = ((b'P' as u32) << 24) + ((b'S' as u32) << 16) + ((b'B' as u32) << 8) + (b'V' as u32);
/// Format versions this crate understands.  Valve's games span 17 (Vampire) through 29.
pub const SUPPORTED_VERSIONS: RangeInclusive<u32> = 17..=29;
/// Number of slots in the lump directory.  Fixed for every version.
pub const HEADER_LUMPS: usize = 64;
/// ident + version + directory + map revision
pub const HEADER_SIZE: usize = 4 + 4 + HEADER_LUMPS * LUMP_DESCRIPTOR_SIZE + 4;
pub const LUMP_DESCRIPTOR_SIZE: usize = 16;


/// Slot in the lump directory.  The discriminant is the slot index.
///
/// Several slots were repurposed between engine branches; the variant is named after the most
/// common meaning and the other names are listed by `aliases()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LumpType {
    Entities = 0,
    Planes = 1,
    TexData = 2,
    Vertexes = 3,
    Visibility = 4,
    Nodes = 5,
    TexInfo = 6,
    Faces = 7,
    Lighting = 8,
    Occlusion = 9,
    Leafs = 10,
    FaceIds = 11,
    Edges = 12,
    SurfEdges = 13,
    Models = 14,
    WorldLights = 15,
    LeafFaces = 16,
    LeafBrushes = 17,
    Brushes = 18,
    BrushSides = 19,
    Areas = 20,
    AreaPortals = 21,
    /// Also UNUSED0, PROPCOLLISION
    Portals = 22,
    /// Also UNUSED1, PROPHULLS
    Clusters = 23,
    /// Also UNUSED2, PROPHULLVERTS
    PortalVerts = 24,
    /// Also UNUSED3, PROPTRIS
    ClusterPortals = 25,
    DispInfo = 26,
    OriginalFaces = 27,
    PhysDisp = 28,
    PhysCollide = 29,
    VertNormals = 30,
    VertNormalIndices = 31,
    DispLightmapAlphas = 32,
    DispVerts = 33,
    DispLightmapSamplePositions = 34,
    GameLump = 35,
    LeafWaterData = 36,
    Primitives = 37,
    PrimVerts = 38,
    PrimIndices = 39,
    PakFile = 40,
    ClipPortalVerts = 41,
    Cubemaps = 42,
    TexDataStringData = 43,
    TexDataStringTable = 44,
    Overlays = 45,
    LeafMinDistToWater = 46,
    FaceMacroTextureInfo = 47,
    DispTris = 48,
    /// Also PROP_BLOB
    PhysCollideSurface = 49,
    WaterOverlays = 50,
    LightmapPages = 51,
    LeafAmbientIndexHdr = 52,
    LightmapPageInfos = 53,
    LeafAmbientIndex = 54,
    LightingHdr = 55,
    WorldLightsHdr = 56,
    LeafAmbientLightingHdr = 57,
    LeafAmbientLighting = 58,
    XZipPakFile = 59,
    FacesHdr = 60,
    MapFlags = 61,
    OverlayFades = 62,
    DispMultiblend = 63,
}

impl LumpType {
    /// Look up the lump type for a directory slot.  Only indices past the end of the directory
    /// have no meaning.
    pub fn from_index(index: usize) -> Option<LumpType> {
        LUMP_TABLE.get(index).map(|info| info.lump)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static LumpInfo {
        &LUMP_TABLE[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn aliases(self) -> &'static [&'static str] {
        self.info().aliases
    }

    /// Whether this crate actually decodes the lump, rather than skipping over it.
    pub fn is_decoded(self) -> bool {
        self.info().decoder.is_some()
    }
}

/// Decodes one lump's records out of the whole file buffer and appends them to the geometry being
/// built.
pub type LumpDecoder = fn(&[u8], &BareLumpDescriptor, &mut BareGeometry) -> Result<()>;

pub struct LumpInfo {
    pub lump: LumpType,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub decoder: Option<LumpDecoder>,
}

macro_rules! lump {
    ($lump:ident, $name:expr) => {
        LumpInfo{ lump: LumpType::$lump, name: $name, aliases: &[], decoder: None }
    };
    ($lump:ident, $name:expr, aliases: [$($alias:expr),+]) => {
        LumpInfo{ lump: LumpType::$lump, name: $name, aliases: &[$($alias),+], decoder: None }
    };
    ($lump:ident, $name:expr, decoder: $decoder:path) => {
        LumpInfo{ lump: LumpType::$lump, name: $name, aliases: &[], decoder: Some($decoder) }
    };
}

/// Every slot of the lump directory, in slot order.  Slots without a decoder are still known;
/// they're checked for sane offsets and then skipped.
pub static LUMP_TABLE: [LumpInfo; HEADER_LUMPS] = [
    lump!(Entities, "ENTITIES"),
    lump!(Planes, "PLANES"),
    lump!(TexData, "TEXDATA"),
    lump!(Vertexes, "VERTEXES", decoder: lumps::decode_vertexes),
    lump!(Visibility, "VISIBILITY"),
    lump!(Nodes, "NODES"),
    lump!(TexInfo, "TEXINFO"),
    lump!(Faces, "FACES", decoder: lumps::decode_faces),
    lump!(Lighting, "LIGHTING"),
    lump!(Occlusion, "OCCLUSION"),
    lump!(Leafs, "LEAFS"),
    lump!(FaceIds, "FACEIDS"),
    lump!(Edges, "EDGES", decoder: lumps::decode_edges),
    lump!(SurfEdges, "SURFEDGES", decoder: lumps::decode_surfedges),
    lump!(Models, "MODELS"),
    lump!(WorldLights, "WORLDLIGHTS"),
    lump!(LeafFaces, "LEAFFACES"),
    lump!(LeafBrushes, "LEAFBRUSHES"),
    lump!(Brushes, "BRUSHES"),
    lump!(BrushSides, "BRUSHSIDES"),
    lump!(Areas, "AREAS"),
    lump!(AreaPortals, "AREAPORTALS"),
    lump!(Portals, "PORTALS", aliases: ["UNUSED0", "PROPCOLLISION"]),
    lump!(Clusters, "CLUSTERS", aliases: ["UNUSED1", "PROPHULLS"]),
    lump!(PortalVerts, "PORTALVERTS", aliases: ["UNUSED2", "PROPHULLVERTS"]),
    lump!(ClusterPortals, "CLUSTERPORTALS", aliases: ["UNUSED3", "PROPTRIS"]),
    lump!(DispInfo, "DISPINFO"),
    lump!(OriginalFaces, "ORIGINALFACES"),
    lump!(PhysDisp, "PHYSDISP"),
    lump!(PhysCollide, "PHYSCOLLIDE"),
    lump!(VertNormals, "VERTNORMALS"),
    lump!(VertNormalIndices, "VERTNORMALINDICES"),
    lump!(DispLightmapAlphas, "DISP_LIGHTMAP_ALPHAS"),
    lump!(DispVerts, "DISP_VERTS"),
    lump!(DispLightmapSamplePositions, "DISP_LIGHTMAP_SAMPLE_POSITIONS"),
    lump!(GameLump, "GAME_LUMP"),
    lump!(LeafWaterData, "LEAFWATERDATA"),
    lump!(Primitives, "PRIMITIVES"),
    lump!(PrimVerts, "PRIMVERTS"),
    lump!(PrimIndices, "PRIMINDICES"),
    lump!(PakFile, "PAKFILE"),
    lump!(ClipPortalVerts, "CLIPPORTALVERTS"),
    lump!(Cubemaps, "CUBEMAPS"),
    lump!(TexDataStringData, "TEXDATA_STRING_DATA"),
    lump!(TexDataStringTable, "TEXDATA_STRING_TABLE"),
    lump!(Overlays, "OVERLAYS"),
    lump!(LeafMinDistToWater, "LEAFMINDISTTOWATER"),
    lump!(FaceMacroTextureInfo, "FACE_MACRO_TEXTURE_INFO"),
    lump!(DispTris, "DISP_TRIS"),
    lump!(PhysCollideSurface, "PHYSCOLLIDESURFACE", aliases: ["PROP_BLOB"]),
    lump!(WaterOverlays, "WATEROVERLAYS"),
    lump!(LightmapPages, "LIGHTMAPPAGES"),
    lump!(LeafAmbientIndexHdr, "LEAF_AMBIENT_INDEX_HDR"),
    lump!(LightmapPageInfos, "LIGHTMAPPAGEINFOS"),
    lump!(LeafAmbientIndex, "LEAF_AMBIENT_INDEX"),
    lump!(LightingHdr, "LIGHTING_HDR"),
    lump!(WorldLightsHdr, "WORLDLIGHTS_HDR"),
    lump!(LeafAmbientLightingHdr, "LEAF_AMBIENT_LIGHTING_HDR"),
    lump!(LeafAmbientLighting, "LEAF_AMBIENT_LIGHTING"),
    lump!(XZipPakFile, "XZIPPAKFILE"),
    lump!(FacesHdr, "FACES_HDR"),
    lump!(MapFlags, "MAP_FLAGS"),
    lump!(OverlayFades, "OVERLAY_FADES"),
    lump!(DispMultiblend, "DISP_MULTIBLEND"),
];


#[derive(Clone, Debug)]
pub struct BareBSPHeader {
    pub ident: u32,
    pub version: u32,
    pub lumps: Vec<BareLumpDescriptor>,
    pub map_revision: u32,
}

/// One entry in the lump directory.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BareLumpDescriptor {
    pub offset: u32,
    pub size: u32,
    pub version: u32,
    /// Opaque four-byte code.  Nonzero on compressed lumps, which aren't supported.
    pub ident: [u8; 4],
}

impl BareLumpDescriptor {
    /// Fails unless the lump starts inside the buffer.  This applies even to empty lumps: a stale
    /// offset pointing past the end means the directory is garbage.
    pub fn check_offset(&self, lump: &'static str, len: usize) -> Result<()> {
        if self.offset as u64 >= len as u64 {
            bail!(ErrorKind::LumpOutOfBounds(lump, self.offset, self.size, len));
        }
        Ok(())
    }

    /// Extract the slice described by this entry from a buffer, failing if any of it lies past
    /// the end.
    pub fn extract_slice<'b>(&self, lump: &'static str, buf: &'b [u8]) -> Result<&'b [u8]> {
        let start = self.offset as u64;
        let end = start + self.size as u64;
        if end > buf.len() as u64 {
            bail!(ErrorKind::LumpOutOfBounds(lump, self.offset, self.size, buf.len()));
        }
        Ok(&buf[start as usize..end as usize])
    }
}


/// Low-level interface to a parsed BSP: the raw buffer plus its validated header.  Nothing past
/// the header has been looked at yet.
pub struct BareBSP<'n> {
    pub buffer: &'n [u8],
    pub header: BareBSPHeader,
}

impl<'n> BareBSP<'n> {
    pub fn lump(&self, lump: LumpType) -> &BareLumpDescriptor {
        &self.header.lumps[lump.index()]
    }

    pub fn lump_slice(&self, lump: LumpType) -> Result<&'n [u8]> {
        self.lump(lump).extract_slice(lump.name(), self.buffer)
    }

    pub fn iter_lumps(&self) -> impl Iterator<Item=(LumpType, &BareLumpDescriptor)> + '_ {
        LUMP_TABLE.iter()
        .zip(self.header.lumps.iter())
        .map(|(info, descriptor)| (info.lump, descriptor))
    }

    /// Walk the whole lump directory, decoding the geometry lumps.  Any bad slot fails the lot.
    pub fn decode_geometry(&self) -> Result<BareGeometry> {
        let mut geometry = BareGeometry::default();
        for (index, descriptor) in self.header.lumps.iter().enumerate() {
            dispatch_lump(self.buffer, index, descriptor, &mut geometry)?;
        }

        if geometry.faces.is_empty() {
            warn!("map has no faces");
        }
        Ok(geometry)
    }
}

/// Route a single directory slot to its decoder, if it has one.
pub fn dispatch_lump(buf: &[u8], index: usize, descriptor: &BareLumpDescriptor, geometry: &mut BareGeometry) -> Result<()> {
    let info = LUMP_TABLE.get(index);
    descriptor.check_offset(info.map_or("UNKNOWN", |info| info.name), buf.len())?;

    let info = info.ok_or(ErrorKind::UnknownLumpType(index))?;
    match info.decoder {
        Some(decoder) => decoder(buf, descriptor, geometry),
        None => {
            trace!("skipping lump {} ({} bytes at {})", info.name, descriptor.size, descriptor.offset);
            Ok(())
        }
    }
}

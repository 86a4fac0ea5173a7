use nom::{IResult, le_f32, le_i32, le_u16, le_u32, le_u8};

use ::archive::bsp::{BareLumpDescriptor, LumpType};
use ::errors::{ErrorKind, Result, nom_to_result};
use ::geom::Point3;

/// x, y, z
pub const VERTEX_SIZE: usize = 3 * 4;
pub const EDGE_SIZE: usize = 2 * 2;
pub const SURFEDGE_SIZE: usize = 4;
pub const FACE_SIZE: usize = 56;


/// A pair of indices into the vertex array.  Edges are shared between the faces on either side, so
/// the stored direction only matters in combination with a surface edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BareEdge {
    pub v0: u16,
    pub v1: u16,
}

named!(pub edge_record<BareEdge>, do_parse!(
    v0: le_u16 >>
    v1: le_u16 >>
    (BareEdge{ v0, v1 })
));

/// Signed reference into the edge array.  The magnitude picks the edge; a negative sign means the
/// face walks it from `v1` to `v0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BareSurfEdge(pub i32);

impl BareSurfEdge {
    pub fn edge_index(&self) -> usize {
        self.0.unsigned_abs() as usize
    }

    pub fn is_reversed(&self) -> bool {
        self.0 < 0
    }

    /// The edge's endpoints in the order this surface edge traverses them.
    pub fn endpoints(&self, edge: &BareEdge) -> (u16, u16) {
        if self.is_reversed() {
            (edge.v1, edge.v0)
        }
        else {
            (edge.v0, edge.v1)
        }
    }
}

named!(pub surfedge_record<BareSurfEdge>, map!(le_i32, BareSurfEdge));

named!(pub vertex_record<Point3>, do_parse!(
    x: le_f32 >>
    y: le_f32 >>
    z: le_f32 >>
    (Point3::new(x, y, z))
));

/// A face as stored on disk.  Only the surface edge range is needed to build geometry; the rest is
/// kept so nothing is thrown away.
#[derive(Clone, Debug, PartialEq)]
pub struct BareFace {
    pub plane_index: u16,
    /// Zero if the face points the same way as its plane
    pub side: u8,
    pub on_node: u8,
    pub first_edge: u32,
    pub num_edges: u16,
    pub tex_info: u16,
    pub disp_info: u16,
    pub surface_fog_volume_id: u16,
    pub styles: [u8; 4],
    pub light_offset: u32,
    pub area: f32,
    pub lightmap_mins: [u32; 2],
    pub lightmap_size: [u32; 2],
    pub orig_face: u32,
    pub num_primitives: u16,
    pub first_primitive: u16,
    pub smoothing_groups: u32,
}

named!(pub face_record<BareFace>, do_parse!(
    plane_index: le_u16 >>
    side: le_u8 >>
    on_node: le_u8 >>
    first_edge: le_u32 >>
    num_edges: le_u16 >>
    tex_info: le_u16 >>
    disp_info: le_u16 >>
    surface_fog_volume_id: le_u16 >>
    styles: take!(4) >>
    light_offset: le_u32 >>
    area: le_f32 >>
    lightmap_mins_x: le_u32 >>
    lightmap_mins_y: le_u32 >>
    lightmap_size_x: le_u32 >>
    lightmap_size_y: le_u32 >>
    orig_face: le_u32 >>
    num_primitives: le_u16 >>
    first_primitive: le_u16 >>
    smoothing_groups: le_u32 >>
    (BareFace{
        plane_index,
        side,
        on_node,
        first_edge,
        num_edges,
        tex_info,
        disp_info,
        surface_fog_volume_id,
        styles: [styles[0], styles[1], styles[2], styles[3]],
        light_offset,
        area,
        lightmap_mins: [lightmap_mins_x, lightmap_mins_y],
        lightmap_size: [lightmap_size_x, lightmap_size_y],
        orig_face,
        num_primitives,
        first_primitive,
        smoothing_groups,
    })
));


/// The four lumps that make up visible geometry, decoded but not yet cross-checked.  Everything is
/// in file order, which is what the indices in other lumps refer to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BareGeometry {
    pub vertices: Vec<Point3>,
    pub edges: Vec<BareEdge>,
    pub surfedges: Vec<BareSurfEdge>,
    pub faces: Vec<BareFace>,
}

/// Run `parser` over every `width`-byte record of a lump.  The lump has to fit in the buffer and
/// be made of whole records.
pub fn decode_records<T, F>(lump: LumpType, buf: &[u8], descriptor: &BareLumpDescriptor, width: usize, parser: F) -> Result<Vec<T>>
where
    F: Fn(&[u8]) -> IResult<&[u8], T>,
{
    let name = lump.name();
    let data = descriptor.extract_slice(name, buf)?;
    if data.len() % width != 0 {
        bail!(ErrorKind::UnevenLump(name, descriptor.size, width));
    }

    let mut ret = Vec::with_capacity(data.len() / width);
    for record in data.chunks(width) {
        ret.push(nom_to_result(name, record, parser(record))?);
    }
    debug!("decoded {} {} records", ret.len(), name);
    Ok(ret)
}

pub fn decode_vertexes(buf: &[u8], descriptor: &BareLumpDescriptor, geometry: &mut BareGeometry) -> Result<()> {
    let vertices = decode_records(LumpType::Vertexes, buf, descriptor, VERTEX_SIZE, vertex_record)?;
    geometry.vertices.extend(vertices);
    Ok(())
}

pub fn decode_edges(buf: &[u8], descriptor: &BareLumpDescriptor, geometry: &mut BareGeometry) -> Result<()> {
    let edges = decode_records(LumpType::Edges, buf, descriptor, EDGE_SIZE, edge_record)?;
    geometry.edges.extend(edges);
    Ok(())
}

pub fn decode_surfedges(buf: &[u8], descriptor: &BareLumpDescriptor, geometry: &mut BareGeometry) -> Result<()> {
    let surfedges = decode_records(LumpType::SurfEdges, buf, descriptor, SURFEDGE_SIZE, surfedge_record)?;
    geometry.surfedges.extend(surfedges);
    Ok(())
}

pub fn decode_faces(buf: &[u8], descriptor: &BareLumpDescriptor, geometry: &mut BareGeometry) -> Result<()> {
    let faces = decode_records(LumpType::Faces, buf, descriptor, FACE_SIZE, face_record)?;
    geometry.faces.extend(faces);
    Ok(())
}

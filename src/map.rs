use ::errors::{ErrorKind, Result};
use ::geom::{Bounds, Point3};
use ::parse::lumps::BareGeometry;


/// The boundary of one face, as indices into the map's vertex array.
///
/// Each surface edge contributes both of its endpoints, in traversal order, so a face with `n`
/// surface edges has `2n` indices and every corner appears twice: once as the end of one edge and
/// once as the start of the next.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceLoop {
    face: usize,
    indices: Vec<u16>,
}

impl FaceLoop {
    /// Index of the face this came from, in the faces lump.
    pub fn face(&self) -> usize {
        self.face
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// The polygon with the doubled corners removed: just the leading endpoint of each surface
    /// edge.
    pub fn outline(&self) -> Vec<u16> {
        self.indices.iter().step_by(2).cloned().collect()
    }
}


/// Visible level geometry: every vertex, plus each face's resolved boundary.  This is what a
/// renderer needs to build its vertex and index buffers, and nothing else.
#[derive(Clone, Debug, PartialEq)]
pub struct MapGeometry {
    pub version: u32,
    pub map_revision: u32,
    vertices: Vec<Point3>,
    faces: Vec<FaceLoop>,
}

impl MapGeometry {
    /// Resolve every face's surface edges into vertex indices.  All the cross-lump references are
    /// checked here; one bad face fails the whole map.
    pub fn from_bare(bare: &BareGeometry, version: u32, map_revision: u32) -> Result<Self> {
        let mut faces = Vec::with_capacity(bare.faces.len());
        for (f, face) in bare.faces.iter().enumerate() {
            let first = face.first_edge as usize;
            let surfedges = first.checked_add(face.num_edges as usize)
                .and_then(|end| bare.surfedges.get(first..end))
                .ok_or(ErrorKind::SurfaceEdgeRangeOutOfBounds(f, face.first_edge, face.num_edges, bare.surfedges.len()))?;

            let mut indices = Vec::with_capacity(surfedges.len() * 2);
            for surfedge in surfedges {
                let e = surfedge.edge_index();
                let edge = bare.edges.get(e)
                    .ok_or(ErrorKind::EdgeOutOfRange(f, surfedge.0, bare.edges.len()))?;

                let (start, end) = surfedge.endpoints(edge);
                for &v in [start, end].iter() {
                    if v as usize >= bare.vertices.len() {
                        bail!(ErrorKind::VertexOutOfRange(f, e, v, bare.vertices.len()));
                    }
                    indices.push(v);
                }
            }

            faces.push(FaceLoop{ face: f, indices });
        }

        debug!("resolved {} faces over {} vertices", faces.len(), bare.vertices.len());
        Ok(MapGeometry{
            version,
            map_revision,
            vertices: bare.vertices.clone(),
            faces,
        })
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[FaceLoop] {
        &self.faces
    }

    /// Positions along a face's loop, in the same order as its indices.
    pub fn face_positions<'a>(&'a self, face: &'a FaceLoop) -> impl Iterator<Item=Point3> + 'a {
        face.indices.iter().map(move |&v| self.vertices[v as usize])
    }

    /// Total number of indices across every face, i.e. the size of a combined index buffer.
    pub fn index_count(&self) -> usize {
        self.faces.iter().map(|face| face.indices.len()).sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.vertices.split_first()?;
        let mut bounds = Bounds::new(*first);
        for &vertex in rest {
            bounds.extend(vertex);
        }
        Some(bounds)
    }
}

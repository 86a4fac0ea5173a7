use euclid::TypedPoint3D;

/// Unit tag for coordinates in a map's own world space.
pub struct MapSpace;
pub type Coord = f32;
pub type Point3 = TypedPoint3D<Coord, MapSpace>;

/// Axis-aligned box given by its two extreme corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub mins: Point3,
    pub maxs: Point3,
}

impl Bounds {
    pub fn new(point: Point3) -> Self {
        Bounds { mins: point, maxs: point }
    }

    pub fn extend(&mut self, point: Point3) {
        self.mins = Point3::new(self.mins.x.min(point.x), self.mins.y.min(point.y), self.mins.z.min(point.z));
        self.maxs = Point3::new(self.maxs.x.max(point.x), self.maxs.y.max(point.y), self.maxs.z.max(point.z));
    }
}

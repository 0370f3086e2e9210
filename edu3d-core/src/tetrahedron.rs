/// Cluster of five regular tetrahedra sharing corners with a central one
use log::debug;

use crate::error::{ensure_positive, Result};
use crate::geometry::{centroid, dedup_points, Point, PointKey};

/// Distance (in units of `scale`) from a shared face's centroid to the new apex.
/// Empirically tuned; the expected vertex layout depends on it.
pub const TETRA_OFFSET_FACTOR: f64 = 1.63;

/// Vertex index triples of the four faces. Winding is fixed, not outward-normal-guaranteed.
pub const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];

/// Sign-alternating cube corners spanning the reference tetrahedron
const REFERENCE_CORNERS: [[f64; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
];

#[derive(Debug, Clone, PartialEq)]
pub struct Tetrahedron {
    vertices: [Point; 4],
    centroid: Point,
}

impl Tetrahedron {
    pub fn new(vertices: [Point; 4]) -> Self {
        let centroid = centroid(&vertices);
        Self { vertices, centroid }
    }

    pub fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn faces(&self) -> &'static [[usize; 3]; 4] {
        &TETRAHEDRON_FACES
    }

    /// The six edges as vertex index pairs
    pub fn edges(&self) -> [[usize; 2]; 6] {
        [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]
    }

    /// Number of this tetrahedron's vertices that coincide with one of `other`'s
    pub fn shared_vertex_count(&self, other: &Tetrahedron) -> usize {
        let keys: Vec<PointKey> = other.vertices.iter().map(PointKey::new).collect();
        self.vertices
            .iter()
            .filter(|v| keys.contains(&PointKey::new(v)))
            .count()
    }
}

/// Construction parameters for [`TetrahedronCluster`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetrahedronClusterConfig {
    pub scale: f64,
    pub offset_factor: f64,
}

impl Default for TetrahedronClusterConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            offset_factor: TETRA_OFFSET_FACTOR,
        }
    }
}

impl TetrahedronClusterConfig {
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn build(&self) -> Result<TetrahedronCluster> {
        let scale = ensure_positive("scale", self.scale)?;
        let offset_factor = ensure_positive("offset_factor", self.offset_factor)?;

        let v: [Point; 4] =
            REFERENCE_CORNERS.map(|[x, y, z]| Point::new(x * scale, y * scale, z * scale));

        let mut tetrahedra = Vec::with_capacity(5);
        tetrahedra.push(Tetrahedron::new(v));

        for i in 0..4 {
            let shared = [v[i], v[(i + 1) % 4], v[(i + 2) % 4]];
            let opposite = v[(i + 3) % 4];
            let mid = centroid(&shared);
            let direction = (opposite - mid).normalize();
            let apex = mid - direction * (scale * offset_factor);
            tetrahedra.push(Tetrahedron::new([shared[0], shared[1], shared[2], apex]));
        }

        let cluster = TetrahedronCluster::from_tetrahedra(tetrahedra);
        debug!(
            "built tetrahedron cluster: scale={} tetrahedra={} unique_vertices={}",
            scale,
            cluster.tetrahedra.len(),
            cluster.unique_vertices.len()
        );
        Ok(cluster)
    }
}

/// Build the five-tetrahedron cluster at the given scale
pub fn build(scale: f64) -> Result<TetrahedronCluster> {
    TetrahedronClusterConfig::with_scale(scale).build()
}

/// One central tetrahedron followed by four derived ones
#[derive(Debug, Clone, PartialEq)]
pub struct TetrahedronCluster {
    tetrahedra: Vec<Tetrahedron>,
    unique_vertices: Vec<Point>,
}

impl TetrahedronCluster {
    fn from_tetrahedra(tetrahedra: Vec<Tetrahedron>) -> Self {
        let unique_vertices = dedup_points(tetrahedra.iter().flat_map(|t| t.vertices.iter()));
        Self {
            tetrahedra,
            unique_vertices,
        }
    }

    /// All five tetrahedra, central first
    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    pub fn central(&self) -> &Tetrahedron {
        &self.tetrahedra[0]
    }

    pub fn derived(&self) -> &[Tetrahedron] {
        &self.tetrahedra[1..]
    }

    /// Center markers: one centroid per tetrahedron
    pub fn centers(&self) -> Vec<Point> {
        self.tetrahedra.iter().map(Tetrahedron::centroid).collect()
    }

    /// Vertex markers: distinct corners across the whole cluster
    pub fn unique_vertices(&self) -> &[Point] {
        &self.unique_vertices
    }
}

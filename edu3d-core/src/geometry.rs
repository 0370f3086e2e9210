/// Geometry primitives: model-space points and render-space triangle meshes
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;

use crate::scene::Rgb;

/// Model-space coordinate used by the builders
pub type Point = Point3<f64>;
/// Model-space direction or offset
pub type Vec3 = Vector3<f64>;

/// Decimal places kept when comparing coordinates for identity
pub const DEDUP_DECIMALS: i32 = 6;

/// Arithmetic mean of a set of points. Returns the origin for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::origin();
    }
    let sum = points
        .iter()
        .fold(Vec3::zeros(), |acc, p| acc + p.coords);
    Point::from(sum / points.len() as f64)
}

/// A coordinate quantized to a fixed number of decimals, usable as a set key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey(i64, i64, i64);

impl PointKey {
    pub fn new(point: &Point) -> Self {
        let factor = 10f64.powi(DEDUP_DECIMALS);
        let q = |c: f64| (c * factor).round() as i64;
        Self(q(point.x), q(point.y), q(point.z))
    }
}

impl From<&Point> for PointKey {
    fn from(point: &Point) -> Self {
        Self::new(point)
    }
}

/// Collapse points that coincide after rounding, keeping first occurrences in order
pub fn dedup_points<'a, I>(points: I) -> Vec<Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(PointKey::new(p)))
        .copied()
        .collect()
}

/// Narrow a model-space point to the f32 space used for rendering
pub fn to_render(point: &Point) -> Point3<f32> {
    Point3::new(point.x as f32, point.y as f32, point.z as f32)
}

/// A render vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A colored triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub color: Rgb,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex, color: Rgb) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color,
        }
    }

    /// Build a flat-shaded triangle from bare positions
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>, color: Rgb) -> Self {
        let normal = (b - a).cross(&(c - a));
        let normal = normal.try_normalize(1e-12).unwrap_or_else(Vector3::z);
        Self::new(
            Vertex::new(a, normal),
            Vertex::new(b, normal),
            Vertex::new(c, normal),
            color,
        )
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// Corner signs and face normals of an axis-aligned cube, two triangles per face
const CUBE_FACES: [([[f32; 3]; 4], [f32; 3]); 6] = [
    ([[-1., -1., 1.], [1., -1., 1.], [1., 1., 1.], [-1., 1., 1.]], [0., 0., 1.]),
    ([[-1., -1., -1.], [-1., 1., -1.], [1., 1., -1.], [1., -1., -1.]], [0., 0., -1.]),
    ([[-1., 1., -1.], [-1., 1., 1.], [1., 1., 1.], [1., 1., -1.]], [0., 1., 0.]),
    ([[-1., -1., -1.], [1., -1., -1.], [1., -1., 1.], [-1., -1., 1.]], [0., -1., 0.]),
    ([[1., -1., -1.], [1., 1., -1.], [1., 1., 1.], [1., -1., 1.]], [1., 0., 0.]),
    ([[-1., -1., -1.], [-1., -1., 1.], [-1., 1., 1.], [-1., 1., -1.]], [-1., 0., 0.]),
];

/// A 3D mesh composed of colored triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append every triangle of another mesh
    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned cube of edge `size` centered at `center`
    pub fn cube(center: Point3<f32>, size: f32, color: Rgb) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        for (corners, n) in &CUBE_FACES {
            let normal = Vector3::new(n[0], n[1], n[2]);
            let v: Vec<Vertex> = corners
                .iter()
                .map(|c| {
                    let offset = Vector3::new(c[0], c[1], c[2]) * half;
                    Vertex::new(center + offset, normal)
                })
                .collect();
            mesh.add_triangle(Triangle::new(v[0], v[1], v[2], color));
            mesh.add_triangle(Triangle::new(v[0], v[2], v[3], color));
        }

        mesh
    }

    /// Largest distance of any vertex from the origin
    pub fn bounding_radius(&self) -> f32 {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| v.position.coords.norm())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        let c = centroid(&[
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(0.0, 4.0, 6.0),
        ]);
        assert!((c - Point::new(2.0 / 3.0, 4.0 / 3.0, 2.0)).norm() < 1e-12);
        assert_eq!(centroid(&[]), Point::origin());
    }

    #[test]
    fn test_point_key_rounding() {
        let a = PointKey::new(&Point::new(1.0, 2.0, 3.0));
        let b = PointKey::new(&Point::new(1.000_000_1, 2.0, 2.999_999_9));
        let c = PointKey::new(&Point::new(1.00001, 2.0, 3.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_dedup_keeps_first_order() {
        let points = [
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];
        let unique = dedup_points(&points);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0], points[0]);
        assert_eq!(unique[2], points[3]);
    }

    #[test]
    fn test_cube_mesh() {
        let cube = Mesh::cube(Point3::new(1.0, 0.0, 0.0), 2.0, Rgb::WHITE);
        assert_eq!(cube.len(), 12);
        for triangle in &cube.triangles {
            for v in &triangle.vertices {
                assert!((v.position.x - 1.0).abs() <= 1.0 + 1e-6);
                assert!(v.position.y.abs() <= 1.0 + 1e-6);
            }
            // Winding agrees with the stored face normal
            let n = triangle.calculate_normal();
            assert!(n.dot(&triangle.vertices[0].normal) > 0.99);
        }
        assert!((cube.bounding_radius() - 6f32.sqrt()).abs() < 1e-5);
    }
}

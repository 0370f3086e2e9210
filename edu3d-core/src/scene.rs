/// Retained scene: maps built models onto drawable triangles, lines and markers
use nalgebra::Point3;

use crate::diamond::DiamondLattice;
use crate::geometry::{to_render, Mesh, Triangle};
use crate::prism::{CellCategory, PrismGrid};
use crate::tetrahedron::TetrahedronCluster;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::hex(0xffffff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Channels as floats in `[0, 1]`
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Multiply each channel by `factor`, clamped to `[0, 1]`
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self::new(
            (self.r as f32 * f).round() as u8,
            (self.g as f32 * f).round() as u8,
            (self.b as f32 * f).round() as u8,
        )
    }
}

/// One hue per tetrahedron, central first
pub const TETRAHEDRON_PALETTE: [Rgb; 5] = [
    Rgb::hex(0xff4040),
    Rgb::hex(0x40ff40),
    Rgb::hex(0x4080ff),
    Rgb::hex(0xffff40),
    Rgb::hex(0xff40ff),
];

pub const CENTER_MARKER_COLOR: Rgb = Rgb::WHITE;
pub const VERTEX_MARKER_COLOR: Rgb = Rgb::hex(0x40ffff);
pub const ATOM_COLOR: Rgb = Rgb::hex(0x888888);
pub const BOND_COLOR: Rgb = Rgb::hex(0xcccccc);

pub const TETRAHEDRON_OPACITY: f32 = 0.6;

pub fn category_color(category: CellCategory) -> Rgb {
    match category {
        CellCategory::Corner => Rgb::hex(0xff3030),
        CellCategory::Edge => Rgb::hex(0xff9900),
        CellCategory::Face => Rgb::hex(0xffee33),
        CellCategory::Interior => Rgb::hex(0x3366ff),
    }
}

/// Line segment in render space
pub type Segment = [Point3<f32>; 2];

#[derive(Debug, Clone)]
pub enum Primitive {
    Triangles(Mesh),
    Lines { segments: Vec<Segment>, color: Rgb },
    Points { positions: Vec<Point3<f32>>, color: Rgb },
}

impl Primitive {
    fn positions(&self) -> Box<dyn Iterator<Item = &Point3<f32>> + '_> {
        match self {
            Primitive::Triangles(mesh) => Box::new(
                mesh.triangles
                    .iter()
                    .flat_map(|t| t.vertices.iter().map(|v| &v.position)),
            ),
            Primitive::Lines { segments, .. } => Box::new(segments.iter().flatten()),
            Primitive::Points { positions, .. } => Box::new(positions.iter()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Drawable {
    pub name: String,
    pub primitive: Primitive,
    pub opacity: f32,
}

impl Drawable {
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Flat list of drawables, built once and drawn every frame
#[derive(Debug, Clone, Default)]
pub struct Scene {
    drawables: Vec<Drawable>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, drawable: Drawable) {
        self.drawables.push(drawable);
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn find(&self, name: &str) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.name == name)
    }

    /// Largest distance of any primitive position from the origin
    pub fn bounding_radius(&self) -> f32 {
        self.drawables
            .iter()
            .flat_map(|d| d.primitive.positions())
            .map(|p| p.coords.norm())
            .fold(0.0, f32::max)
    }

    /// Translucent colored faces, edges, center markers and shared-vertex markers
    pub fn from_cluster(cluster: &TetrahedronCluster) -> Self {
        let mut scene = Self::new();

        for (index, tetrahedron) in cluster.tetrahedra().iter().enumerate() {
            let color = TETRAHEDRON_PALETTE[index % TETRAHEDRON_PALETTE.len()];
            let v: [Point3<f32>; 4] =
                std::array::from_fn(|i| to_render(&tetrahedron.vertices()[i]));

            let mut mesh = Mesh::with_capacity(4);
            for [i, j, k] in tetrahedron.faces() {
                mesh.add_triangle(Triangle::flat(v[*i], v[*j], v[*k], color));
            }
            scene.add(
                Drawable::new(format!("tetrahedron-{index}"), Primitive::Triangles(mesh))
                    .with_opacity(TETRAHEDRON_OPACITY),
            );

            let segments = tetrahedron.edges().map(|[a, b]| [v[a], v[b]]).to_vec();
            scene.add(Drawable::new(
                format!("tetrahedron-{index}-edges"),
                Primitive::Lines { segments, color },
            ));
        }

        scene.add(Drawable::new(
            "centers",
            Primitive::Points {
                positions: cluster.centers().iter().map(to_render).collect(),
                color: CENTER_MARKER_COLOR,
            },
        ));
        scene.add(Drawable::new(
            "vertices",
            Primitive::Points {
                positions: cluster.unique_vertices().iter().map(to_render).collect(),
                color: VERTEX_MARKER_COLOR,
            },
        ));
        scene
    }

    /// One cube per cell, grouped by category
    pub fn from_prism(grid: &PrismGrid) -> Self {
        let mut scene = Self::new();
        let size = grid.cube_size() as f32;

        for category in CellCategory::ALL {
            let color = category_color(category);
            let mut mesh = Mesh::new();
            for cell in grid.cells().iter().filter(|c| c.category == category) {
                mesh.extend(Mesh::cube(to_render(&cell.center), size, color));
            }
            if !mesh.is_empty() {
                scene.add(Drawable::new(category.as_str(), Primitive::Triangles(mesh)));
            }
        }
        scene
    }

    /// Atoms as markers, bonds as segments
    pub fn from_lattice(lattice: &DiamondLattice) -> Self {
        let mut scene = Self::new();
        let atoms = lattice.atoms();

        scene.add(Drawable::new(
            "atoms",
            Primitive::Points {
                positions: atoms.iter().map(|atom| to_render(&atom.position)).collect(),
                color: ATOM_COLOR,
            },
        ));
        scene.add(Drawable::new(
            "bonds",
            Primitive::Lines {
                segments: lattice
                    .bonds()
                    .iter()
                    .map(|bond| {
                        [
                            to_render(&atoms[bond.a].position),
                            to_render(&atoms[bond.b].position),
                        ]
                    })
                    .collect(),
                color: BOND_COLOR,
            },
        ));
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diamond, prism, tetrahedron};

    #[test]
    fn test_hex_color() {
        assert_eq!(Rgb::hex(0x123456), Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(Rgb::WHITE.to_f32(), [1.0, 1.0, 1.0]);
        assert_eq!(Rgb::WHITE.scaled(0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_cluster_scene() {
        let cluster = tetrahedron::build(1.0).unwrap();
        let scene = Scene::from_cluster(&cluster);
        // Faces and edges per tetrahedron, plus two marker sets
        assert_eq!(scene.drawables().len(), 5 * 2 + 2);
        match &scene.find("vertices").unwrap().primitive {
            Primitive::Points { positions, .. } => assert_eq!(positions.len(), 8),
            other => panic!("unexpected primitive {other:?}"),
        }
        let faces = scene.find("tetrahedron-0").unwrap();
        assert!((faces.opacity - TETRAHEDRON_OPACITY).abs() < 1e-6);
        assert!(scene.bounding_radius() >= 3f32.sqrt() - 1e-5);
    }

    #[test]
    fn test_prism_scene() {
        let grid = prism::build(2, 5, 11, 1.0, 0.2).unwrap();
        let scene = Scene::from_prism(&grid);
        // No interior cells in a two-wide grid
        assert_eq!(scene.drawables().len(), 3);
        assert!(scene.find("interior").is_none());
        let total: usize = scene
            .drawables()
            .iter()
            .map(|d| match &d.primitive {
                Primitive::Triangles(mesh) => mesh.len(),
                _ => 0,
            })
            .sum();
        assert_eq!(total, 110 * 12);
    }

    #[test]
    fn test_lattice_scene() {
        let lattice = diamond::build(1, 1, 1, 3.57, 1.8).unwrap();
        let scene = Scene::from_lattice(&lattice);
        match &scene.find("bonds").unwrap().primitive {
            Primitive::Lines { segments, color } => {
                assert_eq!(segments.len(), 7);
                assert_eq!(*color, BOND_COLOR);
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }
}

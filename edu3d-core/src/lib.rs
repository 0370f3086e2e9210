/// edu3d Core Library - Educational geometric models
///
/// Pure construction of three static models (a cluster of corner-sharing
/// tetrahedra, a prism of cells classified by exposed faces, and a diamond
/// cubic lattice with inferred bonds), plus the scene adapter, camera and
/// orbit controls a host renderer needs to draw them.

pub mod diamond;
pub mod error;
pub mod geometry;
pub mod neighbors;
pub mod orbit;
pub mod prism;
pub mod projection;
pub mod scene;
pub mod tetrahedron;

// Re-export commonly used types
pub use diamond::{Atom, Bond, DiamondConfig, DiamondLattice};
pub use error::{GeometryError, Result};
pub use geometry::{Mesh, Point, PointKey, Triangle, Vec3, Vertex};
pub use neighbors::BondSearch;
pub use orbit::OrbitControls;
pub use prism::{Cell, CellCategory, PrismConfig, PrismGrid};
pub use projection::{Camera, ProjectionMode};
pub use scene::{Drawable, Primitive, Rgb, Scene};
pub use tetrahedron::{Tetrahedron, TetrahedronCluster, TetrahedronClusterConfig};

/// Which of the three models to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Tetrahedra,
    Prism,
    Diamond,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Tetrahedra, ModelKind::Prism, ModelKind::Diamond];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Tetrahedra => "tetrahedra",
            ModelKind::Prism => "prism",
            ModelKind::Diamond => "diamond",
        }
    }
}

/// Parameters for all three models
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelConfig {
    pub tetrahedra: TetrahedronClusterConfig,
    pub prism: PrismConfig,
    pub diamond: DiamondConfig,
}

impl ModelConfig {
    /// Check every model's parameters, so a later switch cannot fail
    pub fn validate(&self) -> Result<()> {
        self.tetrahedra.build()?;
        self.prism.build()?;
        self.diamond.build()?;
        Ok(())
    }

    /// Build one model and map it onto a drawable scene
    pub fn build_scene(&self, kind: ModelKind) -> Result<Scene> {
        Ok(match kind {
            ModelKind::Tetrahedra => Scene::from_cluster(&self.tetrahedra.build()?),
            ModelKind::Prism => Scene::from_prism(&self.prism.build()?),
            ModelKind::Diamond => Scene::from_lattice(&self.diamond.build()?),
        })
    }
}

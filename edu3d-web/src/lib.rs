/// edu3d Web - WASM bindings exposing the models as flat GPU-ready buffers
///
/// A browser harness (WebGL, three.js, ...) calls one of the builder
/// functions and uploads the returned arrays as vertex and index buffers.
use edu3d_core::scene::{Primitive, Rgb};
use edu3d_core::{diamond, prism, tetrahedron, GeometryError, Scene};
use wasm_bindgen::prelude::*;

/// Flattened geometry of one model.
///
/// `positions` and `colors` hold three floats per vertex. `indices` address
/// those vertices as triangles and `line_indices` as segment pairs, so a
/// triangle model keeps its edge overlay. `kind()` is `"triangles"` when any
/// triangle is present, `"lines"` otherwise. `markers` holds point markers,
/// three floats each.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct ModelBuffers {
    kind: &'static str,
    positions: Vec<f32>,
    colors: Vec<f32>,
    indices: Vec<u32>,
    line_indices: Vec<u32>,
    markers: Vec<f32>,
    marker_colors: Vec<f32>,
}

#[wasm_bindgen]
impl ModelBuffers {
    pub fn kind(&self) -> String {
        self.kind.to_string()
    }

    pub fn positions(&self) -> Vec<f32> {
        self.positions.clone()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.colors.clone()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.indices.clone()
    }

    #[wasm_bindgen(js_name = lineIndices)]
    pub fn line_indices(&self) -> Vec<u32> {
        self.line_indices.clone()
    }

    pub fn markers(&self) -> Vec<f32> {
        self.markers.clone()
    }

    #[wasm_bindgen(js_name = markerColors)]
    pub fn marker_colors(&self) -> Vec<f32> {
        self.marker_colors.clone()
    }

    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

impl ModelBuffers {
    fn push_vertex(&mut self, position: [f32; 3], color: Rgb) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.extend_from_slice(&position);
        self.colors.extend_from_slice(&color.to_f32());
        index
    }

    /// Flatten every drawable of a scene into the shared vertex buffer
    fn from_scene(scene: &Scene) -> Self {
        let has_triangles = scene
            .drawables()
            .iter()
            .any(|d| matches!(d.primitive, Primitive::Triangles(_)));
        let mut buffers = Self {
            kind: if has_triangles { "triangles" } else { "lines" },
            ..Self::default()
        };

        for drawable in scene.drawables() {
            match &drawable.primitive {
                Primitive::Triangles(mesh) => {
                    for triangle in &mesh.triangles {
                        for vertex in &triangle.vertices {
                            let p = vertex.position;
                            let index = buffers.push_vertex([p.x, p.y, p.z], triangle.color);
                            buffers.indices.push(index);
                        }
                    }
                }
                Primitive::Lines { segments, color } => {
                    for segment in segments {
                        for p in segment {
                            let index = buffers.push_vertex([p.x, p.y, p.z], *color);
                            buffers.line_indices.push(index);
                        }
                    }
                }
                Primitive::Points { positions, color } => {
                    for p in positions {
                        buffers.markers.extend_from_slice(&[p.x, p.y, p.z]);
                        buffers.marker_colors.extend_from_slice(&color.to_f32());
                    }
                }
            }
        }
        buffers
    }
}

fn to_js(error: GeometryError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen(js_name = tetrahedronCluster)]
pub fn tetrahedron_cluster(scale: f64) -> Result<ModelBuffers, JsValue> {
    let cluster = tetrahedron::build(scale).map_err(to_js)?;
    Ok(ModelBuffers::from_scene(&Scene::from_cluster(&cluster)))
}

#[wasm_bindgen(js_name = prismGrid)]
pub fn prism_grid(
    width: u32,
    height: u32,
    depth: u32,
    cube_size: f64,
    spacing: f64,
) -> Result<ModelBuffers, JsValue> {
    let grid = prism::build(width, height, depth, cube_size, spacing).map_err(to_js)?;
    Ok(ModelBuffers::from_scene(&Scene::from_prism(&grid)))
}

#[wasm_bindgen(js_name = diamondLattice)]
pub fn diamond_lattice(
    cells_x: u32,
    cells_y: u32,
    cells_z: u32,
    lattice_constant: f64,
    bond_threshold: f64,
) -> Result<ModelBuffers, JsValue> {
    let lattice = diamond::build(cells_x, cells_y, cells_z, lattice_constant, bond_threshold)
        .map_err(to_js)?;
    log::debug!("exporting {} atoms", lattice.atoms().len());
    Ok(ModelBuffers::from_scene(&Scene::from_lattice(&lattice)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(scene: &Scene) -> ModelBuffers {
        ModelBuffers::from_scene(scene)
    }

    #[test]
    fn test_cluster_buffers() {
        let buffers = flatten(&Scene::from_cluster(&tetrahedron::build(1.0).unwrap()));
        assert_eq!(buffers.kind(), "triangles");
        // 5 tetrahedra x 4 faces x 3 vertices
        assert_eq!(buffers.indices().len(), 60);
        // 5 tetrahedra x 6 edges x 2 endpoints
        assert_eq!(buffers.line_indices().len(), 60);
        assert_eq!(buffers.vertex_count(), 120);
        let max_index = buffers.line_indices().into_iter().max().unwrap();
        assert_eq!(max_index as usize, buffers.vertex_count() - 1);
        assert_eq!(buffers.colors().len(), buffers.positions().len());
        // 5 centers + 8 shared vertices
        assert_eq!(buffers.markers().len(), 13 * 3);
        assert_eq!(buffers.marker_colors().len(), 13 * 3);
    }

    #[test]
    fn test_prism_buffers() {
        let buffers = flatten(&Scene::from_prism(&prism::build(2, 2, 2, 1.0, 0.1).unwrap()));
        assert_eq!(buffers.kind(), "triangles");
        assert_eq!(buffers.indices().len(), 8 * 12 * 3);
        assert!(buffers.line_indices().is_empty());
        assert!(buffers.markers().is_empty());
    }

    #[test]
    fn test_lattice_buffers() {
        let lattice = diamond::build(1, 1, 1, 3.57, 1.8).unwrap();
        let buffers = flatten(&Scene::from_lattice(&lattice));
        assert_eq!(buffers.kind(), "lines");
        assert!(buffers.indices().is_empty());
        assert_eq!(buffers.line_indices().len(), 7 * 2);
        assert_eq!(buffers.markers().len(), 8 * 3);
    }

    #[test]
    fn test_empty_lattice_buffers() {
        let lattice = diamond::build(0, 0, 0, 3.57, 1.8).unwrap();
        let buffers = flatten(&Scene::from_lattice(&lattice));
        assert_eq!(buffers.vertex_count(), 0);
        assert!(buffers.line_indices().is_empty());
    }
}

/// Pointer-driven orbit controls around a fixed target
use nalgebra::{Point3, Vector3};

use crate::projection::Camera;

/// Elevation limit, just short of the poles so `up` never aligns with the view direction
const MAX_ELEVATION: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Radians of rotation per pointer cell dragged
pub const DRAG_SENSITIVITY: f32 = 0.05;

/// Spherical camera placement: azimuth around +Y, elevation above the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    pub fn new(distance: f32) -> Self {
        let mut controls = Self {
            target: Point3::origin(),
            azimuth: 0.6,
            elevation: 0.4,
            distance,
            min_distance: 0.5,
            max_distance: 500.0,
        };
        controls.zoom(1.0);
        controls
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(std::f32::consts::TAU);
        self.elevation = (self.elevation + d_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Translate a pointer drag, in terminal cells, into rotation
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.rotate(-dx * DRAG_SENSITIVITY, dy * DRAG_SENSITIVITY);
    }

    /// Scale the orbit distance; factors below 1 move closer
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Choose a distance that keeps a sphere of `radius` in view
    pub fn fit(&mut self, radius: f32, fov: f32) {
        let radius = radius.max(f32::EPSILON);
        self.max_distance = self.max_distance.max(radius * 20.0);
        self.distance = radius / (fov / 2.0).sin() * 1.1;
        self.zoom(1.0);
    }

    pub fn eye(&self) -> Point3<f32> {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let offset = Vector3::new(cos_el * sin_az, sin_el, cos_el * cos_az) * self.distance;
        self.target + offset
    }

    /// Place the camera on the orbit sphere looking at the target
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.eye();
        camera.target = self.target;
        camera.up = Vector3::y();
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(5.0)
    }
}

/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use edu3d_core::scene::{Drawable, Primitive, Segment};
use edu3d_core::{Camera, Mesh, Rgb, Scene};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph used for point markers
const MARKER: char = 'o';

/// Markers are pulled towards the camera so they win against the surface they sit on
const MARKER_DEPTH_BIAS: f32 = 1e-3;

/// Minimum brightness so faces turned away from the light stay visible
const AMBIENT: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Rgb,
    depth: f32,
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    color: Rgb::WHITE,
    depth: f32::INFINITY,
};

/// ASCII renderer that converts a scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![EMPTY; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Glyph at a screen position, for inspection
    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].glyph)
    }

    /// Draw opaque drawables first, then translucent ones so they blend over the rest
    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        let view_projection = camera.view_projection();
        let light_dir = (camera.position - camera.target).normalize();

        let (opaque, translucent): (Vec<&Drawable>, Vec<&Drawable>) =
            scene.drawables().iter().partition(|d| d.opacity >= 1.0);

        for drawable in opaque.into_iter().chain(translucent) {
            match &drawable.primitive {
                Primitive::Triangles(mesh) => self.render_mesh(
                    mesh,
                    &view_projection,
                    camera,
                    &light_dir,
                    drawable.opacity,
                ),
                Primitive::Lines { segments, color } => {
                    self.render_lines(segments, *color, &view_projection, camera)
                }
                Primitive::Points { positions, color } => {
                    self.render_points(positions, *color, &view_projection, camera)
                }
            }
        }
    }

    fn project(
        &self,
        point: &Point3<f32>,
        view_projection: &Matrix4<f32>,
        camera: &Camera,
    ) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(
            point,
            view_projection,
            self.width as u32,
            self.height as u32,
        )
    }

    fn render_mesh(
        &mut self,
        mesh: &Mesh,
        view_projection: &Matrix4<f32>,
        camera: &Camera,
        light_dir: &Vector3<f32>,
        opacity: f32,
    ) {
        for triangle in &mesh.triangles {
            // Project vertices to screen space
            let mut screen_coords = [(0.0, 0.0, 0.0); 3];
            let mut visible = true;
            for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
                match self.project(&vertex.position, view_projection, camera) {
                    Some(coords) => *slot = coords,
                    None => visible = false,
                }
            }
            if !visible {
                continue;
            }

            // Two-sided lighting: winding is not guaranteed to face outwards
            let normal = triangle.calculate_normal();
            let brightness = AMBIENT + (1.0 - AMBIENT) * normal.dot(light_dir).abs();

            // Map brightness to character
            let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
            let character = LUMINOSITY_RAMP[char_index];

            self.rasterize_triangle(
                &screen_coords,
                character,
                triangle.color.scaled(brightness),
                opacity,
            );
        }
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f32, f32, f32); 3],
        character: char,
        color: Rgb,
        opacity: f32,
    ) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    // Interpolate depth
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x as usize, y as usize, depth, character, color, opacity);
                }
            }
        }
    }

    fn render_lines(
        &mut self,
        segments: &[Segment],
        color: Rgb,
        view_projection: &Matrix4<f32>,
        camera: &Camera,
    ) {
        for [start, end] in segments {
            let (Some(a), Some(b)) = (
                self.project(start, view_projection, camera),
                self.project(end, view_projection, camera),
            ) else {
                continue;
            };
            self.rasterize_line(a, b, color);
        }
    }

    /// DDA line walk with interpolated depth
    fn rasterize_line(&mut self, a: (f32, f32, f32), b: (f32, f32, f32), color: Rgb) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let glyph = line_glyph(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        // Off-screen endpoints far away would otherwise make this loop unbounded
        let limit = (self.width + self.height) as f32 * 4.0;
        if steps > limit {
            return;
        }

        for i in 0..=steps as usize {
            let t = i as f32 / steps;
            let x = a.0 + dx * t;
            let y = a.1 + dy * t;
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            let depth = a.2 + (b.2 - a.2) * t;
            self.plot(x as usize, y as usize, depth, glyph, color, 1.0);
        }
    }

    fn render_points(
        &mut self,
        positions: &[Point3<f32>],
        color: Rgb,
        view_projection: &Matrix4<f32>,
        camera: &Camera,
    ) {
        for position in positions {
            let Some((x, y, depth)) = self.project(position, view_projection, camera) else {
                continue;
            };
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            self.plot(
                x as usize,
                y as usize,
                depth - MARKER_DEPTH_BIAS,
                MARKER,
                color,
                1.0,
            );
        }
    }

    /// Depth-tested write. Translucent writes blend color and leave depth untouched.
    fn plot(&mut self, x: usize, y: usize, depth: f32, glyph: char, color: Rgb, opacity: f32) {
        let cell = &mut self.cells[y * self.width + x];
        if depth >= cell.depth {
            return;
        }
        if opacity >= 1.0 {
            *cell = Cell {
                glyph,
                color,
                depth,
            };
        } else if cell.glyph == ' ' {
            cell.glyph = glyph;
            cell.color = color.scaled(opacity);
        } else {
            cell.color = blend(cell.color, color, opacity);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            // No trailing newline, so the last row never scrolls the screen
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for cell in row {
                let Rgb { r, g, b } = cell.color;
                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn blend(under: Rgb, over: Rgb, opacity: f32) -> Rgb {
    let mix = |u: u8, o: u8| (u as f32 * (1.0 - opacity) + o as f32 * opacity).round() as u8;
    Rgb::new(mix(under.r, over.r), mix(under.g, over.g), mix(under.b, over.b))
}

/// Pick a glyph that follows the line's on-screen slope
fn line_glyph(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

/// Terminal-based ASCII viewer for the edu3d models
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use edu3d_core::{Camera, ModelConfig, ModelKind, OrbitControls, Scene};
use log::{info, warn};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod error;
pub mod renderer;

pub use error::{AppError, Result};
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

const ROTATE_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 1.1;

/// Render context: everything a frame needs, owned in one place
pub struct TerminalApp {
    config: ModelConfig,
    kind: ModelKind,
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    drag_origin: Option<(u16, u16)>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: ModelConfig, kind: ModelKind) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, kind, width, height)
    }

    /// Build the context for a viewport of `width x height` terminal cells.
    /// Parameters of all three models are checked here, not on first switch.
    pub fn with_size(config: ModelConfig, kind: ModelKind, width: u16, height: u16) -> Result<Self> {
        config.validate()?;
        let scene = config.build_scene(kind)?;
        let rows = height.saturating_sub(STATUS_ROWS);
        let camera = Camera::new(width as u32, rows as u32 * CELL_ASPECT);
        let mut app = Self {
            config,
            kind,
            scene,
            camera,
            controls: OrbitControls::default(),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            drag_origin: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.frame_scene();
        info!(
            "loaded {} model: {} drawables",
            kind.name(),
            app.scene.drawables().len()
        );
        Ok(app)
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn frame_scene(&mut self) {
        self.controls.fit(self.scene.bounding_radius(), self.camera.fov);
        self.controls.apply(&mut self.camera);
    }

    /// Rebuild the scene for another model and reframe the camera
    pub fn switch_model(&mut self, kind: ModelKind) -> Result<()> {
        if kind == self.kind {
            return Ok(());
        }
        self.scene = self.config.build_scene(kind)?;
        self.kind = kind;
        self.frame_scene();
        info!("switched to {} model", kind.name());
        Ok(())
    }

    /// Switch from an input handler: a failure keeps the current scene
    fn try_switch(&mut self, kind: ModelKind) {
        if let Err(e) = self.switch_model(kind) {
            warn!("keeping {} model: {}", self.kind.name(), e);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one input event to the context
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) -> Result<()> {
        if kind == KeyEventKind::Release {
            return Ok(());
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('1') => self.try_switch(ModelKind::Tetrahedra),
            KeyCode::Char('2') => self.try_switch(ModelKind::Prism),
            KeyCode::Char('3') => self.try_switch(ModelKind::Diamond),
            KeyCode::Char('w') | KeyCode::Up => self.controls.rotate(0.0, ROTATE_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.controls.rotate(0.0, -ROTATE_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.controls.rotate(-ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.controls.rotate(ROTATE_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.controls.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => self.controls.zoom(ZOOM_STEP),
            KeyCode::Char('r') => self.frame_scene(),
            _ => {}
        }
        self.controls.apply(&mut self.camera);
        Ok(())
    }

    fn handle_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_origin = Some((column, row));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x0, y0)) = self.drag_origin {
                    let dx = column as f32 - x0 as f32;
                    let dy = row as f32 - y0 as f32;
                    // Rows are taller than columns; weight vertical motion to match
                    self.controls.drag(dx, dy * CELL_ASPECT as f32);
                }
                self.drag_origin = Some((column, row));
            }
            MouseEventKind::Up(_) => {
                self.drag_origin = None;
            }
            MouseEventKind::ScrollUp => self.controls.zoom(1.0 / ZOOM_STEP),
            MouseEventKind::ScrollDown => self.controls.zoom(ZOOM_STEP),
            _ => {}
        }
        self.controls.apply(&mut self.camera);
    }

    /// Follow a terminal resize
    pub fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(STATUS_ROWS);
        if width == 0 || rows == 0 {
            warn!("ignoring degenerate terminal size {}x{}", width, height);
            return;
        }
        self.renderer.resize(width as usize, rows as usize);
        self.camera.resize(width as u32, rows as u32 * CELL_ASPECT);
    }

    /// Rasterize the current scene into the renderer's buffer
    pub fn render_frame(&mut self) {
        self.renderer.clear();
        self.renderer.render_scene(&self.scene, &self.camera);
    }

    fn render(&mut self) -> Result<()> {
        self.render_frame();

        // Output to terminal
        let mut stdout = stdout();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "edu3d | {} | FPS: {:.1} | Drag=Orbit Wheel=Zoom 1/2/3=Model R=Reset Q=Quit",
                self.kind.name(),
                self.fps
            )),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            ResetColor,
            cursor::MoveTo(0, STATUS_ROWS)
        )?;

        self.renderer.draw(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use edu3d_core::GeometryError;

    fn app() -> TerminalApp {
        TerminalApp::with_size(ModelConfig::default(), ModelKind::Tetrahedra, 80, 25).unwrap()
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_model_switching() {
        let mut app = app();
        app.handle_event(key('3')).unwrap();
        assert_eq!(app.kind(), ModelKind::Diamond);
        assert!(app.scene().find("bonds").is_some());
        app.handle_event(key('2')).unwrap();
        assert_eq!(app.kind(), ModelKind::Prism);
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let mut config = ModelConfig::default();
        config.prism.width = 0;
        let result = TerminalApp::with_size(config, ModelKind::Tetrahedra, 80, 25);
        assert!(matches!(
            result,
            Err(AppError::Geometry(GeometryError::ZeroDimension { name: "width" }))
        ));

        let mut config = ModelConfig::default();
        config.diamond.bond_threshold = -1.0;
        assert!(TerminalApp::with_size(config, ModelKind::Prism, 80, 25).is_err());
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        assert!(app.is_running());
        app.handle_event(key('q')).unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn test_mouse_drag_orbits() {
        let mut app = app();
        let before = app.controls().azimuth;
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10))
            .unwrap();
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 14, 10))
            .unwrap();
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 14, 10))
            .unwrap();
        assert!((app.controls().azimuth - before).abs() > 1e-3);
    }

    #[test]
    fn test_scroll_zooms() {
        let mut app = app();
        let before = app.controls().distance;
        app.handle_event(mouse(MouseEventKind::ScrollUp, 0, 0)).unwrap();
        assert!(app.controls().distance < before);
    }

    #[test]
    fn test_resize_and_render() {
        let mut app = app();
        app.handle_event(Event::Resize(40, 21)).unwrap();
        assert_eq!(app.renderer().width(), 40);
        assert_eq!(app.renderer().height(), 20);
        app.resize(0, 0);
        assert_eq!(app.renderer().width(), 40);

        app.render_frame();
        let drawn = (0..40)
            .flat_map(|x| (0..20).map(move |y| (x, y)))
            .filter(|&(x, y)| app.renderer().glyph_at(x, y) != Some(' '))
            .count();
        assert!(drawn > 0);
    }
}

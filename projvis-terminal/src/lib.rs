/// Terminal-based wireframe viewer for planar projections
use anyhow::Context as _;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info, warn};
use projvis_core::{Frame, ProjectionConfig, ProjectionSystem, Vec3, WireframeModel};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;

pub use renderer::WireframeRenderer;

/// Change of viewpoint requested by a key, scaled by `step`
pub fn viewpoint_delta(code: KeyCode, step: f64) -> Option<Vec3> {
    match code {
        KeyCode::Char('w') => Some(Vec3::new(0.0, 0.0, -step)),
        KeyCode::Char('s') => Some(Vec3::new(0.0, 0.0, step)),
        KeyCode::Char('a') => Some(Vec3::new(-step, 0.0, 0.0)),
        KeyCode::Char('d') => Some(Vec3::new(step, 0.0, 0.0)),
        KeyCode::Char('q') => Some(Vec3::new(0.0, step, 0.0)),
        KeyCode::Char('e') => Some(Vec3::new(0.0, -step, 0.0)),
        _ => None,
    }
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    model: WireframeModel,
    initial_config: ProjectionConfig,
    config: ProjectionConfig,
    system: ProjectionSystem,
    step: f64,
    renderer: WireframeRenderer,
    status: Option<String>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(model: WireframeModel, config: ProjectionConfig, step: f64) -> anyhow::Result<Self> {
        let system = config
            .system()
            .context("invalid projection configuration")?;
        let (width, height) = terminal::size()?;

        Ok(Self {
            model,
            initial_config: config,
            config,
            system,
            step,
            renderer: WireframeRenderer::new(width as usize, height as usize),
            status: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn system(&self) -> &ProjectionSystem {
        &self.system
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
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

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                debug!("terminal resized to {width}x{height}");
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('r') => self.apply_config(self.initial_config),
            code => {
                if let Some(delta) = viewpoint_delta(code, self.step) {
                    self.apply_config(self.config.moved_by(delta));
                }
            }
        }
    }

    /// Rebuild the projection for `config`, keeping the current one if it is invalid
    fn apply_config(&mut self, config: ProjectionConfig) {
        match config.system() {
            Ok(system) => {
                if system.is_viewpoint_on_plane() {
                    warn!("viewpoint {} lies on the projection plane", config.c);
                    self.status = Some("viewpoint lies on the plane".to_string());
                } else {
                    self.status = None;
                }
                info!("viewpoint moved to {}", config.c);
                self.config = config;
                self.system = system;
            }
            Err(e) => {
                warn!("rejected viewpoint {}: {e}", config.c);
                self.status = Some(format!("rejected: {e}"));
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = self.renderer.viewport_size();
        let frame = Frame::build(&self.system, &self.model, width, height);

        // Clear renderer
        self.renderer.clear();

        // Render wireframe
        self.renderer.render_frame(&frame, &self.model);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let c = self.config.c;
        let mut overlay = format!(
            "Projvis | FPS: {:.1} | C = ({:.2}, {:.2}, {:.2}) | {} vertices, {} skipped | WASD/QE=Move C R=Reset Esc=Quit",
            self.fps,
            c.x,
            c.y,
            c.z,
            self.model.vertices.len(),
            frame.skipped_count(),
        );
        if let Some(status) = &self.status {
            overlay.push_str(" | ");
            overlay.push_str(status);
        }
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(overlay),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewpoint_keys() {
        assert_eq!(
            viewpoint_delta(KeyCode::Char('w'), 0.5),
            Some(Vec3::new(0.0, 0.0, -0.5))
        );
        assert_eq!(
            viewpoint_delta(KeyCode::Char('q'), 0.5),
            Some(Vec3::new(0.0, 0.5, 0.0))
        );
        assert_eq!(
            viewpoint_delta(KeyCode::Char('d'), 2.0),
            Some(Vec3::new(2.0, 0.0, 0.0))
        );
        assert_eq!(viewpoint_delta(KeyCode::Char('x'), 0.5), None);
        assert_eq!(viewpoint_delta(KeyCode::Up, 0.5), None);
    }

    #[test]
    fn test_moving_back_and_forth_restores_viewpoint() {
        let config = ProjectionConfig::default();
        let forward = viewpoint_delta(KeyCode::Char('w'), 0.5).unwrap();
        let back = viewpoint_delta(KeyCode::Char('s'), 0.5).unwrap();
        let moved = config.moved_by(forward).moved_by(back);
        assert_eq!(moved, config);
    }
}

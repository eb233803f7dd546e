//! gemflight - fly a plane over endless procedural terrain and collect gems.

mod camera;
mod config;
mod flight;
mod gems;
mod sim;
mod state;

use anyhow::Result;
use engine_core::Time;
use input::InputState;
use sim::GameSim;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

/// Application handler for winit.
struct App {
    window: Option<Arc<Window>>,
    sim: Option<GameSim>,
    input: InputState,
    time: Time,
    /// First fatal error; reported as the process exit status.
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            sim: None,
            input: InputState::new(),
            time: Time::new(),
            fatal: None,
        }
    }

    fn tick(&mut self) -> Result<()> {
        let Some(sim) = &mut self.sim else {
            return Ok(());
        };
        self.time.update();
        let dt = self.time.delta_seconds();
        sim.frame(&self.input, dt)?;
        self.input.begin_frame();

        if self.time.frame_count() % 300 == 0 {
            log::debug!(
                "fps {:.1}, phase {:?}, craft {:?}",
                self.time.fps(),
                sim.phase(),
                sim.flight().position()
            );
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.sim.is_none() {
            let config = config::GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("gemflight")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window.width,
                    config.window.height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let mut sim = match GameSim::new(config, rand::random()) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("Failed to initialize game: {e:#}");
                    self.fatal = Some(e);
                    event_loop.exit();
                    return;
                }
            };
            let size = window.inner_size();
            sim.camera.set_aspect(size.width, size.height);
            if let Err(e) = sim.init_audio() {
                log::warn!("Audio disabled: {e:#}");
            }

            window.request_redraw();
            self.window = Some(window);
            self.sim = Some(sim);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(sim) = &mut self.sim {
                    sim.camera.set_aspect(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.input.process_keyboard(code, event.state);
                }
                if self.input.is_quit_pressed() {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.input.process_scroll(notches);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.tick() {
                    log::error!("frame failed: {e:#}");
                    self.fatal = Some(e);
                    event_loop.exit();
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("gemflight");
    println!("  P          - start           H     - begin a round");
    println!("  F          - engine on/off   WASD  - pitch / turn");
    println!("  Space      - boost           1/2   - nose / chase camera");
    println!("  Q/E/X      - side and front views  Scroll - zoom");
    println!("  Escape     - quit");

    log::info!("Starting gemflight");

    let event_loop = EventLoop::new()?;
    // Poll continuously: Wait would block until events arrive and delay
    // RedrawRequested, which stutters the fixed per-frame simulation.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    // Scene/setup breakage is an error exit, not a silent success.
    if let Some(e) = app.fatal {
        return Err(e);
    }
    Ok(())
}

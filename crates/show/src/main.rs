//! Fireworks - perspective particle fireworks with particle-text greetings

mod config;
mod events;
mod show;

use anyhow::Result;
use show::Show;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

struct App {
    show: Option<Show>,
}

impl App {
    fn new() -> Self {
        Self { show: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.show.is_none() {
            let config = config::ShowConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Fireworks")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(Show::new(window.clone(), config)) {
                Ok(s) => {
                    self.show = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize show: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(show) = &mut self.show {
            if show.handle_window_event(event) || !show.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════╗");
    println!("║                FIREWORKS                 ║");
    println!("╠══════════════════════════════════════════╣");
    println!("║  Left Click        - Launch a shell      ║");
    println!("║  Enter/Space/G     - Play a greeting     ║");
    println!("║  M                 - Toggle sound        ║");
    println!("║  Escape            - Quit                ║");
    println!("╚══════════════════════════════════════════╝");

    log::info!("Starting fireworks show");

    let event_loop = EventLoop::new()?;
    // Redraw as fast as the presenter allows; each redraw is one simulation frame.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}

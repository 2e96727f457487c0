//! Top-level show state: wires input, simulation, audio and presentation together.

use crate::config::ShowConfig;
use anyhow::Result;
use audio::{AudioSystem, Cue};
use engine_core::Time;
use fireworks::{Engine, Greeting};
use glam::Vec2;
use input::InputState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use renderer::{Canvas, Renderer};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::window::Window;

/// Pointer offset, in pixels, per unit of tilt.
const TILT_DIVISOR: f32 = 25.0;
/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 600;

type SharedAudio = Rc<RefCell<AudioSystem>>;

pub struct Show {
    renderer: Renderer,
    canvas: Canvas,
    engine: Engine,
    greeting: Greeting,
    audio: Option<SharedAudio>,
    pub(crate) input: InputState,
    time: Time,
    tilt: Vec2,
    phrases: Vec<String>,
    rng: StdRng,
    pub running: bool,
}

impl Show {
    pub async fn new(window: Arc<Window>, config: ShowConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.vsync).await?;
        let (width, height) = renderer.dimensions();
        let canvas = Canvas::new(width, height)?;

        let audio = match AudioSystem::new() {
            Ok(mut system) => {
                system.set_master_volume(config.master_volume);
                system.set_muted(config.muted);
                Some(Rc::new(RefCell::new(system)))
            }
            Err(e) => {
                log::warn!("Audio unavailable, running silent: {}", e);
                None
            }
        };

        let greeting = Greeting::new(&config.sim.greeting);
        let phrases = config.sim.greeting.phrases.clone();
        let mut engine = Engine::new(config.sim)?;
        engine.resize(width as f32, height as f32);

        let launch_audio = audio.clone();
        engine.set_on_launch(move |_| play_cue(launch_audio.as_ref(), Cue::Launch));
        let explode_audio = audio.clone();
        engine.set_on_explode(move |_| play_cue(explode_audio.as_ref(), Cue::Explosion));
        engine.start();

        Ok(Self {
            renderer,
            canvas,
            engine,
            greeting,
            audio,
            input: InputState::new(),
            time: Time::new(),
            tilt: Vec2::ZERO,
            phrases,
            rng: StdRng::from_entropy(),
            running: true,
        })
    }

    /// Advance one frame: consume input, step the greeting and the engine.
    pub fn update(&mut self) {
        self.time.update();
        let now = self.time.elapsed();

        let presses = self.input.pointer_presses().to_vec();
        for press in presses {
            self.engine.launch_toward(press);
        }
        if self.input.is_greeting_pressed() {
            self.start_greeting();
        }
        if self.input.is_mute_pressed() {
            self.toggle_mute();
        }
        if self.input.cursor_moved() && !self.greeting.is_active() {
            let (w, h) = self.engine.size();
            self.tilt = tilt_for(self.input.cursor_position(), w, h);
            log::trace!("tilt {}", self.tilt);
        }

        self.greeting.tick(now, &mut self.engine);
        self.engine.update(now, &mut self.canvas);

        if let Some(audio) = &self.audio {
            audio.borrow_mut().cleanup();
        }
        self.input.end_frame();

        if self.time.frame_count() % FPS_LOG_INTERVAL == 0 {
            log::debug!(
                "{:.1} fps, {} flares, {} ascents, {} glyphs, {} sounds, tilt {}",
                self.time.take_average_fps(),
                self.engine.flares().active_len(),
                self.engine.ascents().active_len(),
                self.engine.glyphs().active_len(),
                self.audio.as_ref().map_or(0, |a| a.borrow().active_count()),
                self.tilt()
            );
        }
    }

    fn start_greeting(&mut self) {
        if self.greeting.is_active() {
            return;
        }
        let Some(phrase) = self.phrases.choose(&mut self.rng) else {
            return;
        };
        if self.greeting.play(phrase, self.time.elapsed(), &mut self.engine) {
            self.engine.launch_celebration();
        }
    }

    fn toggle_mute(&mut self) {
        if let Some(audio) = &self.audio {
            let mut audio = audio.borrow_mut();
            let muted = !audio.is_muted();
            audio.set_muted(muted);
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        }
    }

    pub fn render(&mut self) -> Result<()> {
        self.renderer.present(&self.canvas)
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.renderer.resize(size);
        if let Err(e) = self.canvas.resize(size.width, size.height) {
            log::error!("Canvas resize failed: {}", e);
            return;
        }
        self.engine.resize(size.width as f32, size.height as f32);
    }

    pub fn window(&self) -> &Window {
        &self.renderer.window
    }

    /// Current pointer tilt; frozen while a greeting plays.
    pub fn tilt(&self) -> Vec2 {
        self.tilt
    }
}

fn play_cue(audio: Option<&SharedAudio>, cue: Cue) {
    let Some(audio) = audio else {
        return;
    };
    if let Err(e) = audio.borrow_mut().play(cue) {
        log::warn!("Failed to play {:?}: {}", cue, e);
    }
}

/// Tilt for a pointer at `cursor` in a `width` x `height` window.
pub fn tilt_for(cursor: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(width / 2.0 - cursor.x, height / 2.0 - cursor.y) / TILT_DIVISOR
}

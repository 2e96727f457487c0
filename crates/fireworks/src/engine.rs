//! The simulation engine: owns the pools and runs one frame per `update`.

use crate::ascent::{AscentBody, Detonation};
use crate::burst::{self, uniform, BurstPattern};
use crate::config::{ConfigError, SimConfig};
use crate::flare::Flare;
use crate::glyph::GlyphParticle;
use crate::pool::Pool;
use crate::throttle::BurstThrottle;
use engine_core::{Projection, Rgba, Surface};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Called with the start position whenever an ascent body is launched.
pub type LaunchHook = Box<dyn FnMut(Vec3)>;
/// Called for every detonation, including ones whose burst was suppressed.
pub type ExplodeHook = Box<dyn FnMut(Detonation)>;

const AUTO_VELOCITY: Vec3 = Vec3::new(0.0, -16.0, -4.0);
const AUTO_MAX_DEPTH: f32 = 300.0;
const POINTER_VELOCITY: Vec3 = Vec3::new(0.0, -18.0, 0.0);
const CELEBRATION_VELOCITY: Vec3 = Vec3::new(0.0, -15.0, 0.0);
const CELEBRATION_TARGET_Y: f32 = -100.0;

pub struct Engine {
    config: SimConfig,
    palette: Vec<Rgba>,
    greeting_color: Rgba,
    projection: Projection,
    width: f32,
    height: f32,
    flares: Pool<Flare>,
    ascents: Pool<AscentBody>,
    glyphs: Pool<GlyphParticle>,
    throttle: Option<BurstThrottle>,
    rng: StdRng,
    /// Detonations reported during the ascent pass of the current frame.
    detonations: Vec<Detonation>,
    running: bool,
    on_launch: Option<LaunchHook>,
    on_explode: Option<ExplodeHook>,
}

impl Engine {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build with a caller-supplied generator, e.g. a seeded one.
    pub fn with_rng(config: SimConfig, rng: StdRng) -> Result<Self, ConfigError> {
        let palette = config.validate()?;
        let greeting_color = Rgba::from_hex(&config.greeting.color)?;
        let throttle = config
            .throttle_window()
            .map(|(window, max)| BurstThrottle::new(window, max));
        log::debug!(
            "engine pools: {} flares, {} ascent bodies, {} glyph particles",
            config.flare_capacity,
            config.ascent_capacity,
            config.glyph_capacity
        );
        Ok(Self {
            projection: Projection::new(config.focal_length),
            flares: Pool::new(config.flare_capacity),
            ascents: Pool::new(config.ascent_capacity),
            glyphs: Pool::new(config.glyph_capacity),
            detonations: Vec::with_capacity(config.ascent_capacity),
            palette,
            greeting_color,
            throttle,
            rng,
            width: 0.0,
            height: 0.0,
            running: false,
            on_launch: None,
            on_explode: None,
            config,
        })
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn set_on_launch(&mut self, hook: impl FnMut(Vec3) + 'static) {
        self.on_launch = Some(Box::new(hook));
    }

    pub fn set_on_explode(&mut self, hook: impl FnMut(Detonation) + 'static) {
        self.on_explode = Some(Box::new(hook));
    }

    /// Run one frame: fade, step ascents, flares and glyphs, then maybe launch.
    pub fn update(&mut self, now: Duration, surface: &mut dyn Surface) {
        if !self.running {
            return;
        }
        let (w, h) = surface.size();
        if (w, h) != (self.width, self.height) {
            self.resize(w, h);
        }
        surface.fade(Rgba::BLACK.with_alpha(self.config.fade_alpha));

        {
            let Self {
                ascents,
                flares,
                projection,
                rng,
                detonations,
                config,
                ..
            } = self;
            let projection: &Projection = projection;
            let spark_chance = config.spark_chance;
            ascents.step(surface, projection, |body| {
                if let Some(d) = body.update(flares, projection, spark_chance, &mut *rng) {
                    detonations.push(d);
                }
            });
        }
        let mut pending = std::mem::take(&mut self.detonations);
        for d in pending.drain(..) {
            self.burst(d.position, d.color, now);
            if let Some(hook) = self.on_explode.as_mut() {
                hook(d);
            }
        }
        self.detonations = pending;

        self.flares.step(surface, &self.projection, Flare::update);

        let rng = &mut self.rng;
        self.glyphs.step(surface, &self.projection, |p| p.update(&mut *rng));

        if self.rng.gen::<f32>() < self.config.auto_launch_chance {
            self.auto_launch();
        }
    }

    pub fn spawn_flare(&mut self, init: impl FnOnce(&mut Flare)) -> bool {
        let spawned = self.flares.spawn(init);
        if !spawned {
            log::trace!("flare pool full, spawn dropped");
        }
        spawned
    }

    pub fn spawn_ascent_body(&mut self, position: Vec3, velocity: Vec3, target_y: f32, color: Rgba) -> bool {
        let spawned = self
            .ascents
            .spawn(|b| b.spawn(position, velocity, target_y, color));
        if !spawned {
            log::trace!("ascent pool full, launch dropped");
        }
        spawned
    }

    pub fn spawn_glyph_particle(&mut self, start: Vec3, target: Vec3, color: Rgba, batch: u32) -> bool {
        let projection = self.projection;
        let spawned = self
            .glyphs
            .spawn(|p| p.spawn(start, target, color, batch, &projection));
        if !spawned {
            log::trace!("glyph pool full, particle dropped");
        }
        spawned
    }

    /// Spawn an ascent body and fire the launch hook if a slot was free.
    pub fn launch(&mut self, position: Vec3, velocity: Vec3, target_y: f32, color: Rgba) -> bool {
        if !self.spawn_ascent_body(position, velocity, target_y, color) {
            return false;
        }
        if let Some(hook) = self.on_launch.as_mut() {
            hook(position);
        }
        true
    }

    /// Launch from the bottom edge toward a screen-space point.
    pub fn launch_toward(&mut self, screen: Vec2) -> bool {
        let position = Vec3::new(screen.x - self.width / 2.0, self.height / 2.0, 0.0);
        let target_y = screen.y - self.height / 2.0;
        let color = self.random_color();
        self.launch(position, POINTER_VELOCITY, target_y, color)
    }

    /// The gold rocket that opens a greeting.
    pub fn launch_celebration(&mut self) -> bool {
        let position = Vec3::new(0.0, self.height / 2.0, 0.0);
        let color = self.greeting_color;
        self.launch(position, CELEBRATION_VELOCITY, CELEBRATION_TARGET_Y, color)
    }

    fn auto_launch(&mut self) {
        let (w, h) = (self.width, self.height);
        let position = Vec3::new(
            uniform(&mut self.rng, -w / 3.0, w / 3.0),
            h / 2.0,
            uniform(&mut self.rng, 0.0, AUTO_MAX_DEPTH),
        );
        let target_y = uniform(&mut self.rng, -h / 3.0, -h / 6.0);
        let color = self.random_color();
        self.launch(position, AUTO_VELOCITY, target_y, color);
    }

    /// Explode at `position` with a random pattern, subject to the burst throttle.
    /// Returns whether the burst was admitted.
    pub fn burst(&mut self, position: Vec3, color: Rgba, now: Duration) -> bool {
        if let Some(throttle) = self.throttle.as_mut() {
            if !throttle.admit(now) {
                log::debug!("burst at {position} suppressed by rate limit");
                return false;
            }
        }
        let pattern = BurstPattern::random(&mut self.rng);
        self.burst_with(pattern, position, color);
        true
    }

    /// Explode with a fixed pattern, bypassing the throttle. Returns the flare count.
    pub fn burst_with(&mut self, pattern: BurstPattern, position: Vec3, color: Rgba) -> usize {
        let spawned = burst::emit(
            pattern.params(&self.config.burst),
            position,
            color,
            self.config.burst.count,
            &mut self.flares,
            &self.projection,
            &mut self.rng,
        );
        if spawned < self.config.burst.count {
            log::trace!(
                "{pattern:?} burst truncated: {spawned}/{} flares",
                self.config.burst.count
            );
        }
        spawned
    }

    /// Fly one glyph particle in toward each point, from a random spot in front
    /// of the camera. Returns how many were spawned.
    pub fn gather_glyphs(&mut self, points: &[Vec2], batch: u32) -> usize {
        let (w, h) = (self.width, self.height);
        let depth = self.config.greeting.start_depth;
        let color = self.greeting_color;
        let mut spawned = 0;
        for pt in points {
            let start = Vec3::new(
                uniform(&mut self.rng, -w, w),
                uniform(&mut self.rng, -h, h),
                depth,
            );
            if self.spawn_glyph_particle(start, pt.extend(0.0), color, batch) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Start dispersing every glyph particle tagged with `batch`.
    pub fn disperse_glyphs(&mut self, batch: u32) {
        for p in self.glyphs.iter_mut().filter(|p| p.batch() == batch) {
            p.disperse();
        }
    }

    fn random_color(&mut self) -> Rgba {
        self.palette[self.rng.gen_range(0..self.palette.len())]
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn flares(&self) -> &Pool<Flare> {
        &self.flares
    }

    pub fn ascents(&self) -> &Pool<AscentBody> {
        &self.ascents
    }

    pub fn glyphs(&self) -> &Pool<GlyphParticle> {
        &self.glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphState;
    use crate::pool::Entity;
    use engine_core::{DrawCall, RecordingSurface};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn quiet_config() -> SimConfig {
        SimConfig {
            auto_launch_chance: 0.0,
            spark_chance: 0.0,
            ..SimConfig::default()
        }
    }

    fn engine(config: SimConfig) -> (Engine, RecordingSurface) {
        let mut engine = Engine::with_rng(config, StdRng::seed_from_u64(42)).unwrap();
        engine.resize(800.0, 600.0);
        engine.start();
        (engine, RecordingSurface::new(800.0, 600.0))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig {
            flare_capacity: 0,
            ..SimConfig::default()
        };
        assert!(matches!(Engine::new(config), Err(ConfigError::ZeroCapacity("flare"))));
    }

    #[test]
    fn stopped_engine_does_nothing() {
        let (mut engine, mut surface) = engine(quiet_config());
        engine.launch(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), -500.0, Rgba::WHITE);
        engine.stop();
        assert!(!engine.is_running());
        engine.update(ms(0), &mut surface);
        assert!(surface.calls.is_empty());
        assert_eq!(engine.ascents().iter().next().unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn frame_starts_with_translucent_fade() {
        let (mut engine, mut surface) = engine(quiet_config());
        engine.update(ms(0), &mut surface);
        match surface.calls.first() {
            Some(DrawCall::Fade(c)) => assert!((c.a - 0.22).abs() < 1e-6),
            other => panic!("expected fade, got {other:?}"),
        }
    }

    #[test]
    fn detonation_bursts_and_fires_hook_once() {
        let (mut engine, mut surface) = engine(quiet_config());
        let explosions = Rc::new(RefCell::new(Vec::new()));
        let seen = explosions.clone();
        engine.set_on_explode(move |d| seen.borrow_mut().push(d));

        assert!(engine.launch(Vec3::new(30.0, 0.0, 0.0), Vec3::new(0.0, -10.0, 0.0), -5.0, Rgba::GOLD));
        engine.update(ms(0), &mut surface);
        assert_eq!(engine.ascents().active_len(), 0);
        assert_eq!(engine.flares().active_len(), 300);
        assert!(engine.flares().iter().all(|f| f.color() == Rgba::GOLD));

        for frame in 1..10 {
            engine.update(ms(frame * 16), &mut surface);
        }
        let explosions = explosions.borrow();
        assert_eq!(explosions.len(), 1);
        assert_eq!(explosions[0].position, Vec3::new(30.0, -10.0, 0.0));
    }

    #[test]
    fn launch_hook_only_fires_on_successful_spawn() {
        let config = SimConfig {
            ascent_capacity: 2,
            ..quiet_config()
        };
        let (mut engine, _) = engine(config);
        let launches = Rc::new(Cell::new(0));
        let counter = launches.clone();
        engine.set_on_launch(move |_| counter.set(counter.get() + 1));

        let results: Vec<bool> = (0..3)
            .map(|_| engine.launch(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), -1000.0, Rgba::WHITE))
            .collect();
        assert_eq!(results, vec![true, true, false]);
        assert_eq!(launches.get(), 2);
    }

    #[test]
    fn unspawned_body_never_detonates() {
        let config = SimConfig {
            ascent_capacity: 1,
            ..quiet_config()
        };
        let (mut engine, mut surface) = engine(config);
        let explosions = Rc::new(Cell::new(0));
        let counter = explosions.clone();
        engine.set_on_explode(move |_| counter.set(counter.get() + 1));

        engine.launch(Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0), -5.0, Rgba::WHITE);
        assert!(!engine.launch(Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0), -5.0, Rgba::WHITE));
        for frame in 0..5 {
            engine.update(ms(frame * 300), &mut surface);
        }
        assert_eq!(explosions.get(), 1);
    }

    #[test]
    fn throttle_suppresses_third_simultaneous_burst() {
        let (mut engine, mut surface) = engine(quiet_config());
        let explosions = Rc::new(Cell::new(0));
        let counter = explosions.clone();
        engine.set_on_explode(move |_| counter.set(counter.get() + 1));
        for x in [0.0, 50.0, 100.0] {
            engine.launch(Vec3::new(x, 0.0, 0.0), Vec3::new(0.0, -10.0, 0.0), -5.0, Rgba::WHITE);
        }
        engine.update(ms(1000), &mut surface);
        assert_eq!(explosions.get(), 3);
        assert_eq!(engine.ascents().active_len(), 0);
        assert_eq!(engine.flares().active_len(), 600);
    }

    #[test]
    fn bursts_are_unlimited_without_throttle() {
        let config = SimConfig {
            throttle: None,
            ..quiet_config()
        };
        let (mut engine, _) = engine(config);
        for _ in 0..5 {
            assert!(engine.burst(Vec3::ZERO, Rgba::WHITE, ms(0)));
        }
        assert_eq!(engine.flares().active_len(), 1500);
    }

    #[test]
    fn burst_with_ring_emits_fixed_speed() {
        let (mut engine, _) = engine(quiet_config());
        let n = engine.burst_with(BurstPattern::Ring, Vec3::ZERO, Rgba::WHITE);
        assert_eq!(n, 300);
        assert!(engine
            .flares()
            .iter()
            .all(|f| (f.velocity().length() - 13.0).abs() < 1e-3));
    }

    #[test]
    fn auto_launch_follows_chance() {
        let config = SimConfig {
            auto_launch_chance: 1.0,
            spark_chance: 0.0,
            ..SimConfig::default()
        };
        let (mut busy, mut surface) = engine(config);
        busy.update(ms(0), &mut surface);
        assert_eq!(busy.ascents().active_len(), 1);
        let body = busy.ascents().iter().next().unwrap();
        let p = body.position();
        assert!(p.x.abs() <= 800.0 / 3.0);
        assert_eq!(p.y, 300.0);
        assert!((0.0..300.0).contains(&p.z));
        assert!(body.target_y() >= -200.0 && body.target_y() <= -100.0);

        let (mut idle, mut surface) = engine(quiet_config());
        for frame in 0..200 {
            idle.update(ms(frame * 16), &mut surface);
        }
        assert_eq!(idle.ascents().active_len(), 0);
    }

    #[test]
    fn pointer_launch_targets_the_click() {
        let (mut engine, _) = engine(quiet_config());
        assert!(engine.launch_toward(Vec2::new(100.0, 150.0)));
        let body = engine.ascents().iter().next().unwrap();
        assert_eq!(body.position(), Vec3::new(-300.0, 300.0, 0.0));
        assert_eq!(body.target_y(), -150.0);
    }

    #[test]
    fn celebration_is_gold_and_aims_at_fixed_height() {
        let (mut engine, _) = engine(quiet_config());
        let launches = Rc::new(RefCell::new(Vec::new()));
        let seen = launches.clone();
        engine.set_on_launch(move |p| seen.borrow_mut().push(p));
        assert!(engine.launch_celebration());
        let body = engine.ascents().iter().next().unwrap();
        assert_eq!(body.target_y(), -100.0);
        assert_eq!(*launches.borrow(), vec![Vec3::new(0.0, 300.0, 0.0)]);
    }

    #[test]
    fn dispersal_only_touches_its_batch() {
        let (mut engine, mut surface) = engine(quiet_config());
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0)];
        assert_eq!(engine.gather_glyphs(&points, 1), 2);
        assert_eq!(engine.gather_glyphs(&points, 2), 2);
        assert!(engine.glyphs().iter().all(|p| p.position().z == 800.0));

        for frame in 0..3 {
            engine.update(ms(frame * 16), &mut surface);
        }
        engine.disperse_glyphs(1);
        engine.update(ms(48), &mut surface);
        assert_eq!(engine.glyphs().active_len(), 4);
        for p in engine.glyphs().iter() {
            let expected = if p.batch() == 1 {
                GlyphState::Dispersing
            } else {
                GlyphState::Gathering
            };
            assert_eq!(p.state(), expected);
        }
    }

    #[test]
    fn glyph_pool_capacity_caps_gathering() {
        let config = SimConfig {
            glyph_capacity: 3,
            ..quiet_config()
        };
        let (mut engine, _) = engine(config);
        let points = vec![Vec2::ZERO; 10];
        assert_eq!(engine.gather_glyphs(&points, 0), 3);
    }

    #[test]
    fn update_tracks_surface_size() {
        let (mut engine, _) = engine(quiet_config());
        let mut surface = RecordingSurface::new(1024.0, 768.0);
        engine.update(ms(0), &mut surface);
        assert_eq!(engine.size(), (1024.0, 768.0));
    }

    #[test]
    fn pools_hold_their_invariant_over_a_busy_show() {
        let config = SimConfig {
            auto_launch_chance: 0.5,
            flare_capacity: 2000,
            ascent_capacity: 8,
            ..SimConfig::default()
        };
        let (mut engine, mut surface) = engine(config);
        for frame in 0..400 {
            surface.clear();
            engine.update(ms(frame * 16), &mut surface);
            for (active, dead, cap) in [
                (engine.flares().active_len(), engine.flares().dead_len(), engine.flares().capacity()),
                (engine.ascents().active_len(), engine.ascents().dead_len(), engine.ascents().capacity()),
            ] {
                assert!(active <= cap);
                assert_eq!(active + dead, cap);
            }
            assert!(engine.flares().iter().all(|f| f.is_alive()));
        }
    }
}

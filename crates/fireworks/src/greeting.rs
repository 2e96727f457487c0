//! Greeting sequences: a phrase spelled out one character at a time in glyph particles.
//!
//! Each character gathers from random points in depth, holds, then disperses before the
//! next one starts. The controller is ticked once per frame ahead of the engine update
//! and never blocks.

use crate::config::GreetingConfig;
use crate::engine::Engine;
use crate::glyph_raster::{text_points, BitmapFont};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// The current character is on screen until `until`.
    Showing { until: Duration },
    /// The current character is dispersing; the next one starts at `until`.
    Clearing { until: Duration },
}

#[derive(Debug)]
pub struct Greeting {
    font: BitmapFont,
    font_size: f32,
    stride: usize,
    threshold: u8,
    hold: Duration,
    clear: Duration,
    chars: Vec<char>,
    index: usize,
    batch: u32,
    phase: Phase,
}

impl Greeting {
    pub fn new(config: &GreetingConfig) -> Self {
        Self {
            font: BitmapFont,
            font_size: config.font_size,
            stride: config.stride,
            threshold: config.alpha_threshold,
            hold: config.hold(),
            clear: config.clear(),
            chars: Vec::new(),
            index: 0,
            batch: 0,
            phase: Phase::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Character currently being shown or cleared.
    pub fn current_char(&self) -> Option<char> {
        if self.is_active() {
            self.chars.get(self.index).copied()
        } else {
            None
        }
    }

    /// Start spelling `phrase`. Ignored (returns false) while another phrase is playing
    /// or when the phrase is empty.
    pub fn play(&mut self, phrase: &str, now: Duration, engine: &mut Engine) -> bool {
        if self.is_active() {
            log::debug!("greeting already playing, ignoring {phrase:?}");
            return false;
        }
        self.chars = phrase.chars().collect();
        if self.chars.is_empty() {
            return false;
        }
        log::info!("greeting {phrase:?} started");
        self.index = 0;
        self.show_current(now, engine);
        true
    }

    /// Advance the timeline to `now`.
    pub fn tick(&mut self, now: Duration, engine: &mut Engine) {
        match self.phase {
            Phase::Idle => {}
            Phase::Showing { until } if now >= until => {
                engine.disperse_glyphs(self.batch);
                self.phase = Phase::Clearing {
                    until: now + self.clear,
                };
            }
            Phase::Clearing { until } if now >= until => {
                self.index += 1;
                if self.index < self.chars.len() {
                    self.show_current(now, engine);
                } else {
                    let phrase: String = self.chars.drain(..).collect();
                    log::info!("greeting {phrase:?} finished");
                    self.phase = Phase::Idle;
                }
            }
            Phase::Showing { .. } | Phase::Clearing { .. } => {}
        }
    }

    fn show_current(&mut self, now: Duration, engine: &mut Engine) {
        let ch = self.chars[self.index];
        self.batch = self.batch.wrapping_add(1);
        match self.font.glyph_mask(ch, self.font_size) {
            Some(mask) => {
                let points = text_points(&mask, self.stride, self.threshold);
                let spawned = engine.gather_glyphs(&points, self.batch);
                log::debug!("glyph {ch:?}: {spawned}/{} particles", points.len());
            }
            None => log::warn!("no glyph for {ch:?}, leaving a gap"),
        }
        self.phase = Phase::Showing {
            until: now + self.hold,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::glyph::GlyphState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Greeting, Engine) {
        let config = SimConfig {
            auto_launch_chance: 0.0,
            ..SimConfig::default()
        };
        let greeting = Greeting::new(&config.greeting);
        let mut engine = Engine::with_rng(config, StdRng::seed_from_u64(3)).unwrap();
        engine.resize(800.0, 600.0);
        engine.start();
        (greeting, engine)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn states(engine: &Engine) -> Vec<(u32, GlyphState)> {
        engine.glyphs().iter().map(|p| (p.batch(), p.state())).collect()
    }

    #[test]
    fn characters_follow_hold_then_clear_timeline() {
        let (mut greeting, mut engine) = setup();
        assert!(greeting.play("HI", ms(0), &mut engine));
        assert_eq!(greeting.current_char(), Some('H'));
        let first = engine.glyphs().active_len();
        assert!(first > 0);
        assert!(engine.glyphs().iter().all(|p| p.position().z == 800.0));

        greeting.tick(ms(1999), &mut engine);
        assert!(states(&engine).iter().all(|&(_, s)| s == GlyphState::Gathering));

        greeting.tick(ms(2000), &mut engine);
        assert!(states(&engine).iter().all(|&(_, s)| s == GlyphState::Dispersing));
        assert_eq!(engine.glyphs().active_len(), first);

        greeting.tick(ms(2599), &mut engine);
        assert_eq!(engine.glyphs().active_len(), first);

        greeting.tick(ms(2600), &mut engine);
        assert_eq!(greeting.current_char(), Some('I'));
        let fresh: Vec<_> = states(&engine)
            .into_iter()
            .filter(|&(_, s)| s == GlyphState::Gathering)
            .collect();
        assert_eq!(engine.glyphs().active_len() - first, fresh.len());
        let batches: Vec<u32> = fresh.iter().map(|&(b, _)| b).collect();
        assert!(batches.windows(2).all(|w| w[0] == w[1]));

        greeting.tick(ms(4600), &mut engine);
        assert!(greeting.is_active());
        greeting.tick(ms(5200), &mut engine);
        assert!(!greeting.is_active());
        assert_eq!(greeting.current_char(), None);
    }

    #[test]
    fn play_while_active_is_ignored() {
        let (mut greeting, mut engine) = setup();
        assert!(greeting.play("JOY", ms(0), &mut engine));
        let spawned = engine.glyphs().active_len();
        assert!(!greeting.play("HOPE", ms(10), &mut engine));
        assert_eq!(engine.glyphs().active_len(), spawned);
        assert_eq!(greeting.current_char(), Some('J'));
    }

    #[test]
    fn completion_reenables_play() {
        let (mut greeting, mut engine) = setup();
        assert!(greeting.play("A", ms(0), &mut engine));
        greeting.tick(ms(2000), &mut engine);
        greeting.tick(ms(2600), &mut engine);
        assert!(!greeting.is_active());
        assert!(greeting.play("B", ms(3000), &mut engine));
    }

    #[test]
    fn empty_phrase_does_not_start() {
        let (mut greeting, mut engine) = setup();
        assert!(!greeting.play("", ms(0), &mut engine));
        assert!(!greeting.is_active());
    }

    #[test]
    fn unsupported_character_keeps_timing() {
        let (mut greeting, mut engine) = setup();
        assert!(greeting.play("\u{9a6c}", ms(0), &mut engine));
        assert_eq!(engine.glyphs().active_len(), 0);
        greeting.tick(ms(2000), &mut engine);
        assert!(greeting.is_active());
        greeting.tick(ms(2600), &mut engine);
        assert!(!greeting.is_active());
    }

    #[test]
    fn late_ticks_do_not_skip_characters() {
        let (mut greeting, mut engine) = setup();
        greeting.play("AB", ms(0), &mut engine);
        // A long stall still walks the phases one step per tick.
        greeting.tick(ms(10_000), &mut engine);
        assert_eq!(greeting.current_char(), Some('A'));
        greeting.tick(ms(10_001), &mut engine);
        assert_eq!(greeting.current_char(), Some('A'));
        greeting.tick(ms(10_600), &mut engine);
        assert_eq!(greeting.current_char(), Some('B'));
    }

    #[test]
    fn dispersed_characters_eventually_leave_the_pool() {
        let (mut greeting, mut engine) = setup();
        let mut surface = engine_core::RecordingSurface::new(800.0, 600.0);
        greeting.play("A", ms(0), &mut engine);
        let mut now = 0;
        while greeting.is_active() {
            greeting.tick(ms(now), &mut engine);
            engine.update(ms(now), &mut surface);
            surface.clear();
            now += 16;
        }
        for _ in 0..120 {
            engine.update(ms(now), &mut surface);
            now += 16;
        }
        assert_eq!(engine.glyphs().active_len(), 0);
    }
}

//! Fixed-capacity entity pools.
//!
//! Each pool preallocates `capacity` entities and moves them between an `active`
//! list (simulated and drawn) and a `dead` list (ready for reuse). Neither list
//! grows past the capacity, so steady-state frames never allocate.

use engine_core::{Projection, Surface};

/// Capabilities shared by every pooled entity.
pub trait Entity: Default {
    fn is_alive(&self) -> bool;
    fn draw(&self, surface: &mut dyn Surface, projection: &Projection);
}

#[derive(Debug)]
pub struct Pool<T> {
    active: Vec<T>,
    dead: Vec<T>,
    capacity: usize,
}

impl<T: Entity> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            active: Vec::with_capacity(capacity),
            dead: (0..capacity).map(|_| T::default()).collect(),
            capacity,
        }
    }

    /// Take a free slot and initialize it with `init`. Returns false (and drops the
    /// request) when every slot is in use.
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> bool {
        let Some(mut entity) = self.dead.pop() else {
            return false;
        };
        init(&mut entity);
        self.active.push(entity);
        true
    }

    /// Advance every active entity with `tick`, draw the survivors and reclaim the rest.
    ///
    /// The scan runs backward so `swap_remove` only ever moves an already-visited
    /// entity into the current index.
    pub fn step(
        &mut self,
        surface: &mut dyn Surface,
        projection: &Projection,
        mut tick: impl FnMut(&mut T),
    ) {
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            tick(&mut self.active[i]);
            if self.active[i].is_alive() {
                self.active[i].draw(surface, projection);
            } else {
                let entity = self.active.swap_remove(i);
                self.dead.push(entity);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.active.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.active.iter_mut()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn dead_len(&self) -> usize {
        self.dead.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.dead.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::RecordingSurface;

    #[derive(Default)]
    struct Countdown {
        frames_left: u32,
        alive: bool,
    }

    impl Entity for Countdown {
        fn is_alive(&self) -> bool {
            self.alive
        }

        fn draw(&self, surface: &mut dyn Surface, _projection: &Projection) {
            surface.fill_circle(glam::Vec2::ZERO, self.frames_left as f32, engine_core::Rgba::WHITE);
        }
    }

    fn tick(c: &mut Countdown) {
        if c.frames_left == 0 {
            c.alive = false;
        } else {
            c.frames_left -= 1;
        }
    }

    fn spawn(pool: &mut Pool<Countdown>, frames: u32) -> bool {
        pool.spawn(|c| {
            c.frames_left = frames;
            c.alive = true;
        })
    }

    #[test]
    fn spawn_beyond_capacity_is_dropped() {
        let mut pool = Pool::<Countdown>::new(3);
        assert!(spawn(&mut pool, 1));
        assert!(spawn(&mut pool, 1));
        assert!(spawn(&mut pool, 1));
        assert!(pool.is_full());
        assert!(!spawn(&mut pool, 1));
        assert_eq!(pool.active_len(), 3);
        assert_eq!(pool.dead_len(), 0);
    }

    #[test]
    fn active_plus_dead_is_always_capacity() {
        let mut pool = Pool::<Countdown>::new(8);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let projection = Projection::default();
        for round in 0..20u32 {
            for k in 0..(round % 5) {
                spawn(&mut pool, k);
            }
            pool.step(&mut surface, &projection, tick);
            assert!(pool.active_len() <= pool.capacity());
            assert_eq!(pool.active_len() + pool.dead_len(), pool.capacity());
        }
    }

    #[test]
    fn step_reclaims_dead_and_draws_survivors() {
        let mut pool = Pool::<Countdown>::new(4);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let projection = Projection::default();
        spawn(&mut pool, 1);
        spawn(&mut pool, 3);
        spawn(&mut pool, 1);
        spawn(&mut pool, 5);
        pool.step(&mut surface, &projection, tick);
        assert_eq!(pool.active_len(), 4);
        assert_eq!(surface.circles().count(), 4);

        surface.clear();
        pool.step(&mut surface, &projection, tick);
        // Both one-frame entities expire; every survivor is still visited exactly once.
        assert_eq!(pool.active_len(), 2);
        assert_eq!(surface.circles().count(), 2);
        let mut left: Vec<u32> = pool.iter().map(|c| c.frames_left).collect();
        left.sort();
        assert_eq!(left, vec![1, 3]);
    }

    #[test]
    fn reclaimed_slots_are_reused() {
        let mut pool = Pool::<Countdown>::new(1);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let projection = Projection::default();
        spawn(&mut pool, 0);
        assert!(!spawn(&mut pool, 0));
        pool.step(&mut surface, &projection, tick);
        pool.step(&mut surface, &projection, tick);
        assert_eq!(pool.active_len(), 0);
        assert!(spawn(&mut pool, 0));
    }
}

//! Decorative effects: drifting clouds, short-lived particles, ball trail
//!
//! Nothing here feeds back into gameplay. The RNG is seeded so layouts are
//! reproducible in tests.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::renderer::{Surface, colors};
use crate::sim::Playfield;

/// Clouds live in the top part of the sky
const CLOUD_BAND: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Dust puff: drifts up and sideways
    Jump,
    /// Stationary spark
    Trail,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 when spawned, removed at 0
    pub life: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub life: f32,
}

/// Capacity limits, normally derived from the quality settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectsConfig {
    pub max_particles: usize,
    pub trail_length: usize,
    pub cloud_count: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            trail_length: DEFAULT_TRAIL_LENGTH,
            cloud_count: DEFAULT_CLOUD_COUNT,
        }
    }
}

pub struct VisualEffects {
    field: Playfield,
    config: EffectsConfig,
    clouds: Vec<Cloud>,
    particles: Vec<Particle>,
    trail: VecDeque<TrailPoint>,
    rng: Pcg32,
}

impl VisualEffects {
    pub fn new(field: Playfield, config: EffectsConfig, seed: u64) -> Self {
        let mut effects = Self {
            field,
            config,
            clouds: Vec::new(),
            particles: Vec::with_capacity(config.max_particles),
            trail: VecDeque::with_capacity(config.trail_length + 1),
            rng: Pcg32::seed_from_u64(seed),
        };
        effects.spawn_clouds();
        effects
    }

    fn spawn_clouds(&mut self) {
        let (w, h) = (self.field.width, self.field.height * CLOUD_BAND);
        self.clouds = (0..self.config.cloud_count)
            .map(|_| Cloud {
                pos: Vec2::new(
                    self.rng.random::<f32>() * w,
                    self.rng.random::<f32>() * h,
                ),
                size: 30.0 + self.rng.random::<f32>() * 40.0,
                speed: 0.5 + self.rng.random::<f32>() * 0.5,
            })
            .collect();
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn trail(&self) -> impl ExactSizeIterator<Item = &TrailPoint> {
        self.trail.iter()
    }

    /// Advance one tick: drift clouds, age particles, trim the trail
    pub fn update(&mut self) {
        let band = self.field.height * CLOUD_BAND;
        for cloud in &mut self.clouds {
            cloud.pos.x += cloud.speed;
            if cloud.pos.x > self.field.width {
                cloud.pos.x = -cloud.size;
                cloud.pos.y = self.rng.random::<f32>() * band;
            }
        }

        self.particles.retain_mut(|p| {
            p.pos += p.vel;
            p.life -= PARTICLE_DECAY;
            p.life > 0.0
        });

        for point in &mut self.trail {
            point.life -= PARTICLE_DECAY;
        }
        self.trail.retain(|p| p.life > 0.0);
        while self.trail.len() > self.config.trail_length {
            self.trail.pop_front();
        }
    }

    /// Spawn one particle. Returns false if the cap was reached.
    pub fn add_particle(&mut self, pos: Vec2, kind: ParticleKind) -> bool {
        if self.particles.len() >= self.config.max_particles {
            return false;
        }

        let (vel, size) = match kind {
            ParticleKind::Jump => (
                Vec2::new(
                    (self.rng.random::<f32>() - 0.5) * 2.0,
                    -self.rng.random::<f32>() * 2.0,
                ),
                3.0,
            ),
            ParticleKind::Trail => (Vec2::ZERO, 2.0),
        };

        self.particles.push(Particle {
            pos,
            vel,
            life: 1.0,
            size,
            kind,
        });
        true
    }

    /// Burst of jump particles at a contact point
    pub fn create_collision_effect(&mut self, pos: Vec2) {
        for _ in 0..COLLISION_BURST {
            self.add_particle(pos, ParticleKind::Jump);
        }
    }

    pub fn add_trail_point(&mut self, pos: Vec2) {
        if self.config.trail_length == 0 {
            return;
        }
        self.trail.push_back(TrailPoint { pos, life: 1.0 });
        while self.trail.len() > self.config.trail_length {
            self.trail.pop_front();
        }
    }

    /// Drop every particle and trail point. Clouds stay.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.trail.clear();
    }

    /// Follow a playfield resize, keeping clouds at the same relative spot
    pub fn resize(&mut self, field: Playfield) {
        let old = self.field;
        if old.width > 0.0 && old.height > 0.0 {
            let scale = field.size() / old.size();
            for cloud in &mut self.clouds {
                cloud.pos *= scale;
            }
        }
        self.field = field;
    }

    // === Drawing ===

    pub fn draw_background(&self, surface: &mut dyn Surface) {
        surface.fill_vertical_gradient(
            Vec2::ZERO,
            self.field.size(),
            &[
                (0.0, colors::SKY),
                (0.5, colors::PERIWINKLE),
                (1.0, colors::LAVENDER),
            ],
        );
    }

    pub fn draw_clouds(&self, surface: &mut dyn Surface) {
        for cloud in &self.clouds {
            surface.fill_circle(cloud.pos, cloud.size, colors::CLOUD);
        }
    }

    pub fn draw_ground(&self, surface: &mut dyn Surface) {
        let min = Vec2::new(0.0, self.field.ground_y());
        let size = Vec2::new(self.field.width, self.field.ground_height());
        surface.fill_rect(min, size, colors::GROUND_SHADOW);
        surface.fill_vertical_gradient(
            min,
            size,
            &[(0.0, colors::GROUND), (1.0, colors::GROUND_DARK)],
        );
    }

    pub fn draw_particles(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            let base = match p.kind {
                ParticleKind::Jump => colors::WHITE,
                ParticleKind::Trail => colors::TRAIL_SPARK,
            };
            surface.fill_circle(p.pos, p.size, colors::faded(base, p.life));
        }
    }

    /// Older points are fainter
    pub fn draw_ball_trail(&self, surface: &mut dyn Surface) {
        let len = self.trail.len() as f32;
        for (index, point) in self.trail.iter().enumerate() {
            let alpha = point.life * (index as f32 / len);
            surface.fill_circle(point.pos, 2.0, colors::faded(colors::WHITE, alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn effects() -> VisualEffects {
        VisualEffects::new(Playfield::new(800.0, 400.0), EffectsConfig::default(), 7)
    }

    #[test]
    fn test_clouds_spawn_in_sky_band() {
        let fx = effects();
        assert_eq!(fx.clouds().len(), DEFAULT_CLOUD_COUNT);
        for cloud in fx.clouds() {
            assert!((0.0..800.0).contains(&cloud.pos.x));
            assert!((0.0..160.0).contains(&cloud.pos.y));
            assert!((30.0..70.0).contains(&cloud.size));
            assert!((0.5..1.0).contains(&cloud.speed));
        }
    }

    #[test]
    fn test_cloud_wraps_to_left_edge() {
        let mut fx = effects();
        fx.clouds[0].pos.x = 799.9;
        fx.clouds[0].size = 50.0;
        fx.clouds[0].speed = 0.5;
        fx.update();
        assert_eq!(fx.clouds[0].pos.x, -50.0);
        assert!(fx.clouds[0].pos.y < 160.0);
    }

    #[test]
    fn test_particles_expire_after_fifty_ticks() {
        let mut fx = effects();
        assert!(fx.add_particle(Vec2::new(10.0, 10.0), ParticleKind::Trail));
        for _ in 0..49 {
            fx.update();
        }
        assert_eq!(fx.particles().len(), 1);
        // Float decay may leave a sliver of life for one more tick
        fx.update();
        fx.update();
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn test_jump_particle_ranges() {
        let mut fx = effects();
        for _ in 0..20 {
            fx.add_particle(Vec2::ZERO, ParticleKind::Jump);
        }
        for p in fx.particles() {
            assert!((-1.0..1.0).contains(&p.vel.x));
            assert!(p.vel.y <= 0.0 && p.vel.y > -2.0);
            assert_eq!(p.size, 3.0);
        }
    }

    #[test]
    fn test_collision_effect_emits_ten() {
        let mut fx = effects();
        fx.create_collision_effect(Vec2::new(100.0, 300.0));
        assert_eq!(fx.particles().len(), COLLISION_BURST);
        assert!(fx.particles().iter().all(|p| p.kind == ParticleKind::Jump));
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut fx = effects();
        for i in 0..25 {
            fx.add_trail_point(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(fx.trail().len(), DEFAULT_TRAIL_LENGTH);
        assert_eq!(fx.trail().next().map(|p| p.pos.x), Some(5.0));
    }

    #[test]
    fn test_clear_keeps_clouds() {
        let mut fx = effects();
        fx.create_collision_effect(Vec2::ZERO);
        fx.add_trail_point(Vec2::ZERO);
        fx.clear();
        assert!(fx.particles().is_empty());
        assert_eq!(fx.trail().len(), 0);
        assert_eq!(fx.clouds().len(), DEFAULT_CLOUD_COUNT);
    }

    #[test]
    fn test_disabled_trail_records_nothing() {
        let mut fx = VisualEffects::new(
            Playfield::new(800.0, 400.0),
            EffectsConfig {
                trail_length: 0,
                ..EffectsConfig::default()
            },
            7,
        );
        fx.add_trail_point(Vec2::ZERO);
        assert_eq!(fx.trail().len(), 0);
    }

    #[test]
    fn test_resize_scales_clouds() {
        let mut fx = effects();
        let before = fx.clouds()[0].pos;
        fx.resize(Playfield::new(1600.0, 200.0));
        let after = fx.clouds()[0].pos;
        assert!((after.x - before.x * 2.0).abs() < 1e-3);
        assert!((after.y - before.y * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = effects();
        let b = effects();
        for (ca, cb) in a.clouds().iter().zip(b.clouds()) {
            assert_eq!(ca.pos, cb.pos);
        }
    }

    proptest! {
        #[test]
        fn prop_particle_cap_is_hard(cap in 0usize..80, attempts in 0usize..200) {
            let mut fx = VisualEffects::new(
                Playfield::new(800.0, 400.0),
                EffectsConfig { max_particles: cap, ..EffectsConfig::default() },
                1,
            );
            let mut accepted = 0;
            for _ in 0..attempts {
                if fx.add_particle(Vec2::ZERO, ParticleKind::Jump) {
                    accepted += 1;
                }
                prop_assert!(fx.particles().len() <= cap);
            }
            prop_assert_eq!(accepted, attempts.min(cap));
        }
    }
}

//! Scene composition: which layer draws what, in which order

use glam::Vec2;

use super::{Layer, Surface, colors};
use crate::effects::VisualEffects;
use crate::sim::{Ball, Character, GameState, Playfield, Side};

/// Paint a full frame (without presenting it)
pub fn render_scene(surface: &mut dyn Surface, state: &GameState, effects: &VisualEffects) {
    for layer in Layer::ORDER {
        surface.begin_layer(layer);
        match layer {
            Layer::Background => effects.draw_background(surface),
            Layer::Clouds => effects.draw_clouds(surface),
            Layer::Ground => effects.draw_ground(surface),
            Layer::Ball => draw_ball(surface, &state.ball, &state.playfield),
            Layer::Characters => {
                draw_character(surface, &state.left, &state.playfield);
                draw_character(surface, &state.right, &state.playfield);
            }
            Layer::Particles => effects.draw_particles(surface),
            Layer::Trail => effects.draw_ball_trail(surface),
        }
    }
}

/// Glow, body, then a flattened shadow on the ground line
pub fn draw_ball(surface: &mut dyn Surface, ball: &Ball, field: &Playfield) {
    let center = ball.center();
    surface.fill_radial_glow(
        center,
        ball.size * 2.0,
        colors::BALL_GLOW,
        colors::transparent(colors::BALL_GLOW),
    );
    surface.fill_circle(center, ball.radius(), colors::WHITE);
    surface.fill_ellipse(
        Vec2::new(center.x, field.ground_y() + 5.0),
        Vec2::new(ball.radius(), ball.size / 4.0),
        colors::DROP_SHADOW,
    );
}

pub fn draw_character(surface: &mut dyn Surface, character: &Character, field: &Playfield) {
    let body_color = match character.side {
        Side::Left => colors::LEFT_CHARACTER,
        Side::Right => colors::RIGHT_CHARACTER,
    };
    let size = Vec2::new(character.width, character.height);

    surface.fill_ellipse(
        Vec2::new(
            character.pos.x + character.width / 2.0,
            field.ground_y() + 5.0,
        ),
        Vec2::new(character.width / 2.0, character.height / 4.0),
        colors::DROP_SHADOW,
    );
    surface.fill_rounded_rect(character.pos, size, 10.0, body_color);

    // Perfect-hit band
    let (zone_start, zone_end) = character.perfect_zone();
    surface.fill_rect(
        Vec2::new(character.pos.x, zone_start),
        Vec2::new(character.width, zone_end - zone_start),
        colors::PERFECT_ZONE,
    );

    // Eyes
    let eye_y = character.pos.y + character.height * 0.3;
    for fraction in [0.3, 0.7] {
        surface.fill_circle(
            Vec2::new(character.pos.x + character.width * fraction, eye_y),
            8.0,
            colors::WHITE,
        );
    }
}

//! Shape generation for 2D primitives
//!
//! All coordinates are playfield units (origin top-left, y down); the
//! pipeline maps them to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{GamePhase, GameState};

/// Height of the lip drawn at the gap end of each pipe segment
const PIPE_CAP_HEIGHT: f32 = 12.0;
/// How far the lip sticks out on each side
const PIPE_CAP_OVERHANG: f32 = 3.0;
/// Thickness of the grass strip on top of the ground
const GRASS_HEIGHT: f32 = 12.0;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Rectangle with a vertical gradient (top color → bottom color)
pub fn gradient_rect(min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// The bird sprite, drawn inside the `size`×`size` box at `top_left`.
/// Tilts its beak with vertical velocity.
pub fn bird(top_left: Vec2, size: f32, vel_y: f32) -> Vec<Vertex> {
    let half = size / 2.0;
    let center = top_left + Vec2::splat(half);
    let mut vertices = Vec::with_capacity(200);

    vertices.extend(circle(center, half * 0.8, colors::BIRD, 20));
    // Wing flaps down while climbing
    let wing_dy = if vel_y < 0.0 { half * 0.25 } else { -half * 0.05 };
    vertices.extend(circle(
        center + Vec2::new(-half * 0.3, wing_dy),
        half * 0.35,
        colors::BIRD_WING,
        12,
    ));
    let eye = center + Vec2::new(half * 0.35, -half * 0.3);
    vertices.extend(circle(eye, half * 0.22, colors::BIRD_EYE, 12));
    vertices.extend(circle(eye + Vec2::new(half * 0.07, 0.0), half * 0.1, colors::BIRD_PUPIL, 8));

    // Beak: a triangle pointing right, nudged by velocity
    let tilt = (vel_y * 1.5).clamp(-half * 0.3, half * 0.3);
    let beak_base = center + Vec2::new(half * 0.6, half * 0.05);
    vertices.push(Vertex::new(beak_base.x, beak_base.y - half * 0.18, colors::BIRD_BEAK));
    vertices.push(Vertex::new(beak_base.x, beak_base.y + half * 0.18, colors::BIRD_BEAK));
    vertices.push(Vertex::new(beak_base.x + half * 0.45, beak_base.y + tilt, colors::BIRD_BEAK));

    vertices
}

/// Horizontal bar showing the current mic level against the lift threshold
pub fn level_meter(origin: Vec2, size: Vec2, level: f32, threshold: f32) -> Vec<Vertex> {
    let mut vertices = rect(origin, size, colors::METER_BG);
    let fill = level.clamp(0.0, 1.0);
    let color = if level > threshold {
        colors::METER_LOUD
    } else {
        colors::METER_QUIET
    };
    vertices.extend(rect(origin, Vec2::new(size.x * fill, size.y), color));
    // Threshold tick
    vertices.extend(rect(
        Vec2::new(origin.x + size.x * threshold - 1.0, origin.y - 2.0),
        Vec2::new(2.0, size.y + 4.0),
        colors::BIRD_PUPIL,
    ));
    vertices
}

/// Build the full frame: sky, pipes, ground, bird and mic meter
pub fn scene(state: &GameState, level: f32) -> Vec<Vertex> {
    let tuning = &state.tuning;
    let width = tuning.playfield_width;
    let field_floor = tuning.field_floor();
    let mut vertices = Vec::with_capacity(64 + state.obstacles.len() * 24 + 256);

    // Sky
    vertices.extend(gradient_rect(
        Vec2::ZERO,
        Vec2::new(width, field_floor),
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));

    // Pipes
    for obstacle in &state.obstacles {
        let gap = &obstacle.gap;
        // Upper segment hangs from the top of the playfield
        vertices.extend(rect(
            Vec2::new(obstacle.x, 0.0),
            Vec2::new(obstacle.width, gap.top),
            colors::PIPE,
        ));
        vertices.extend(rect(
            Vec2::new(obstacle.x - PIPE_CAP_OVERHANG, gap.top - PIPE_CAP_HEIGHT),
            Vec2::new(obstacle.width + 2.0 * PIPE_CAP_OVERHANG, PIPE_CAP_HEIGHT),
            colors::PIPE_CAP,
        ));
        // Lower segment stands on the ground
        let lower_top = gap.lower_edge(field_floor);
        vertices.extend(rect(
            Vec2::new(obstacle.x, lower_top),
            Vec2::new(obstacle.width, gap.bottom),
            colors::PIPE,
        ));
        vertices.extend(rect(
            Vec2::new(obstacle.x - PIPE_CAP_OVERHANG, lower_top),
            Vec2::new(obstacle.width + 2.0 * PIPE_CAP_OVERHANG, PIPE_CAP_HEIGHT),
            colors::PIPE_CAP,
        ));
    }

    // Ground
    vertices.extend(rect(
        Vec2::new(0.0, field_floor),
        Vec2::new(width, GRASS_HEIGHT),
        colors::GRASS,
    ));
    vertices.extend(rect(
        Vec2::new(0.0, field_floor + GRASS_HEIGHT),
        Vec2::new(width, tuning.ground_height - GRASS_HEIGHT),
        colors::DIRT,
    ));

    // Bird (hidden once it has left the top of the screen)
    if !(state.phase == GamePhase::Ended && state.avatar.pos.y < 0.0) {
        vertices.extend(bird(state.avatar.pos, tuning.avatar_size, state.avatar.vel_y));
    }

    // Mic meter in the ground strip
    vertices.extend(level_meter(
        Vec2::new(10.0, tuning.playfield_height - 24.0),
        Vec2::new(160.0, 10.0),
        level,
        tuning.level_threshold,
    ));

    vertices
}

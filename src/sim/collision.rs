//! Collision detection between the bird and pipes
//!
//! The bird is treated as a single point (its top-left anchor) tested against
//! the two solid segments of a pipe. Its sprite size plays no part here.

use glam::Vec2;

use super::obstacle::Obstacle;

/// Which solid segment of a pipe was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Upper,
    Lower,
}

/// Test the avatar point against one pipe.
///
/// Horizontal overlap is half-open: `[x, x + width)`. Vertically the gap is
/// closed, so a point exactly on either gap edge is safe.
pub fn point_hits_obstacle(point: Vec2, obstacle: &Obstacle, field_floor: f32) -> Option<Segment> {
    if point.x < obstacle.x || point.x >= obstacle.right() {
        return None;
    }
    if point.y < obstacle.gap.top {
        Some(Segment::Upper)
    } else if point.y > obstacle.gap.lower_edge(field_floor) {
        Some(Segment::Lower)
    } else {
        None
    }
}

/// First pipe (in spawn order) the point collides with
pub fn first_hit(point: Vec2, obstacles: &[Obstacle], field_floor: f32) -> Option<(u32, Segment)> {
    obstacles.iter().find_map(|obstacle| {
        point_hits_obstacle(point, obstacle, field_floor).map(|segment| (obstacle.id, segment))
    })
}

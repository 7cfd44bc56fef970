use crate::vec::Vec2;
use std::f32::consts::{PI, TAU};

// Silhouettes a shaped shell explodes into, in shell-local coordinates
// (+y down, so the heart lobes point up after the sign flip). Deterministic:
// explosion jitter is applied later, per particle.

pub fn heart_shape(scale: f32) -> Vec<Vec2> {
    let mut points = Vec::new();
    let mut t = 0.0f32;
    while t < TAU {
        let x = 16.0 * t.sin().powi(3);
        let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
        points.push(Vec2::new(x * scale, y * scale));
        t += 0.1;
    }
    points
}

pub fn smiley_shape(scale: f32) -> Vec<Vec2> {
    let mut points = Vec::new();

    // Face outline
    let mut t = 0.0f32;
    while t < TAU {
        points.push(Vec2::new(t.cos() * 12.0 * scale, t.sin() * 12.0 * scale));
        t += 0.2;
    }

    // Eyes
    points.push(Vec2::new(-4.0 * scale, -4.0 * scale));
    points.push(Vec2::new(4.0 * scale, -4.0 * scale));

    // Smile arc, open side up
    let mut t = PI * 0.2;
    while t < PI * 0.8 {
        points.push(Vec2::new(t.cos() * 8.0 * scale, t.sin() * 8.0 * scale));
        t += 0.1;
    }

    points
}

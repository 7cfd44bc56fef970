use crate::vec::Vec3;

// Factory defaults per shell type. Life is ticks, size is the stroke/radius
// base before perspective scaling.
const SMILEY_PARTICLE_LIFE: i32 = 110;
const SMILEY_PARTICLE_SIZE: f32 = 2.0;
const HEART_PARTICLE_LIFE: i32 = 100;
const HEART_PARTICLE_SIZE: f32 = 2.5;
const SPHERE_PARTICLE_LIFE: i32 = 100;
const SPHERE_PARTICLE_SIZE: f32 = 2.5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FireworkType {
    Kiku,   // chrysanthemum: sphere burst drawn as streaks with golden trails
    Botan,  // peony: sphere burst drawn as dots
    Heart,
    Smiley,
}

#[derive(Clone)]
pub struct Particle {
    pub position: Vec3,
    pub prev_position: Vec3,
    pub velocity: Vec3,
    pub color: (u8, u8, u8),
    pub glow_color: (u8, u8, u8),
    pub size: f32,
    pub life: i32,
    // Ticks left in the afterglow trail color; only Kiku bursts carry one
    pub trail_life: Option<i32>,
    pub kind: FireworkType,
}

impl Particle {
    // One fragment of an explosion. The shared shell hue gets a +/-10 degree
    // jitter per fragment, then life and size jitter by type.
    pub fn burst(
        position: Vec3,
        velocity: Vec3,
        hue: f32,
        kind: FireworkType,
        trailed: bool,
    ) -> Self {
        let hue = hue + (fastrand::f32() - 0.5) * 20.0;

        let (life, size) = match kind {
            FireworkType::Smiley => (
                SMILEY_PARTICLE_LIFE + fastrand::i32(-10..10),
                SMILEY_PARTICLE_SIZE,
            ),
            FireworkType::Heart => (
                HEART_PARTICLE_LIFE + fastrand::i32(-20..20),
                HEART_PARTICLE_SIZE + fastrand::f32() - 0.5,
            ),
            FireworkType::Kiku | FireworkType::Botan => (
                SPHERE_PARTICLE_LIFE + fastrand::i32(-20..20),
                SPHERE_PARTICLE_SIZE + fastrand::f32() - 0.5,
            ),
        };

        Self {
            position,
            prev_position: position,
            velocity,
            color: hsl(hue, 1.0, 0.7),
            glow_color: hsl(hue, 1.0, 0.5),
            size,
            life,
            trail_life: if trailed {
                Some(20 + fastrand::i32(0..10))
            } else {
                None
            },
            kind,
        }
    }

    // The ascending shell body. Life stays at 100 for the whole flight; it
    // only feeds the alpha formula, launchers are removed at apex instead.
    pub fn launcher(position: Vec3, velocity: Vec3, hue: f32, kind: FireworkType) -> Self {
        Self {
            position,
            prev_position: position,
            velocity,
            color: hsl(hue, 1.0, 0.7),
            glow_color: hsl(hue, 1.0, 0.5),
            size: 2.0,
            life: 100,
            trail_life: None,
            kind,
        }
    }
}

// A shell in flight, up to the apex.
#[derive(Clone)]
pub struct Firework {
    pub kind: FireworkType,
    pub launcher: Particle,
    pub has_exploded: bool,
    pub hue: f32,
}

// Hue in degrees (any value, wrapped), saturation and lightness in [0, 1].
pub fn hsl(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

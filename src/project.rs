use crate::vec::{Vec2, Vec3};

// Screen-space result of projecting a simulation point. scale doubles as the
// depth cue: 1 at z = 0, shrinking toward 0 far away, unbounded (then
// negative) as a point passes the camera plane at z = -perspective.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub perspective: f32,
    pub center: Vec2,
}

impl Projection {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            perspective: width * 0.8,
            center: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn project(&self, point: Vec3) -> Projected {
        let scale = self.perspective / (self.perspective + point.z);
        Projected {
            x: point.x * scale + self.center.x,
            y: point.y * scale + self.center.y,
            scale,
        }
    }
}

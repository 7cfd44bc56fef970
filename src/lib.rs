//! Core of a terminal fireworks show: a 2.5D particle simulation with
//! perspective projection and a truecolor half-block renderer.

pub mod particle;
pub mod project;
pub mod render;
pub mod shape;
pub mod vec;
pub mod world;

pub use particle::{Firework, FireworkType, Particle};
pub use project::{Projected, Projection};
pub use render::Renderer;
pub use vec::{Vec2, Vec3};
pub use world::{StarMine, World};

use crate::particle::{Firework, FireworkType, Particle};
use crate::project::Projection;
use crate::shape::{heart_shape, smiley_shape};
use crate::vec::Vec3;

pub const GRAVITY: f32 = 0.04;
pub const LAUNCHER_FRICTION: f32 = 0.99;
pub const PARTICLE_FRICTION: f32 = 0.97;
pub const KIKU_BOTAN_PARTICLE_COUNT: usize = 300;
pub const STAR_MINE_COUNT: u32 = 36;
pub const STAR_MINE_INTERVAL: f32 = 0.15; // Seconds between star mine shots

const HEART_FIREWORK_SCALE: f32 = 0.2;
const HEART_VELOCITY_SCALE: f32 = 1.2;
const HEART_JITTER: f32 = 0.5;
const SMILEY_FIREWORK_SCALE: f32 = 0.2;
const SMILEY_VELOCITY_SCALE: f32 = 1.2;
const SMILEY_JITTER: f32 = 0.1;
const SPHERE_EXPLOSION_POWER: f32 = 5.0;

// One queued star mine run: a volley of shells fired on a fixed cadence
pub struct StarMine {
    pub next_due: f32,
    pub remaining: u32,
}

pub struct World {
    pub fireworks: Vec<Firework>,
    pub particles: Vec<Particle>,
    pub star_mines: Vec<StarMine>,
    pub projection: Projection,
    pub time: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            fireworks: Vec::new(),
            particles: Vec::with_capacity(2048),
            star_mines: Vec::new(),
            projection: Projection::new(width, height),
            time: 0.0,
        }
    }

    // Simulation state survives a resize; only the camera changes
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.projection = Projection::new(width, height);
    }

    pub fn launch(&mut self, kind: FireworkType) {
        self.launch_with_power(kind, 1.0);
    }

    pub fn launch_with_power(&mut self, kind: FireworkType, power_scale: f32) {
        let center_y = self.projection.center.y;

        // Smiley shells are always yellow so the face reads as a face
        let hue = if kind == FireworkType::Smiley {
            60.0
        } else {
            fastrand::f32() * 360.0
        };

        // Shells start a half viewport below center, i.e. at the bottom edge
        let position = Vec3::new(
            (fastrand::f32() - 0.5) * 100.0,
            center_y,
            (fastrand::f32() - 0.5) * 200.0,
        );

        // Pick an apex height, then the exact upward speed that stalls there
        let target_y = -center_y * (0.25 + fastrand::f32() * 0.4) * power_scale;
        let climb = (position.y - target_y).max(0.0);
        let velocity = Vec3::new(
            (fastrand::f32() - 0.5) * 4.0,
            -(2.0 * GRAVITY * climb).sqrt(),
            (fastrand::f32() - 0.5) * 4.0,
        );

        self.fireworks.push(Firework {
            kind,
            launcher: Particle::launcher(position, velocity, hue, kind),
            has_exploded: false,
            hue,
        });
    }

    pub fn launch_star_mine(&mut self) {
        self.star_mines.push(StarMine {
            next_due: self.time + STAR_MINE_INTERVAL,
            remaining: STAR_MINE_COUNT,
        });
    }

    // One simulation tick. dt only drives the clock that paces star mine
    // shots; the physics itself advances one fixed step per call.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        // Wrap time to prevent floating point precision issues
        if self.time > 10000.0 {
            self.time -= 10000.0;
            for run in &mut self.star_mines {
                run.next_due -= 10000.0;
            }
        }

        self.fire_due_star_mine_shots();
        self.step_launchers();
        self.step_particles();
    }

    fn fire_due_star_mine_shots(&mut self) {
        let mut shots = Vec::new();
        for run in &mut self.star_mines {
            while run.remaining > 0 && self.time >= run.next_due {
                let kind = if fastrand::bool() {
                    FireworkType::Kiku
                } else {
                    FireworkType::Botan
                };
                shots.push((kind, 0.7 + fastrand::f32() * 0.6));
                run.remaining -= 1;
                run.next_due += STAR_MINE_INTERVAL;
            }
        }
        self.star_mines.retain(|run| run.remaining > 0);

        for (kind, power_scale) in shots {
            self.launch_with_power(kind, power_scale);
        }
    }

    // Update launchers and collect the ones that reached apex
    fn step_launchers(&mut self) {
        let mut exploded = Vec::new();

        self.fireworks.retain_mut(|fw| {
            let l = &mut fw.launcher;
            l.prev_position = l.position;
            l.velocity.y += GRAVITY;
            l.velocity.x *= LAUNCHER_FRICTION;
            l.velocity.z *= LAUNCHER_FRICTION;
            l.position += l.velocity;

            // Apex: the first tick vertical velocity stops being negative
            if !fw.has_exploded && l.velocity.y >= 0.0 {
                fw.has_exploded = true;
                exploded.push(fw.clone());
                false // Remove launcher
            } else {
                true // Keep launcher
            }
        });

        for fw in &exploded {
            self.explode(fw);
        }
    }

    fn step_particles(&mut self) {
        self.particles.retain_mut(|p| {
            p.life -= 1;
            if p.life <= 0 {
                return false;
            }

            p.prev_position = p.position;
            p.velocity.y += GRAVITY;
            p.velocity.x *= PARTICLE_FRICTION;
            p.velocity.y *= PARTICLE_FRICTION;
            p.velocity.z *= PARTICLE_FRICTION;
            p.position += p.velocity;

            if let Some(trail) = p.trail_life.as_mut() {
                if *trail > 0 {
                    *trail -= 1;
                }
            }

            true
        });
    }

    fn explode(&mut self, fw: &Firework) {
        let origin = fw.launcher.position;

        match fw.kind {
            FireworkType::Heart => {
                for point in heart_shape(HEART_FIREWORK_SCALE) {
                    let velocity = Vec3::new(
                        point.x * HEART_VELOCITY_SCALE + (fastrand::f32() - 0.5) * HEART_JITTER,
                        point.y * HEART_VELOCITY_SCALE + (fastrand::f32() - 0.5) * HEART_JITTER,
                        (fastrand::f32() - 0.5) * HEART_JITTER,
                    );
                    self.particles
                        .push(Particle::burst(origin, velocity, fw.hue, fw.kind, false));
                }
            }
            FireworkType::Smiley => {
                for point in smiley_shape(SMILEY_FIREWORK_SCALE) {
                    let velocity = Vec3::new(
                        point.x * SMILEY_VELOCITY_SCALE + (fastrand::f32() - 0.5) * SMILEY_JITTER,
                        point.y * SMILEY_VELOCITY_SCALE + (fastrand::f32() - 0.5) * SMILEY_JITTER,
                        (fastrand::f32() - 0.5) * SMILEY_JITTER * 2.0,
                    );
                    self.particles
                        .push(Particle::burst(origin, velocity, fw.hue, fw.kind, false));
                }
            }
            FireworkType::Kiku | FireworkType::Botan => {
                // One power draw per shell, shared by every fragment
                let power = SPHERE_EXPLOSION_POWER * (0.9 + fastrand::f32() * 0.2);
                let trailed = fw.kind == FireworkType::Kiku;

                for _ in 0..KIKU_BOTAN_PARTICLE_COUNT {
                    let theta = fastrand::f32() * std::f32::consts::TAU;
                    // acos of a uniform value gives even coverage over the sphere
                    let phi = (2.0 * fastrand::f32() - 1.0).acos();
                    let velocity = Vec3::new(
                        phi.sin() * theta.cos() * power,
                        phi.sin() * theta.sin() * power,
                        phi.cos() * power,
                    );
                    self.particles
                        .push(Particle::burst(origin, velocity, fw.hue, fw.kind, trailed));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_launch_sends_shell_upward() {
        fastrand::seed(1);
        let mut world = World::new(800.0, 600.0);
        world.launch(FireworkType::Botan);

        let fw = &world.fireworks[0];
        assert!(fw.launcher.velocity.y < 0.0);
        assert!(fw.launcher.velocity.x.abs() <= 2.0);
        assert!(fw.launcher.velocity.z.abs() <= 2.0);
        assert_eq!(fw.launcher.position.y, 300.0);
        assert!(!fw.has_exploded);
    }

    #[test]
    fn test_smiley_hue_is_fixed_yellow() {
        fastrand::seed(2);
        let mut world = World::new(800.0, 600.0);
        world.launch(FireworkType::Smiley);
        world.launch(FireworkType::Smiley);
        for fw in &world.fireworks {
            assert_eq!(fw.hue, 60.0);
        }
    }

    #[test]
    fn test_launcher_gains_gravity_each_tick() {
        fastrand::seed(3);
        let mut world = World::new(800.0, 600.0);
        world.launch(FireworkType::Kiku);

        let before = world.fireworks[0].launcher.velocity.y;
        world.update(DT);
        let after = world.fireworks[0].launcher.velocity.y;
        assert_eq!(after, before + GRAVITY);
    }

    #[test]
    fn test_launcher_prev_position_trails_by_one_tick() {
        fastrand::seed(4);
        let mut world = World::new(800.0, 600.0);
        world.launch(FireworkType::Kiku);

        let start = world.fireworks[0].launcher.position;
        world.update(DT);
        let l = &world.fireworks[0].launcher;
        assert_eq!(l.prev_position, start);
        assert!(l.position.y < start.y);
    }

    #[test]
    fn test_particle_loses_one_life_per_tick() {
        let mut world = World::new(800.0, 600.0);
        world.particles.push(Particle::burst(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            200.0,
            FireworkType::Botan,
            false,
        ));
        let life = world.particles[0].life;

        world.update(DT);
        assert_eq!(world.particles[0].life, life - 1);
        world.update(DT);
        assert_eq!(world.particles[0].life, life - 2);
    }

    #[test]
    fn test_dead_particles_are_removed_before_moving() {
        let mut world = World::new(800.0, 600.0);
        let mut p = Particle::burst(
            Vec3::new(5.0, 5.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            0.0,
            FireworkType::Botan,
            false,
        );
        p.life = 1;
        world.particles.push(p);

        world.update(DT);
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_particle_friction_damps_all_axes() {
        let mut world = World::new(800.0, 600.0);
        let mut p = Particle::burst(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            0.0,
            FireworkType::Botan,
            false,
        );
        p.life = 50;
        world.particles.push(p);

        world.update(DT);
        let v = world.particles[0].velocity;
        assert_eq!(v.x, 10.0 * PARTICLE_FRICTION);
        assert_eq!(v.y, GRAVITY * PARTICLE_FRICTION);
        assert_eq!(v.z, 10.0 * PARTICLE_FRICTION);
    }

    #[test]
    fn test_heart_burst_has_one_particle_per_shape_point() {
        fastrand::seed(5);
        let mut world = World::new(800.0, 600.0);
        world.launch(FireworkType::Heart);

        let mut ticks = 0;
        while !world.fireworks.is_empty() {
            world.update(DT);
            ticks += 1;
            assert!(ticks < 1000, "launcher never reached apex");
        }

        assert_eq!(
            world.particles.len(),
            heart_shape(HEART_FIREWORK_SCALE).len()
        );
        assert!(world.particles.iter().all(|p| p.trail_life.is_none()));
    }

    #[test]
    fn test_smiley_burst_has_one_particle_per_shape_point() {
        fastrand::seed(6);
        let mut world = World::new(800.0, 600.0);
        world.launch(FireworkType::Smiley);

        let mut ticks = 0;
        while !world.fireworks.is_empty() {
            world.update(DT);
            ticks += 1;
            assert!(ticks < 1000, "launcher never reached apex");
        }

        assert_eq!(
            world.particles.len(),
            smiley_shape(SMILEY_FIREWORK_SCALE).len()
        );
    }

    #[test]
    fn test_star_mine_fires_one_shot_per_interval() {
        fastrand::seed(7);
        let mut world = World::new(800.0, 600.0);
        world.launch_star_mine();
        assert_eq!(world.star_mines.len(), 1);
        assert_eq!(world.star_mines[0].remaining, STAR_MINE_COUNT);

        // Stepping by exactly one interval fires exactly one shell
        world.update(STAR_MINE_INTERVAL);
        assert_eq!(world.fireworks.len(), 1);
        assert_eq!(world.star_mines[0].remaining, STAR_MINE_COUNT - 1);
        assert!(matches!(
            world.fireworks[0].kind,
            FireworkType::Kiku | FireworkType::Botan
        ));
    }

    #[test]
    fn test_star_mine_drains_and_is_removed() {
        fastrand::seed(8);
        let mut world = World::new(800.0, 600.0);
        world.launch_star_mine();

        for _ in 0..STAR_MINE_COUNT {
            world.update(STAR_MINE_INTERVAL);
        }
        assert!(world.star_mines.is_empty());
        // 36 ticks is far short of any apex, so every shell is still aloft
        assert_eq!(world.fireworks.len(), STAR_MINE_COUNT as usize);
    }

    #[test]
    fn test_star_mine_runs_stack() {
        fastrand::seed(9);
        let mut world = World::new(800.0, 600.0);
        world.launch_star_mine();
        world.launch_star_mine();

        world.update(STAR_MINE_INTERVAL);
        assert_eq!(world.fireworks.len(), 2);
    }

    #[test]
    fn test_time_wrap_rebases_star_mine_dues() {
        fastrand::seed(10);
        let mut world = World::new(800.0, 600.0);
        world.time = 9999.9;
        world.launch_star_mine();

        world.update(0.2);
        assert!(world.time < 1.0);
        // The pending run came along for the rebase instead of stalling
        assert!(world.star_mines[0].next_due < 1.0);
        assert_eq!(world.star_mines[0].remaining, STAR_MINE_COUNT - 1);
    }

    #[test]
    fn test_resize_keeps_simulation_state() {
        fastrand::seed(11);
        let mut world = World::new(800.0, 600.0);
        world.launch(FireworkType::Kiku);
        world.update(DT);

        world.set_viewport(400.0, 200.0);
        assert_eq!(world.fireworks.len(), 1);
        assert_eq!(world.projection.center.x, 200.0);
    }
}

//! Line traces against the world.
//!
//! The simulation asks the world three kinds of question: where does the
//! laser land, is the path to a point clear, and is the surface ahead open
//! sky. All of them go through `Tracer`, so hosts can plug in real collision
//! while tests use the simple shapes below.

use glam::DVec3;
use hecs::{Entity, World};

use laserguide_core::components::{Actor, Hull};
use laserguide_core::types::Position;

/// Result of a line trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// 1.0 when nothing was hit.
    pub fraction: f64,
    pub end: Position,
    pub normal: DVec3,
    /// The entity whose hull stopped the trace.
    pub entity: Option<Entity>,
    pub hit_sky: bool,
}

impl TraceHit {
    pub fn clear(to: &Position) -> Self {
        Self {
            fraction: 1.0,
            end: *to,
            normal: DVec3::ZERO,
            entity: None,
            hit_sky: false,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.fraction >= 1.0
    }
}

pub trait Tracer: Send {
    /// Trace from `from` to `to`, ignoring `ignore`'s hull.
    fn trace_line(
        &self,
        world: &World,
        from: &Position,
        to: &Position,
        ignore: Option<Entity>,
    ) -> TraceHit;

    /// Whether `to` is visible from `from`.
    fn line_of_sight(
        &self,
        world: &World,
        from: &Position,
        to: &Position,
        ignore: Option<Entity>,
    ) -> bool {
        self.trace_line(world, from, to, ignore).is_clear()
    }
}

/// No terrain at all. Only entity hulls stop a trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSky;

impl Tracer for OpenSky {
    fn trace_line(
        &self,
        world: &World,
        from: &Position,
        to: &Position,
        ignore: Option<Entity>,
    ) -> TraceHit {
        trace_hulls(world, from, to, ignore).unwrap_or_else(|| TraceHit::clear(to))
    }
}

/// A solid floor plane, with an optional sky ceiling above it.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub height: f64,
    pub sky_height: Option<f64>,
}

impl FlatGround {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            sky_height: None,
        }
    }

    pub fn with_sky(mut self, sky_height: f64) -> Self {
        self.sky_height = Some(sky_height);
        self
    }
}

impl Tracer for FlatGround {
    fn trace_line(
        &self,
        world: &World,
        from: &Position,
        to: &Position,
        ignore: Option<Entity>,
    ) -> TraceHit {
        let mut best = trace_hulls(world, from, to, ignore).unwrap_or_else(|| TraceHit::clear(to));

        // Floor, entered from above.
        if from.z >= self.height && to.z < self.height {
            let t = (from.z - self.height) / (from.z - to.z);
            if t < best.fraction {
                best = TraceHit {
                    fraction: t,
                    end: lerp(from, to, t),
                    normal: DVec3::Z,
                    entity: None,
                    hit_sky: false,
                };
            }
        }

        if let Some(sky) = self.sky_height {
            if from.z <= sky && to.z > sky {
                let t = (sky - from.z) / (to.z - from.z);
                if t < best.fraction {
                    best = TraceHit {
                        fraction: t,
                        end: lerp(from, to, t),
                        normal: DVec3::NEG_Z,
                        entity: None,
                        hit_sky: true,
                    };
                }
            }
        }

        best
    }
}

fn lerp(from: &Position, to: &Position, t: f64) -> Position {
    from.as_dvec3().lerp(to.as_dvec3(), t).into()
}

/// Nearest hull sphere crossed by the segment, if any. A segment starting
/// inside a hull hits it at fraction 0.
fn trace_hulls(
    world: &World,
    from: &Position,
    to: &Position,
    ignore: Option<Entity>,
) -> Option<TraceHit> {
    let start = from.as_dvec3();
    let delta = to.as_dvec3() - start;
    let a = delta.length_squared();

    let mut best: Option<(f64, Entity, DVec3)> = None;
    for (entity, (pos, hull, actor)) in world.query::<(&Position, &Hull, Option<&Actor>)>().iter() {
        if Some(entity) == ignore {
            continue;
        }
        let center = match actor {
            Some(actor) => pos.as_dvec3() + DVec3::Z * actor.center_height,
            None => pos.as_dvec3(),
        };
        let m = start - center;
        let c = m.length_squared() - hull.radius * hull.radius;
        let t = if c <= 0.0 {
            0.0
        } else {
            if a == 0.0 {
                continue;
            }
            let b = m.dot(delta);
            let disc = b * b - a * c;
            if b >= 0.0 || disc < 0.0 {
                continue;
            }
            (-b - disc.sqrt()) / a
        };
        if t > 1.0 {
            continue;
        }
        if best.is_none_or(|(best_t, _, _)| t < best_t) {
            best = Some((t, entity, center));
        }
    }

    best.map(|(t, entity, center)| {
        let end = start + delta * t;
        TraceHit {
            fraction: t,
            end: end.into(),
            normal: (end - center).normalize_or_zero(),
            entity: Some(entity),
            hit_sky: false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_sky_never_hits_terrain() {
        let world = World::new();
        let to = Position::new(0.0, 0.0, -5000.0);
        let hit = OpenSky.trace_line(&world, &Position::default(), &to, None);
        assert!(hit.is_clear());
        assert_eq!(hit.end, to);
    }

    #[test]
    fn test_flat_ground_hit() {
        let world = World::new();
        let ground = FlatGround::new(0.0);
        let hit = ground.trace_line(
            &world,
            &Position::new(0.0, 0.0, 100.0),
            &Position::new(100.0, 0.0, -100.0),
            None,
        );
        assert!((hit.fraction - 0.5).abs() < 1e-12);
        assert!((hit.end.x - 50.0).abs() < 1e-9);
        assert_eq!(hit.normal, DVec3::Z);
        assert!(!hit.hit_sky);
    }

    #[test]
    fn test_sky_ceiling_flagged() {
        let world = World::new();
        let ground = FlatGround::new(0.0).with_sky(1000.0);
        let hit = ground.trace_line(
            &world,
            &Position::new(0.0, 0.0, 990.0),
            &Position::new(0.0, 0.0, 1006.0),
            None,
        );
        assert!(hit.hit_sky);
        assert!(!hit.is_clear());
    }

    #[test]
    fn test_hull_hit_and_ignore() {
        let mut world = World::new();
        let target = world.spawn((Position::new(100.0, 0.0, 0.0), Hull { radius: 10.0 }));
        let from = Position::default();
        let to = Position::new(200.0, 0.0, 0.0);

        let hit = OpenSky.trace_line(&world, &from, &to, None);
        assert_eq!(hit.entity, Some(target));
        assert!((hit.end.x - 90.0).abs() < 1e-9);
        assert!((hit.normal - DVec3::NEG_X).length() < 1e-9);

        assert!(OpenSky.line_of_sight(&world, &from, &to, Some(target)));
    }
}

//! Integration tests for a running level
//!
//! Drives a player across a small hand-built level tick by tick: gravity,
//! forward motion, collision check. Covers landing, collecting, dropping
//! platforms, moving platforms and the kill zone together, plus a
//! generated level of path movers checked against a brute-force scan.
//!
//! Run with: cargo test --test level_integration_tests

use rhythm_runner::glam::Vec3;
use rhythm_runner::runner::RunnerConfig;
use rhythm_runner::runner::game::{
    check_collisions, DeathCause, GameObject, GameObjectDesc, Level, MotionDesc, ObjectRole,
    ObstacleKind, Player,
};
use rhythm_runner::runner::resource::{Shape, ShapeRegistry};
use rhythm_runner::runner::spatial::{
    brute_force_colliding_objects, AxisAlignedBox, ObjectKey, SpatialObject,
};

// ============================================================================
// HELPERS
// ============================================================================

const GRAVITY: f32 = 0.02;
const DELTA_X_PER_TICK: f32 = 0.1;

fn shapes() -> ShapeRegistry {
    let mut shapes = ShapeRegistry::new();
    shapes.register(Shape::unit_cube("cube")).unwrap();
    shapes
}

fn spawn_desc(role: ObjectRole, position: Vec3, scale: Vec3, motion: MotionDesc) -> GameObjectDesc {
    GameObjectDesc {
        shape: "cube".to_string(),
        role,
        position,
        scale,
        motion,
        ..GameObjectDesc::default()
    }
}

fn platform(shapes: &ShapeRegistry, x_from: f32, x_to: f32) -> GameObject {
    GameObject::from_desc(
        spawn_desc(
            ObjectRole::Obstacle(ObstacleKind::Platform),
            Vec3::new((x_from + x_to) * 0.5, -0.5, 0.0),
            Vec3::new(x_to - x_from, 1.0, 4.0),
            MotionDesc::Static,
        ),
        shapes,
    )
    .unwrap()
}

fn player_at(x: f32, y: f32) -> Player {
    Player::new(AxisAlignedBox::new(
        Vec3::new(x, y, -0.4),
        Vec3::new(x + 0.8, y + 1.6, 0.4),
    ))
}

/// One simulation tick: level objects move, the player falls and runs
/// forward, then the collision check runs.
fn tick(player: &mut Player, level: &mut Level, config: &RunnerConfig) -> Option<DeathCause> {
    level.update();

    player.begin_tick();
    if player.ground().is_none() {
        player.set_y_velocity(player.y_velocity() - GRAVITY);
    } else if let Some(ground) = player.ground().and_then(|key| level.object(key)) {
        // Walked off the end of the ground
        if player.bounding_box().min().x > ground.bounding_box().max().x {
            player.leave_ground();
        }
    }
    player.move_by(Vec3::new(DELTA_X_PER_TICK, player.y_velocity(), 0.0));

    check_collisions(player, level, &config.collision).death
}

fn run(player: &mut Player, level: &mut Level, config: &RunnerConfig, ticks: usize) -> Option<DeathCause> {
    for _ in 0..ticks {
        if let Some(death) = tick(player, level, config) {
            return Some(death);
        }
    }
    None
}

/// 64-bit linear congruential generator (Knuth MMIX constants)
struct Lcg(u64);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform float in [lo, hi)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (self.next_u32() as f32 / (1u64 << 31) as f32) * (hi - lo)
    }

    fn point(&mut self, extent: f32) -> Vec3 {
        Vec3::new(
            self.range(-extent, extent),
            self.range(-extent, extent),
            self.range(-extent, extent),
        )
    }
}

fn key_where(level: &Level, predicate: impl Fn(&GameObject) -> bool) -> ObjectKey {
    level
        .objects()
        .find(|(_, object)| predicate(object))
        .map(|(key, _)| key)
        .unwrap()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_integration_run_lands_and_collects() {
    let config = RunnerConfig::default();
    let shapes = shapes();
    let coin = GameObject::from_desc(
        spawn_desc(
            ObjectRole::Collectible,
            Vec3::new(3.0, 0.6, 0.0),
            Vec3::splat(0.4),
            MotionDesc::Static,
        ),
        &shapes,
    )
    .unwrap();
    let mut level = Level::new(&config.spatial, vec![platform(&shapes, -2.0, 10.0), coin]).unwrap();
    let ground = key_where(&level, |o| o.obstacle_kind() == Some(ObstacleKind::Platform));

    // Start slightly above the ground and fall onto it
    let mut player = player_at(0.0, 0.3);
    let death = run(&mut player, &mut level, &config, 50);

    assert_eq!(death, None);
    assert!(player.is_alive());
    assert_eq!(player.ground(), Some(ground));
    assert_eq!(player.score(), 1);
}

#[test]
fn test_integration_gap_leads_to_kill_zone() {
    let config = RunnerConfig::default();
    let shapes = shapes();
    let mut level = Level::new(
        &config.spatial,
        vec![platform(&shapes, -2.0, 2.0), platform(&shapes, 30.0, 40.0)],
    )
    .unwrap();

    let mut player = player_at(0.0, 0.0);
    let death = run(&mut player, &mut level, &config, 400);

    assert_eq!(death, Some(DeathCause::KillZone));
    assert!(!player.is_alive());
    assert!(player.previous_box().min().y < level.kill_zone());
}

#[test]
fn test_integration_running_into_wall_is_fatal() {
    let config = RunnerConfig::default();
    let shapes = shapes();
    let wall = GameObject::from_desc(
        spawn_desc(
            ObjectRole::Obstacle(ObstacleKind::Rock),
            Vec3::new(4.5, 1.5, 0.0),
            Vec3::new(1.0, 3.0, 4.0),
            MotionDesc::Static,
        ),
        &shapes,
    )
    .unwrap();
    let mut level = Level::new(&config.spatial, vec![platform(&shapes, -2.0, 10.0), wall]).unwrap();
    let wall_key = key_where(&level, |o| o.obstacle_kind() == Some(ObstacleKind::Rock));

    let mut player = player_at(0.0, 0.0);
    let death = run(&mut player, &mut level, &config, 100);

    assert_eq!(death, Some(DeathCause::SideCollision(wall_key)));
}

#[test]
fn test_integration_dropping_platform_falls_away() {
    let config = RunnerConfig::default();
    let shapes = shapes();
    let dropper = GameObject::from_desc(
        spawn_desc(
            ObjectRole::Obstacle(ObstacleKind::DroppingPlatform),
            Vec3::new(4.0, -0.5, 0.0),
            Vec3::new(4.0, 1.0, 4.0),
            MotionDesc::Drop { velocity: 0.05 },
        ),
        &shapes,
    )
    .unwrap();
    let floor = GameObject::from_desc(
        spawn_desc(
            ObjectRole::Obstacle(ObstacleKind::Platform),
            Vec3::new(50.0, -5.5, 0.0),
            Vec3::new(4.0, 1.0, 4.0),
            MotionDesc::Static,
        ),
        &shapes,
    )
    .unwrap();
    let mut level = Level::new(&config.spatial, vec![platform(&shapes, -2.0, 2.0), dropper, floor]).unwrap();
    let dropper_key = key_where(&level, |o| o.obstacle_kind() == Some(ObstacleKind::DroppingPlatform));

    let mut player = player_at(0.0, 0.0);
    let mut landed_on_dropper = false;
    let mut death = None;
    for _ in 0..600 {
        death = tick(&mut player, &mut level, &config);
        landed_on_dropper |= player.ground() == Some(dropper_key);
        if death.is_some() {
            break;
        }
    }

    assert!(landed_on_dropper);
    let dropper = level.object(dropper_key).unwrap();
    assert!(dropper.is_dropping());
    assert!(dropper.bounding_box().max().y < 0.0);
    assert_eq!(death, Some(DeathCause::KillZone));

    // Reset puts the platform back where it started
    level.reset();
    let dropper = level.object(dropper_key).unwrap();
    assert!(!dropper.is_dropping());
    assert_eq!(dropper.position(), Vec3::new(4.0, -0.5, 0.0));
    assert!(level.tree().contains(dropper_key));
}

#[test]
fn test_integration_moving_platform_stays_queryable() {
    let config = RunnerConfig::from_toml_str(
        r#"
        [spatial]
        objects_per_leaf = 2
        "#,
    )
    .unwrap();
    let shapes = shapes();

    let mut objects: Vec<GameObject> = (0..12)
        .map(|i| platform(&shapes, i as f32 * 6.0, i as f32 * 6.0 + 4.0))
        .collect();
    objects.push(
        GameObject::from_desc(
            spawn_desc(
                ObjectRole::Obstacle(ObstacleKind::MovingPlatform),
                Vec3::new(10.0, 4.0, 0.0),
                Vec3::new(2.0, 0.5, 2.0),
                MotionDesc::Path {
                    waypoints: vec![Vec3::new(30.0, 8.0, 0.0), Vec3::new(10.0, 4.0, 0.0)],
                    velocity: Vec3::splat(0.3),
                },
            ),
            &shapes,
        )
        .unwrap(),
    );
    let mut level = Level::new(&config.spatial, objects).unwrap();
    let mover = key_where(&level, |o| o.path_motion().is_some());

    for _ in 0..500 {
        level.update();
        let current = level.object(mover).unwrap().bounding_box();
        assert!(level.colliding_objects(&current).contains(&mover));
    }
}

#[test]
fn test_integration_generated_movers_stay_indexed() {
    let config = RunnerConfig::from_toml_str("[spatial]\nobjects_per_leaf = 2").unwrap();
    let shapes = shapes();
    let mut rng = Lcg(2024);

    let mut objects: Vec<GameObject> = (0..30)
        .map(|i| platform(&shapes, i as f32 * 5.0 - 75.0, i as f32 * 5.0 - 72.0))
        .collect();
    for _ in 0..20 {
        let start = rng.point(60.0);
        let stops = 1 + (rng.next_u32() % 3) as usize;
        let waypoints = (0..stops).map(|_| rng.point(60.0)).collect();
        // Unequal speeds per axis bend the heading away from the goal
        let velocity = Vec3::new(rng.range(0.01, 2.0), rng.range(0.01, 2.0), rng.range(0.01, 2.0));
        let scale = Vec3::splat(rng.range(0.5, 3.0));
        objects.push(
            GameObject::from_desc(
                spawn_desc(
                    ObjectRole::Obstacle(ObstacleKind::MovingPlatform),
                    start,
                    scale,
                    MotionDesc::Path { waypoints, velocity },
                ),
                &shapes,
            )
            .unwrap(),
        );
    }
    let mut level = Level::new(&config.spatial, objects).unwrap();
    let movers: Vec<ObjectKey> = level
        .objects()
        .filter(|(_, object)| object.path_motion().is_some())
        .map(|(key, _)| key)
        .collect();
    assert_eq!(movers.len(), 20);

    for tick in 0..1500 {
        // Teleport a mover now and then
        if tick % 250 == 100 {
            let key = movers[(tick / 250) % movers.len()];
            assert!(level.set_position(key, rng.point(80.0)));
        }

        level.update();

        for &key in &movers {
            let current = level.object(key).unwrap().bounding_box();
            assert!(
                level.tree().indexed_box(key).unwrap().contains(&current),
                "tick {}: {:?} at {} escaped its index box",
                tick,
                key,
                current
            );
            assert!(level.colliding_objects(&current).contains(&key));
        }

        let corner = rng.point(80.0);
        let query = AxisAlignedBox::new(corner, corner + Vec3::splat(rng.range(1.0, 20.0)));
        assert_eq!(
            level.colliding_objects(&query),
            brute_force_colliding_objects(&query, level.objects()),
            "tick {}: query {}",
            tick,
            query
        );
    }
}

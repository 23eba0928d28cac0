//! Example game demonstrating engine features
//!
//! Runs headless: frames go to an offscreen buffer and the loop stops after a
//! bounded number of iterations. Pass `capture=frame.png` to keep the last
//! frame, `debug=3` for the overlay, or `config=demo.ron` for a config file.

use arcade_engine::prelude::*;

/// Iterations run when no `max_iterations` is given
const DEMO_ITERATIONS: u64 = 600;

/// Title screen; moves on to the demo on Enter or after a while
struct TitleScene {
    shown: f64,
}

impl Scene for TitleScene {
    fn name(&self) -> &str {
        "title"
    }

    fn initialize(&mut self, _stage: &mut Stage<'_>) {
        self.shown = 0.0;
    }

    fn create(&mut self, stage: &mut Stage<'_>) {
        let title = stage.ctx.messages.get("game.title", &[&stage.ctx.config.title]);
        let start = stage.ctx.messages.get("title.start", &[]);
        let (width, height) = (
            f64::from(stage.ctx.config.width),
            f64::from(stage.ctx.config.height),
        );

        stage.add(
            Entity::new("background")
                .with_size(width, height)
                .with_color(rgba(16, 16, 48, 255))
                .with_physics(PhysicsKind::Static)
                .with_stuck_to_camera(true),
        );
        stage.add(
            Entity::new("title")
                .with_text(title)
                .with_position(width * 0.5 - 40.0, height * 0.4)
                .with_layer(1, 0),
        );
        stage.add(
            Entity::new("start")
                .with_text(start)
                .with_position(width * 0.5 - 60.0, height * 0.6)
                .with_color(rgba(200, 200, 80, 255))
                .with_layer(1, 1),
        );
    }

    fn input(&mut self, stage: &mut Stage<'_>) {
        if stage.ctx.input.is_key_just_pressed(KeyCode::Enter) {
            stage.ctx.request_scene("demo");
        }
    }

    fn update(&mut self, stage: &mut Stage<'_>, dt: f64) {
        self.shown += dt;
        if self.shown > 90.0 {
            stage.ctx.request_scene("demo");
        }
    }
}

/// Player, walls and coins in a world twice the screen size, under the rain
struct DemoScene {
    coins: usize,
}

impl DemoScene {
    fn spawn_coin(stage: &mut Stage<'_>, index: usize) {
        let Some(area) = stage.ctx.world.as_ref().map(|world| world.play_area) else {
            return;
        };
        let x = stage.ctx.rng.range(32.0, area.x - 48.0);
        let y = stage.ctx.rng.range(32.0, area.y - 48.0);
        stage.add(
            Entity::new(format!("coin_{index}"))
                .with_kind(EntityKind::Ellipse)
                .with_size(8.0, 8.0)
                .with_position(x, y)
                .with_color(rgba(255, 210, 0, 255))
                .with_physics(PhysicsKind::Static)
                .with_collider(true)
                .with_attribute(AttributeKey::Value, 10)
                .with_layer(1, 0),
        );
    }
}

impl Scene for DemoScene {
    fn name(&self) -> &str {
        "demo"
    }

    fn load_resources(&mut self, stage: &mut Stage<'_>) {
        // sounds are optional; only look for them under a configured root
        if stage.ctx.config.resources.is_none() {
            return;
        }
        if let Some(clip) = stage.ctx.resources.load_sound("sounds/coin.ogg") {
            stage.ctx.audio.register("coin", clip);
        }
    }

    fn create(&mut self, stage: &mut Stage<'_>) {
        let (width, height) = (
            f64::from(stage.ctx.config.width),
            f64::from(stage.ctx.config.height),
        );
        let (world_w, world_h) = (width * 2.0, height * 2.0);
        stage.set_world(World::new(world_w, world_h).with_wind(DVec2::new(0.1, 0.0)));

        let player = stage.add(
            Entity::new("player")
                .with_position(40.0, 40.0)
                .with_size(16.0, 16.0)
                .with_material(Material::RUBBER)
                .with_color(rgba(80, 200, 255, 255))
                .with_border(rgba(255, 255, 255, 255), 1.0)
                .with_collider(true)
                .with_attribute(AttributeKey::Lives, 3)
                .with_behavior(PlayerInput::new())
                .with_collision_response(Bounce::filtered("wall"))
                .with_collision_response(Pickup::default())
                .with_layer(2, 0),
        );

        for (i, (x, y, w, h)) in [
            (0.0, world_h * 0.5, world_w * 0.3, 8.0),
            (world_w * 0.55, world_h * 0.7, world_w * 0.3, 8.0),
            (world_w * 0.4, world_h * 0.3, 8.0, world_h * 0.3),
        ]
        .into_iter()
        .enumerate()
        {
            stage.add(
                Entity::new(format!("wall_{i}"))
                    .with_position(x, y)
                    .with_size(w, h)
                    .with_material(Material::WOOD)
                    .with_color(rgba(120, 80, 40, 255))
                    .with_shadow(rgba(0, 0, 0, 128), DVec2::new(2.0, 2.0))
                    .with_physics(PhysicsKind::Static)
                    .with_collider(true)
                    .with_layer(1, 1),
            );
        }

        for i in 0..self.coins {
            Self::spawn_coin(stage, i);
        }

        stage.add(
            Entity::new("rain")
                .with_size(width, height)
                .with_fill(rgba(0, 0, 0, 0))
                .with_color(rgba(0, 0, 0, 0))
                .with_stuck_to_camera(true)
                .with_particles(RainEmitter::new(200).with_batch(10))
                .with_behavior(Storm::new(120.0, 0.6))
                .with_layer(5, 0),
        );

        let score = stage.ctx.messages.get("hud.score", &[&0]);
        stage.add(
            Entity::new("score")
                .with_text(score)
                .with_position(4.0, 4.0)
                .with_physics(PhysicsKind::Static)
                .with_stuck_to_camera(true)
                .with_layer(10, 0),
        );

        stage.set_camera(
            Camera::new("main", width, height)
                .with_tween(0.1)
                .with_target(player),
        );
    }

    fn input(&mut self, stage: &mut Stage<'_>) {
        if stage.ctx.input.is_key_just_pressed(KeyCode::KeyR) {
            let ctx = &mut *stage.ctx;
            if let Some(world) = ctx.world.as_mut() {
                world.reshuffle(&mut ctx.rng);
            }
        }
    }

    fn update(&mut self, stage: &mut Stage<'_>, _dt: f64) {
        let score = stage
            .get("player")
            .map(|player| player.attributes.int(AttributeKey::Score))
            .unwrap_or_default();
        let label = stage.ctx.messages.get("hud.score", &[&score]);
        if let Some(hud) = stage.get_mut("score") {
            hud.text = Some(label);
        }

        let collected = self
            .coins
            .saturating_sub(stage.entities.iter().filter(|e| e.name.starts_with("coin")).count());
        if collected == self.coins && self.coins > 0 {
            log::info!("All coins collected, final score {score}");
            stage.ctx.request_scene("title");
        }
    }
}

fn main() {
    env_logger::init();

    let mut config = EngineConfig::from_args(std::env::args().skip(1));
    if config.max_iterations == 0 {
        config = config.with_max_iterations(DEMO_ITERATIONS);
    }
    if config.start_scene.is_none() {
        config = config.with_start_scene("title");
    }

    let mut game = Game::new(config);
    game.add_scene(TitleScene { shown: 0.0 });
    game.add_scene(DemoScene { coins: 12 });

    if let Err(e) = game.run() {
        eprintln!("Game error: {e}");
    }
}

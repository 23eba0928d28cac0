//! Game context and main loop

use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use winit::keyboard::KeyCode;

use super::{DebugInfo, EngineConfig, Messages, Time};
use crate::assets::ResourceCache;
use crate::audio::{AudioService, RodioAudio, SilentAudio};
use crate::behavior::dispatch_input;
use crate::entity::{EntityStore, World};
use crate::input::Input;
use crate::math::Rng;
use crate::physics::PhysicsEngine;
use crate::renderer::{FrameReport, HeadlessPresenter, Presenter, Renderer};
use crate::scene::{Scene, SceneError, SceneManager};

/// Shared state handed to scenes, behaviors and the physics engine
pub struct GameContext {
    /// Active configuration
    pub config: EngineConfig,
    /// Frame timing
    pub time: Time,
    /// Input state
    pub input: Input,
    /// Sound playback
    pub audio: Box<dyn AudioService>,
    /// Loaded images and sounds
    pub resources: ResourceCache,
    /// Text lookup
    pub messages: Messages,
    /// Environment of the live scene, if it has one
    pub world: Option<World>,
    /// Deterministic random numbers
    pub rng: Rng,
    /// Debug level and frame statistics
    pub debug: DebugInfo,
    /// Updates are skipped while paused
    pub paused: bool,
    should_quit: bool,
    scene_request: Option<String>,
}

impl GameContext {
    /// Build a context from `config` with silent audio
    pub fn new(config: EngineConfig) -> Self {
        let mut messages = Messages::with_defaults();
        if let Some(path) = &config.messages {
            match Messages::load(path) {
                Ok(loaded) => messages.merge(loaded),
                Err(e) => log::warn!("Ignoring messages file {}: {e}", path.display()),
            }
        }

        let mut resources = ResourceCache::new();
        if let Some(root) = &config.resources {
            resources = resources.with_root(root);
        }

        let mut audio = SilentAudio::new();
        audio.set_master_volume(config.volume);

        Self {
            time: Time::new(config.frame_budget()),
            input: Input::new(),
            audio: Box::new(audio),
            resources,
            messages,
            world: None,
            rng: Rng::new(config.seed),
            debug: DebugInfo::new(config.debug),
            paused: false,
            should_quit: false,
            scene_request: None,
            config,
        }
    }

    /// Request loop exit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if the loop should exit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Ask the loop to switch scenes once the current input phase is over
    pub fn request_scene(&mut self, name: impl Into<String>) {
        self.scene_request = Some(name.into());
    }

    /// Take the pending scene switch, if any
    pub fn take_scene_request(&mut self) -> Option<String> {
        self.scene_request.take()
    }

    /// Flip the pause flag
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        self.paused
    }
}

impl fmt::Debug for GameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameContext")
            .field("config", &self.config)
            .field("world", &self.world)
            .field("debug", &self.debug.level())
            .field("paused", &self.paused)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

/// The game loop and everything it drives
///
/// Each iteration measures the real time of the previous one and scales it by
/// `config.time_scale`, so motion speed does not depend on the frame rate.
pub struct Game {
    ctx: GameContext,
    physics: PhysicsEngine,
    renderer: Renderer,
    scenes: SceneManager,
    presenter: Box<dyn Presenter>,
    iterations: u64,
    last_report: FrameReport,
}

impl Game {
    /// Create a game; opens an audio device when `config.audio` is set
    pub fn new(config: EngineConfig) -> Self {
        let physics = PhysicsEngine::new().with_mode(config.collision_mode);
        let renderer = Renderer::new(config.width, config.height);
        let presenter = match &config.capture {
            Some(path) => HeadlessPresenter::new().with_capture(path),
            None => HeadlessPresenter::new(),
        };

        let mut ctx = GameContext::new(config);
        if ctx.config.audio {
            match RodioAudio::new() {
                Ok(mut audio) => {
                    audio.set_master_volume(ctx.config.volume);
                    ctx.audio = Box::new(audio);
                }
                Err(e) => log::warn!("Audio disabled: {e}"),
            }
        }

        Self {
            ctx,
            physics,
            renderer,
            scenes: SceneManager::new(),
            presenter: Box::new(presenter),
            iterations: 0,
            last_report: FrameReport::default(),
        }
    }

    /// Replace the frame presenter
    #[must_use]
    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    /// Register a scene
    ///
    /// A live scene of the same name is disposed before it is replaced.
    pub fn add_scene(&mut self, scene: impl Scene + 'static) {
        self.scenes
            .replace(scene, &mut self.ctx, &mut self.physics, &mut self.renderer);
    }

    /// Switch to the scene called `name`
    ///
    /// # Errors
    ///
    /// Returns an error if no such scene is registered
    pub fn activate(&mut self, name: &str) -> Result<(), SceneError> {
        self.scenes
            .activate(name, &mut self.ctx, &mut self.physics, &mut self.renderer)
    }

    /// Run the loop until exit, or once in test mode
    ///
    /// # Errors
    ///
    /// Returns an error if the start scene is unknown or the final frame
    /// cannot be saved
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        if self.scenes.active_name().is_none()
            && let Some(start) = self.ctx.config.start_scene.clone()
        {
            self.activate(&start)?;
        }
        log::info!("Starting game: {}", self.ctx.config.title);

        if self.ctx.config.test_mode {
            self.step();
        } else {
            let max_iterations = self.ctx.config.max_iterations;
            while !self.ctx.should_quit() {
                self.step();
                if max_iterations > 0 && self.iterations >= max_iterations {
                    log::info!("Reached {max_iterations} iterations");
                    break;
                }
            }
        }

        self.scenes
            .deactivate(&mut self.ctx, &mut self.physics, &mut self.renderer);
        self.presenter.finish()?;
        log::info!(
            "Stopped after {} iterations ({} updates)",
            self.iterations,
            self.ctx.debug.stats.total_updates()
        );
        Ok(())
    }

    /// One loop iteration: input, pending scene switch, update (unless
    /// paused), draw, pacing
    pub fn step(&mut self) {
        let started = Instant::now();

        self.global_keys();
        self.input();
        if let Some(name) = self.ctx.take_scene_request()
            && let Err(e) = self.activate(&name)
        {
            log::error!("Scene switch failed: {e}");
        }
        if !self.ctx.paused {
            let dt = self.ctx.time.delta_secs() * self.ctx.config.time_scale;
            self.update(dt);
            self.ctx.debug.stats.record_update();
        }
        self.draw();
        self.ctx.input.end_frame();
        self.iterations += 1;

        if !self.ctx.config.test_mode {
            let budget = self.ctx.config.frame_budget();
            let spent = started.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }
        let delta = self.ctx.time.tick();
        self.ctx.debug.stats.record_frame(delta);
    }

    fn global_keys(&mut self) {
        if self.ctx.input.is_key_just_pressed(KeyCode::Escape) {
            log::info!("Escape pressed, shutting down");
            self.ctx.quit();
        }
        if self.ctx.input.is_key_just_pressed(KeyCode::KeyP) {
            self.ctx.toggle_pause();
        }
        if self.ctx.input.ctrl() && self.ctx.input.is_key_just_pressed(KeyCode::KeyD) {
            let level = self.ctx.debug.cycle();
            log::debug!("Debug level {level}");
        }
    }

    fn input(&mut self) {
        let Self { ctx, physics, renderer, scenes, .. } = self;
        scenes.input(ctx, physics, renderer);
        if let Some(entities) = scenes.active_entities_mut() {
            for entity in entities.iter_mut().filter(|e| e.active) {
                dispatch_input(ctx, entity);
            }
        }
    }

    /// Advance the live scene by `dt` (scaled) time units
    ///
    /// Physics runs first, then lifetimes, the camera and the scene's own
    /// update hook.
    pub fn update(&mut self, dt: f64) {
        let Self { ctx, physics, renderer, scenes, .. } = self;
        if let Some(entities) = scenes.active_entities_mut() {
            physics.update(ctx, entities, dt);
            for entity in entities.iter_mut().filter(|e| e.active) {
                entity.tick_life(dt);
            }
            if let Some(camera) = renderer.camera_mut() {
                camera.update(dt, entities);
            }
        }
        scenes.update(ctx, physics, renderer, dt);
    }

    /// Draw the live scene and present the frame
    pub fn draw(&mut self) -> &FrameReport {
        let stats = self.ctx.debug.stats.to_map();
        let report = match self.scenes.active_entities_mut() {
            Some(entities) => self.renderer.draw(&self.ctx, entities, &stats),
            None => self.renderer.draw(&self.ctx, &mut EntityStore::new(), &stats),
        };
        self.presenter
            .present(self.renderer.surface().buffer(), self.ctx.config.scale);
        self.last_report = report;
        &self.last_report
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn physics(&self) -> &PhysicsEngine {
        &self.physics
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Loop iterations run so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Report of the last drawn frame
    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    /// Measured duration of the previous iteration
    pub fn frame_time(&self) -> Duration {
        self.ctx.time.delta()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("ctx", &self.ctx)
            .field("scenes", &self.scenes)
            .field("renderer", &self.renderer)
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

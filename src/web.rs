//! Browser binding
//!
//! The JS host owns the renderer. It hands in a scene object exposing
//! `createNode(primitive, color, x, y, z) -> number`,
//! `setPosition(handle, x, y, z)` and `removeNode(handle)`, forwards
//! keyboard events and calls `frame()` from its animation-frame callback.

use glam::Vec3;
use js_sys::{Array, Function, JSON, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::config::{Difficulty, GameConfig};
use crate::sandbox::{self, SandboxControls, SandboxState};
use crate::scene::{
    Color, NodeHandle, Primitive, SceneGraph, SceneSync, breakout_drawables, sandbox_drawables,
};
use crate::sim::{GamePhase, GameState, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("arcade3d loaded");
}

/// [`SceneGraph`] backed by JS callbacks
struct JsScene {
    target: JsValue,
    create_node: Function,
    set_position: Function,
    remove_node: Function,
}

impl JsScene {
    fn new(target: JsValue) -> Result<Self, JsValue> {
        let method = |name: &str| -> Result<Function, JsValue> {
            Reflect::get(&target, &JsValue::from_str(name))?
                .dyn_into::<Function>()
                .map_err(|_| JsValue::from_str(&format!("scene.{name} is not a function")))
        };
        Ok(Self {
            create_node: method("createNode")?,
            set_position: method("setPosition")?,
            remove_node: method("removeNode")?,
            target,
        })
    }
}

impl SceneGraph for JsScene {
    fn create_node(&mut self, primitive: &Primitive, color: Color, position: Vec3) -> NodeHandle {
        let primitive = serde_json::to_string(primitive)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|json| JSON::parse(&json))
            .unwrap_or(JsValue::NULL);
        let color: Array = color.iter().map(|c| JsValue::from_f64(*c as f64)).collect();

        let args = Array::of5(
            &primitive,
            &color,
            &position.x.into(),
            &position.y.into(),
            &position.z.into(),
        );
        match self.create_node.apply(&self.target, &args) {
            Ok(handle) => handle.as_f64().unwrap_or_default() as NodeHandle,
            Err(e) => {
                log::error!("createNode failed: {:?}", e);
                NodeHandle::MAX
            }
        }
    }

    fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        let args = Array::of4(
            &handle.into(),
            &position.x.into(),
            &position.y.into(),
            &position.z.into(),
        );
        if let Err(e) = self.set_position.apply(&self.target, &args) {
            log::warn!("setPosition({}) failed: {:?}", handle, e);
        }
    }

    fn remove_node(&mut self, handle: NodeHandle) {
        if let Err(e) = self.remove_node.call1(&self.target, &handle.into()) {
            log::warn!("removeNode({}) failed: {:?}", handle, e);
        }
    }
}

fn parse_config(level: f32, config_json: Option<String>) -> GameConfig {
    let difficulty = Difficulty::from_level(level);
    match config_json {
        Some(json) => match GameConfig::from_json(&json) {
            Ok(config) => GameConfig { difficulty, ..config },
            Err(e) => {
                log::warn!("Ignoring config ({}), using defaults", e);
                GameConfig::with_difficulty(difficulty)
            }
        },
        None => GameConfig::with_difficulty(difficulty),
    }
}

/// Breakout instance driven by the JS host
#[wasm_bindgen]
pub struct WebBreakout {
    state: GameState,
    config: GameConfig,
    input: TickInput,
    scene: JsScene,
    sync: SceneSync,
}

#[wasm_bindgen]
impl WebBreakout {
    #[wasm_bindgen(constructor)]
    pub fn new(scene: JsValue, level: f32, seed: f64, config_json: Option<String>) -> Result<WebBreakout, JsValue> {
        let scene = JsScene::new(scene)?;
        let config = parse_config(level, config_json);
        let mut game = Self {
            state: GameState::new(config.clone(), seed as u64),
            config,
            input: TickInput::default(),
            scene,
            sync: SceneSync::new(),
        };
        game.sync.sync(&mut game.scene, &breakout_drawables(&game.state));
        Ok(game)
    }

    /// Start over with a new difficulty level, keeping the config overrides
    pub fn restart(&mut self, level: f32, seed: f64) {
        self.config.difficulty = Difficulty::from_level(level);
        self.sync.clear(&mut self.scene);
        self.state = GameState::new(self.config.clone(), seed as u64);
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..Default::default()
        };
        self.sync.sync(&mut self.scene, &breakout_drawables(&self.state));
    }

    pub fn key_down(&mut self, event: &KeyboardEvent) {
        match event.key().as_str() {
            "Enter" => self.input.launch = true,
            " " => self.input.pause = true,
            "ArrowLeft" => self.input.move_left = true,
            "ArrowRight" => self.input.move_right = true,
            _ => return,
        }
        event.prevent_default();
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) {
        match event.key().as_str() {
            "ArrowLeft" => self.input.move_left = false,
            "ArrowRight" => self.input.move_right = false,
            _ => {}
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    /// Run one tick and push the changes to the scene
    pub fn frame(&mut self) {
        tick(&mut self.state, &self.input);
        // One-shot inputs
        self.input.launch = false;
        self.input.pause = false;

        self.sync.sync(&mut self.scene, &breakout_drawables(&self.state));
    }

    pub fn points(&self) -> u32 {
        self.state.points
    }

    pub fn charges(&self) -> u32 {
        self.state.charges
    }

    pub fn alive(&self) -> bool {
        self.state.alive
    }

    pub fn victory(&self) -> bool {
        self.state.victory
    }

    pub fn paused(&self) -> bool {
        self.state.phase() == GamePhase::Paused
    }

    pub fn remaining_bricks(&self) -> usize {
        self.state.remaining_bricks()
    }

    /// Seconds left on the countdown, `undefined` when the tier has none
    pub fn remaining_time(&self) -> Option<f32> {
        self.state.remaining_time_secs()
    }

    pub fn dispose(&mut self) {
        self.sync.clear(&mut self.scene);
    }
}

/// Robot sandbox instance driven by the JS host
#[wasm_bindgen]
pub struct WebSandbox {
    state: SandboxState,
    controls: SandboxControls,
    scene: JsScene,
    sync: SceneSync,
}

#[wasm_bindgen]
impl WebSandbox {
    #[wasm_bindgen(constructor)]
    pub fn new(scene: JsValue, seed: f64) -> Result<WebSandbox, JsValue> {
        let mut sandbox = Self {
            state: SandboxState::new(seed as u64),
            controls: SandboxControls::default(),
            scene: JsScene::new(scene)?,
            sync: SceneSync::new(),
        };
        sandbox.sync.sync(&mut sandbox.scene, &sandbox_drawables(&sandbox.state));
        Ok(sandbox)
    }

    /// GUI slider values; clamped by the robot
    pub fn set_controls(&mut self, head_rotation: f32, body_rotation: f32, leg_scale: f32) {
        self.controls = SandboxControls {
            head_rotation,
            body_rotation,
            leg_scale,
        };
    }

    /// Advance by `dt_ms` milliseconds and push the changes to the scene
    pub fn frame(&mut self, dt_ms: f64) {
        let dt = (dt_ms / 1000.0).min(0.1) as f32;
        sandbox::tick(&mut self.state, &self.controls, dt);
        self.sync.sync(&mut self.scene, &sandbox_drawables(&self.state));
    }

    pub fn energy(&self) -> i32 {
        self.state.robot.energy()
    }

    pub fn points(&self) -> u32 {
        self.state.robot.points()
    }

    pub fn is_dead(&self) -> bool {
        self.state.robot.is_dead()
    }

    pub fn head_rotation(&self) -> f32 {
        self.state.robot.head_rotation()
    }

    pub fn body_rotation(&self) -> f32 {
        self.state.robot.body_rotation()
    }

    pub fn leg_scale(&self) -> f32 {
        self.state.robot.leg_scale()
    }

    pub fn dispose(&mut self) {
        self.sync.clear(&mut self.scene);
    }
}

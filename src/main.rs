//! arcade3d entry point
//!
//! Native: runs a demo headless against an in-memory scene and logs the
//! outcome. Usage: `arcade3d [breakout|sandbox] [difficulty] [seed] [config.json]`.
//! Web: the library's `start` hook sets up logging; the JS host drives
//! `WebBreakout` / `WebSandbox`.

#[cfg(not(target_arch = "wasm32"))]
use arcade3d::{
    Difficulty, GameConfig,
    sandbox::{self, SandboxControls, SandboxState},
    scene::{RecordingScene, SceneSync, breakout_drawables, sandbox_drawables},
    sim::{GameState, TickInput, tick},
};

#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let demo = args.first().map(String::as_str).unwrap_or("breakout");
    let difficulty = args
        .get(1)
        .map(|s| {
            s.parse::<Difficulty>().unwrap_or_else(|e| {
                log::warn!("{}, falling back to Easy", e);
                Difficulty::Easy
            })
        })
        .unwrap_or_default();
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);

    let config = match args.get(3) {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => GameConfig { difficulty, ..config },
            Err(e) => {
                log::warn!("Could not load {}: {}, using defaults", path, e);
                GameConfig::with_difficulty(difficulty)
            }
        },
        None => GameConfig::with_difficulty(difficulty),
    };

    log::info!("arcade3d (native) starting {} demo, seed {}", demo, seed);
    match demo {
        "sandbox" => run_sandbox(seed),
        "breakout" => run_breakout(config, seed),
        other => log::error!("Unknown demo `{}` (expected breakout or sandbox)", other),
    }
}

/// Let the autopilot play until the game ends or the tick budget runs out
#[cfg(not(target_arch = "wasm32"))]
fn run_breakout(config: GameConfig, seed: u64) {
    let mut state = GameState::new(config, seed);
    let mut scene = RecordingScene::new();
    let mut sync = SceneSync::new();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while !state.is_terminal() && state.time_ticks < MAX_TICKS {
        tick(&mut state, &input);
        sync.sync(&mut scene, &breakout_drawables(&state));
    }

    log::info!(
        "Breakout finished: {:?} after {} ticks, {} points, {} bricks left",
        state.phase(),
        state.time_ticks,
        state.points,
        state.remaining_bricks()
    );
    log::info!(
        "Scene: {} nodes ({} created, {} moves, {} removed)",
        scene.len(),
        scene.created,
        scene.moved,
        scene.removed
    );
}

/// Sweep the robot's joints for a fixed time at 60 fps
#[cfg(not(target_arch = "wasm32"))]
fn run_sandbox(seed: u64) {
    let mut state = SandboxState::new(seed);
    let mut scene = RecordingScene::new();
    let mut sync = SceneSync::new();
    let dt = 1.0 / 60.0;

    for frame in 0..MAX_TICKS {
        let phase = frame as f32 * dt;
        let controls = SandboxControls {
            head_rotation: (phase * 0.7).sin() * 80.0,
            body_rotation: (phase * 0.3).sin() * 40.0 - 7.5,
            leg_scale: 1.1 + (phase * 0.5).sin() * 0.1,
        };
        sandbox::tick(&mut state, &controls, dt);
        sync.sync(&mut scene, &sandbox_drawables(&state));
        if state.robot.is_dead() {
            break;
        }
    }

    log::info!(
        "Sandbox finished after {} ticks: energy {}, {} points{}",
        state.time_ticks,
        state.robot.energy(),
        state.robot.points(),
        if state.robot.is_dead() { " (robot dead)" } else { "" }
    );
    log::info!("Scene: {} nodes", scene.len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is `arcade3d::web::start`
}

//! Robot-control sandbox
//!
//! The player poses a jointed robot while good and bad ovos fly across the
//! ground. Touching a good one earns points and energy, a bad one drains
//! energy. Same determinism rules as the breakout sim: seeded RNG, one
//! `tick` per frame, insertion-ordered iteration.

pub mod energy_bar;
pub mod ovo;
pub mod robot;

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::state::EntityId;
pub use energy_bar::{EnergyBand, EnergyBar};
pub use ovo::{Ovo, OvoKind};
pub use robot::Robot;

/// Ovo slots for a whole session
pub const MAX_OVO: usize = 20;
/// Share of slots holding good ovos
pub const GOOD_OVO_RATIO: f32 = 0.2;
/// One spawn roll in this many succeeds
pub const SPAWN_ODDS: u32 = 9;
/// Energy lost to a bad ovo
pub const OVO_DAMAGE: i32 = 10;
/// Points plus energy granted by a good ovo
pub const OVO_REWARD: u32 = 5;

/// Joint poses requested by the GUI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SandboxControls {
    pub head_rotation: f32,
    pub body_rotation: f32,
    pub leg_scale: f32,
}

impl Default for SandboxControls {
    fn default() -> Self {
        Self {
            head_rotation: 0.0,
            body_rotation: 0.0,
            leg_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SandboxEvent {
    OvoSpawned { id: EntityId, kind: OvoKind },
    OvoHit { id: EntityId, kind: OvoKind, points: u32, energy: i32 },
    RobotDied { points: u32 },
}

#[derive(Debug, Clone)]
pub struct SandboxState {
    pub seed: u64,
    pub robot: Robot,
    /// Spawned ovos in slot order
    pub ovos: Vec<Ovo>,
    /// Kind assigned to each slot up front
    pub plan: [OvoKind; MAX_OVO],
    pub time_ticks: u64,
    pub events: Vec<SandboxEvent>,
    pub(crate) rng: Pcg32,
    next_id: EntityId,
}

impl SandboxState {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut plan = [OvoKind::Bad; MAX_OVO];
        let good = (MAX_OVO as f32 * GOOD_OVO_RATIO).floor() as usize;
        for slot in index::sample(&mut rng, MAX_OVO, good).iter() {
            plan[slot] = OvoKind::Good;
        }

        log::info!("New sandbox (seed {}): {} good ovos of {}", seed, good, MAX_OVO);

        Self {
            seed,
            robot: Robot::new(1),
            ovos: Vec::with_capacity(MAX_OVO),
            plan,
            time_ticks: 0,
            events: Vec::new(),
            rng,
            next_id: 2,
        }
    }

    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bar to display, if the robot still has energy
    pub fn energy_bar(&self) -> Option<EnergyBar> {
        EnergyBar::for_energy(self.robot.energy())
    }

    /// Spawn the ovo for the next free slot, if any
    pub fn spawn_ovo(&mut self) -> Option<EntityId> {
        let slot = self.ovos.len();
        let kind = *self.plan.get(slot)?;
        let id = self.next_entity_id();
        let ovo = Ovo::new(id, kind, &mut self.rng);
        log::debug!("Spawned {:?} ovo {} at z={}", kind, id, ovo.position.z);
        self.ovos.push(ovo);
        self.events.push(SandboxEvent::OvoSpawned { id, kind });
        Some(id)
    }
}

/// Advance the sandbox by one frame of `dt` seconds
pub fn tick(state: &mut SandboxState, controls: &SandboxControls, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    state.robot.set_head_rotation(controls.head_rotation);
    state.robot.set_body_rotation(controls.body_rotation);
    state.robot.set_leg_scale(controls.leg_scale);

    if state.ovos.len() < MAX_OVO && state.rng.random_range(0..SPAWN_ODDS) == 0 {
        state.spawn_ovo();
    }

    for ovo in &mut state.ovos {
        ovo.advance(dt, &mut state.rng);
    }

    if !state.robot.is_dead() {
        resolve_hits(state);
    }
}

fn resolve_hits(state: &mut SandboxState) {
    let robot_box = state.robot.collider();

    for ovo in state.ovos.iter_mut().filter(|o| o.enabled) {
        if !ovo.collider().intersects(&robot_box) {
            continue;
        }
        ovo.enabled = false;

        let was_dead = state.robot.is_dead();
        let (points, energy) = match ovo.kind {
            OvoKind::Bad => {
                state.robot.subtract_energy(OVO_DAMAGE);
                (0, -OVO_DAMAGE)
            }
            OvoKind::Good => {
                let points = state.rng.random_range(0..=OVO_REWARD);
                let energy = (OVO_REWARD - points) as i32;
                state.robot.add_points(points);
                state.robot.add_energy(energy);
                (points, energy)
            }
        };
        state.events.push(SandboxEvent::OvoHit {
            id: ovo.id,
            kind: ovo.kind,
            points,
            energy,
        });

        if !was_dead && state.robot.is_dead() {
            state.events.push(SandboxEvent::RobotDied {
                points: state.robot.points(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Put an ovo right on the robot, never moving (dt = 0)
    fn ovo_on_robot(state: &mut SandboxState, kind: OvoKind) -> EntityId {
        let id = state.next_entity_id();
        let mut ovo = Ovo::new(id, kind, &mut state.rng);
        ovo.position = Vec3::new(-100.0, 5.0, 0.0);
        state.ovos.push(ovo);
        id
    }

    #[test]
    fn test_plan_has_four_good_slots() {
        for seed in 0..20 {
            let state = SandboxState::new(seed);
            let good = state.plan.iter().filter(|k| **k == OvoKind::Good).count();
            assert_eq!(good, 4);
        }
    }

    #[test]
    fn test_spawning_stops_at_max() {
        let mut state = SandboxState::new(3);
        for _ in 0..2000 {
            tick(&mut state, &SandboxControls::default(), 1.0 / 60.0);
        }
        assert_eq!(state.ovos.len(), MAX_OVO);
        for (slot, ovo) in state.ovos.iter().enumerate() {
            assert_eq!(ovo.kind, state.plan[slot]);
        }
        assert_eq!(state.spawn_ovo(), None);
    }

    #[test]
    fn test_controls_are_clamped() {
        let mut state = SandboxState::new(1);
        let controls = SandboxControls {
            head_rotation: 95.0,
            body_rotation: -60.0,
            leg_scale: 2.0,
        };
        tick(&mut state, &controls, 0.0);
        assert_eq!(state.robot.head_rotation(), 80.0);
        assert_eq!(state.robot.body_rotation(), -45.0);
        assert_eq!(state.robot.leg_scale(), 1.2);
    }

    #[test]
    fn test_bad_ovo_drains_energy_once() {
        let mut state = SandboxState::new(1);
        let id = ovo_on_robot(&mut state, OvoKind::Bad);

        tick(&mut state, &SandboxControls::default(), 0.0);
        assert_eq!(state.robot.energy(), 90);
        assert!(state.events.contains(&SandboxEvent::OvoHit {
            id,
            kind: OvoKind::Bad,
            points: 0,
            energy: -10
        }));

        tick(&mut state, &SandboxControls::default(), 0.0);
        assert_eq!(state.robot.energy(), 90, "disabled ovo does not hit again");
    }

    #[test]
    fn test_good_ovo_splits_reward() {
        let mut state = SandboxState::new(8);
        state.robot.subtract_energy(70);
        ovo_on_robot(&mut state, OvoKind::Good);

        tick(&mut state, &SandboxControls::default(), 0.0);

        let gained = state.robot.energy() - 30;
        assert!((0..=5).contains(&gained));
        assert_eq!(state.robot.points() as i32 + gained, 5);
        assert_eq!(state.energy_bar().map(|b| b.band), Some(EnergyBand::Medium));
    }

    #[test]
    fn test_dead_robot_ignores_ovos() {
        let mut state = SandboxState::new(1);
        ovo_on_robot(&mut state, OvoKind::Bad);
        for _ in 0..10 {
            state.robot.subtract_energy(OVO_DAMAGE);
        }
        assert!(state.robot.is_dead());
        assert!(state.energy_bar().is_none());

        tick(&mut state, &SandboxControls::default(), 0.0);
        assert!(state.ovos.iter().all(|o| o.enabled));
        assert_eq!(state.robot.energy(), 0);
    }

    #[test]
    fn test_death_event() {
        let mut state = SandboxState::new(1);
        for _ in 0..9 {
            state.robot.subtract_energy(OVO_DAMAGE);
        }
        ovo_on_robot(&mut state, OvoKind::Bad);
        tick(&mut state, &SandboxControls::default(), 0.0);
        assert!(state.robot.is_dead());
        assert!(matches!(state.events.last(), Some(SandboxEvent::RobotDied { .. })));
    }

    #[test]
    fn test_ovo_far_from_robot_is_not_hit() {
        let mut state = SandboxState::new(1);
        let id = state.next_entity_id();
        let mut ovo = Ovo::new(id, OvoKind::Bad, &mut state.rng);
        ovo.position = Vec3::new(-100.0, 5.0, 100.0);
        state.ovos.push(ovo);
        tick(&mut state, &SandboxControls::default(), 0.0);
        assert_eq!(state.robot.energy(), 100);
    }

    #[test]
    fn test_determinism() {
        let mut a = SandboxState::new(77);
        let mut b = SandboxState::new(77);
        for _ in 0..900 {
            tick(&mut a, &SandboxControls::default(), 1.0 / 60.0);
            tick(&mut b, &SandboxControls::default(), 1.0 / 60.0);
        }
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.robot.energy(), b.robot.energy());
        assert_eq!(a.robot.points(), b.robot.points());
        let xs_a: Vec<f32> = a.ovos.iter().map(|o| o.position.x).collect();
        let xs_b: Vec<f32> = b.ovos.iter().map(|o| o.position.x).collect();
        assert_eq!(xs_a, xs_b);
    }
}

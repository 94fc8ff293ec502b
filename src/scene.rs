//! Narrow interface to the external scene graph
//!
//! The simulation never talks to a renderer directly. Each frame the demo
//! state is flattened into a list of [`Drawable`]s and [`SceneSync`] turns
//! the difference against the previous frame into create/move/remove calls
//! on a [`SceneGraph`] implementation.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sandbox::energy_bar::BAR_POSITION;
use crate::sandbox::{OvoKind, SandboxState};
use crate::sim::state::{BrickKind, EntityId, GameState};

pub type NodeHandle = u32;
pub type Color = [f32; 4];

/// Geometric primitives the scene collaborator knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    Torus { radius: f32, tube: f32 },
}

/// Scene collaborator: owns nodes, the crate only positions them
pub trait SceneGraph {
    fn create_node(&mut self, primitive: &Primitive, color: Color, position: Vec3) -> NodeHandle;
    fn set_position(&mut self, handle: NodeHandle, position: Vec3);
    fn remove_node(&mut self, handle: NodeHandle);
}

/// Identity of a drawable across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    /// Scenery and parts without their own entity
    Static(u32),
    Entity(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub key: NodeKey,
    pub primitive: Primitive,
    pub color: Color,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy)]
struct SyncedNode {
    handle: NodeHandle,
    primitive: Primitive,
    color: Color,
    position: Vec3,
}

/// Mirrors a drawable list into a scene graph frame after frame
#[derive(Debug, Default)]
pub struct SceneSync {
    nodes: BTreeMap<NodeKey, SyncedNode>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn handle(&self, key: NodeKey) -> Option<NodeHandle> {
        self.nodes.get(&key).map(|n| n.handle)
    }

    /// Create new nodes, move existing ones and remove the ones that
    /// disappeared. A node whose shape or colour changed is rebuilt.
    pub fn sync<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, drawables: &[Drawable]) {
        let mut seen = BTreeSet::new();

        for drawable in drawables {
            seen.insert(drawable.key);

            if let Some(node) = self.nodes.get_mut(&drawable.key) {
                if node.primitive == drawable.primitive && node.color == drawable.color {
                    if node.position != drawable.position {
                        scene.set_position(node.handle, drawable.position);
                        node.position = drawable.position;
                    }
                    continue;
                }
                scene.remove_node(node.handle);
            }

            let handle = scene.create_node(&drawable.primitive, drawable.color, drawable.position);
            self.nodes.insert(
                drawable.key,
                SyncedNode {
                    handle,
                    primitive: drawable.primitive,
                    color: drawable.color,
                    position: drawable.position,
                },
            );
        }

        let gone: Vec<NodeKey> = self
            .nodes
            .keys()
            .filter(|key| !seen.contains(*key))
            .copied()
            .collect();
        for key in gone {
            if let Some(node) = self.nodes.remove(&key) {
                scene.remove_node(node.handle);
            }
        }
    }

    /// Remove every node this sync created
    pub fn clear<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        for node in std::mem::take(&mut self.nodes).into_values() {
            scene.remove_node(node.handle);
        }
    }
}

/// Colours
mod palette {
    use super::Color;

    pub const FLOOR: Color = [0.25, 0.25, 0.3, 1.0];
    pub const WALL: Color = [0.5, 0.5, 0.55, 1.0];
    pub const PLATFORM: Color = [0.95, 0.95, 0.95, 1.0];
    pub const BALL: Color = [1.0, 0.2, 0.2, 1.0];
    pub const BRICK: Color = [0.2, 0.5, 1.0, 1.0];
    pub const SPECIAL_BRICK: Color = [1.0, 0.84, 0.0, 1.0];
    pub const POWER_UP: Color = [1.0, 0.84, 0.0, 1.0];
    pub const ROBOT: Color = [0.79, 0.8, 0.81, 1.0];
    pub const GOOD_OVO: Color = [0.0, 1.0, 0.0, 1.0];
    pub const BAD_OVO: Color = [1.0, 0.0, 0.0, 1.0];
}

const FLOOR_THICKNESS: f32 = 1.0;
const POWER_UP_TUBE: f32 = 3.0;
const SANDBOX_GROUND: f32 = 300.0;

/// Everything visible in a breakout frame
pub fn breakout_drawables(state: &GameState) -> Vec<Drawable> {
    let mut out = Vec::with_capacity(6 + state.bricks.len() + state.specials.len());

    out.push(Drawable {
        key: NodeKey::Static(0),
        primitive: Primitive::Box {
            size: Vec3::new(state.field.width, FLOOR_THICKNESS, state.field.depth),
        },
        color: palette::FLOOR,
        position: Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, 0.0),
    });
    for (i, wall) in state.field.walls.iter().enumerate() {
        out.push(Drawable {
            key: NodeKey::Static(1 + i as u32),
            primitive: Primitive::Box {
                size: wall.collider.size(),
            },
            color: palette::WALL,
            position: wall.collider.center(),
        });
    }

    out.push(Drawable {
        key: NodeKey::Entity(state.platform.id),
        primitive: Primitive::Box {
            size: state.platform.size(),
        },
        color: palette::PLATFORM,
        position: state.platform.position(),
    });
    out.push(Drawable {
        key: NodeKey::Entity(state.ball.id),
        primitive: Primitive::Sphere {
            radius: state.ball.radius,
        },
        color: palette::BALL,
        position: state.ball.position,
    });

    out.extend(state.alive_bricks().map(|brick| Drawable {
        key: NodeKey::Entity(brick.id),
        primitive: Primitive::Box { size: brick.size },
        color: match brick.kind {
            BrickKind::Normal => palette::BRICK,
            BrickKind::Special => palette::SPECIAL_BRICK,
        },
        position: brick.position,
    }));

    out.extend(state.specials.iter().map(|special| Drawable {
        key: NodeKey::Entity(special.id),
        primitive: Primitive::Torus {
            radius: special.half_extents.x - POWER_UP_TUBE,
            tube: POWER_UP_TUBE,
        },
        color: palette::POWER_UP,
        position: special.position,
    }));

    out
}

/// Everything visible in a sandbox frame
pub fn sandbox_drawables(state: &SandboxState) -> Vec<Drawable> {
    let robot = &state.robot;
    let mut out = Vec::with_capacity(5 + state.ovos.len());

    out.push(Drawable {
        key: NodeKey::Static(0),
        primitive: Primitive::Box {
            size: Vec3::new(SANDBOX_GROUND, FLOOR_THICKNESS, SANDBOX_GROUND),
        },
        color: palette::FLOOR,
        position: Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, 0.0),
    });

    // Legs, body and head stacked on the robot's footprint
    let depth = robot.width / 3.0;
    let mut base = 0.0;
    for (part, height) in [robot.leg_height(), robot.body_height(), robot.head_height()]
        .into_iter()
        .enumerate()
    {
        out.push(Drawable {
            key: NodeKey::Static(10 + part as u32),
            primitive: Primitive::Box {
                size: Vec3::new(depth, height, robot.width),
            },
            color: palette::ROBOT,
            position: robot.position + Vec3::new(0.0, base + height / 2.0, 0.0),
        });
        base += height;
    }

    if let Some(bar) = state.energy_bar() {
        out.push(Drawable {
            key: NodeKey::Static(20),
            primitive: Primitive::Box { size: bar.size() },
            color: bar.band.color(),
            position: BAR_POSITION,
        });
    }

    out.extend(state.ovos.iter().filter(|o| o.enabled).map(|ovo| Drawable {
        key: NodeKey::Entity(ovo.id),
        primitive: Primitive::Sphere { radius: ovo.radius },
        color: match ovo.kind {
            OvoKind::Good => palette::GOOD_OVO,
            OvoKind::Bad => palette::BAD_OVO,
        },
        position: ovo.position,
    }));

    out
}

/// A node as last seen by [`RecordingScene`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedNode {
    pub primitive: Primitive,
    pub color: Color,
    pub position: Vec3,
}

/// In-memory scene for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingScene {
    nodes: BTreeMap<NodeHandle, RecordedNode>,
    next_handle: NodeHandle,
    pub created: usize,
    pub moved: usize,
    pub removed: usize,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&RecordedNode> {
        self.nodes.get(&handle)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeHandle, &RecordedNode)> {
        self.nodes.iter()
    }
}

impl SceneGraph for RecordingScene {
    fn create_node(&mut self, primitive: &Primitive, color: Color, position: Vec3) -> NodeHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.nodes.insert(
            handle,
            RecordedNode {
                primitive: *primitive,
                color,
                position,
            },
        );
        self.created += 1;
        handle
    }

    fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.position = position;
            self.moved += 1;
        } else {
            log::warn!("set_position on unknown node {}", handle);
        }
    }

    fn remove_node(&mut self, handle: NodeHandle) {
        if self.nodes.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            log::warn!("remove_node on unknown node {}", handle);
        }
    }
}

//! CPU reference trail store.
//!
//! Write commands only latch a per-slot input; nothing reaches the node
//! buffer until `dispatch` runs the compute pass for the tick. Reads go
//! through `snapshot`, which is coherent between dispatches.

use glam::Vec3;

use trailburst_core::error::TrailError;
use trailburst_core::trail::{Trail, TrailNode, TrailSnapshot, TrailStore, TrailStoreConfig};

/// What the next compute pass should do with a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Idle,
    Start,
    Update,
    Stop,
}

/// Latched sample for one slot.
#[derive(Debug, Clone, Copy, Default)]
struct TrailInput {
    mode: InputMode,
    position: Vec3,
    direction: Vec3,
    speed: f32,
}

/// Ring-buffer trail store advanced by an explicit `dispatch`.
#[derive(Debug, Clone)]
pub struct RingTrailStore {
    config: TrailStoreConfig,
    node_count: usize,
    trails: Vec<Trail>,
    nodes: Vec<TrailNode>,
    inputs: Vec<TrailInput>,
}

impl RingTrailStore {
    /// Allocate every ring empty. `config` is assumed validated.
    pub fn new(config: TrailStoreConfig) -> Self {
        let node_count = config.node_count();
        Self {
            config,
            node_count,
            trails: vec![Trail::UNSTARTED; config.trail_count],
            nodes: vec![TrailNode::EMPTY; config.total_node_count()],
            inputs: vec![TrailInput::default(); config.trail_count],
        }
    }

    pub fn config(&self) -> &TrailStoreConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }

    /// Read-only view of the rings as of the last `dispatch`.
    pub fn snapshot(&self) -> TrailSnapshot<'_> {
        TrailSnapshot {
            node_count: self.node_count,
            trails: &self.trails,
            nodes: &self.nodes,
        }
    }

    /// Run the compute pass: apply every latched input, stamping new nodes with `now`.
    pub fn dispatch(&mut self, now: f32) {
        for slot in 0..self.inputs.len() {
            let input = self.inputs[slot];
            match input.mode {
                InputMode::Idle | InputMode::Stop => {}
                InputMode::Start => {
                    self.wipe(slot, TrailNode::unwritten_at(input.position));
                    self.write_node(slot, 0, now, &input);
                    self.trails[slot].head_index = 0;
                    self.inputs[slot].mode = InputMode::Update;
                }
                InputMode::Update => {
                    let head = self.trails[slot].head_index;
                    if head < 0 {
                        continue;
                    }
                    let newest = slot * self.node_count + head as usize;
                    let moved = self.nodes[newest].position.distance(input.position);
                    if moved >= self.config.update_distance_min {
                        let local = (head as usize + 1) % self.node_count;
                        self.write_node(slot, local, now, &input);
                        self.trails[slot].head_index = local as i32;
                    }
                }
            }
        }
    }

    fn check_slot(&self, slot: usize) -> Result<(), TrailError> {
        if slot >= self.trails.len() {
            return Err(TrailError::SlotOutOfRange {
                slot,
                trail_count: self.trails.len(),
            });
        }
        Ok(())
    }

    fn latch(&mut self, slot: usize, mode: InputMode, tail: Vec3, velocity: Vec3, inertia_ratio: f32) {
        self.inputs[slot] = TrailInput {
            mode,
            position: tail,
            direction: velocity.normalize_or_zero(),
            speed: velocity.length() * self.config.inertia * inertia_ratio,
        };
    }

    fn write_node(&mut self, slot: usize, local: usize, now: f32, input: &TrailInput) {
        self.nodes[slot * self.node_count + local] = TrailNode {
            time: now,
            position: input.position,
            direction: input.direction,
            speed: input.speed,
        };
    }

    fn wipe(&mut self, slot: usize, fill: TrailNode) {
        let start = slot * self.node_count;
        self.nodes[start..start + self.node_count].fill(fill);
    }
}

impl TrailStore for RingTrailStore {
    fn start_trail(
        &mut self,
        slot: usize,
        tail: Vec3,
        velocity: Vec3,
        inertia_ratio: f32,
    ) -> Result<(), TrailError> {
        self.check_slot(slot)?;
        self.latch(slot, InputMode::Start, tail, velocity, inertia_ratio);
        Ok(())
    }

    fn update_trail(
        &mut self,
        slot: usize,
        tail: Vec3,
        velocity: Vec3,
        inertia_ratio: f32,
    ) -> Result<(), TrailError> {
        self.check_slot(slot)?;
        // A start that has not been dispatched yet still has to reset the ring.
        let mode = match self.inputs[slot].mode {
            InputMode::Start => InputMode::Start,
            _ => InputMode::Update,
        };
        self.latch(slot, mode, tail, velocity, inertia_ratio);
        Ok(())
    }

    fn stop_trail(&mut self, slot: usize) -> Result<(), TrailError> {
        self.check_slot(slot)?;
        self.inputs[slot].mode = InputMode::Stop;
        Ok(())
    }

    fn clear(&mut self) {
        self.trails.fill(Trail::UNSTARTED);
        self.nodes.fill(TrailNode::EMPTY);
        self.inputs.fill(TrailInput::default());
    }

    fn clear_slot(&mut self, slot: usize) -> Result<(), TrailError> {
        self.check_slot(slot)?;
        self.trails[slot] = Trail::UNSTARTED;
        self.wipe(slot, TrailNode::EMPTY);
        self.inputs[slot] = TrailInput::default();
        Ok(())
    }
}

//! Force-directed layout for the thinking canvas.
//!
//! Velocity-Verlet integration in the style of d3-force: every tick applies a
//! link spring, pairwise charge, collision, and centering forces scaled by a
//! decaying energy parameter (`alpha`), then integrates velocities with decay.
//! The host drives one tick per animation frame until the energy falls below
//! `alpha_min`.

use crate::geometry::{Rect, Vec2};
use crate::graph::{GraphModel, GraphNode, NodeIndex};
use grove_core::{LayoutSettings, NodeId, clamp_repel_force};
use std::collections::HashMap;
use std::f32::consts::PI;

/// Energy the engine is reheated to on rebuild or a repel-force change.
const ALPHA_REHEAT: f32 = 1.0;
/// Energy floor applied after a viewport resize.
const ALPHA_RESIZE: f32 = 0.3;

/// Deterministic source for the tiny offsets used to separate coincident
/// points. Same constants as the d3 linear congruential generator.
#[derive(Debug, Clone)]
struct Lcg(u32);

impl Lcg {
    fn next_unit(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0 as f32 / u32::MAX as f32
    }

    fn jiggle(&mut self) -> f32 {
        (self.next_unit() - 0.5) * 1e-6
    }
}

#[derive(Debug)]
pub struct ForceLayoutEngine {
    settings: LayoutSettings,
    model: GraphModel,
    degrees: Vec<usize>,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    generation: u64,
    ticks: u64,
    rng: Lcg,
}

impl ForceLayoutEngine {
    pub fn new(settings: LayoutSettings, viewport: Vec2) -> Self {
        let mut settings = settings;
        settings.repel_force = clamp_repel_force(settings.repel_force);
        Self {
            settings,
            model: GraphModel::new(),
            degrees: Vec::new(),
            center: Vec2::new(viewport.x / 2.0, viewport.y / 2.0),
            alpha: 0.0,
            alpha_target: 0.0,
            running: false,
            generation: 0,
            ticks: 0,
            rng: Lcg(1),
        }
    }

    /// Replace the simulated graph.
    ///
    /// The running simulation is stopped first, all prior state is discarded,
    /// positions are re-seeded and the engine restarts from full energy. The
    /// generation counter changes so work scheduled against the previous
    /// graph can be recognised as stale.
    pub fn rebuild(&mut self, model: GraphModel) {
        self.stop();
        self.generation += 1;
        self.degrees = model.degrees();
        self.model = model;
        self.rng = Lcg(1);
        self.seed_positions();
        self.alpha = ALPHA_REHEAT;
        self.alpha_target = 0.0;
        self.ticks = 0;
        self.running = !self.model.is_empty();
        tracing::debug!(
            "Layout rebuilt: generation {}, {} nodes, {} links",
            self.generation,
            self.model.node_count(),
            self.model.link_count()
        );
    }

    pub fn clear(&mut self) {
        self.rebuild(GraphModel::new());
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resume ticking if there is anything to simulate.
    pub fn restart(&mut self) {
        self.running = !self.model.is_empty();
    }

    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
        self.restart();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn repel_force(&self) -> f32 {
        self.settings.repel_force
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn nodes(&self) -> &[GraphNode] {
        self.model.nodes()
    }

    pub fn position(&self, id: &NodeId) -> Option<Vec2> {
        self.model.get_node(id).map(|node| node.position)
    }

    /// Change the charge multiplier. Values are clamped to the accepted
    /// range and the simulation is reheated so the new balance is found.
    pub fn set_repel_force(&mut self, repel_force: f32) {
        self.settings.repel_force = clamp_repel_force(repel_force);
        self.alpha = ALPHA_REHEAT;
        self.restart();
    }

    /// Move the centering target to the middle of the new viewport.
    pub fn resize(&mut self, viewport: Vec2) {
        self.center = Vec2::new(viewport.x / 2.0, viewport.y / 2.0);
        self.reheat(ALPHA_RESIZE);
    }

    /// Pin a node for dragging and keep the simulation warm while it moves.
    pub fn drag_start(&mut self, id: &NodeId, position: Vec2) -> bool {
        if !self.set_pin(id, Some(position)) {
            return false;
        }
        self.alpha_target = self.settings.drag_alpha_target;
        self.restart();
        true
    }

    pub fn drag_move(&mut self, id: &NodeId, position: Vec2) -> bool {
        self.set_pin(id, Some(position))
    }

    /// Release the pin and let the simulation cool back down.
    pub fn drag_end(&mut self, id: &NodeId) -> bool {
        let released = self.set_pin(id, None);
        if !self.model.nodes().iter().any(GraphNode::is_pinned) {
            self.alpha_target = 0.0;
        }
        released
    }

    fn set_pin(&mut self, id: &NodeId, pin: Option<Vec2>) -> bool {
        let Some(idx) = self.model.index_of(id) else {
            return false;
        };
        let node = &mut self.model.nodes_mut()[idx.0];
        node.pin = pin;
        if let Some(position) = pin {
            node.position = position;
            node.velocity = Vec2::ZERO;
        }
        true
    }

    /// Advance one tick if this frame belongs to the current graph.
    pub fn step_frame(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            tracing::trace!(
                "Ignoring tick for stale layout generation {} (current {})",
                generation,
                self.generation
            );
            return false;
        }
        self.tick()
    }

    /// Run one simulation step. Returns false when the engine is idle.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.settings.alpha_decay;
        let alpha = self.alpha;

        self.apply_link_force(alpha);
        self.apply_charge_force(alpha);
        self.apply_centering();
        self.apply_collision();
        self.apply_positional_pull(alpha);
        self.integrate();

        self.ticks += 1;
        if self.alpha < self.settings.alpha_min {
            self.running = false;
            tracing::debug!("Layout settled after {} ticks", self.ticks);
        }
        true
    }

    /// Tick until the energy runs out or `max_ticks` is reached.
    pub fn run_to_rest(&mut self, max_ticks: u64) -> u64 {
        let mut steps = 0;
        while steps < max_ticks && self.tick() {
            steps += 1;
        }
        steps
    }

    /// Bounding box of every node circle.
    pub fn bounds(&self) -> Option<Rect> {
        if self.model.is_empty() {
            return None;
        }
        let rect = self
            .model
            .nodes()
            .iter()
            .fold(Rect::NOTHING, |acc, node| {
                acc.union(&Rect::from_circle(node.position, node.radius))
            });
        rect.is_valid().then_some(rect)
    }

    /// Phyllotaxis spiral around the viewport center. Only depends on the
    /// node index, so re-seeding an unchanged graph is reproducible.
    fn seed_positions(&mut self) {
        let initial_radius = self.settings.initial_radius;
        let golden_angle = PI * (3.0 - 5.0f32.sqrt());
        let center = self.center;
        for (i, node) in self.model.nodes_mut().iter_mut().enumerate() {
            let radius = initial_radius * (0.5 + i as f32).sqrt();
            let angle = i as f32 * golden_angle;
            node.position = Vec2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            node.velocity = Vec2::ZERO;
            node.pin = None;
        }
    }

    fn apply_link_force(&mut self, alpha: f32) {
        let strength = self.settings.link_strength;
        let padding = self.settings.link_padding;
        let endpoints: Vec<(NodeIndex, NodeIndex)> = self
            .model
            .link_indices()
            .filter_map(|idx| self.model.link_endpoints(idx))
            .collect();

        for (src, target) in endpoints {
            if src == target {
                continue;
            }
            let (distance, mut delta) = {
                let nodes = self.model.nodes();
                let (s, t) = (&nodes[src.0], &nodes[target.0]);
                (
                    s.radius + t.radius + padding,
                    (t.position + t.velocity) - (s.position + s.velocity),
                )
            };
            if delta.x == 0.0 {
                delta.x = self.rng.jiggle();
            }
            if delta.y == 0.0 {
                delta.y = self.rng.jiggle();
            }
            let length = delta.length();
            let scale = (length - distance) / length * alpha * strength;
            let delta = delta * scale;

            let ds = self.degrees[src.0] as f32;
            let dt = self.degrees[target.0] as f32;
            let bias = ds / (ds + dt);

            let nodes = self.model.nodes_mut();
            nodes[target.0].velocity -= delta * bias;
            nodes[src.0].velocity += delta * (1.0 - bias);
        }
    }

    fn apply_charge_force(&mut self, alpha: f32) {
        let repel = self.settings.repel_force;
        let distance_min_sq = self.settings.distance_min * self.settings.distance_min;
        let count = self.model.node_count();
        if count < 2 {
            return;
        }

        let positions: Vec<Vec2> = self.model.nodes().iter().map(|n| n.position).collect();
        let strengths: Vec<f32> = self
            .model
            .nodes()
            .iter()
            .map(|n| -n.radius * repel)
            .collect();
        let mut impulses = vec![Vec2::ZERO; count];

        for i in 0..count {
            for j in (i + 1)..count {
                let mut delta = positions[j] - positions[i];
                if delta.x == 0.0 {
                    delta.x = self.rng.jiggle();
                }
                if delta.y == 0.0 {
                    delta.y = self.rng.jiggle();
                }
                let mut l = delta.length_sq();
                if l < distance_min_sq {
                    l = (distance_min_sq * l).sqrt();
                }
                impulses[i] += delta * (strengths[j] * alpha / l);
                impulses[j] -= delta * (strengths[i] * alpha / l);
            }
        }

        for (node, impulse) in self.model.nodes_mut().iter_mut().zip(impulses) {
            node.velocity += impulse;
        }
    }

    /// Translate the whole graph so its mean position sits at the center.
    fn apply_centering(&mut self) {
        let count = self.model.node_count();
        if count == 0 {
            return;
        }
        let sum = self
            .model
            .nodes()
            .iter()
            .fold(Vec2::ZERO, |acc, n| acc + n.position);
        let shift = sum * (1.0 / count as f32) - self.center;
        for node in self.model.nodes_mut() {
            node.position -= shift;
        }
    }

    /// Weak per-axis pull towards the center so disconnected parts don't
    /// drift apart.
    fn apply_positional_pull(&mut self, alpha: f32) {
        let strength = self.settings.center_strength * alpha;
        let center = self.center;
        for node in self.model.nodes_mut() {
            node.velocity += (center - node.position) * strength;
        }
    }

    /// Push overlapping circles apart using their predicted positions.
    /// Candidate pairs come from a uniform grid whose cells are as wide as
    /// the largest collision diameter.
    fn apply_collision(&mut self) {
        let padding = self.settings.collision_padding;
        let count = self.model.node_count();
        if count < 2 {
            return;
        }

        let radii: Vec<f32> = self
            .model
            .nodes()
            .iter()
            .map(|n| n.radius + padding)
            .collect();
        let cell = radii.iter().copied().fold(0.0f32, f32::max) * 2.0;
        if cell <= 0.0 {
            return;
        }

        for _ in 0..self.settings.collision_iterations {
            let predicted: Vec<Vec2> = self
                .model
                .nodes()
                .iter()
                .map(|n| n.position + n.velocity)
                .collect();

            let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::with_capacity(count);
            let cell_of = |p: Vec2| ((p.x / cell).floor() as i32, (p.y / cell).floor() as i32);
            for (i, p) in predicted.iter().enumerate() {
                grid.entry(cell_of(*p)).or_default().push(i);
            }

            let mut impulses = vec![Vec2::ZERO; count];
            for i in 0..count {
                let (gx, gy) = cell_of(predicted[i]);
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        let Some(bucket) = grid.get(&(gx + dx, gy + dy)) else {
                            continue;
                        };
                        for &j in bucket {
                            if j <= i {
                                continue;
                            }
                            let (ri, rj) = (radii[i], radii[j]);
                            let r = ri + rj;
                            let mut delta = predicted[i] - predicted[j];
                            let mut l = delta.length_sq();
                            if l >= r * r {
                                continue;
                            }
                            if delta.x == 0.0 {
                                delta.x = self.rng.jiggle();
                                l += delta.x * delta.x;
                            }
                            if delta.y == 0.0 {
                                delta.y = self.rng.jiggle();
                                l += delta.y * delta.y;
                            }
                            let l = l.sqrt();
                            let push = delta * ((r - l) / l);
                            let (ri2, rj2) = (ri * ri, rj * rj);
                            let share = rj2 / (ri2 + rj2);
                            impulses[i] += push * share;
                            impulses[j] -= push * (1.0 - share);
                        }
                    }
                }
            }

            for (node, impulse) in self.model.nodes_mut().iter_mut().zip(impulses) {
                node.velocity += impulse;
            }
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.settings.velocity_decay;
        for node in self.model.nodes_mut() {
            match node.pin {
                Some(pin) => {
                    node.position = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity = node.velocity * keep;
                    node.position += node.velocity;
                }
            }
        }
    }
}

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::sync::Arc;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::assets::PlanetObject;
use super::color::Rgb;
use super::engine::{
	CameraControls, ForceParameter, GraphStyle, LinkHoverCallback, NodeHoverCallback, RenderEngine,
};
use super::view_model::{ViewModel, VisualEdge, VisualNode};

pub const NODE_RADIUS: f64 = 5.0;
/// World units per unit of planet scale.
pub const PLANET_UNIT: f64 = 3.0;
pub const HIT_SLOP: f64 = 2.0;
/// Screen-space distance within which a link counts as hovered.
pub const LINK_HIT_PX: f64 = 4.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Spring stiffness times link distance; 7 / 140 gives the stock 0.05.
const SPRING_REFERENCE: f64 = 7.0;
const ALPHA_MIN: f64 = 0.001;
const ALPHA_DECAY: f64 = 0.0228;
const DRAG_ALPHA: f64 = 0.3;
/// Orbit angle per second at auto-rotate speed 1.0: one turn a minute.
const ORBIT_RATE: f64 = 2.0 * PI / 60.0;
const SEED_RADIUS: f64 = 100.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub node: Arc<VisualNode>,
	pub color: Rgb,
	pub radius: f64,
	pub label: String,
	pub object: Option<PlanetObject>,
}

#[derive(Clone, Debug)]
pub struct LinkInfo {
	pub edge: Arc<VisualEdge>,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: String,
	pub particle_color: Rgb,
	pub width: f64,
	pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSettings {
	pub charge_strength: f64,
	pub link_distance: f64,
	pub velocity_decay: f64,
}

impl Default for ForceSettings {
	fn default() -> Self {
		Self {
			charge_strength: -150.0,
			link_distance: 140.0,
			velocity_decay: 0.1,
		}
	}
}

impl ForceSettings {
	pub fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: (-self.charge_strength).max(0.0) as f32,
			force_spring: (SPRING_REFERENCE / self.link_distance.max(1.0)) as f32,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: (1.0 - self.velocity_decay).clamp(0.0, 1.0) as f32,
		}
	}
}

/// Screen position `(x, y)` of the graph point `(fx, fy)`, zoom `k` and orbit
/// `angle` around that point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
	pub angle: f64,
	pub fx: f64,
	pub fy: f64,
}

impl ViewTransform {
	fn toward(&self, to: &ViewTransform, t: f64) -> ViewTransform {
		let lerp = |a: f64, b: f64| a + (b - a) * t;
		ViewTransform {
			x: lerp(self.x, to.x),
			y: lerp(self.y, to.y),
			k: lerp(self.k, to.k),
			angle: self.angle,
			fx: lerp(self.fx, to.fx),
			fy: lerp(self.fy, to.fy),
		}
	}
}

#[derive(Clone, Debug)]
struct FitAnimation {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub offset_x: f64,
	pub offset_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTarget {
	Node(DefaultNodeIdx),
	/// Position in the link list.
	Link(usize),
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub target: Option<HoverTarget>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_target: Option<HoverTarget>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Scene behind the planet graph canvas: the force simulation, the camera and
/// pointer interaction.
pub struct SceneState {
	pub(super) graph: ForceGraph<NodeInfo, ()>,
	pub(super) links: Vec<LinkInfo>,
	forces: ForceSettings,
	forces_dirty: bool,
	alpha: f64,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub camera: CameraControls,
	fit: Option<FitAnimation>,
	pub pointer: Option<(f64, f64)>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	node_hover: Option<NodeHoverCallback>,
	link_hover: Option<LinkHoverCallback>,
}

impl SceneState {
	pub fn new(width: f64, height: f64) -> Self {
		let forces = ForceSettings::default();
		Self {
			graph: ForceGraph::new(forces.parameters()),
			links: Vec::new(),
			forces,
			forces_dirty: false,
			alpha: 1.0,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
				..Default::default()
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			camera: CameraControls::default(),
			fit: None,
			pointer: None,
			width,
			height,
			flow_time: 0.0,
			node_hover: None,
			link_hover: None,
		}
	}

	pub fn on_node_hover(&mut self, callback: impl FnMut(Option<Arc<VisualNode>>) + 'static) {
		self.node_hover = Some(Box::new(callback));
	}

	pub fn on_link_hover(&mut self, callback: impl FnMut(Option<Arc<VisualEdge>>) + 'static) {
		self.link_hover = Some(Box::new(callback));
	}

	/// Replaces the scene contents. Nodes whose id survives keep their position.
	pub fn set_data<S: GraphStyle + ?Sized>(&mut self, view: &ViewModel, style: &S) {
		let mut previous = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.node.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let mut graph = ForceGraph::new(self.forces.parameters());
		let mut id_to_idx = HashMap::with_capacity(view.nodes.len());
		let count = view.nodes.len().max(1) as f64;

		for (i, node) in view.nodes.iter().enumerate() {
			let (x, y, is_anchor) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / count;
				(
					(SEED_RADIUS * angle.cos()) as f32,
					(SEED_RADIUS * angle.sin()) as f32,
					false,
				)
			});
			let object = style.node_object(node);
			let radius = match &object {
				Some(object) => object.scale * object.geometry.sphere.radius * PLANET_UNIT,
				None => NODE_RADIUS * style.node_size(node).max(1.0).cbrt(),
			};

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					node: Arc::clone(node),
					color: style.node_color(node),
					radius,
					label: style.node_label(node),
					object,
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut links = Vec::with_capacity(view.edges.len());
		for edge in &view.edges {
			if let (Some(&source), Some(&target)) = (
				id_to_idx.get(edge.source.id.as_str()),
				id_to_idx.get(edge.target.id.as_str()),
			) {
				graph.add_edge(source, target, EdgeData::default());
				links.push(LinkInfo {
					edge: Arc::clone(edge),
					source,
					target,
					color: style.link_color(edge),
					particle_color: style.link_particle_color(edge),
					width: style.link_width(edge),
					label: style.link_label(edge),
				});
			}
		}

		debug!(
			"scene loaded {} nodes, {} links",
			view.nodes.len(),
			links.len()
		);
		self.graph = graph;
		self.links = links;
		self.forces_dirty = false;
		self.hover = HoverState::default();
		self.drag = DragState::default();
		self.alpha = 1.0;
	}

	/// Rebuilds the simulation with the current force settings, keeping every
	/// node where it is.
	fn rebuild_simulation(&mut self) {
		let mut graph = ForceGraph::new(self.forces.parameters());
		let mut remap = HashMap::new();
		self.graph.visit_nodes(|node| {
			let idx = graph.add_node(NodeData {
				x: node.x(),
				y: node.y(),
				mass: node.data.mass,
				is_anchor: node.data.is_anchor,
				user_data: node.data.user_data.clone(),
			});
			remap.insert(node.index(), idx);
		});

		let moved = |idx: DefaultNodeIdx| remap.get(&idx).copied().unwrap_or(idx);
		for link in &mut self.links {
			link.source = moved(link.source);
			link.target = moved(link.target);
			graph.add_edge(link.source, link.target, EdgeData::default());
		}

		let remap_target = |target: Option<HoverTarget>| match target {
			Some(HoverTarget::Node(idx)) => Some(HoverTarget::Node(moved(idx))),
			other => other,
		};
		self.hover.target = remap_target(self.hover.target);
		self.hover.prev_target = remap_target(self.hover.prev_target);
		self.hover.neighbors = self.hover.neighbors.iter().map(|&idx| moved(idx)).collect();
		self.hover.prev_neighbors = self
			.hover
			.prev_neighbors
			.iter()
			.map(|&idx| moved(idx))
			.collect();
		self.drag.node_idx = self.drag.node_idx.map(moved);

		self.graph = graph;
		self.forces_dirty = false;
	}

	pub fn forces(&self) -> ForceSettings {
		self.forces
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}

	pub fn links(&self) -> &[LinkInfo] {
		&self.links
	}

	pub fn is_fitting(&self) -> bool {
		self.fit.is_some()
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		let t = &self.transform;
		let (dx, dy) = ((sx - t.x) / t.k, (sy - t.y) / t.k);
		let (sin, cos) = (-t.angle).sin_cos();
		(t.fx + dx * cos - dy * sin, t.fy + dx * sin + dy * cos)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		let t = &self.transform;
		let (dx, dy) = (gx - t.fx, gy - t.fy);
		let (sin, cos) = t.angle.sin_cos();
		(
			t.x + t.k * (dx * cos - dy * sin),
			t.y + t.k * (dx * sin + dy * cos),
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// radius is world-space, so the hit area scales with zoom like the planet
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_SLOP {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn link_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		let threshold = LINK_HIT_PX / self.transform.k.max(MIN_ZOOM);

		let mut best: Option<(usize, f64)> = None;
		for (i, link) in self.links.iter().enumerate() {
			let (Some(&a), Some(&b)) = (positions.get(&link.source), positions.get(&link.target))
			else {
				continue;
			};
			let distance = distance_to_segment((gx, gy), a, b);
			let limit = threshold.max(link.width / 2.0);
			if distance < limit && best.is_none_or(|(_, d)| distance < d) {
				best = Some((i, distance));
			}
		}
		best.map(|(i, _)| i)
	}

	fn visual_node(&self, idx: DefaultNodeIdx) -> Option<Arc<VisualNode>> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(Arc::clone(&node.data.user_data.node));
			}
		});
		found
	}

	pub fn set_hover(&mut self, target: Option<HoverTarget>) {
		if self.hover.target == target {
			return;
		}
		let previous = self.hover.target;
		let was_hovering = previous.is_some();

		// Save previous state for fade-out
		if was_hovering && target.is_none() {
			self.hover.prev_target = self.hover.target.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_target = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.target = target;
		self.hover.neighbors.clear();

		if let Some(target) = target {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			match target {
				HoverTarget::Node(idx) => {
					for link in &self.links {
						if link.source == idx {
							self.hover.neighbors.insert(link.target);
						} else if link.target == idx {
							self.hover.neighbors.insert(link.source);
						}
					}
				}
				HoverTarget::Link(i) => {
					if let Some(link) = self.links.get(i) {
						self.hover.neighbors.insert(link.source);
						self.hover.neighbors.insert(link.target);
					}
				}
			}
		}

		self.notify_hover(previous, target);
	}

	/// Exits of the old target are reported before the enter of the new one.
	fn notify_hover(&mut self, previous: Option<HoverTarget>, current: Option<HoverTarget>) {
		let node_of = |target: Option<HoverTarget>| match target {
			Some(HoverTarget::Node(idx)) => Some(idx),
			_ => None,
		};
		let link_of = |target: Option<HoverTarget>| match target {
			Some(HoverTarget::Link(i)) => Some(i),
			_ => None,
		};
		let (next_node, next_link) = (node_of(current), link_of(current));

		if node_of(previous).is_some() && next_node.is_none() {
			if let Some(callback) = self.node_hover.as_mut() {
				callback(None);
			}
		}
		if link_of(previous).is_some() && next_link.is_none() {
			if let Some(callback) = self.link_hover.as_mut() {
				callback(None);
			}
		}

		if let Some(idx) = next_node {
			let node = self.visual_node(idx);
			if let Some(callback) = self.node_hover.as_mut() {
				callback(node);
			}
		}
		if let Some(i) = next_link {
			let edge = self.links.get(i).map(|link| Arc::clone(&link.edge));
			if let Some(callback) = self.link_hover.as_mut() {
				callback(edge);
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.is_hovered(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.target == Some(HoverTarget::Node(idx))
			|| self.hover.prev_target == Some(HoverTarget::Node(idx))
	}

	pub fn is_link_highlighted(&self, i: usize) -> bool {
		let target = Some(HoverTarget::Link(i));
		if self.hover.target == target || self.hover.prev_target == target {
			return true;
		}
		self.links
			.get(i)
			.is_some_and(|link| self.is_highlighted(link.source) && self.is_highlighted(link.target))
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.target.is_some() || self.hover.prev_target.is_some()
	}

	/// Label of the hovered element and the pointer position to draw it at.
	pub fn tooltip(&self) -> Option<(String, f64, f64)> {
		let (px, py) = self.pointer?;
		let label = match self.hover.target? {
			HoverTarget::Node(idx) => {
				let mut label = None;
				self.graph.visit_nodes(|node| {
					if node.index() == idx {
						label = Some(node.data.user_data.label.clone());
					}
				});
				label?
			}
			HoverTarget::Link(i) => self.links.get(i)?.label.clone(),
		};
		Some((label, px, py))
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			let (gx, gy) = self.screen_to_graph(x, y);
			let mut origin = (gx, gy);
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					origin = (node.x() as f64, node.y() as f64);
				}
			});
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				offset_x: origin.0 - gx,
				offset_y: origin.1 - gy,
			};
		} else {
			self.fit = None;
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.pointer = Some((x, y));

		// Update hover state when not dragging
		if !self.drag.active {
			let target = self
				.node_at_position(x, y)
				.map(HoverTarget::Node)
				.or_else(|| self.link_at_position(x, y).map(HoverTarget::Link));
			self.set_hover(target);
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (gx, gy) = self.screen_to_graph(x, y);
				let (nx, ny) = (
					(gx + self.drag.offset_x) as f32,
					(gy + self.drag.offset_y) as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.pointer = None;
		self.set_hover(None);
	}

	/// Zooms around the screen point `(x, y)`; positive `delta_y` zooms out.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		self.fit = None;
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Centre of mass and the radius of the circle enclosing every planet.
	pub fn content_bounds(&self) -> Option<(f64, f64, f64)> {
		let mut placed = Vec::new();
		self.graph.visit_nodes(|node| {
			placed.push((
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.radius,
			));
		});
		if placed.is_empty() {
			return None;
		}

		let n = placed.len() as f64;
		let cx = placed.iter().map(|p| p.0).sum::<f64>() / n;
		let cy = placed.iter().map(|p| p.1).sum::<f64>() / n;
		let radius = placed
			.iter()
			.map(|&(x, y, r)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() + r)
			.fold(0.0, f64::max);
		Some((cx, cy, radius))
	}

	pub fn tick(&mut self, dt: f32) {
		if self.forces_dirty {
			self.rebuild_simulation();
		}
		if self.drag.active {
			self.alpha = self.alpha.max(DRAG_ALPHA);
		}
		if self.alpha >= ALPHA_MIN {
			self.graph.update(dt);
			self.alpha *= 1.0 - ALPHA_DECAY;
		}

		let dt = dt as f64;
		self.flow_time += dt;

		if self.camera.auto_rotate {
			self.transform.angle =
				(self.transform.angle + self.camera.auto_rotate_speed * ORBIT_RATE * dt) % (2.0 * PI);
		}

		if let Some(fit) = self.fit.as_mut() {
			fit.elapsed += dt;
			let t = (fit.elapsed / fit.duration).min(1.0);
			let angle = self.transform.angle;
			self.transform = fit.from.toward(&fit.to, ease_out_cubic(t));
			self.transform.angle = angle;
			if t >= 1.0 {
				self.fit = None;
			}
		}

		let (target, delay, speed) = if self.hover.target.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.target.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_target = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl RenderEngine for SceneState {
	fn set_force_parameter(&mut self, parameter: ForceParameter, value: f64) {
		match parameter {
			ForceParameter::ChargeStrength => self.forces.charge_strength = value,
			ForceParameter::LinkDistance => self.forces.link_distance = value,
			ForceParameter::VelocityDecay => self.forces.velocity_decay = value,
		}
		self.forces_dirty = true;
	}

	fn reheat_simulation(&mut self) {
		if self.forces_dirty {
			self.rebuild_simulation();
		}
		self.alpha = 1.0;
	}

	fn camera_controls(&mut self) -> Option<&mut CameraControls> {
		Some(&mut self.camera)
	}

	fn fit_view_to_content(&mut self, duration_ms: f64, padding: f64) {
		let Some((cx, cy, radius)) = self.content_bounds() else {
			return;
		};
		let span = (self.width.min(self.height) / 2.0 - padding).max(1.0);
		let to = ViewTransform {
			x: self.width / 2.0,
			y: self.height / 2.0,
			k: (span / radius.max(1.0)).clamp(MIN_ZOOM, MAX_ZOOM),
			angle: self.transform.angle,
			fx: cx,
			fy: cy,
		};

		if duration_ms <= 0.0 {
			self.transform = to;
			self.fit = None;
		} else {
			self.fit = Some(FitAnimation {
				from: self.transform.clone(),
				to,
				elapsed: 0.0,
				duration: duration_ms / 1000.0,
			});
		}
	}
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let length_sq = abx * abx + aby * aby;
	let t = if length_sq < f64::EPSILON {
		0.0
	} else {
		(((p.0 - a.0) * abx + (p.1 - a.1) * aby) / length_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + abx * t, a.1 + aby * t);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

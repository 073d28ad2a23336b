//! Capability surface of the render engine: the imperative controls the layout
//! tuner drives and the styling accessors evaluated when data is loaded.

use std::sync::Arc;

use super::assets::PlanetObject;
use super::color::Rgb;
use super::view_model::{VisualEdge, VisualNode};

/// Simulation knobs addressable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForceParameter {
	/// Many-body strength; negative values repel.
	ChargeStrength,
	/// Target length of a link.
	LinkDistance,
	/// Fraction of velocity lost per tick.
	VelocityDecay,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraControls {
	pub auto_rotate: bool,
	/// Orbit speed; 1.0 is one revolution per minute.
	pub auto_rotate_speed: f64,
}

pub trait RenderEngine {
	fn set_force_parameter(&mut self, parameter: ForceParameter, value: f64);

	fn reheat_simulation(&mut self);

	/// `None` until the engine has a camera to control.
	fn camera_controls(&mut self) -> Option<&mut CameraControls>;

	fn fit_view_to_content(&mut self, duration_ms: f64, padding: f64);
}

/// Per-element styling, read once for every node and link when data is loaded.
pub trait GraphStyle {
	fn node_color(&self, node: &VisualNode) -> Rgb;
	fn node_size(&self, node: &VisualNode) -> f64;
	fn node_label(&self, node: &VisualNode) -> String;
	fn node_object(&self, node: &VisualNode) -> Option<PlanetObject>;
	fn link_color(&self, edge: &VisualEdge) -> String;
	fn link_width(&self, edge: &VisualEdge) -> f64;
	fn link_label(&self, edge: &VisualEdge) -> String;
	fn link_particle_color(&self, edge: &VisualEdge) -> Rgb;
}

pub type NodeHoverCallback = Box<dyn FnMut(Option<Arc<VisualNode>>)>;
pub type LinkHoverCallback = Box<dyn FnMut(Option<Arc<VisualEdge>>)>;

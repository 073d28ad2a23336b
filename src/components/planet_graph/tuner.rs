use log::debug;

use super::engine::{ForceParameter, RenderEngine};

/// One-shot simulation and camera settings applied after the engine mounts and
/// whenever a new view model is loaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutTuning {
	pub charge_strength: f64,
	pub link_distance: f64,
	pub velocity_decay: f64,
	pub auto_rotate_speed: f64,
	pub fit_duration_ms: f64,
	pub fit_padding: f64,
}

impl Default for LayoutTuning {
	fn default() -> Self {
		Self {
			charge_strength: -120.0,
			link_distance: 140.0,
			velocity_decay: 0.2,
			auto_rotate_speed: 0.6,
			fit_duration_ms: 800.0,
			fit_padding: 100.0,
		}
	}
}

impl LayoutTuning {
	/// No-op while the engine is not available yet.
	pub fn apply<E: RenderEngine + ?Sized>(&self, engine: Option<&mut E>) {
		let Some(engine) = engine else {
			debug!("layout tuning skipped, render engine not ready");
			return;
		};

		engine.set_force_parameter(ForceParameter::ChargeStrength, self.charge_strength);
		engine.set_force_parameter(ForceParameter::LinkDistance, self.link_distance);
		engine.set_force_parameter(ForceParameter::VelocityDecay, self.velocity_decay);
		engine.reheat_simulation();

		if let Some(controls) = engine.camera_controls() {
			controls.auto_rotate = true;
			controls.auto_rotate_speed = self.auto_rotate_speed;
		}

		engine.fit_view_to_content(self.fit_duration_ms, self.fit_padding);
	}

	/// Stops the camera orbit before the view goes away.
	pub fn release<E: RenderEngine + ?Sized>(&self, engine: &mut E) {
		if let Some(controls) = engine.camera_controls() {
			controls.auto_rotate = false;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::planet_graph::engine::CameraControls;

	#[derive(Default)]
	struct RecordingEngine {
		forces: Vec<(ForceParameter, f64)>,
		reheats: usize,
		camera: Option<CameraControls>,
		fits: Vec<(f64, f64)>,
	}

	impl RenderEngine for RecordingEngine {
		fn set_force_parameter(&mut self, parameter: ForceParameter, value: f64) {
			self.forces.push((parameter, value));
		}

		fn reheat_simulation(&mut self) {
			self.reheats += 1;
		}

		fn camera_controls(&mut self) -> Option<&mut CameraControls> {
			self.camera.as_mut()
		}

		fn fit_view_to_content(&mut self, duration_ms: f64, padding: f64) {
			self.fits.push((duration_ms, padding));
		}
	}

	#[test]
	fn applies_tuned_constants() {
		let mut engine = RecordingEngine {
			camera: Some(CameraControls::default()),
			..Default::default()
		};
		LayoutTuning::default().apply(Some(&mut engine));

		assert_eq!(
			engine.forces,
			vec![
				(ForceParameter::ChargeStrength, -120.0),
				(ForceParameter::LinkDistance, 140.0),
				(ForceParameter::VelocityDecay, 0.2),
			]
		);
		assert_eq!(engine.reheats, 1);
		assert_eq!(
			engine.camera,
			Some(CameraControls {
				auto_rotate: true,
				auto_rotate_speed: 0.6,
			})
		);
		assert_eq!(engine.fits, vec![(800.0, 100.0)]);
	}

	#[test]
	fn reapplying_reaches_the_same_state() {
		let mut engine = RecordingEngine {
			camera: Some(CameraControls::default()),
			..Default::default()
		};
		let tuning = LayoutTuning::default();
		tuning.apply(Some(&mut engine));
		let camera = engine.camera;
		tuning.apply(Some(&mut engine));
		assert_eq!(engine.camera, camera);
		assert_eq!(engine.forces[..3], engine.forces[3..]);
	}

	#[test]
	fn missing_engine_or_camera_is_not_an_error() {
		LayoutTuning::default().apply::<RecordingEngine>(None);

		let mut engine = RecordingEngine::default();
		LayoutTuning::default().apply(Some(&mut engine));
		assert_eq!(engine.reheats, 1);
		assert_eq!(engine.fits.len(), 1);
	}

	#[test]
	fn release_stops_rotation() {
		let mut engine = RecordingEngine {
			camera: Some(CameraControls::default()),
			..Default::default()
		};
		let tuning = LayoutTuning::default();
		tuning.apply(Some(&mut engine));
		tuning.release(&mut engine);
		assert_eq!(engine.camera.map(|c| c.auto_rotate), Some(false));
	}
}

//! Pause/resume lifecycle for the animation loop.
//!
//! Three independent booleans — tab visibility, viewport intersection, and
//! the manual toggle — combine by AND into a [`RunState`]. Event sources
//! (visibilitychange, the intersection observer, the keyboard handler) only
//! feed [`LifecycleEvent`]s in; the animation loop asks [`Lifecycle::advance`]
//! once per frame whether to step and whether to draw.
//!
//! Pausing stops simulation time; the last rendered frame stays on the
//! canvas. Resuming continues from current state, never resets. A reset can
//! force exactly one frame through while paused so the respawned field
//! becomes visible.

use log::debug;

use super::field::ParticleField;

/// Whether the per-frame update runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
	Running,
	Paused,
}

/// A discrete input to the lifecycle state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
	/// The document became visible or hidden.
	TabVisible(bool),
	/// The canvas entered or left the viewport.
	InView(bool),
	/// The manual pause key was pressed.
	ToggleManual,
}

/// Lifecycle controller: run-state inputs plus the forced-redraw latch.
#[derive(Clone, Debug)]
pub struct Lifecycle {
	tab_visible: bool,
	in_view: bool,
	manual_paused: bool,
	redraw_requested: bool,
}

impl Lifecycle {
	/// Starts Running: tab visible, in view, not manually paused.
	pub fn new() -> Self {
		Self {
			tab_visible: true,
			in_view: true,
			manual_paused: false,
			redraw_requested: false,
		}
	}

	/// Current run state: Running iff all three inputs allow it.
	pub fn run_state(&self) -> RunState {
		if self.tab_visible && self.in_view && !self.manual_paused {
			RunState::Running
		} else {
			RunState::Paused
		}
	}

	pub fn is_running(&self) -> bool {
		self.run_state() == RunState::Running
	}

	/// Applies one input event. Each event touches only its own flag.
	pub fn apply(&mut self, event: LifecycleEvent) {
		let before = self.run_state();
		match event {
			LifecycleEvent::TabVisible(visible) => self.tab_visible = visible,
			LifecycleEvent::InView(in_view) => self.in_view = in_view,
			LifecycleEvent::ToggleManual => self.manual_paused = !self.manual_paused,
		}
		let after = self.run_state();
		if before != after {
			debug!("sticker-field: {before:?} -> {after:?} on {event:?}");
		}
	}

	/// Requests that the next frame renders even while paused.
	pub fn request_redraw(&mut self) {
		self.redraw_requested = true;
	}

	/// Drives one animation frame. Returns whether the frame should render.
	///
	/// Running: the field steps and the frame renders. Paused: the field is
	/// left untouched, and the frame renders only if a redraw was requested
	/// (consuming the request).
	pub fn advance(
		&mut self,
		field: &mut ParticleField,
		pointer: Option<(f64, f64)>,
		now_ms: f64,
	) -> bool {
		if self.is_running() {
			self.redraw_requested = false;
			field.step(pointer, now_ms);
			true
		} else if self.redraw_requested {
			self.redraw_requested = false;
			true
		} else {
			false
		}
	}
}

impl Default for Lifecycle {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::sticker_field::config::FieldConfig;

	fn field() -> ParticleField {
		ParticleField::new(FieldConfig::default(), 800.0, 600.0, 8, 42)
	}

	#[test]
	fn runs_only_when_all_inputs_allow() {
		let mut lc = Lifecycle::new();
		assert_eq!(lc.run_state(), RunState::Running);

		lc.apply(LifecycleEvent::TabVisible(false));
		assert_eq!(lc.run_state(), RunState::Paused);
		lc.apply(LifecycleEvent::TabVisible(true));
		assert_eq!(lc.run_state(), RunState::Running);

		lc.apply(LifecycleEvent::InView(false));
		assert_eq!(lc.run_state(), RunState::Paused);

		// Inputs are independent: the hidden tab alone keeps it paused.
		lc.apply(LifecycleEvent::TabVisible(false));
		lc.apply(LifecycleEvent::InView(true));
		assert_eq!(lc.run_state(), RunState::Paused);
	}

	#[test]
	fn manual_toggle_flips_only_its_own_flag() {
		let mut lc = Lifecycle::new();
		lc.apply(LifecycleEvent::ToggleManual);
		assert_eq!(lc.run_state(), RunState::Paused);
		lc.apply(LifecycleEvent::ToggleManual);
		assert_eq!(lc.run_state(), RunState::Running);
	}

	#[test]
	fn paused_advance_is_a_no_op() {
		let mut lc = Lifecycle::new();
		let mut f = field();
		lc.apply(LifecycleEvent::InView(false));

		let before = f.particles.clone();
		let time_before = f.field_time();
		for _ in 0..10 {
			assert!(!lc.advance(&mut f, Some((10.0, 10.0)), 0.0));
		}
		assert_eq!(before, f.particles, "paused frames must not touch state");
		assert_eq!(time_before, f.field_time());
	}

	#[test]
	fn running_advance_steps_and_renders() {
		let mut lc = Lifecycle::new();
		let mut f = field();
		assert!(lc.advance(&mut f, None, 0.0));
		assert!(f.field_time() > 0.0);
	}

	#[test]
	fn resume_continues_without_reset() {
		let mut lc = Lifecycle::new();
		let mut f = field();
		lc.advance(&mut f, None, 0.0);
		let time_paused_at = f.field_time();

		lc.apply(LifecycleEvent::ToggleManual);
		lc.advance(&mut f, None, 0.0);
		assert_eq!(f.field_time(), time_paused_at);

		lc.apply(LifecycleEvent::ToggleManual);
		lc.advance(&mut f, None, 0.0);
		assert!(f.field_time() > time_paused_at, "time resumes, not resets");
	}

	#[test]
	fn redraw_request_forces_exactly_one_paused_frame() {
		let mut lc = Lifecycle::new();
		let mut f = field();
		lc.apply(LifecycleEvent::TabVisible(false));

		lc.request_redraw();
		let before = f.particles.clone();
		assert!(lc.advance(&mut f, None, 0.0), "requested frame renders");
		assert_eq!(before, f.particles, "forced frame renders without stepping");
		assert!(!lc.advance(&mut f, None, 0.0), "request is consumed");
	}
}

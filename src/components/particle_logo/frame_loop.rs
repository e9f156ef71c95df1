//! Frame loop and listener bookkeeping.
//!
//! The browser only gives us "call me next frame" and "stop calling me".
//! [`FrameLoop`] makes the stop condition explicit state: every frame
//! checks it before drawing and before asking for another frame, and once
//! stopped it stays stopped. [`ListenerRegistry`] remembers every event
//! listener the component attached so teardown can remove all of them.

use super::error::ParticleError;
use super::pixels::PixelSource;
use super::render::{self, DrawTarget};
use super::state::ParticleField;

/// Lifecycle of the animation loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	/// Created, not yet started. The image may still be loading.
	#[default]
	Idle,
	/// Drawing every frame.
	Running,
	/// Torn down. Terminal.
	Stopped,
}

/// Cancellable repeating frame task.
///
/// `H` is whatever the host uses to cancel a scheduled frame
/// (`requestAnimationFrame` returns an `i32`).
#[derive(Debug, Default)]
pub struct FrameLoop<H = i32> {
	state: LoopState,
	handle: Option<H>,
	frames: u64,
}

impl<H> FrameLoop<H> {
	/// An idle loop with no pending frame.
	pub fn new() -> Self {
		Self {
			state: LoopState::Idle,
			handle: None,
			frames: 0,
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> LoopState {
		self.state
	}

	/// Move from idle to running. Returns `false` if already running or stopped.
	pub fn start(&mut self) -> bool {
		if self.state == LoopState::Idle {
			self.state = LoopState::Running;
			true
		} else {
			false
		}
	}

	/// Whether frames are being drawn.
	pub fn is_running(&self) -> bool {
		self.state == LoopState::Running
	}

	/// Whether another frame may be requested.
	pub fn should_reschedule(&self) -> bool {
		self.is_running()
	}

	/// Record the handle of the frame just requested.
	pub fn scheduled(&mut self, handle: H) {
		self.handle = Some(handle);
	}

	/// The pending frame has fired; forget its handle.
	pub fn take_handle(&mut self) -> Option<H> {
		self.handle.take()
	}

	/// Whether a requested frame has not fired yet.
	pub fn has_pending_frame(&self) -> bool {
		self.handle.is_some()
	}

	/// Frames drawn so far.
	pub fn frames(&self) -> u64 {
		self.frames
	}

	/// Stop for good. Returns the pending frame handle, which the caller
	/// must cancel.
	pub fn stop(&mut self) -> Option<H> {
		self.state = LoopState::Stopped;
		self.handle.take()
	}

	/// The image has loaded: sample it into `field` and start the loop.
	///
	/// The loop starts even when sampling fails. A canvas still measuring
	/// 0x0 yields no particles now, and the next resize fills the running
	/// loop.
	pub fn load_and_start(
		&mut self,
		field: &mut ParticleField,
		source: &impl PixelSource,
	) -> Result<usize, ParticleError> {
		let result = field.load(source);
		self.start();
		result
	}

	/// Run one frame: clear, advance, draw.
	///
	/// Does nothing unless running. Returns whether the caller should
	/// schedule the next frame.
	pub fn run_frame(&mut self, field: &mut ParticleField, target: &mut impl DrawTarget) -> bool {
		if !self.is_running() {
			return false;
		}
		target.clear(field.size());
		field.tick();
		render::draw_particles(field, target);
		self.frames += 1;
		self.should_reschedule()
	}
}

/// What a listener is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerTarget {
	/// The particle canvas.
	Canvas,
	/// The browser window.
	Window,
}

/// A single attached listener.
#[derive(Debug)]
pub struct Registration<C> {
	/// Element the listener is attached to.
	pub target: ListenerTarget,
	/// DOM event name.
	pub event: &'static str,
	/// Handle that keeps the callback alive until removal.
	pub callback: C,
}

/// Every listener the component has attached and not yet removed.
#[derive(Debug)]
pub struct ListenerRegistry<C> {
	registrations: Vec<Registration<C>>,
}

impl<C> Default for ListenerRegistry<C> {
	fn default() -> Self {
		Self {
			registrations: Vec::new(),
		}
	}
}

impl<C> ListenerRegistry<C> {
	/// An empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a listener that has just been attached.
	pub fn register(&mut self, target: ListenerTarget, event: &'static str, callback: C) {
		self.registrations.push(Registration {
			target,
			event,
			callback,
		});
	}

	/// Listeners still attached.
	pub fn len(&self) -> usize {
		self.registrations.len()
	}

	/// Whether nothing is attached.
	pub fn is_empty(&self) -> bool {
		self.registrations.is_empty()
	}

	/// Whether `event` is currently attached to `target`.
	pub fn contains(&self, target: ListenerTarget, event: &str) -> bool {
		self.registrations
			.iter()
			.any(|r| r.target == target && r.event == event)
	}

	/// Hand back every registration for removal, leaving the registry empty.
	pub fn drain(&mut self) -> Vec<Registration<C>> {
		std::mem::take(&mut self.registrations)
	}
}

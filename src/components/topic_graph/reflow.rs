//! Reflow scheduling.
//!
//! Tracks why the layout is stale and debounces container resizes. Resize
//! events keep pushing the deadline forward; only once the container has been
//! still for the debounce window is the new size handed out. Other
//! invalidations are due immediately.

/// Default quiet period after the last resize event, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: f64 = 120.0;

/// Why a reflow was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invalidation {
	Mount,
	Resize,
	Expansion,
}

/// A due reflow, with the settled container size if it changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reflow {
	pub reason: Invalidation,
	pub size: Option<(f64, f64)>,
}

/// Collects invalidations and decides when a reflow is due.
#[derive(Clone, Debug)]
pub struct ReflowTrigger {
	debounce_ms: f64,
	dirty: Option<Invalidation>,
	pending_size: Option<(f64, f64)>,
	deadline: Option<f64>,
}

impl Default for ReflowTrigger {
	fn default() -> Self {
		Self::new(DEFAULT_DEBOUNCE_MS)
	}
}

impl ReflowTrigger {
	pub fn new(debounce_ms: f64) -> Self {
		Self {
			debounce_ms: debounce_ms.max(0.0),
			dirty: None,
			pending_size: None,
			deadline: None,
		}
	}

	/// Record a container resize at time `now` (milliseconds). Restarts the window.
	pub fn resize(&mut self, now: f64, width: f64, height: f64) {
		self.pending_size = Some((width, height));
		self.deadline = Some(now + self.debounce_ms);
	}

	/// Mark the layout stale for a non-resize reason.
	pub fn invalidate(&mut self, reason: Invalidation) {
		self.dirty = Some(match (self.dirty, reason) {
			(Some(Invalidation::Mount), _) => Invalidation::Mount,
			_ => reason,
		});
	}

	/// Whether anything is waiting, due or not.
	pub fn is_pending(&self) -> bool {
		self.dirty.is_some() || self.pending_size.is_some()
	}

	/// Take the reflow due at time `now`, if any.
	///
	/// A debounced resize still inside its window is left in place; an
	/// immediate invalidation is returned without it.
	pub fn poll(&mut self, now: f64) -> Option<Reflow> {
		let resize_due = self.deadline.is_some_and(|d| now >= d);
		if resize_due {
			self.deadline = None;
			let size = self.pending_size.take();
			let reason = self.dirty.take().unwrap_or(Invalidation::Resize);
			return Some(Reflow { reason, size });
		}
		self.take_immediate()
	}

	/// Take a pending non-resize invalidation, ignoring any debounced resize.
	pub fn take_immediate(&mut self) -> Option<Reflow> {
		self.dirty.take().map(|reason| Reflow { reason, size: None })
	}
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A value that arrives after mount, at most once.
///
/// Clones share the same slot. After [`Deferred::teardown`] the slot stays
/// empty: a resolution that lands late is dropped instead of being used
/// against a view that no longer exists.
pub struct Deferred<T> {
	slot: Rc<RefCell<Option<T>>>,
	mounted: Rc<Cell<bool>>,
}

impl<T> Clone for Deferred<T> {
	fn clone(&self) -> Self {
		Self {
			slot: Rc::clone(&self.slot),
			mounted: Rc::clone(&self.mounted),
		}
	}
}

impl<T> Default for Deferred<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Deferred<T> {
	pub fn new() -> Self {
		Self {
			slot: Rc::new(RefCell::new(None)),
			mounted: Rc::new(Cell::new(true)),
		}
	}

	/// Stores `value` unless the owner is gone or a value already arrived.
	pub fn resolve(&self, value: T) -> bool {
		if !self.mounted.get() || self.slot.borrow().is_some() {
			return false;
		}
		*self.slot.borrow_mut() = Some(value);
		true
	}

	pub fn is_ready(&self) -> bool {
		self.slot.borrow().is_some()
	}

	pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
		self.slot.borrow_mut().as_mut().map(f)
	}

	/// Frame-loop guard. While mounted returns `true`; afterwards empties `slot`,
	/// which holds the loop's own callback, and returns `false`.
	pub fn keep_alive<C>(&self, slot: &RefCell<Option<C>>) -> bool {
		if self.mounted.get() {
			return true;
		}
		let finished = slot.borrow_mut().take();
		drop(finished);
		false
	}

	/// Runs `f` on the value one last time, then drops it.
	pub fn teardown(&self, f: impl FnOnce(&mut T)) {
		self.mounted.set(false);
		let taken = self.slot.borrow_mut().take();
		if let Some(mut value) = taken {
			f(&mut value);
		}
	}
}

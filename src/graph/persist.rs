//! Durable storage for the graph document with a trailing-debounce writer.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::document::GraphDocument;
use super::error::{PersistError, PersistResult};
use super::model::ContentMode;

/// Wall-clock milliseconds, used to stamp scheduled saves and new categories.
pub fn now_ms() -> f64 {
	#[cfg(target_arch = "wasm32")]
	{
		js_sys::Date::now()
	}
	#[cfg(not(target_arch = "wasm32"))]
	{
		std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.map_or(0.0, |d| d.as_secs_f64() * 1_000.0)
	}
}

/// A named key-value slot holding one serialized document.
pub trait DocumentSlot {
	fn read(&self, key: &str) -> PersistResult<Option<String>>;
	fn write(&self, key: &str, value: &str) -> PersistResult<()>;
}

/// Browser `localStorage`.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageSlot;

impl LocalStorageSlot {
	fn storage() -> PersistResult<web_sys::Storage> {
		web_sys::window()
			.and_then(|w| w.local_storage().ok().flatten())
			.ok_or(PersistError::Unavailable)
	}
}

impl DocumentSlot for LocalStorageSlot {
	fn read(&self, key: &str) -> PersistResult<Option<String>> {
		Self::storage()?
			.get_item(key)
			.map_err(|_| PersistError::Read { key: key.into() })
	}

	fn write(&self, key: &str, value: &str) -> PersistResult<()> {
		Self::storage()?
			.set_item(key, value)
			.map_err(|_| PersistError::Write { key: key.into() })
	}
}

/// In-process slot; clones share the same contents.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
	items: Rc<RefCell<HashMap<String, String>>>,
	writes: Rc<Cell<usize>>,
	fail_writes: Rc<Cell<bool>>,
}

impl MemorySlot {
	pub fn writes(&self) -> usize {
		self.writes.get()
	}

	pub fn get(&self, key: &str) -> Option<String> {
		self.items.borrow().get(key).cloned()
	}

	/// Makes subsequent writes fail, as a full quota would.
	pub fn set_failing(&self, failing: bool) {
		self.fail_writes.set(failing);
	}
}

impl DocumentSlot for MemorySlot {
	fn read(&self, key: &str) -> PersistResult<Option<String>> {
		Ok(self.get(key))
	}

	fn write(&self, key: &str, value: &str) -> PersistResult<()> {
		if self.fail_writes.get() {
			return Err(PersistError::Write { key: key.into() });
		}
		self.writes.set(self.writes.get() + 1);
		self.items.borrow_mut().insert(key.into(), value.into());
		Ok(())
	}
}

/// Trailing debounce over explicit timestamps (milliseconds).
///
/// Arming while a save is pending replaces the payload and pushes the
/// deadline out, so a burst of mutations produces one save.
#[derive(Clone, Debug)]
pub struct SaveScheduler {
	quiet_ms: f64,
	deadline: Option<f64>,
	pending: Option<GraphDocument>,
}

impl SaveScheduler {
	pub fn new(quiet_ms: f64) -> Self {
		Self {
			quiet_ms,
			deadline: None,
			pending: None,
		}
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Milliseconds from `now` until the pending save is due.
	pub fn due_in(&self, now: f64) -> Option<f64> {
		self.deadline.map(|deadline| (deadline - now).max(0.0))
	}

	pub fn arm(&mut self, now: f64, doc: GraphDocument) {
		self.deadline = Some(now + self.quiet_ms);
		self.pending = Some(doc);
	}

	pub fn take_due(&mut self, now: f64) -> Option<GraphDocument> {
		match self.deadline {
			Some(deadline) if now >= deadline => self.flush(),
			_ => None,
		}
	}

	pub fn flush(&mut self) -> Option<GraphDocument> {
		self.deadline = None;
		self.pending.take()
	}
}

/// Loads once at startup, then writes back best-effort.
pub struct Persistence<S: DocumentSlot> {
	slot: S,
	key: String,
	scheduler: SaveScheduler,
}

impl<S: DocumentSlot> Persistence<S> {
	pub fn new(slot: S, key: impl Into<String>, quiet_ms: f64) -> Self {
		Self {
			slot,
			key: key.into(),
			scheduler: SaveScheduler::new(quiet_ms),
		}
	}

	/// Stored document if there is a readable one, otherwise the seed.
	pub fn load(&self, mode: ContentMode) -> GraphDocument {
		let stored = match self.slot.read(&self.key) {
			Ok(stored) => stored,
			Err(err) => {
				log::warn!("could not read saved graph: {err}");
				None
			}
		};
		let Some(json) = stored else {
			log::info!("no saved graph, starting from seed");
			return GraphDocument::seed(mode);
		};
		match GraphDocument::from_json(&json, mode) {
			Ok(doc) => {
				log::info!(
					"loaded graph with {} nodes and {} edges",
					doc.nodes.len(),
					doc.edges.len()
				);
				doc
			}
			Err(err) => {
				log::warn!("saved graph is unreadable, starting from seed: {err}");
				GraphDocument::seed(mode)
			}
		}
	}

	pub fn save(&self, doc: &GraphDocument) -> PersistResult<()> {
		let json = doc.to_json()?;
		self.slot.write(&self.key, &json)
	}

	pub fn schedule(&mut self, now: f64, doc: GraphDocument) {
		self.scheduler.arm(now, doc);
	}

	pub fn is_pending(&self) -> bool {
		self.scheduler.is_pending()
	}

	pub fn due_in(&self, now: f64) -> Option<f64> {
		self.scheduler.due_in(now)
	}

	/// Writes the pending document if its quiet period has elapsed.
	pub fn tick(&mut self, now: f64) -> bool {
		let due = self.scheduler.take_due(now);
		self.write_out(due)
	}

	/// Writes the pending document immediately.
	pub fn flush(&mut self) -> bool {
		let pending = self.scheduler.flush();
		self.write_out(pending)
	}

	fn write_out(&self, doc: Option<GraphDocument>) -> bool {
		let Some(doc) = doc else {
			return false;
		};
		match self.save(&doc) {
			Ok(()) => {
				log::debug!("saved graph ({} nodes)", doc.nodes.len());
				true
			}
			Err(err) => {
				log::warn!("graph save dropped: {err}");
				false
			}
		}
	}
}

//! Persistent state store seam.
//!
//! The tracker reads the session once when it is built and writes the
//! whole struct after every mutation. The SQLite implementation lives in
//! `db::session_store`; `MemoryStore` backs the tests.

use crate::errors::AppResult;
use crate::models::session::WorkSessionState;
use std::cell::RefCell;
use std::rc::Rc;

pub trait SessionStore {
    fn load(&self) -> AppResult<WorkSessionState>;
    fn save(&mut self, state: &WorkSessionState) -> AppResult<()>;
}

/// In-memory store. Clones share the same slot, so dropping a tracker and
/// building a new one on a clone behaves like a process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<WorkSessionState>>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: WorkSessionState) -> Self {
        let store = Self::default();
        *store.slot.borrow_mut() = Some(state);
        store
    }

    pub fn snapshot(&self) -> Option<WorkSessionState> {
        self.slot.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> AppResult<WorkSessionState> {
        Ok(self.slot.borrow().clone().unwrap_or_default())
    }

    fn save(&mut self, state: &WorkSessionState) -> AppResult<()> {
        *self.slot.borrow_mut() = Some(state.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

//! Test support utilities for pcgfont.
//!
//! This module provides helper types and functions that are useful for testing
//! store mutation and the codecs, but are not part of the public API.
use std::{cell::RefCell, rc::Rc};

use crate::{CharChange, CharacterStore, CHAR_COUNT, CHAR_SIZE};

/// Records every change notification emitted by a store.
#[derive(Clone, Default)]
pub struct ChangeLog {
    events: Rc<RefCell<Vec<CharChange>>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `store` and returns the log.
    pub fn attach(store: &mut CharacterStore) -> Self {
        let log = Self::new();
        let events = log.events.clone();
        store.subscribe(move |change| events.borrow_mut().push(change));
        log
    }

    pub fn events(&self) -> Vec<CharChange> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// A store filled with deterministic pseudo-random bytes in every character.
pub fn patterned_store() -> CharacterStore {
    let mut store = CharacterStore::new();
    let data: Vec<u8> = (0..CHAR_COUNT * CHAR_SIZE)
        .map(|i| (i as u32).wrapping_mul(2_654_435_761).rotate_left(7) as u8)
        .collect();
    // length is correct by construction
    let _ = store.set_all_data(&data);
    store
}

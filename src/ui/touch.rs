//! Touch ownership arbitration
//!
//! Only one blocking box may own a gesture (press, hold, release) at a time.
//! The arbiter is a cheap cloneable handle: every clone shares the same
//! ownership record, so one arbiter created at the root and handed to each
//! [`CompositionManager`](super::composition::CompositionManager) keeps the
//! single-gesture rule across all of them. The shell is single threaded,
//! hence `Rc<RefCell<_>>`.
//!
//! The arbiter also hands out box ids, which makes ids unique across every
//! manager sharing it.

use log::trace;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Stable identity of an interactive box, assigned in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(u64);

impl BoxId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box#{}", self.0)
    }
}

/// One frame's pointer state as seen by boxes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchEvent {
    pub x: f32,
    pub y: f32,
    pub pressed: bool,
    pub held: bool,
    pub released: bool,
}

impl TouchEvent {
    /// True when the event carries no edge and no hold
    pub fn is_idle(&self) -> bool {
        !self.pressed && !self.held && !self.released
    }
}

#[derive(Debug, Default)]
struct ArbitrationState {
    /// Owner of the active gesture; `Some` iff a gesture is active
    owner: Option<BoxId>,
    next_id: u64,
}

/// Shared gesture ownership record
#[derive(Debug, Clone, Default)]
pub struct TouchArbiter {
    state: Rc<RefCell<ArbitrationState>>,
}

impl TouchArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique box id
    pub fn allocate_id(&self) -> BoxId {
        let mut state = self.state.borrow_mut();
        let id = BoxId(state.next_id);
        state.next_id += 1;
        id
    }

    /// Decide whether `id` may treat `event` as its own.
    ///
    /// A release by the owner ends the gesture and is not consumable. While
    /// another box owns a gesture nothing else is consumable. Presses and
    /// holds are consumable otherwise, and blocking boxes claim ownership.
    pub fn check_and_register(&self, id: BoxId, event: &TouchEvent, blocking: bool) -> bool {
        let mut state = self.state.borrow_mut();

        if event.released {
            if state.owner == Some(id) {
                trace!("✋ {} released its gesture", id);
                state.owner = None;
            }
            return false;
        }

        if matches!(state.owner, Some(owner) if owner != id) {
            return false;
        }

        if event.pressed || event.held {
            if blocking && state.owner.is_none() {
                trace!("👆 {} claimed the gesture", id);
                state.owner = Some(id);
            }
            return true;
        }

        false
    }

    /// Drop ownership if `id` currently owns the gesture
    pub fn release(&self, id: BoxId) {
        let mut state = self.state.borrow_mut();
        if state.owner == Some(id) {
            state.owner = None;
        }
    }

    /// Clear any active gesture
    pub fn reset(&self) {
        self.state.borrow_mut().owner = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().owner.is_some()
    }

    pub fn owner(&self) -> Option<BoxId> {
        self.state.borrow().owner
    }

    /// Whether two handles refer to the same ownership record
    pub fn shares_state_with(&self, other: &TouchArbiter) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

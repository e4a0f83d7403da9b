//! # Study Session
//!
//! The mutable progress state over one scoped subset of the deck.
//!
//! ```text
//! Session
//! ├── scope: String               // key the subset was selected with
//! ├── session_ids: Vec<String>    // the subset, canonical order
//! ├── original_order: Vec<String> // baseline order for this session
//! ├── current_order: Vec<String>  // order cards are shown in (maybe shuffled)
//! ├── current_index: usize        // position in current_order
//! ├── incorrect_ids: HashSet      // cards answered wrong
//! ├── is_shuffled: bool
//! ├── front_first: bool           // default face setting
//! ├── font_size: u32              // display setting, persisted
//! ├── phase: Phase                // Active | Finished
//! └── flipped: bool               // per-card flip, reset on every move
//! ```
//!
//! Every change is one of the explicit transitions below. Each returns
//! `true` if it changed anything, so callers can log and persist only when
//! something actually happened.
//!
//! Invariants after every transition:
//! - `incorrect_ids ⊆ session_ids`
//! - `current_index < len` while `Active` (unless the session is empty)
//! - answered = `current_index` while `Active`, `len` once `Finished`

use std::collections::HashSet;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::card::Card;
use crate::core::deck::Deck;
use crate::core::scope::{ALL_SCOPE, select_scope_ids};

pub const DEFAULT_FONT_SIZE: u32 = 30;
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) scope: String,
    pub(crate) session_ids: Vec<String>,
    pub(crate) original_order: Vec<String>,
    pub(crate) current_order: Vec<String>,
    pub(crate) current_index: usize,
    pub(crate) incorrect_ids: HashSet<String>,
    pub(crate) is_shuffled: bool,
    pub(crate) front_first: bool,
    pub(crate) font_size: u32,
    pub(crate) phase: Phase,
    pub(crate) flipped: bool,
}

impl Session {
    /// Fresh session over `scope`, in canonical order.
    pub fn new(deck: &Deck, scope: &str, front_first: bool, font_size: u32) -> Self {
        let ids = select_scope_ids(deck, scope);
        debug!("New session: scope={scope}, {} cards", ids.len());
        Self::over(scope.to_string(), ids, front_first, font_size)
    }

    fn over(scope: String, ids: Vec<String>, front_first: bool, font_size: u32) -> Self {
        Self {
            scope,
            original_order: ids.clone(),
            current_order: ids.clone(),
            session_ids: ids,
            current_index: 0,
            incorrect_ids: HashSet::new(),
            is_shuffled: false,
            front_first,
            font_size: clamp_font_size(font_size),
            phase: Phase::Active,
            flipped: false,
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Record an answer for the current card and move on.
    pub fn answer(&mut self, outcome: Outcome) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        let Some(id) = self.current_id().map(str::to_string) else {
            return false;
        };
        if outcome == Outcome::Incorrect {
            self.incorrect_ids.insert(id);
        }
        if self.current_index + 1 >= self.current_order.len() {
            self.phase = Phase::Finished;
        } else {
            self.current_index += 1;
        }
        self.flipped = false;
        self.debug_check();
        true
    }

    /// Step back one card, clear its wrong-mark, and resume the pass.
    ///
    /// Rejected at index 0, whatever the phase.
    pub fn undo(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        if let Some(id) = self.current_order.get(self.current_index) {
            self.incorrect_ids.remove(id);
        }
        self.phase = Phase::Active;
        self.flipped = false;
        self.debug_check();
        true
    }

    /// Shuffle on, or back to the original order. Either way the index goes
    /// back to the first card; the phase is left alone.
    pub fn toggle_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.is_shuffled {
            self.current_order = self.original_order.clone();
            self.is_shuffled = false;
        } else {
            let mut order = self.original_order.clone();
            order.shuffle(rng);
            self.current_order = order;
            self.is_shuffled = true;
        }
        self.current_index = 0;
        self.flipped = false;
        self.debug_check();
    }

    /// Replace this session with a fresh one over `scope`. Settings carry over.
    pub fn change_scope(&mut self, deck: &Deck, scope: &str) {
        *self = Self::new(deck, scope, self.front_first, self.font_size);
    }

    /// Start over on just the cards answered wrong, in canonical deck order.
    pub fn review_wrong_only(&mut self, deck: &Deck) -> bool {
        if self.phase != Phase::Finished || self.incorrect_ids.is_empty() {
            return false;
        }
        let ids = deck.canonical_order(&self.incorrect_ids);
        debug!("Reviewing {} wrong cards", ids.len());
        let scope = std::mem::take(&mut self.scope);
        *self = Self::over(scope, ids, self.front_first, self.font_size);
        true
    }

    pub fn restart_full_deck(&mut self, deck: &Deck) {
        self.change_scope(deck, ALL_SCOPE);
    }

    /// Flip the current card. Moving to another card flips it back.
    pub fn flip(&mut self) -> bool {
        if self.phase == Phase::Finished || self.current_id().is_none() {
            return false;
        }
        self.flipped = !self.flipped;
        true
    }

    pub fn set_front_first(&mut self, front_first: bool) {
        self.front_first = front_first;
        self.flipped = false;
    }

    pub fn set_font_size(&mut self, font_size: u32) {
        self.font_size = clamp_font_size(font_size);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn session_ids(&self) -> &[String] {
        &self.session_ids
    }

    pub fn original_order(&self) -> &[String] {
        &self.original_order
    }

    pub fn current_order(&self) -> &[String] {
        &self.current_order
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn incorrect_ids(&self) -> &HashSet<String> {
        &self.incorrect_ids
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    pub fn front_first(&self) -> bool {
        self.front_first
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn len(&self) -> usize {
        self.session_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.session_ids.is_empty()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_order.get(self.current_index).map(String::as_str)
    }

    pub fn current_card<'a>(&self, deck: &'a Deck) -> Option<&'a Card> {
        self.current_id().and_then(|id| deck.get(id))
    }

    /// Which side of the current card is showing: `front_first XOR flipped`.
    pub fn displayed_face(&self) -> Face {
        if self.front_first != self.flipped {
            Face::Front
        } else {
            Face::Back
        }
    }

    pub fn answered(&self) -> usize {
        match self.phase {
            Phase::Active => self.current_index,
            Phase::Finished => self.len(),
        }
    }

    /// Cards not yet answered in this pass.
    pub fn remaining(&self) -> usize {
        self.len() - self.answered()
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect_ids.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answered().saturating_sub(self.incorrect_count())
    }

    /// True when every session invariant holds.
    pub fn invariants_hold(&self) -> bool {
        let members: HashSet<&String> = self.session_ids.iter().collect();
        let subset = self.incorrect_ids.iter().all(|id| members.contains(id));
        let index_ok = self.session_ids.is_empty()
            || self.phase == Phase::Finished
            || self.current_index < self.session_ids.len();
        subset && index_ok && self.current_order.len() == self.session_ids.len()
    }

    fn debug_check(&self) {
        debug_assert!(self.invariants_hold(), "session invariants violated: {self:?}");
    }
}

pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

//! # Core Application Logic
//!
//! This module contains flashdeck's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!   (path, text) pairs
//!          │
//!          ▼
//!   csv ─► card ─► deck ─┬─► scope
//!                        │
//!                        ├─► session ◄── action::update(app, action)
//!                        │
//!                        └─► snapshot ◄─► store
//! ```
//!
//! No terminal I/O here. The only filesystem access is the config file and
//! the `FileStore`, both reached through explicit calls from the binary.
//!
//! ## Modules
//!
//! - [`csv`]: one line → fields
//! - [`card`]: one document → cards
//! - [`deck`]: many documents → one canonically ordered deck
//! - [`scope`]: all / folder / file subsets
//! - [`session`]: the study state machine
//! - [`snapshot`]: export / validate / import
//! - [`store`]: the injected key/value persistence capability
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: settings resolution

pub mod action;
pub mod card;
pub mod config;
pub mod csv;
pub mod deck;
pub mod scope;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod store;

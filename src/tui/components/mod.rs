//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: Top status bar (scope, progress, status line)
//! - `CardView`: The displayed face of the current card
//! - `Summary`: Results once a session is finished
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events:
//! - `ScopePicker`: Overlay for choosing what to study
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as "props", not by reaching into `App`.
//! `ui.rs` reads the state and builds the props each frame.
//!
//! ```rust,ignore
//! // Good: dependencies are explicit
//! TitleBar { scope_label, progress, .. }.render(frame, area);
//!
//! // Bad: hidden dependency on global state
//! title_bar.render(frame, area); // reads from global App
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── card_view.rs     (Current card face)
//! ├── summary.rs       (Finished-session results)
//! └── scope_picker.rs  (Scope overlay)
//! ```

pub mod card_view;
pub mod scope_picker;
pub mod summary;
mod title_bar;

pub use card_view::CardView;
pub use scope_picker::{ScopePicker, ScopePickerState};
pub use summary::Summary;
pub use title_bar::TitleBar;

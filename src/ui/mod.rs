//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No file I/O happens here.

pub mod gallery;
pub mod halfblock;
pub mod home;
pub mod layout;
pub mod marble;
pub mod screen;
pub mod spinner;
pub mod theme;

//! Shell-facing helpers.
//!
//! All TUI rendering goes to the alternate screen (stderr-backed), so stdout
//! is reserved for the post-exit payload — the last link the user copied.

pub mod clipboard;

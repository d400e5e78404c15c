//! Core logic – scroll easing, frame scheduling, content and choreography.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod choreography;
pub mod content;
pub mod frame;
pub mod smooth_scroll;
pub mod visibility;

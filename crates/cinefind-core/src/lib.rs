//! State controllers for the cinefind movie browser.
//!
//! Each controller owns its state exclusively and spawns its catalog
//! requests as tagged tasks, so a superseded request can never overwrite
//! the result of a newer one.

pub mod debounce;
pub mod detail;
pub mod fetch_state;
pub mod list;
pub mod navigation;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

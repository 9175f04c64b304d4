//! Domain aggregates exposed by the roster service layer.

pub mod drag;
pub mod makler;
pub mod roster;
pub mod types;

//! Domain logic for wayfarer.
//!
//! Two subsystems live here: the participation state machine (apply,
//! accept, remove, check-applied against the plans tables) and the AI
//! itinerary pipeline (duration parsing, preference classification,
//! prompt construction, JSON extraction from model output).

pub mod duration;
pub mod error;
pub mod extract;
pub mod model;
pub mod participation;
pub mod places;
pub mod preferences;
pub mod prompt;

pub use error::Error;

//! Passive state containers mutated by the engine.
//!
//! None of these schedule anything on their own; all timing lives in the
//! engine. Mutators that only the engine may call are `pub(crate)`.

mod chat;
mod entity_map;
mod log;
mod metrics;
mod objectives;
mod overlay;
mod pointer;

pub use chat::{ChatChannel, ChatMessage, ChatView, TypeProgress};
pub use entity_map::{Entity, EntityMap, MergeOutcome};
pub use log::{LogChannel, LogEntry};
pub use metrics::Metrics;
pub use objectives::Objectives;
pub use overlay::{Overlay, OverlayChannel, OverlayView};
pub use pointer::{PointerChannel, PointerState};

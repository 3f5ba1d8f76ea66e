//! Scenario choreography engine.
//!
//! Drives an automated presentation made of scenes: a simulated pointer,
//! overlay cards, an entity map, a typed chat transcript, a decision log and
//! running metrics, all sequenced on a virtual clock through an epoch-gated
//! scheduler. Rendering and sound are left to consumers of [`core::Snapshot`]
//! and [`core::CuePlayer`].

pub mod core;

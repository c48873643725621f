//! Core types for the rendezvous coordinator.
//!
//! - [`kind`]: The resource kind tag and the typed per-kind map
//! - [`recipe`]: Per-cycle required amounts
//! - [`id`]: Producer identities and cycle tickets

pub mod id;
pub mod kind;
pub mod recipe;

pub use id::{CycleTicket, ProducerId};
pub use kind::{KindMap, ResourceKind};
pub use recipe::Recipe;

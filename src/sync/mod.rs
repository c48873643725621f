//! Synchronization entities of the rendezvous.
//!
//! Each entity has exactly one guarding lock:
//!
//! - [`AtomChannel`]: per-kind required count, guarded by the channel mutex,
//!   with a demand condition producers wait on
//! - [`ReadySignal`]: condition the assembler waits on (with a channel's mutex)
//!   until that channel drains
//! - [`CompletionBarrier`]: the cycle counter and the condition producers wait
//!   on until their cycle is finalized
//!
//! No operation here acquires a second lock while holding one, and no wait is
//! performed on one entity's condition while holding another entity's lock.

mod barrier;
mod channel;
mod ready;

pub use barrier::CompletionBarrier;
pub use channel::{AtomChannel, Delivery};
pub use ready::ReadySignal;

//! In-memory chain backend
//!
//! Factory, pools and block clock simulated in process. Pools keep a real
//! observation ring buffer, so history depth and TWAP readings come out of
//! simulated time passing rather than being stubbed.

mod in_memory;
mod simulated_pool;

pub use in_memory::{InMemoryChain, DEFAULT_TICK_SPACINGS};
pub use simulated_pool::SimulatedPool;

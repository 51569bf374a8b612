//! Synchronization support
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedW5500`] - statically allocatable, critical-section protected
//!   driver slot
//!
//! Enabled by the `critical-section` feature. The driver itself holds no
//! global state; this module is the opt-in way to share one instance between
//! thread context and interrupt handlers.
//!
//! # Example
//!
//! ```ignore
//! use wiznet_w5500::sync::SharedW5500;
//!
//! static ETH: SharedW5500<MyBus> = SharedW5500::new();
//!
//! fn main() {
//!     ETH.init(W5500::new(bus));
//!     ETH.with(|w5500| w5500.init(&config, &mut delay));
//! }
//! ```

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedW5500;

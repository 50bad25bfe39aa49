//! Time-bounded, multi-key packet-correlation buffers for a DSR-style
//! source-routing layer.
//!
//! Three buffers track packets through the acknowledgment scheme:
//!
//! - [`MaintenanceBuffer`] — packets in flight awaiting network-layer
//!   acknowledgment, consumed by multi-field correlation predicates.
//! - [`PassiveBuffer`] — packets overheard promiscuously, consumed when a
//!   neighbor is seen forwarding them one hop on.
//! - [`NetworkQueue`] — the bounded per-next-hop send queue with a
//!   maximum residency delay.
//!
//! All operations run to completion inside the host's event scheduler;
//! the virtual clock is passed in explicitly and only advances between
//! calls. Buffers enforce hard entry-count ceilings, so memory stays
//! bounded at the cost of silent oldest-first loss under overload.

pub mod config;
pub mod error;
pub mod maintenance;
pub mod passive;
pub mod queue;

pub use config::BufferConfig;
pub use error::ConfigError;
pub use maintenance::{MaintainEntry, MaintenanceBuffer};
pub use passive::{DropReason, PassiveBuffer, PassiveEntry};
pub use queue::{NetworkQueue, NetworkQueueEntry};

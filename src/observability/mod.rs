//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! provider, wallet and contract operations produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout/stderr via tracing-subscriber
//!     → whichever metrics recorder the embedding application installs
//! ```

pub mod logging;
pub mod metrics;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Open storage → Bind listener → Serve on background task     [Created → Listening]
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger (idempotent)
//!
//! Shutdown (startup.rs + shutdown.rs):
//!     Stop accepting → Drain (bounded) → Close storage (bounded)  [ShuttingDown → Closed]
//! ```
//!
//! # Design Decisions
//! - Ordered startup: storage first, then listener
//! - Ordered shutdown: stop accept, drain, release storage
//! - Each shutdown phase has its own timeout; expiry moves on to the next phase

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{Application, LifecycleError, ShutdownError, StartupError};
pub use state::{LifecycleState, StateTracker};

//! Memory reconstruction, read planning and structured decoding for the
//! Wintex Upload/Download (UDL) protocol.
//!
//! This crate sits on top of [`wintex_proto`]'s framing layer and owns
//! everything protocol-aware: the session state machine that dispatches
//! framed messages to a handler (observer or panel role), the sparse memory
//! model that accumulates observed reads and writes, the topic-driven read
//! planner and its range-compaction algebra, panel model dispatch, and the
//! structured decoder that turns raw memory into a typed configuration
//! record.

pub mod addr;
pub mod decode;
pub mod error;
pub mod memory;
pub mod model;
pub mod persist;
pub mod ranges;
pub mod session;
pub mod topics;

pub use error::{CoreError, Result};
pub use memory::{Memory, Region};
pub use model::{ModelDescriptor, ModelId, model_for};
pub use session::{PanelObserver, PasswordObserver, Session};
pub use topics::{Topic, Topics, plan};

//! Frame model for the relaynet simulation.
//!
//! A frame carries its addressing (`source`, `destination`), a per-link
//! sequence number and a fixed-size filler payload. There is no wire encoding:
//! frames move between actors by value, so whichever actor holds a frame last
//! is the one that releases it.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod frame;
pub mod node;

pub use errors::{FrameError, Result};
pub use frame::{FRAME_LENGTH, Frame, PAYLOAD_SIZE};
pub use node::{LinkId, NodeId};

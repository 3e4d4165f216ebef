//! Reelcut Core - Foundation types for the clip assembly renderer
//!
//! This crate provides the fundamental types used throughout Reelcut:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - RGBA frame buffers
//! - Contain-fit geometry for letterbox/pillarbox composition
//! - The error taxonomy shared by every pipeline stage
//! - The fixed render target configuration

pub mod error;
pub mod fit;
pub mod frame;
pub mod target;
pub mod time;

pub use error::{ReelcutError, Result};
pub use fit::{fit_contain, FitRect};
pub use frame::FrameBuffer;
pub use target::{CodecPreference, RenderTarget};
pub use time::{FrameRate, RationalTime, TimeRange};

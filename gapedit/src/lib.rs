//! gapedit: buffers, views and configuration around the text editing core.
//!
//! The [`BufferPool`] owns every open buffer and hands out weak
//! [`BufferHandle`]s. A [`TextView`] attaches a cursor to one of those
//! buffers and runs [`gapedit_text::Command`]s against it. Indentation for C
//! buffers comes from [`gapedit_indent`] over tokens the pool caches per buffer.

pub mod config;
pub mod error;
pub mod pool;
pub mod view;

pub use config::Config;
pub use error::{PoolError, Result};
pub use pool::{BufferHandle, BufferPool};
pub use view::{LineIndent, TextView};

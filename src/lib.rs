//! rowcast: encode records into delimited rows.
//!
//! Everything from [`rowcast_core`] is re-exported here, so typed callers only
//! need this crate:
//!
//! - **Typed records**: declare them with [`impl_tabular!`] and encode with
//!   [`Encoder`], [`encode_all`], or one of the streaming drivers
//! - **Dynamic records**: [`Value`] and [`DynRecord`] for data whose shape is only
//!   known at run time
//! - **JSON input**: [`input`] reads JSON arrays and JSON Lines, [`pipeline`]
//!   feeds them through a reader thread into the streaming driver

pub mod input;
pub mod pipeline;

pub use rowcast_core::*;
pub use rowcast_types::env_utils;

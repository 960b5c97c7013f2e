//! Rust's turnkey login throttle - sliding-window attempt budgets, cooldown escalation, and
//! idle-bucket reaping in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod bucket;
pub mod decision;
pub mod error;
pub mod key;
pub mod limiter;
pub mod obs;
pub mod policy;
pub mod quota;
#[cfg(feature = "reaper")] pub mod reaper;

mod _prelude {
	pub use std::{
		collections::{HashMap, VecDeque},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use {serde_json as _, tokio as _};

//! Live timing state for F1 UDP broadcasts.
//!
//! [`TimingEngine`] takes raw datagrams and keeps a fixed 22-slot roster
//! (lap and sector times, gaps, tyre history, penalties, status) plus session
//! information, events and the final classification. Each call returns a
//! [`ChangeSet`] naming what moved, so a front end can redraw selectively.
//!
//! ```rust
//! use racing_timing_config::EngineSettings;
//! use racing_timing_engine::TimingEngine;
//!
//! let mut engine = TimingEngine::new(EngineSettings::default());
//! let changes = engine.apply(&[]);
//! assert!(changes.is_empty());
//! assert_eq!(engine.drivers().len(), 22);
//! ```

#![deny(static_mut_refs)]

pub mod changes;
pub mod delta;
pub mod driver;
pub mod engine;
pub mod event;
pub mod laps;
pub mod names;
pub mod session;
pub mod status;
pub mod store;
pub mod wear;

pub use changes::{Change, ChangeSet, DriverField};
pub use driver::{DriverSlot, DriverStatus, LapRecord, MAX_LAPS};
pub use engine::TimingEngine;
pub use event::{EventDetail, EventType, PenaltyDetails, SessionEvent};
pub use session::{ClassificationEntry, SessionInfo, TyreStint};
pub use wear::{WearDetail, Wheels};

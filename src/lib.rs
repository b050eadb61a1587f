//! Classification and grading engine for the portal.
//!
//! Turns backend records plus an explicit `now` into lifecycle states,
//! percentages, letter grades, urgency tiers, and roll-up summaries.
//! Everything here is a stateless, side-effect-free transform over records
//! owned by the system of record; callers own persistence, transport, and
//! presentation. No function reads the wall clock.

pub mod aggregate;
pub mod error;
pub mod grading;
pub mod models;
pub mod policy;
pub mod quiz;
pub mod status;
pub mod urgency;

//! PenDo command-line front end
//!
//! The engine lives in `pendo_engine`; this crate adds the console output,
//! the persisted session record and input validation around it.

pub mod cli;
pub mod session;

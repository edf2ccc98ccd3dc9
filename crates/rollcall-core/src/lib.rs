//! Core types, the persistence trait, and the scheduling operations for
//! rollcall.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::ScheduleStore`]; request handlers call the
//! operations in [`schedule`] and [`record`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod class;
pub mod clock;
pub mod error;
pub mod grade;
pub mod record;
pub mod resolve;
pub mod schedule;
pub mod store;
pub mod timetable;

pub use error::{Error, Result};

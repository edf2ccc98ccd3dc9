//! JSON REST API for rollcall.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rollcall_core::store::ScheduleStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rollcall_api::api_router(store.clone(), chrono_tz::Europe::Berlin))
//! ```

pub mod attendance;
pub mod classes;
pub mod error;
pub mod grades;
pub mod timetable;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use chrono_tz::Tz;
use rollcall_core::store::ScheduleStore;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  /// Civil time zone in which reference instants are resolved.
  pub zone:  Tz,
}

// Manual impl: the store itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store), zone: self.zone } }
}

/// Build a fully-materialised API router for `store`, resolving attendance
/// times in `zone`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, zone: Tz) -> Router<()>
where
  S: ScheduleStore + 'static,
{
  Router::new()
    // Timetable
    .route("/timetable/conflicts", post(timetable::conflicts::<S>))
    .route(
      "/timetable/slots",
      get(timetable::list::<S>).post(timetable::create::<S>),
    )
    .route(
      "/timetable/slots/{id}",
      get(timetable::get_one::<S>)
        .put(timetable::replace::<S>)
        .patch(timetable::patch::<S>)
        .delete(timetable::delete_one::<S>),
    )
    // Classes
    .route("/classes", post(classes::create::<S>))
    .route("/classes/{id}", get(classes::get_one::<S>))
    .route("/classes/{id}/members", post(classes::add_member::<S>))
    // Attendance
    .route("/attendance", get(attendance::list::<S>))
    .route("/attendance/automatic", post(attendance::automatic::<S>))
    .route("/attendance/manual", post(attendance::manual::<S>))
    // Grades
    .route("/grades", get(grades::list::<S>).post(grades::create::<S>))
    .with_state(ApiState { store, zone })
}

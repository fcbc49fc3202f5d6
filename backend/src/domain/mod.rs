//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed habit-tracking entities and the services
//! that reconcile scheduled habits against recorded completions. Types stay
//! immutable and transport agnostic; adapters reach them through `ports`.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, ProviderProfile: local identity linked to the identity provider.
//! - Habit, WeekDay, NewHabit: habits and their weekly schedule.
//! - DayView, DaySummary: read models for a day and for completion history.
//! - IdentityResolver, HabitService: driving port implementations.

pub mod auth;
pub mod error;
pub mod habit;
pub mod habit_service;
pub mod identity_service;
pub mod ports;
pub mod summary;
pub mod trace_id;
pub mod user;

pub use self::auth::{AccessToken, CredentialValidationError, SessionClaims, SessionToken};
pub use self::error::{Error, ErrorCode};
pub use self::habit::{
    Habit, HabitDraft, HabitId, HabitTitle, HabitValidationError, NewHabit, WeekDay,
};
pub use self::habit_service::HabitService;
pub use self::identity_service::IdentityResolver;
pub use self::summary::{DayCompletionCount, DaySummary, DayView, summarise};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AvatarUrl, DisplayName, Email, ExternalId, ProviderProfile, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use habit_tracker::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

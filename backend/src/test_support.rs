//! Test utilities for the habit tracker crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`):
//! a pinned clock and a stub identity provider keyed by access token.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AccessToken, ProviderProfile};

/// Clock pinned to noon (server local time) on a fixed calendar date.
///
/// Noon keeps the local date stable whatever the host time zone.
pub struct FixtureClock(Mutex<DateTime<Local>>);

impl FixtureClock {
    /// Clock reading noon local time on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(Mutex::new(local_noon(date)))
    }

    /// Move the clock to noon on `date`.
    pub fn set_date(&self, date: NaiveDate) {
        *self.lock_clock() = local_noon(date);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Local>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

fn local_noon(date: NaiveDate) -> DateTime<Local> {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    match Local.from_local_datetime(&noon).earliest() {
        Some(moment) => moment,
        None => panic!("noon on {date} does not exist in the local time zone"),
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        *self.lock_clock()
    }

    fn utc(&self) -> DateTime<Utc> {
        self.lock_clock().with_timezone(&Utc)
    }
}

/// Identity provider answering from a fixed token → profile table.
///
/// Unknown tokens are rejected the way the real provider answers 401.
#[derive(Default)]
pub struct StubIdentityProvider {
    profiles: Mutex<HashMap<String, ProviderProfile>>,
}

impl StubIdentityProvider {
    /// Register `profile` as the answer for `token`.
    pub fn with_profile(self, token: &str, profile: ProviderProfile) -> Self {
        self.lock_profiles().insert(token.to_owned(), profile);
        self
    }

    fn lock_profiles(&self) -> std::sync::MutexGuard<'_, HashMap<String, ProviderProfile>> {
        match self.profiles.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("stub identity provider mutex"),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> Result<ProviderProfile, IdentityProviderError> {
        self.lock_profiles()
            .get(token.expose())
            .cloned()
            .ok_or_else(|| IdentityProviderError::rejected("unknown access token"))
    }
}

/// Profile with predictable fields derived from `external_id`.
pub fn profile(external_id: &str, name: &str) -> ProviderProfile {
    let built = ProviderProfile::try_from_parts(
        external_id,
        format!("{external_id}@example.com"),
        name,
        format!("https://example.com/{external_id}.png"),
    );
    match built {
        Ok(profile) => profile,
        Err(error) => panic!("fixture profile must be valid: {error}"),
    }
}

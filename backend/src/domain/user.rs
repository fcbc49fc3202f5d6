//! User identity model.
//!
//! A local [`User`] is keyed by its internal [`UserId`] and linked to the
//! identity provider through a unique [`ExternalId`]. Profile fields are copied
//! from the provider on first login and never refreshed afterwards.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Validation errors for user and provider profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyExternalId,
    InvalidEmail,
    InvalidAvatarUrl,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExternalId => write!(f, "external identity must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::InvalidAvatarUrl => write!(f, "avatar url must be an absolute URL"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Internal user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an already-validated UUID, e.g. one read from the store.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalId(String);

impl ExternalId {
    /// Validate and wrap a provider identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyExternalId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name shown in session claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Wrap a provider display name. Any string is accepted, including an
    /// empty one.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Email address reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; the provider has already verified ownership.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Email {
    /// Validate an email address.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Absolute URL of the user's avatar.
///
/// Holds the provider's string verbatim; parsing only validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Validate an avatar URL.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        Url::parse(&raw).map_err(|_| UserValidationError::InvalidAvatarUrl)?;
        Ok(Self(raw))
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Profile returned by the identity provider after schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub external_id: ExternalId,
    pub email: Email,
    pub display_name: DisplayName,
    pub avatar_url: AvatarUrl,
}

impl ProviderProfile {
    /// Validate raw provider fields.
    ///
    /// # Examples
    /// ```
    /// use habit_tracker::domain::ProviderProfile;
    ///
    /// let profile = ProviderProfile::try_from_parts(
    ///     "1234",
    ///     "ada@example.com",
    ///     "Ada Lovelace",
    ///     "https://example.com/ada.png",
    /// )
    /// .expect("valid profile");
    /// assert_eq!(profile.external_id.as_ref(), "1234");
    /// ```
    pub fn try_from_parts(
        external_id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            external_id: ExternalId::new(external_id)?,
            email: Email::new(email)?,
            display_name: DisplayName::new(display_name),
            avatar_url: AvatarUrl::new(avatar_url)?,
        })
    }
}

/// Local user record.
///
/// ## Invariants
/// - `external_id` is unique across users.
/// - Fields are immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    external_id: ExternalId,
    display_name: DisplayName,
    email: Email,
    avatar_url: AvatarUrl,
}

impl User {
    /// Build a user from validated components.
    pub fn new(id: UserId, profile: ProviderProfile) -> Self {
        let ProviderProfile {
            external_id,
            email,
            display_name,
            avatar_url,
        } = profile;
        Self {
            id,
            external_id,
            display_name,
            email,
            avatar_url,
        }
    }

    /// Create a brand-new user with a random identifier.
    pub fn register(profile: ProviderProfile) -> Self {
        Self::new(UserId::random(), profile)
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn avatar_url(&self) -> &AvatarUrl {
        &self.avatar_url
    }
}

//! DTO for decoding the identity provider's user-info response.

use serde::Deserialize;

use crate::domain::ProviderProfile;

/// Fields read from the user-info endpoint; extra fields are ignored.
#[derive(Debug, Deserialize)]
pub(super) struct UserInfoDto {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) name: String,
    pub(super) picture: String,
}

impl UserInfoDto {
    pub(super) fn into_profile(self) -> Result<ProviderProfile, String> {
        ProviderProfile::try_from_parts(self.id, self.email, self.name, self.picture)
            .map_err(|err| err.to_string())
    }
}

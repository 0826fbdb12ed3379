use serde::{Deserialize, Serialize};

/// Reverse-geocoded address parts; any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponents {
    pub name: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl AddressComponents {
    /// Non-empty components joined with `", "`.
    pub fn to_postal_address(&self) -> String {
        [
            &self.name,
            &self.street,
            &self.district,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Best-effort device location lookup used by the contact step.
pub trait Geolocator {
    fn current_address(&self) -> Result<AddressComponents, GeolocationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

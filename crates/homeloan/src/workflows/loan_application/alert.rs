use serde::Serialize;

use super::documents::PickerError;
use super::geolocation::GeolocationError;

/// Where acknowledging an alert takes the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    Stay,
    Home,
    Login,
}

/// Modal alert with a single acknowledgement action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
    pub on_acknowledge: Navigation,
}

impl Alert {
    pub fn new(title: &'static str, message: impl Into<String>, on_acknowledge: Navigation) -> Self {
        Self {
            title,
            message: message.into(),
            on_acknowledge,
        }
    }
}

impl PickerError {
    pub fn alert(&self) -> Alert {
        match self {
            PickerError::PermissionDenied(_) => Alert::new(
                "Permission Required",
                "Please allow access to your photos and files to upload documents.",
                Navigation::Stay,
            ),
            PickerError::Failed(_) => Alert::new(
                "Error",
                "Could not pick the document. Please try again.",
                Navigation::Stay,
            ),
        }
    }
}

impl GeolocationError {
    pub fn alert(&self) -> Alert {
        match self {
            GeolocationError::PermissionDenied => Alert::new(
                "Permission Denied",
                "Location permission is required to fill in your current address.",
                Navigation::Stay,
            ),
            GeolocationError::Unavailable(_) => Alert::new(
                "Location Unavailable",
                "Could not determine your current address. Please enter it manually.",
                Navigation::Stay,
            ),
        }
    }
}

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::suggestions::SuggestionField;
use super::validation::{
    validate_aadhaar, validate_date_of_birth, validate_email, validate_gst, validate_pan,
    validate_phone, FieldValidation,
};
use crate::workflows::emi::{AmortizationYear, EmiCalculator, EmiRequest};

/// Stateless calculator endpoints backing the wizard and the EMI screen.
pub fn calculator_router() -> Router {
    Router::new()
        .route("/api/v1/emi", post(emi_handler))
        .route("/api/v1/validate", post(validate_handler))
        .route("/api/v1/suggestions/:field", get(suggestions_handler))
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmiPayload {
    principal: f64,
    annual_rate_percent: f64,
    tenure_years: u32,
    #[serde(default)]
    include_schedule: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmiResponse {
    monthly_emi: u64,
    total_interest: u64,
    total_payment: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<Vec<AmortizationYear>>,
}

pub(crate) async fn emi_handler(axum::Json(payload): axum::Json<EmiPayload>) -> Response {
    let request = EmiRequest {
        principal: payload.principal,
        annual_rate_percent: payload.annual_rate_percent,
        tenure_years: payload.tenure_years,
    };

    match EmiCalculator::new(request) {
        Ok(calculator) => {
            let breakdown = calculator.breakdown();
            let body = EmiResponse {
                monthly_emi: breakdown.monthly_emi,
                total_interest: breakdown.total_interest,
                total_payment: breakdown.total_payment,
                schedule: payload
                    .include_schedule
                    .then(|| calculator.amortization_schedule()),
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct IdentityCheckRequest {
    pan: Option<String>,
    aadhaar: Option<String>,
    date_of_birth: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    gst_number: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct IdentityCheckResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pan: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aadhaar: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gst_number: Option<FieldValidation>,
}

pub(crate) async fn validate_handler(
    axum::Json(request): axum::Json<IdentityCheckRequest>,
) -> axum::Json<IdentityCheckResponse> {
    let today = Utc::now().date_naive();
    axum::Json(IdentityCheckResponse {
        pan: request.pan.as_deref().map(validate_pan),
        aadhaar: request.aadhaar.as_deref().map(validate_aadhaar),
        date_of_birth: request
            .date_of_birth
            .as_deref()
            .map(|value| validate_date_of_birth(value, today)),
        phone: request.phone.as_deref().map(validate_phone),
        email: request.email.as_deref().map(validate_email),
        gst_number: request.gst_number.as_deref().map(validate_gst),
    })
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SuggestionQuery {
    #[serde(default)]
    q: Option<String>,
}

pub(crate) async fn suggestions_handler(
    Path(field): Path<String>,
    Query(query): Query<SuggestionQuery>,
) -> Response {
    let Some(field) = SuggestionField::parse(&field) else {
        let payload = json!({ "error": format!("unknown suggestion field '{field}'") });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    let index = field.index();
    let suggestions = match query.q.as_deref() {
        Some(text) => index.filter(text),
        None => index.all(),
    };
    (
        StatusCode::OK,
        axum::Json(json!({ "field": field, "suggestions": suggestions })),
    )
        .into_response()
}

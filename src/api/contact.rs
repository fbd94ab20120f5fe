//! Contact form endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Contact form submission
#[derive(Deserialize, Validate, ToSchema)]
pub struct ContactMessage {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ContactResponse {
    pub message: String,
}

/// Send a message to the library
#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    request_body = ContactMessage,
    responses(
        (status = 200, description = "Message sent", body = ContactResponse),
        (status = 500, description = "Mail relay failure", body = ContactResponse)
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Json(data): Json<ContactMessage>,
) -> AppResult<(StatusCode, Json<ContactResponse>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    match state
        .services
        .email
        .send_contact_message(&data.name, &data.email, &data.subject, &data.message)
        .await
    {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(ContactResponse {
                message: "Thank you for contacting us. We will get back to you soon.".to_string(),
            }),
        )),
        Err(e) => {
            warn!(from = %data.email, error = %e, "contact form relay failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse {
                    message:
                        "Sorry, there was an error sending your message. Please try again later."
                            .to_string(),
                }),
            ))
        }
    }
}

/// Newsletter subscription request
#[derive(Deserialize, Validate, ToSchema)]
pub struct NewsletterSubscription {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Subscribe to the library newsletter. Subscriptions are acknowledged and
/// logged; there is no subscriber store yet.
#[utoipa::path(
    post,
    path = "/newsletter/subscribe",
    tag = "contact",
    request_body = NewsletterSubscription,
    responses(
        (status = 200, description = "Subscription accepted", body = ContactResponse)
    )
)]
pub async fn subscribe_newsletter(
    Json(data): Json<NewsletterSubscription>,
) -> AppResult<Json<ContactResponse>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::info!(email = %data.email, "newsletter subscription");

    Ok(Json(ContactResponse {
        message: "Thank you for subscribing to our newsletter!".to_string(),
    }))
}

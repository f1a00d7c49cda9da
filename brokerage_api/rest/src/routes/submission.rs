use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use brokerage_core_submission_contracts::{SubmissionFeatureService, SubmitError};
use brokerage_models::submission::FormVariant;
use tracing::{debug, error};

use crate::{
    errors::{self, INVALID_REQUEST_BODY, INVALID_SUBMISSION, SUBMISSION_FAILED},
    models::{
        submission::{ApiSubmission, ApiSubmissionAccepted},
        ApiError,
    },
};

pub const SUBMISSION_ACCEPTED: &str = "Email sent successfully";

pub fn router(
    service: Arc<impl SubmissionFeatureService>,
    expose_error_details: bool,
) -> Router<()> {
    Router::new()
        .route("/api/submissions/:variant", routing::post(submit))
        .with_state(SubmissionState {
            service,
            expose_error_details,
        })
}

struct SubmissionState<Service> {
    service: Arc<Service>,
    expose_error_details: bool,
}

impl<Service> Clone for SubmissionState<Service> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            expose_error_details: self.expose_error_details,
        }
    }
}

async fn submit(
    State(state): State<SubmissionState<impl SubmissionFeatureService>>,
    Path(variant): Path<String>,
    body: Result<Json<ApiSubmission>, JsonRejection>,
) -> Response {
    let Ok(variant) = variant.parse::<FormVariant>() else {
        return errors::error(StatusCode::NOT_FOUND, errors::NOT_FOUND);
    };

    let submission = match body {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            debug!(%variant, "rejecting malformed submission: {rejection}");
            return errors::error(StatusCode::BAD_REQUEST, INVALID_REQUEST_BODY);
        }
    };

    match state.service.submit(variant, submission.into()).await {
        Ok(delivery_id) => Json(ApiSubmissionAccepted {
            success: true,
            message: SUBMISSION_ACCEPTED,
            delivery_id,
        })
        .into_response(),
        Err(SubmitError::Invalid(field_errors)) => {
            let errors = field_errors
                .iter()
                .map(|(field, message)| (field.as_str(), message))
                .collect();
            let body = ApiError {
                errors: Some(errors),
                ..ApiError::new(INVALID_SUBMISSION)
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        Err(err) => {
            if let SubmitError::Other(err) = &err {
                error!(%variant, "failed to process submission: {err:#}");
            }
            let body = ApiError {
                error: state
                    .expose_error_details
                    .then(|| format!("{:#}", anyhow::Error::from(err))),
                ..ApiError::new(SUBMISSION_FAILED)
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::{body::Body, http::Request};
    use brokerage_core_blog_contracts::MockBlogFeatureService;
    use brokerage_core_health_contracts::MockHealthFeatureService;
    use brokerage_core_submission_contracts::{
        delivery::MissingDeliveryConfig, dispatch::SubmissionDispatchError,
        MockSubmissionFeatureService,
    };
    use brokerage_demo::submission::{BUY_DRAFT, CONTACT_DRAFT};
    use brokerage_email_contracts::EmailSendError;
    use brokerage_models::submission::{
        validation::{EMAIL_INVALID, IP_BLOCK_REQUIRED, NAME_REQUIRED},
        DeliveryId, FieldErrors, SubmissionDraft, SubmissionField,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::tests::{make_sut, response_json};

    async fn post(
        submission: MockSubmissionFeatureService,
        expose_error_details: bool,
        variant: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, Value) {
        let sut = make_sut(
            MockHealthFeatureService::new(),
            submission,
            MockBlogFeatureService::new(),
            expose_error_details,
        );
        let request = Request::post(format!("/api/submissions/{variant}"))
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap();

        let response = sut.router().oneshot(request).await.unwrap();
        let status = response.status();
        (status, response_json(response).await)
    }

    fn valid_buy_request() -> String {
        json!({"name": "A", "email": "a@b.com", "ipBlock": "10.0.0.0/8", "message": "hi"})
            .to_string()
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Buy,
            BUY_DRAFT.clone(),
            Ok(Some(DeliveryId::from("FAKE0001".to_owned()))),
        );

        // Act
        let (status, body) = post(submission, false, "buy", valid_buy_request()).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Email sent successfully", "deliveryId": "FAKE0001"})
        );
    }

    #[tokio::test]
    async fn ok_without_delivery_id() {
        // Arrange
        let request = json!({
            "firstName": "Jane Doe",
            "email": "jane@example.com",
            "phone": "+1 555 010 0199",
            "service": ["Lease IPv4", "IPv4 Buy"],
            "message": "We need a /22 before March.",
        });
        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Contact,
            CONTACT_DRAFT.clone(),
            Ok(None),
        );

        // Act
        let (status, body) = post(submission, false, "contact", request.to_string()).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Email sent successfully"})
        );
    }

    #[tokio::test]
    async fn name_and_first_name() {
        // Arrange
        let request = json!({
            "name": "A",
            "firstName": "B",
            "email": "a@b.com",
            "ipBlock": "10.0.0.0/8",
            "message": "hi",
        });
        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Buy,
            BUY_DRAFT.clone(),
            Ok(None),
        );

        // Act
        let (status, body) = post(submission, false, "buy", request.to_string()).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Email sent successfully"})
        );
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let draft = SubmissionDraft {
            name: Some("".into()),
            email: Some("bad".into()),
            ip_block: Some("".into()),
            ..Default::default()
        };
        let mut field_errors = FieldErrors::default();
        field_errors.insert(SubmissionField::Name, NAME_REQUIRED);
        field_errors.insert(SubmissionField::Email, EMAIL_INVALID);
        field_errors.insert(SubmissionField::IpBlock, IP_BLOCK_REQUIRED);

        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Sell,
            draft,
            Err(SubmitError::Invalid(field_errors)),
        );
        let request = json!({"name": "", "email": "bad", "ipBlock": ""});

        // Act
        let (status, body) = post(submission, false, "sell", request.to_string()).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Please fix the errors in the form",
                "errors": {
                    "name": "Name is required",
                    "email": "Please enter a valid email",
                    "ipBlock": "IP block is required",
                },
            })
        );
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Buy,
            BUY_DRAFT.clone(),
            Err(MissingDeliveryConfig(vec!["email.smtp_host", "email.smtp_password"]).into()),
        );

        // Act
        let (status, body) = post(submission, false, "buy", valid_buy_request()).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Error sending email"})
        );
    }

    #[tokio::test]
    async fn authentication_rejected() {
        // Arrange
        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Buy,
            BUY_DRAFT.clone(),
            Err(SubmitError::Dispatch(SubmissionDispatchError::Transport(
                EmailSendError::AuthenticationRejected(anyhow!("535 5.7.8 Authentication failed")),
            ))),
        );

        // Act
        let (status, body) = post(submission, false, "buy", valid_buy_request()).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Error sending email"})
        );
    }

    #[tokio::test]
    async fn authentication_rejected_with_details() {
        // Arrange
        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Buy,
            BUY_DRAFT.clone(),
            Err(SubmitError::Dispatch(SubmissionDispatchError::Transport(
                EmailSendError::AuthenticationRejected(anyhow!("535 5.7.8 Authentication failed")),
            ))),
        );

        // Act
        let (status, body) = post(submission, true, "buy", valid_buy_request()).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error sending email");
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("rejected the credentials"));
        assert!(error.contains("535 5.7.8 Authentication failed"));
    }

    #[tokio::test]
    async fn other_error() {
        // Arrange
        let submission = MockSubmissionFeatureService::new().with_submit(
            FormVariant::Buy,
            BUY_DRAFT.clone(),
            Err(SubmitError::Other(anyhow!("template missing"))),
        );

        // Act
        let (status, body) = post(submission, false, "buy", valid_buy_request()).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Error sending email"})
        );
    }

    #[tokio::test]
    async fn malformed_json() {
        // Act
        let (status, body) = post(
            MockSubmissionFeatureService::new(),
            false,
            "buy",
            r#"{"name": "A", "email":"#,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "message": "Invalid request body"})
        );
    }

    #[tokio::test]
    async fn wrong_field_type() {
        // Act
        let (status, body) = post(
            MockSubmissionFeatureService::new(),
            false,
            "buy",
            json!({"name": 42, "email": "a@b.com"}).to_string(),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn missing_content_type() {
        // Arrange
        let sut = make_sut(
            MockHealthFeatureService::new(),
            MockSubmissionFeatureService::new(),
            MockBlogFeatureService::new(),
            false,
        );
        let request = Request::post("/api/submissions/buy")
            .body(Body::from(valid_buy_request()))
            .unwrap();

        // Act
        let response = sut.router().oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_variant() {
        // Act
        let (status, body) = post(
            MockSubmissionFeatureService::new(),
            false,
            "rent",
            valid_buy_request(),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "message": "Not found"}));
    }
}

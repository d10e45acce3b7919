//! REST API of the email templates administration.

use axum::{
    extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse, Extension, Json,
};
#[cfg(doc)]
use common::DateTime;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, email_template},
    query,
};

use crate::{AsError as _, Error, Service};

/// Record of an [`domain::EmailTemplate`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EmailTemplate {
    /// ID of the [`domain::EmailTemplate`].
    pub id: email_template::Id,

    /// Name of the [`domain::EmailTemplate`].
    pub name: String,

    /// Body of the [`domain::EmailTemplate`].
    pub body: String,

    /// Indicator whether the [`domain::EmailTemplate`] is active.
    pub is_active: bool,

    /// [`DateTime`] when the [`domain::EmailTemplate`] was created, in
    /// [RFC 3339] format.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub created_at: String,
}

impl From<domain::EmailTemplate> for EmailTemplate {
    fn from(template: domain::EmailTemplate) -> Self {
        let domain::EmailTemplate {
            id,
            name,
            body,
            is_active,
            created_at,
        } = template;
        Self {
            id,
            name: name.to_string(),
            body: body.to_string(),
            is_active,
            created_at: created_at.to_rfc3339(),
        }
    }
}

/// Request body creating a new [`EmailTemplate`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewEmailTemplate {
    /// Name of the new [`EmailTemplate`].
    pub name: Option<String>,

    /// Body of the new [`EmailTemplate`].
    pub body: Option<String>,

    /// Indicator whether the new [`EmailTemplate`] is active.
    pub is_active: Option<bool>,
}

/// Outcome of a database connection test.
#[derive(Clone, Debug, Serialize)]
pub struct ConnectionStatus {
    /// Indicator whether the database is reachable.
    pub connected: bool,

    /// Human-readable summary.
    pub message: String,

    /// Error the database failed with, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Lists all the [`EmailTemplate`]s, the most recently created first.
///
/// `GET /api/admin/email-templates`
///
/// # Errors
///
/// If the database fails.
#[tracing::instrument(skip_all, fields(otel.name = "REST email templates"))]
pub async fn list_email_templates(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<EmailTemplate>>, Error> {
    service
        .execute(query::email_templates::List::newest_first(None))
        .await
        .map_err(|e| Error::internal(&e.into_inner()))
        .map(|list| Json(list.into_iter().map(Into::into).collect()))
}

/// Creates a new [`EmailTemplate`], active unless stated otherwise.
///
/// `POST /api/admin/email-templates`
///
/// # Errors
///
/// - `400` if the body is not a JSON template, or if the name or the body
///   is missing or empty.
/// - `500` if the database fails.
#[tracing::instrument(skip_all, fields(otel.name = "REST email templates"))]
pub async fn create_email_template(
    Extension(service): Extension<Service>,
    request: Result<Json<NewEmailTemplate>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(NewEmailTemplate {
        name,
        body,
        is_active,
    }) = request.map_err(|e| e.as_error())?;

    let name = name.and_then(email_template::Name::new);
    let body = body.and_then(email_template::Body::new);
    let (Some(name), Some(body)) = (name, body) else {
        return Err(Error::bad_request(&"Name and body are required"));
    };

    let created = service
        .execute(command::CreateEmailTemplate {
            name,
            body,
            is_active: is_active.unwrap_or(true),
        })
        .await
        .map_err(|e| Error::internal(&e.into_inner()))?;

    Ok((StatusCode::CREATED, Json(EmailTemplate::from(created))))
}

/// Tests whether the database is reachable.
///
/// `GET /api/admin/email-templates/test-connection`
///
/// # Errors
///
/// Never, the failure is reported in the [`ConnectionStatus`].
#[tracing::instrument(skip_all, fields(otel.name = "REST test connection"))]
pub async fn test_connection(
    Extension(service): Extension<Service>,
) -> Result<Json<ConnectionStatus>, Error> {
    let query::connection::Status {
        connected,
        message,
        error,
    } = service
        .execute(query::connection::Probe)
        .await
        .map_err(|e| Error::internal(&e.into_inner()))?;

    Ok(Json(ConnectionStatus {
        connected,
        message,
        error,
    }))
}

/// Lists all the [`EmailTemplate`]s as they're stored.
///
/// `GET /api/admin/templates/emails`
///
/// # Errors
///
/// If the database fails.
#[tracing::instrument(skip_all, fields(otel.name = "REST raw email templates"))]
pub async fn raw_email_templates(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<EmailTemplate>>, Error> {
    service
        .execute(query::email_templates::List::raw())
        .await
        .map_err(|e| Error::internal(&e.into_inner()))
        .map(|list| Json(list.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod spec {
    use axum::{
        body::{self, Body},
        extract::{rejection::JsonRejection, FromRequest as _},
        http::{self, StatusCode},
        response::{IntoResponse as _, Response},
        Extension, Json,
    };
    use service::{
        domain::draft::Firm,
        infra::{llm::gemini, Gemini, Memory},
    };

    use crate::Service;

    use super::{
        create_email_template, list_email_templates, raw_email_templates,
        test_connection, NewEmailTemplate,
    };

    fn service(db: Memory) -> Service {
        Service::new(
            service::Config {
                firm: Firm::default(),
            },
            db,
            Gemini::new(gemini::Config {
                api_key: None,
                model: "gemini-3-flash-preview".into(),
                endpoint: "http://localhost".into(),
            }),
        )
    }

    async fn json(response: Response<Body>) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(
        name: &str,
        body: &str,
    ) -> Result<Json<NewEmailTemplate>, JsonRejection> {
        Ok(Json(NewEmailTemplate {
            name: Some(name.into()),
            body: Some(body.into()),
            is_active: None,
        }))
    }

    async fn raw_request(
        content: &'static str,
    ) -> Result<Json<NewEmailTemplate>, JsonRejection> {
        let req = http::Request::builder()
            .method(http::Method::POST)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(content))
            .unwrap();
        Json::<NewEmailTemplate>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn rejects_blank_name_or_body() {
        let svc = service(Memory::new());

        for req in [
            request("", "x"),
            request("Test", ""),
            Ok(Json(NewEmailTemplate::default())),
        ] {
            let resp = create_email_template(Extension(svc.clone()), req)
                .await
                .into_response();

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json(resp).await,
                serde_json::json!({"error": "Name and body are required"}),
            );
        }
    }

    #[tokio::test]
    async fn rejects_malformed_json_with_error_body() {
        let svc = service(Memory::new());

        for content in [r#"{"name":5,"body":"x"}"#, "{not json"] {
            let req = raw_request(content).await;
            assert!(req.is_err());

            let resp = create_email_template(Extension(svc.clone()), req)
                .await
                .into_response();

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert!(json(resp).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn creates_active_template() {
        let svc = service(Memory::new());

        let resp =
            create_email_template(Extension(svc.clone()), request("Test", "Hello"))
                .await
                .into_response();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = json(resp).await;
        assert_eq!(created["name"], "Test");
        assert_eq!(created["body"], "Hello");
        assert_eq!(created["is_active"], true);
        assert!(created["id"].is_string());
        assert!(created["created_at"].is_string());

        let listed = list_email_templates(Extension(svc))
            .await
            .into_response();
        assert_eq!(listed.status(), StatusCode::OK);
        let listed = json(listed).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn keeps_explicit_inactivity() {
        let svc = service(Memory::new());

        let resp = create_email_template(
            Extension(svc),
            Ok(Json(NewEmailTemplate {
                is_active: Some(false),
                name: Some("Test".into()),
                body: Some("Hello".into()),
            })),
        )
        .await
        .into_response();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(json(resp).await["is_active"], false);
    }

    #[tokio::test]
    async fn reports_store_failures() {
        let svc = service(Memory::unavailable());

        let created =
            create_email_template(Extension(svc.clone()), request("Test", "Hello"))
                .await
                .into_response();
        assert_eq!(created.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json(created).await,
            serde_json::json!({"error": "in-memory database is unavailable"}),
        );

        let listed = list_email_templates(Extension(svc.clone()))
            .await
            .into_response();
        assert_eq!(listed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let raw = raw_email_templates(Extension(svc.clone()))
            .await
            .into_response();
        assert_eq!(raw.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let probe = test_connection(Extension(svc)).await.into_response();
        assert_eq!(probe.status(), StatusCode::OK);
        let probe = json(probe).await;
        assert_eq!(probe["connected"], false);
        assert_eq!(probe["message"], "Connection failed");
        assert_eq!(probe["error"], "in-memory database is unavailable");
    }

    #[tokio::test]
    async fn reports_reachable_store() {
        let svc = service(Memory::new());

        let probe = test_connection(Extension(svc)).await.into_response();

        let probe = json(probe).await;
        assert_eq!(probe["connected"], true);
        assert!(probe.get("error").is_none());
    }
}

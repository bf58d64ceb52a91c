// ABOUTME: Marathon REST client implementing the ControlPlane trait.
// ABOUTME: Speaks HTTP/1.1 JSON to /v2/apps with a DC/OS token on every request.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use super::error::{
    BodySnafu, ControlPlaneError, DecodeSnafu, EncodeSnafu, RequestSnafu, TlsSnafu,
    TransportSnafu,
};
use super::traits::ControlPlane;
use super::types::{AppRecord, Scale, ScaleTarget};
use crate::definition::AppDefinition;
use crate::types::AppId;

const APP_EMBEDS: &str =
    "embed=app.tasks&embed=app.counts&embed=app.deployments&embed=app.lastTaskFailure";
const LIST_EMBEDS: &str = "embed=apps.counts";

#[derive(Deserialize)]
struct AppEnvelope {
    app: AppRecord,
}

#[derive(Deserialize)]
struct AppList {
    #[serde(default)]
    apps: Vec<AppRecord>,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

/// Which kind of write a request is; 409 means different things for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Write {
    Create,
    Update,
}

/// Control plane client for the Marathon `/v2` API.
pub struct MarathonClient {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    base: String,
    authorization: HeaderValue,
}

impl std::fmt::Debug for MarathonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarathonClient")
            .field("base", &self.base)
            .finish()
    }
}

impl MarathonClient {
    /// Build a client for the Marathon instance at `url`.
    ///
    /// No request is made; connection failures surface on the first call.
    /// Both `http://` and `https://` URLs are accepted; TLS servers are
    /// verified against the bundled webpki roots.
    pub fn connect(url: &str, credential: &str) -> Result<Self, ControlPlaneError> {
        let invalid = |reason: &str| ControlPlaneError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            invalid(&e.to_string())
        })?;

        match uri.scheme_str() {
            Some("http" | "https") => {}
            Some(other) => {
                return Err(invalid(&format!(
                    "unsupported scheme '{other}', expected http or https"
                )));
            }
            None => return Err(invalid("missing scheme, expected http(s)://host[:port]")),
        }
        if uri.host().is_none() {
            return Err(invalid("missing host"));
        }
        if uri.query().is_some() {
            return Err(invalid("query strings are not allowed"));
        }

        // DC/OS expects `token=<jwt>` rather than `Bearer <jwt>`.
        let authorization = HeaderValue::from_str(&format!("token={credential}"))
            .map_err(|_| invalid("credential contains characters not allowed in a header"))?;

        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
            .context(TlsSnafu)?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            base: url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Send a request and return the status and full body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<(StatusCode, Bytes), ControlPlaneError> {
        let uri = format!("{}{}", self.base, path);
        tracing::debug!(%method, %uri, "control plane request");

        let req = Request::builder()
            .method(method)
            .uri(&uri)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .context(RequestSnafu { path })?;

        let resp = self
            .client
            .request(req)
            .await
            .context(TransportSnafu { path })?;

        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .context(BodySnafu { path })?
            .to_bytes();

        tracing::debug!(%status, %uri, "control plane response");
        Ok((status, bytes))
    }

    /// Decode a successful response body, or map the failure status.
    fn decode<T: DeserializeOwned>(
        path: &str,
        status: StatusCode,
        body: &[u8],
        app_id: Option<&AppId>,
    ) -> Result<T, ControlPlaneError> {
        if !status.is_success() {
            return Err(status_error(status, body, app_id, None));
        }
        serde_json::from_slice(body).context(DecodeSnafu { path })
    }

    async fn write(
        &self,
        write: Write,
        app_id: &AppId,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<(), ControlPlaneError> {
        let method = match write {
            Write::Create => Method::POST,
            Write::Update => Method::PUT,
        };
        let body = serde_json::to_vec(payload).context(EncodeSnafu)?;
        let (status, bytes) = self.send(method, path, Some(body)).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, &bytes, Some(app_id), Some(write)))
        }
    }
}

/// Map a non-success status to an error.
fn status_error(
    status: StatusCode,
    body: &[u8],
    app_id: Option<&AppId>,
    write: Option<Write>,
) -> ControlPlaneError {
    let message = serde_json::from_slice::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());

    match (status, app_id, write) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _, _) => {
            ControlPlaneError::Unauthorized {
                status: status.as_u16(),
            }
        }
        (StatusCode::CONFLICT, Some(app_id), Some(Write::Create)) => ControlPlaneError::Conflict {
            app_id: app_id.clone(),
        },
        (StatusCode::CONFLICT, Some(app_id), Some(Write::Update)) => ControlPlaneError::Locked {
            app_id: app_id.clone(),
            message,
        },
        (StatusCode::NOT_FOUND, Some(app_id), _) => ControlPlaneError::NotFound {
            app_id: app_id.clone(),
        },
        _ => ControlPlaneError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn force_query(force: bool) -> &'static str {
    if force { "?force=true" } else { "?force=false" }
}

#[async_trait]
impl ControlPlane for MarathonClient {
    async fn create_app(
        &self,
        id: &AppId,
        definition: &AppDefinition,
    ) -> Result<(), ControlPlaneError> {
        let payload = serde_json::Value::Object(definition.as_json().clone());
        self.write(Write::Create, id, "/v2/apps", &payload).await
    }

    async fn update_app(
        &self,
        id: &AppId,
        definition: &AppDefinition,
        force: bool,
    ) -> Result<(), ControlPlaneError> {
        let path = format!("/v2/apps{}{}", id.url_path(), force_query(force));
        let payload = serde_json::Value::Object(definition.as_json().clone());
        self.write(Write::Update, id, &path, &payload).await
    }

    async fn scale_app(&self, id: &AppId, scale: Scale) -> Result<(), ControlPlaneError> {
        // Marathon has no relative scale; resolve deltas against a fresh read.
        let instances = match scale.target {
            ScaleTarget::Instances(n) => n,
            ScaleTarget::Delta(_) => scale.resolve(self.get_app(id).await?.instances),
        };
        let path = format!("/v2/apps{}{}", id.url_path(), force_query(scale.force));
        let payload = serde_json::json!({ "instances": instances });
        self.write(Write::Update, id, &path, &payload).await
    }

    async fn get_app(&self, id: &AppId) -> Result<AppRecord, ControlPlaneError> {
        let path = format!("/v2/apps{}?{}", id.url_path(), APP_EMBEDS);
        let (status, body) = self.send(Method::GET, &path, None).await?;
        let envelope: AppEnvelope = Self::decode(&path, status, &body, Some(id))?;
        Ok(envelope.app)
    }

    async fn list_apps(&self) -> Result<Vec<AppRecord>, ControlPlaneError> {
        let path = format!("/v2/apps?{LIST_EMBEDS}");
        let (status, body) = self.send(Method::GET, &path, None).await?;
        let list: AppList = Self::decode(&path, status, &body, None)?;
        Ok(list.apps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_plane::ControlPlaneErrorKind;

    #[test]
    fn connect_accepts_http_urls() {
        let client = MarathonClient::connect("http://marathon.mesos:8080/", "jwt").unwrap();
        assert_eq!(client.base_url(), "http://marathon.mesos:8080");
    }

    #[test]
    fn connect_keeps_path_prefix() {
        let client = MarathonClient::connect("http://dcos.local/service/marathon", "jwt").unwrap();
        assert_eq!(client.base_url(), "http://dcos.local/service/marathon");
    }

    #[test]
    fn connect_accepts_https_urls() {
        let client =
            MarathonClient::connect("https://dcos.example.com/service/marathon", "jwt").unwrap();
        assert_eq!(client.base_url(), "https://dcos.example.com/service/marathon");
    }

    #[test]
    fn connect_rejects_other_schemes_and_missing_scheme() {
        for url in ["ftp://dcos.local", "marathon.mesos:8080", "not a url"] {
            let err = MarathonClient::connect(url, "jwt").unwrap_err();
            assert_eq!(err.kind(), ControlPlaneErrorKind::Transport, "{url}");
        }
    }

    #[test]
    fn connect_rejects_credentials_with_newlines() {
        assert!(MarathonClient::connect("http://marathon", "a\nb").is_err());
    }

    #[test]
    fn conflict_on_create_vs_update() {
        let id = AppId::new("/svc.v1");
        let body = br#"{"message": "An app with id [/svc.v1] already exists."}"#;
        assert!(matches!(
            status_error(StatusCode::CONFLICT, body, Some(&id), Some(Write::Create)),
            ControlPlaneError::Conflict { .. }
        ));
        match status_error(StatusCode::CONFLICT, body, Some(&id), Some(Write::Update)) {
            ControlPlaneError::Locked { message, .. } => assert!(message.contains("already")),
            other => panic!("expected Locked, got {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_kept_as_message() {
        match status_error(StatusCode::BAD_GATEWAY, b" upstream down ", None, None) {
            ControlPlaneError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn forbidden_is_unauthorized() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, b"", None, None),
            ControlPlaneError::Unauthorized { status: 403 }
        ));
    }
}

//! HTTP client for the remote notes service.

use async_trait::async_trait;
use notehub_api_types::{CreateNoteData, FetchNotesParams, Note, NotesPage};
use reqwest::{Client, RequestBuilder, Response, Url, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::notes_api::{ApiError, NotesApi};
use crate::config::BackendSettings;

use super::error::InfraError;

const NOTES_PATH: &str = "notes";

#[derive(Clone, Debug)]
pub struct HttpNotesApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpNotesApi {
    pub fn new(settings: &BackendSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::configuration(format!("failed to build client: {err}")))?;

        Ok(Self {
            client,
            base: settings.base_url.clone(),
            token: settings.token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("notehub/", env!("CARGO_PKG_VERSION"))
    }

    fn notes_url(&self) -> Result<Url, ApiError> {
        Ok(self.base.join(NOTES_PATH)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.as_deref() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    #[instrument(skip(self), fields(page = params.page, tag = ?params.tag))]
    async fn fetch_notes(&self, params: &FetchNotesParams) -> Result<NotesPage, ApiError> {
        let mut url = self.notes_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &params.page.to_string());
            pairs.append_pair("perPage", &params.per_page.to_string());
            if let Some(tag) = params.tag.as_deref() {
                pairs.append_pair("tag", tag);
            }
        }

        debug!(target = "notehub::backend", %url, "fetching notes");
        let resp = self.authorize(self.client.get(url)).send().await?;
        Self::handle(resp).await
    }

    #[instrument(skip(self, data), fields(tag = %data.tag))]
    async fn create_note(&self, data: &CreateNoteData) -> Result<Note, ApiError> {
        let url = self.notes_url()?;
        debug!(target = "notehub::backend", %url, "creating note");
        let resp = self
            .authorize(self.client.post(url).json(data))
            .send()
            .await?;
        Self::handle(resp).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::MockServer;
    use notehub_api_types::NoteTag;
    use serde_json::json;

    use super::*;

    fn api(server: &MockServer, token: Option<&str>) -> HttpNotesApi {
        let settings = BackendSettings {
            base_url: Url::parse(&format!("{}/api/", server.base_url())).expect("url"),
            token: token.map(str::to_string),
            timeout: Duration::from_secs(5),
        };
        HttpNotesApi::new(&settings).expect("client")
    }

    #[tokio::test]
    async fn fetch_sends_paging_and_tag() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/notes")
                    .query_param("page", "2")
                    .query_param("perPage", "12")
                    .query_param("tag", "Work")
                    .header("authorization", "Bearer secret");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        r#"{"notes":[{"id":"n1","title":"Plan","content":"","tag":"Work"}],"totalPages":3}"#,
                    );
            })
            .await;

        let params = FetchNotesParams {
            page: 2,
            per_page: 12,
            tag: Some("Work".to_string()),
        };
        let page = api(&server, Some("secret"))
            .fetch_notes(&params)
            .await
            .expect("page");

        mock.assert_async().await;
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.notes.len(), 1);
        assert_eq!(page.notes[0].tag, NoteTag::Work);
    }

    #[tokio::test]
    async fn fetch_omits_tag_for_all_notes() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/notes")
                    .query_param("page", "1")
                    .query_param_missing("tag");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"notes":[],"totalPages":0}"#);
            })
            .await;

        let params = FetchNotesParams {
            page: 1,
            per_page: 12,
            tag: None,
        };
        let page = api(&server, None)
            .fetch_notes(&params)
            .await
            .expect("page");

        mock.assert_async().await;
        assert!(page.notes.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/notes");
                then.status(503).body("maintenance");
            })
            .await;

        let params = FetchNotesParams {
            page: 1,
            per_page: 12,
            tag: None,
        };
        let err = api(&server, None)
            .fetch_notes(&params)
            .await
            .expect_err("should fail");

        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/notes");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("not json");
            })
            .await;

        let params = FetchNotesParams {
            page: 1,
            per_page: 12,
            tag: None,
        };
        let err = api(&server, None)
            .fetch_notes(&params)
            .await
            .expect_err("should fail");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn create_posts_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/api/notes")
                    .json_body(json!({"title": "Groceries", "content": "milk", "tag": "Shopping"}));
                then.status(201)
                    .header("content-type", "application/json")
                    .body(r#"{"id":"n9","title":"Groceries","content":"milk","tag":"Shopping"}"#);
            })
            .await;

        let data = CreateNoteData {
            title: "Groceries".to_string(),
            content: "milk".to_string(),
            tag: NoteTag::Shopping,
        };
        let note = api(&server, None).create_note(&data).await.expect("note");

        mock.assert_async().await;
        assert_eq!(note.id, "n9");
        assert_eq!(note.tag, NoteTag::Shopping);
    }
}

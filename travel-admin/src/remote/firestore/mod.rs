//! Cloud Firestore backend
//!
//! Talks to the Firestore REST API with an API key. Writes go through
//! `documents:commit` so the server can stamp timestamp fields with
//! `REQUEST_TIME` in the same request. New document keys are generated on
//! the client, the same way the Firestore SDKs do it.

pub mod value;

use super::{Document, RemoteCollection, WriteRequest};
use crate::config::{
    FirestoreConfig, AUTO_ID_LENGTH, FIRESTORE_BASE_URL, FIRESTORE_PAGE_SIZE, FIRESTORE_TIMEOUT,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};

const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random document key in the Firestore auto-ID format
pub fn auto_id() -> String {
    let mut rng = rand::thread_rng();
    (0..AUTO_ID_LENGTH)
        .map(|_| AUTO_ID_ALPHABET[rng.gen_range(0..AUTO_ID_ALPHABET.len())] as char)
        .collect()
}

/// Build the shared HTTP client for all Firestore collections
pub fn http_client() -> Result<Client> {
    Ok(Client::builder().timeout(FIRESTORE_TIMEOUT).build()?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RawDocument {
    fn into_document(self) -> Result<Document> {
        let key = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Document {
            key,
            fields: value::decode_fields(&self.fields)?,
        })
    }
}

#[derive(Clone)]
pub struct FirestoreCollection {
    client: Client,
    config: FirestoreConfig,
    name: String,
}

impl FirestoreCollection {
    pub fn new(client: Client, config: FirestoreConfig, name: impl Into<String>) -> Self {
        Self {
            client,
            config,
            name: name.into(),
        }
    }

    /// Full resource name of a document
    fn document_name(&self, key: &str) -> String {
        format!("{}/{}/{}", self.config.documents_path(), self.name, key)
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/{}/{}",
            FIRESTORE_BASE_URL,
            self.config.documents_path(),
            self.name
        )
    }

    fn document_url(&self, key: &str) -> String {
        format!("{}/{}", FIRESTORE_BASE_URL, self.document_name(key))
    }

    fn commit_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents:commit",
            FIRESTORE_BASE_URL, self.config.project_id, self.config.database
        )
    }

    /// Commit body for a single write.
    ///
    /// `must_exist` selects between create (`exists: false`, whole document)
    /// and update (`exists: true`, masked to the written fields).
    fn commit_body(&self, key: &str, write: &WriteRequest, must_exist: bool) -> Value {
        let mut entry = Map::new();
        entry.insert(
            "update".into(),
            json!({
                "name": self.document_name(key),
                "fields": value::encode_fields(&write.fields),
            }),
        );

        if must_exist {
            let paths: Vec<&String> = write.fields.keys().collect();
            entry.insert("updateMask".into(), json!({ "fieldPaths": paths }));
        }

        entry.insert("currentDocument".into(), json!({ "exists": must_exist }));

        if !write.server_timestamps.is_empty() {
            let transforms: Vec<Value> = write
                .server_timestamps
                .iter()
                .map(|field| json!({ "fieldPath": field, "setToServerValue": "REQUEST_TIME" }))
                .collect();
            entry.insert("updateTransforms".into(), Value::Array(transforms));
        }

        json!({ "writes": [Value::Object(entry)] })
    }

    /// Decode one listing page, skipping documents with malformed values
    fn decode_page(&self, page: Vec<RawDocument>) -> Vec<Document> {
        page.into_iter()
            .filter_map(|raw| {
                let name = raw.name.clone();
                match raw.into_document() {
                    Ok(document) => Some(document),
                    Err(e) => {
                        tracing::warn!("Skipping undecodable document {}: {}", name, e);
                        None
                    }
                }
            })
            .collect()
    }

    async fn commit(&self, body: Value) -> Result<()> {
        let response = self
            .client
            .post(self.commit_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        check(response, "commit").await?;
        Ok(())
    }
}

/// Turn a non-success response into a remote error carrying the body
async fn check(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(format!("Firestore {}: {}", action, body)));
    }
    Err(AppError::Remote(format!(
        "Firestore {} failed ({}): {}",
        action, status, body
    )))
}

#[async_trait]
impl RemoteCollection for FirestoreCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let page_size = FIRESTORE_PAGE_SIZE.to_string();

        loop {
            let mut query = vec![
                ("key", self.config.api_key.as_str()),
                ("pageSize", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response = self
                .client
                .get(self.collection_url())
                .query(&query)
                .send()
                .await?;

            let page: ListResponse = check(response, "list").await?.json().await?;

            documents.extend(self.decode_page(page.documents));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), self.name);
        Ok(documents)
    }

    async fn create(&self, write: WriteRequest) -> Result<String> {
        let key = auto_id();
        self.commit(self.commit_body(&key, &write, false)).await?;

        tracing::debug!("Created document {}/{}", self.name, key);
        Ok(key)
    }

    async fn update(&self, key: &str, write: WriteRequest) -> Result<()> {
        self.commit(self.commit_body(key, &write, true)).await?;

        tracing::debug!("Updated document {}/{}", self.name, key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.document_url(key))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        check(response, "delete").await?;

        tracing::debug!("Deleted document {}/{}", self.name, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> FirestoreCollection {
        FirestoreCollection::new(
            Client::new(),
            FirestoreConfig {
                project_id: "demo".into(),
                api_key: "key".into(),
                database: "(default)".into(),
            },
            "reviews",
        )
    }

    fn write(value: Value) -> WriteRequest {
        WriteRequest::new(value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_auto_id_format() {
        let id = auto_id();
        assert_eq!(id.len(), AUTO_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, auto_id());
    }

    #[test]
    fn test_urls() {
        let c = collection();
        assert_eq!(
            c.collection_url(),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/reviews"
        );
        assert_eq!(
            c.document_url("abc"),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/reviews/abc"
        );
        assert_eq!(
            c.commit_url(),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents:commit"
        );
    }

    #[test]
    fn test_create_body_has_precondition_and_transforms() {
        let c = collection();
        let body = c.commit_body(
            "abc",
            &write(json!({"place_name": "Beach", "score": 3}))
                .stamped(&["created_at", "updated_at"]),
            false,
        );

        let entry = &body["writes"][0];
        assert_eq!(
            entry["update"]["name"],
            json!("projects/demo/databases/(default)/documents/reviews/abc")
        );
        assert_eq!(
            entry["update"]["fields"]["score"],
            json!({"integerValue": "3"})
        );
        assert_eq!(entry["currentDocument"], json!({"exists": false}));
        assert!(entry.get("updateMask").is_none());
        assert_eq!(
            entry["updateTransforms"][1],
            json!({"fieldPath": "updated_at", "setToServerValue": "REQUEST_TIME"})
        );
    }

    #[test]
    fn test_update_body_is_masked() {
        let c = collection();
        let body = c.commit_body("abc", &write(json!({"status": "inactive"})), true);

        let entry = &body["writes"][0];
        assert_eq!(entry["updateMask"], json!({"fieldPaths": ["status"]}));
        assert_eq!(entry["currentDocument"], json!({"exists": true}));
        assert!(entry.get("updateTransforms").is_none());
    }

    #[test]
    fn test_list_response_decoding() {
        let page: ListResponse = serde_json::from_value(json!({
            "documents": [{
                "name": "projects/demo/databases/(default)/documents/reviews/k1",
                "fields": {"place_name": {"stringValue": "Beach"}},
                "createTime": "2024-01-01T00:00:00Z"
            }],
            "nextPageToken": "next"
        }))
        .unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("next"));
        let doc = page.documents.into_iter().next().unwrap().into_document().unwrap();
        assert_eq!(doc.key, "k1");
        assert_eq!(doc.fields["place_name"], json!("Beach"));

        let empty: ListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.documents.is_empty());
    }

    #[test]
    fn test_malformed_document_is_skipped() {
        let page: ListResponse = serde_json::from_value(json!({
            "documents": [
                {
                    "name": "projects/demo/databases/(default)/documents/reviews/bad",
                    "fields": {"place_name": {"vectorValue": {}}}
                },
                {
                    "name": "projects/demo/databases/(default)/documents/reviews/good",
                    "fields": {"place_name": {"stringValue": "Beach"}}
                }
            ]
        }))
        .unwrap();

        let documents = collection().decode_page(page.documents);
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].key, "good");
    }
}

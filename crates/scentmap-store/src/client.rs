//! HTTP client for the Firestore REST API.
//!
//! Wraps `reqwest` with project-scoped URL building, optional API key and
//! bearer credentials, and typed-value (de)serialization. The client is built
//! once from configuration and shared by handle; it holds no global state.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use scentmap_core::app_config::FirestoreSettings;
use scentmap_core::{assign_images, Category, EnhancedPlaceData, HotplaceDestination, PaymentRecord};

use crate::error::StoreError;
use crate::value::{self, Document, Fields, FirestoreValue};

pub const HOTPLACES: &str = "hotplaces";
pub const PAYMENTS: &str = "payments";

const PAGE_SIZE: &str = "300";

/// Client for one Firestore database.
///
/// Use [`FirestoreClient::new`] with loaded settings, or
/// [`FirestoreClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    database_url: Url,
    api_key: Option<String>,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    fields: &'a Fields,
}

impl FirestoreClient {
    /// Creates a client from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`StoreError::InvalidBaseUrl`] for a malformed base URL.
    pub fn new(settings: &FirestoreSettings, timeout_secs: u64) -> Result<Self, StoreError> {
        let mut client =
            Self::with_base_url(&settings.project_id, timeout_secs, &settings.base_url)?;
        client.api_key.clone_from(&settings.api_key);
        client.auth_token.clone_from(&settings.auth_token);
        Ok(client)
    }

    /// Creates an unauthenticated client against a custom base URL (for
    /// testing with wiremock or the Firestore emulator).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`StoreError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_base_url(
        project_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("scentmap/0.1 (catalog)")
            .build()?;

        let raw = format!(
            "{}/projects/{project_id}/databases/(default)",
            base_url.trim_end_matches('/')
        );
        let database_url =
            Url::parse(&raw).map_err(|e| StoreError::InvalidBaseUrl(format!("'{raw}': {e}")))?;
        if database_url.cannot_be_a_base() {
            return Err(StoreError::InvalidBaseUrl(raw));
        }

        Ok(Self {
            client,
            database_url,
            api_key: None,
            auth_token: None,
        })
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Fetches every catalog entry, following `nextPageToken` until the
    /// listing is exhausted.
    ///
    /// Documents that fail to decode are logged and skipped so one bad record
    /// cannot take the whole catalog down.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a page request fails or a page body is not
    /// a valid listing.
    pub async fn get_all(&self) -> Result<Vec<HotplaceDestination>, StoreError> {
        let mut places = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![("pageSize", PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }
            let url = self.url(&["documents", HOTPLACES], &params)?;
            let body = self.send(self.client.get(url)).await?;
            let page: ListDocumentsResponse =
                serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
                    context: format!("list {HOTPLACES}"),
                    source: e,
                })?;

            places.extend(page.documents.iter().filter_map(decode_or_skip));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(count = places.len(), "loaded catalog from Firestore");
        Ok(places)
    }

    /// Fetches one entry by document id. A 404 yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, any other non-2xx status,
    /// or when the document does not decode into a place.
    pub async fn get(&self, id: &str) -> Result<Option<HotplaceDestination>, StoreError> {
        let url = self.url(&["documents", HOTPLACES, id], &[])?;
        let body = match self.send(self.client.get(url)).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let doc = parse_document(&body, id)?;
        decode_place(&doc).map(Some)
    }

    /// Entries whose `location.region` equals `region`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query request fails.
    pub async fn get_by_region(
        &self,
        region: &str,
    ) -> Result<Vec<HotplaceDestination>, StoreError> {
        self.query_equal(
            "location.region",
            FirestoreValue::StringValue(region.to_string()),
        )
        .await
    }

    /// Entries in `category`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query request fails.
    pub async fn get_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<HotplaceDestination>, StoreError> {
        self.query_equal(
            "category",
            FirestoreValue::StringValue(category.as_str().to_string()),
        )
        .await
    }

    /// Adds a new entry and returns its generated id.
    ///
    /// The caller's `id` is ignored. Entries without images get three
    /// `/images/places/<stem>-<n>.jpg` paths derived from the name, and both
    /// `createdAt` and `updatedAt` are stamped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the create request fails.
    pub async fn add(&self, place: &HotplaceDestination) -> Result<String, StoreError> {
        let mut draft = place.clone();
        draft.images = assign_images(&draft.name, &draft.images);

        let mut fields = encode(&draft, "place")?;
        fields.remove("id");
        let now = value::timestamp(Utc::now());
        fields.insert("createdAt".to_string(), now.clone());
        fields.insert("updatedAt".to_string(), now);

        let id = self.create(HOTPLACES, &fields).await?;
        tracing::info!(id = %id, name = %place.name, "added place");
        Ok(id)
    }

    /// Replaces `enhancedData` on an existing entry and bumps `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnexpectedStatus`] with 404 when the entry does
    /// not exist, or another [`StoreError`] if the update fails.
    pub async fn update_enhanced_data(
        &self,
        id: &str,
        data: &EnhancedPlaceData,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_value(data).map_err(|e| StoreError::Encode {
            context: format!("enhancedData for {id}"),
            reason: e.to_string(),
        })?;

        let mut fields = Fields::new();
        fields.insert("enhancedData".to_string(), value::from_json(&json));
        fields.insert("updatedAt".to_string(), value::timestamp(Utc::now()));

        let url = self.url(
            &["documents", HOTPLACES, id],
            &[
                ("updateMask.fieldPaths", "enhancedData"),
                ("updateMask.fieldPaths", "updatedAt"),
                ("currentDocument.exists", "true"),
            ],
        )?;
        self.send(self.client.patch(url).json(&WriteBody { fields: &fields }))
            .await?;
        tracing::debug!(id, "stored enhanced data");
        Ok(())
    }

    /// Deletes an entry. Deleting a missing id succeeds, as Firestore does.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the delete request fails.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.url(&["documents", HOTPLACES, id], &[])?;
        self.send(self.client.delete(url)).await?;
        tracing::info!(id, "deleted place");
        Ok(())
    }

    /// Writes a payment audit record and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the create request fails.
    pub async fn add_payment_record(&self, record: &PaymentRecord) -> Result<String, StoreError> {
        let mut fields = encode(record, "payment record")?;
        for (key, at) in [
            ("createdAt", Some(record.created_at)),
            ("updatedAt", Some(record.updated_at)),
            ("requestedAt", record.requested_at),
            ("approvedAt", record.approved_at),
        ] {
            if let Some(at) = at {
                fields.insert(key.to_string(), value::timestamp(at));
            }
        }
        self.create(PAYMENTS, &fields).await
    }

    /// Cheap reachability probe: lists at most one catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when Firestore cannot be reached or refuses.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let url = self.url(&["documents", HOTPLACES], &[("pageSize", "1")])?;
        self.send(self.client.get(url)).await.map(|_| ())
    }

    async fn create(&self, collection: &str, fields: &Fields) -> Result<String, StoreError> {
        let url = self.url(&["documents", collection], &[])?;
        let body = self
            .send(self.client.post(url).json(&WriteBody { fields }))
            .await?;
        let doc = parse_document(&body, collection)?;
        Ok(doc.id().to_string())
    }

    async fn query_equal(
        &self,
        field_path: &str,
        value: FirestoreValue,
    ) -> Result<Vec<HotplaceDestination>, StoreError> {
        let query = serde_json::json!({
            "structuredQuery": {
                "from": [{ "collectionId": HOTPLACES }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field_path },
                        "op": "EQUAL",
                        "value": value,
                    }
                }
            }
        });

        let url = self.url(&["documents:runQuery"], &[])?;
        let body = self.send(self.client.post(url).json(&query)).await?;
        let items: Vec<RunQueryItem> =
            serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
                context: format!("runQuery({field_path})"),
                source: e,
            })?;

        Ok(items
            .iter()
            .filter_map(|item| item.document.as_ref())
            .filter_map(decode_or_skip)
            .collect())
    }

    /// Builds `<database>/<segments...>?key=..&<params>`; each segment is
    /// percent-encoded by [`Url::path_segments_mut`].
    fn url(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, StoreError> {
        let mut url = self.database_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidBaseUrl(self.database_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        if self.api_key.is_some() || !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends the request and returns the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] on network failure or
    /// [`StoreError::UnexpectedStatus`] for a non-2xx reply.
    async fn send(&self, request: RequestBuilder) -> Result<String, StoreError> {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn encode<T: Serialize>(item: &T, context: &str) -> Result<Fields, StoreError> {
    match serde_json::to_value(item) {
        Ok(serde_json::Value::Object(object)) => Ok(value::object_to_fields(&object)),
        Ok(_) => Err(StoreError::Encode {
            context: context.to_string(),
            reason: "not a JSON object".to_string(),
        }),
        Err(e) => Err(StoreError::Encode {
            context: context.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn parse_document(body: &str, context: &str) -> Result<Document, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Deserialize {
        context: format!("document {context}"),
        source: e,
    })
}

fn decode_place(doc: &Document) -> Result<HotplaceDestination, StoreError> {
    let mut json = doc.to_json();
    if let Some(object) = json.as_object_mut() {
        object.insert(
            "id".to_string(),
            serde_json::Value::String(doc.id().to_string()),
        );
    }
    serde_json::from_value(json).map_err(|e| StoreError::Deserialize {
        context: format!("place {}", doc.id()),
        source: e,
    })
}

fn decode_or_skip(doc: &Document) -> Option<HotplaceDestination> {
    match decode_place(doc) {
        Ok(place) => Some(place),
        Err(e) => {
            tracing::warn!(id = doc.id(), error = %e, "skipping undecodable place document");
            None
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

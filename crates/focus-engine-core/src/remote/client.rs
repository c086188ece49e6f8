use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::Table;
use crate::error::RemoteError;
use crate::notify::PushSubscription;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// REST client for the remote backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base: Url,
    key: String,
}

impl RestClient {
    /// Validate credentials and build a client. Makes no network call.
    ///
    /// # Errors
    /// Returns an error if the URL or key is missing, or the URL is not
    /// an absolute http(s) URL.
    pub fn new(url: &str, key: &str) -> Result<Self, RemoteError> {
        let url = url.trim();
        let key = key.trim();
        if url.is_empty() {
            return Err(RemoteError::MissingCredentials("url"));
        }
        if key.is_empty() {
            return Err(RemoteError::MissingCredentials("key"));
        }

        let invalid = |message: String| RemoteError::InvalidUrl {
            url: url.to_string(),
            message,
        };
        let mut base = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base,
            key: key.to_string(),
        })
    }

    /// Build a client and check the server answers with these credentials.
    pub async fn connect(url: &str, key: &str) -> Result<Self, RemoteError> {
        let client = Self::new(url, key)?;
        client.probe().await?;
        Ok(client)
    }

    fn endpoint(&self, table: Table, query: &str) -> Result<Url, RemoteError> {
        let path = format!("rest/v1/{}{}", table.name(), query);
        self.base.join(&path).map_err(|e| RemoteError::InvalidUrl {
            url: self.base.to_string(),
            message: e.to_string(),
        })
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Accept", "application/json")
    }

    async fn check(resp: Response) -> Result<Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Cheapest authenticated read.
    pub async fn probe(&self) -> Result<(), RemoteError> {
        let url = self.endpoint(Table::Days, "?select=id&limit=1")?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        Self::check(resp).await?;
        debug!(base = %self.base, "remote reachable");
        Ok(())
    }

    /// Every row of `table`, oldest first.
    pub async fn list<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>, RemoteError> {
        let url = self.endpoint(table, "?select=*&order=created_at.asc")?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        let rows = Self::check(resp).await?.json::<Vec<T>>().await?;
        debug!(table = %table, rows = rows.len(), "remote list");
        Ok(rows)
    }

    /// Insert one row and return it as stored.
    pub async fn insert(&self, table: Table, row: &Value) -> Result<Value, RemoteError> {
        let url = self.endpoint(table, "")?;
        let resp = self
            .authorized(self.http.post(url))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        first_row(Self::check(resp).await?).await
    }

    /// Apply `patch` to the row with `id`.
    pub async fn update(&self, table: Table, id: &str, patch: &Value) -> Result<Value, RemoteError> {
        let url = self.endpoint(table, &id_filter(id))?;
        let resp = self
            .authorized(self.http.patch(url))
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        first_row(Self::check(resp).await?).await
    }

    pub async fn delete(&self, table: Table, id: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(table, &id_filter(id))?;
        let resp = self.authorized(self.http.delete(url)).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Insert or refresh a push subscription, keyed on its endpoint.
    pub async fn upsert_push_subscription(
        &self,
        subscription: &PushSubscription,
    ) -> Result<Value, RemoteError> {
        let url = self.endpoint(Table::PushSubscriptions, "?on_conflict=endpoint")?;
        let resp = self
            .authorized(self.http.post(url))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&subscription.to_row())
            .send()
            .await?;
        first_row(Self::check(resp).await?).await
    }
}

fn id_filter(id: &str) -> String {
    format!("?id=eq.{}", urlencoding::encode(id))
}

async fn first_row(resp: Response) -> Result<Value, RemoteError> {
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(&text).map_err(|e| RemoteError::Api {
        status: 200,
        message: format!("unreadable response: {e}"),
    })?;
    Ok(match value {
        Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
        Value::Array(_) => Value::Null,
        other => other,
    })
}

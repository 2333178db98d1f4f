use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::auth::Session;

/// Errors surfaced by the gateway client.
///
/// The gateway is an external collaborator: every failure here is either a
/// transport problem, a non-success status it returned, or a row-count
/// mismatch on an exact-one-row lookup.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("expected exactly one row")]
    RowNotFound,
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Typed client for the managed data/auth gateway.
///
/// Rows live in gateway tables queried over REST with filter/order/range
/// primitives; sessions come from the gateway's token endpoints. The project
/// api key rides on every request, and a per-request bearer token scopes
/// writes to the session that issued them.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GatewayClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Start a query against a gateway table.
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder {
            client: self.clone(),
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: None,
            range: None,
            token: None,
        }
    }

    /// The gateway's token endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

pub struct QueryBuilder {
    client: GatewayClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    range: Option<(u64, u64)>,
    token: Option<String>,
}

impl QueryBuilder {
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn in_list<T: ToString>(mut self, column: &str, values: &[T]) -> Self {
        let list = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.to_string(), format!("in.({list})")));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        let direction = match order {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        };
        self.order = Some(format!("{column}.{direction}"));
        self
    }

    /// Inclusive offset window of rows to return.
    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some((from, to));
        self
    }

    /// Attach a bearer token so the gateway applies its row-level rules
    /// for that identity.
    pub fn authorized(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(select) = &self.select {
            pairs.push(("select".to_string(), select.clone()));
        }
        for (column, predicate) in &self.filters {
            pairs.push((column.clone(), predicate.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        pairs
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        let url = self.client.table_url(&self.table);
        let bearer = self.token.as_deref().unwrap_or(&self.client.api_key);

        let mut req = self
            .client
            .http
            .request(method, url)
            .header("apikey", &self.client.api_key)
            .bearer_auth(bearer)
            .query(&self.query_pairs());

        if let Some((from, to)) = self.range {
            req = req.header("Range", format!("{from}-{to}"));
        }

        req
    }

    /// Fetch all rows matching the query.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, GatewayError> {
        let resp = send(self.request(Method::GET)).await?;
        Ok(resp.json().await?)
    }

    /// Fetch at most one row; `Ok(None)` when nothing matches.
    pub async fn fetch_maybe<T: DeserializeOwned>(self) -> Result<Option<T>, GatewayError> {
        let rows: Vec<T> = self.range(0, 0).fetch().await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch exactly one row.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, GatewayError> {
        self.fetch_maybe().await?.ok_or(GatewayError::RowNotFound)
    }

    /// Insert a row and return the stored representation.
    pub async fn insert<T: DeserializeOwned, B: Serialize>(self, row: &B) -> Result<T, GatewayError> {
        let req = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(row);
        let resp = send(req).await?;
        let mut rows: Vec<T> = resp.json().await?;
        if rows.is_empty() {
            return Err(GatewayError::RowNotFound);
        }
        Ok(rows.remove(0))
    }

    /// Delete the rows matching the filters and return them.
    ///
    /// An empty result means nothing matched (wrong id, or a row the
    /// acting identity may not touch).
    pub async fn delete<T: DeserializeOwned>(self) -> Result<Vec<T>, GatewayError> {
        let req = self
            .request(Method::DELETE)
            .header("Prefer", "return=representation");
        let resp = send(req).await?;
        Ok(resp.json().await?)
    }
}

async fn send(req: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::Status { status: status.as_u16(), body });
    }
    Ok(resp)
}

pub struct AuthApi<'a> {
    client: &'a GatewayClient,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

impl AuthApi<'_> {
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let req = self
            .client
            .http
            .post(self.client.auth_url("signup"))
            .header("apikey", &self.client.api_key)
            .json(&PasswordGrant { email, password });
        let resp = send(req).await?;
        Ok(resp.json().await?)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let req = self
            .client
            .http
            .post(self.client.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.client.api_key)
            .json(&PasswordGrant { email, password });
        let resp = send(req).await?;
        Ok(resp.json().await?)
    }

    /// Revoke the session server-side.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        let req = self
            .client
            .http
            .post(self.client.auth_url("logout"))
            .header("apikey", &self.client.api_key)
            .bearer_auth(access_token);
        send(req).await?;
        Ok(())
    }
}

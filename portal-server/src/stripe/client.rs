//! Gateway REST client (no SDK dependency)
//!
//! Talks to the Stripe payment-intents API with form-encoded requests, the
//! secret key as basic auth and an idempotency key on creates. The
//! [`IntentGateway`] trait is the seam tests use to substitute a fake.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::stripe::types::{CreateIntentParams, GatewayError, GatewayErrorEnvelope, RemoteIntent};
use crate::utils::AppError;

const API_BASE: &str = "https://api.stripe.com/v1";

/// Remote intent operations the reconciler needs
#[async_trait]
pub trait IntentGateway: Send + Sync {
    async fn retrieve_intent(&self, intent_id: &str) -> Result<RemoteIntent, GatewayError>;

    async fn create_intent(&self, params: &CreateIntentParams)
        -> Result<RemoteIntent, GatewayError>;

    async fn update_intent_amount(
        &self,
        intent_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<RemoteIntent, GatewayError>;
}

/// REST client bound to one secret key
pub struct StripeClient {
    http: reqwest::Client,
    api_key: String,
}

impl StripeClient {
    pub fn new(api_key: &str, timeout_ms: u64) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build gateway client: {e}")))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
        })
    }

    async fn decode(resp: reqwest::Response) -> Result<RemoteIntent, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<RemoteIntent>()
                .await
                .map_err(|e| GatewayError::Unavailable(format!("invalid gateway response: {e}")));
        }

        let body = resp
            .json::<GatewayErrorEnvelope>()
            .await
            .map(|env| env.error)
            .unwrap_or_default();

        if status == reqwest::StatusCode::NOT_FOUND
            || body.code.as_deref() == Some("resource_missing")
        {
            return Err(GatewayError::RemoteMissing);
        }

        let message = body
            .message
            .unwrap_or_else(|| format!("gateway returned {status}"));
        if status.is_client_error() {
            Err(GatewayError::Rejected(message))
        } else {
            Err(GatewayError::Unavailable(message))
        }
    }

    fn transport_error(e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Unavailable("gateway request timed out".to_string())
        } else {
            GatewayError::Unavailable(format!("gateway request failed: {e}"))
        }
    }
}

#[async_trait]
impl IntentGateway for StripeClient {
    async fn retrieve_intent(&self, intent_id: &str) -> Result<RemoteIntent, GatewayError> {
        let resp = self
            .http
            .get(format!("{API_BASE}/payment_intents/{intent_id}"))
            .basic_auth(&self.api_key, None::<&str>)
            .send()
            .await
            .map_err(Self::transport_error)?;
        Self::decode(resp).await
    }

    async fn create_intent(
        &self,
        params: &CreateIntentParams,
    ) -> Result<RemoteIntent, GatewayError> {
        let amount = params.amount_cents.to_string();
        let currency = params.currency.to_lowercase();
        let payment_id = params.payment_id.to_string();
        let order_id = params.order_id.to_string();
        let user_id = params.user_id.to_string();
        let group_id = params.group_id.map(|g| g.to_string()).unwrap_or_default();

        let mut form: Vec<(&str, &str)> = vec![
            ("amount", &amount),
            ("currency", &currency),
            ("automatic_payment_methods[enabled]", "true"),
            ("metadata[payment_id]", &payment_id),
            ("metadata[order_id]", &order_id),
            ("metadata[order_number]", &params.order_number),
            ("metadata[user_id]", &user_id),
        ];
        if params.group_id.is_some() {
            form.push(("metadata[group_id]", &group_id));
        }

        let resp = self
            .http
            .post(format!("{API_BASE}/payment_intents"))
            .basic_auth(&self.api_key, None::<&str>)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form)
            .send()
            .await
            .map_err(Self::transport_error)?;
        Self::decode(resp).await
    }

    async fn update_intent_amount(
        &self,
        intent_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<RemoteIntent, GatewayError> {
        let amount = amount_cents.to_string();
        let currency = currency.to_lowercase();
        let form: Vec<(&str, &str)> = vec![("amount", &amount), ("currency", &currency)];

        let resp = self
            .http
            .post(format!("{API_BASE}/payment_intents/{intent_id}"))
            .basic_auth(&self.api_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(Self::transport_error)?;
        Self::decode(resp).await
    }
}

/// Per-credential client cache
///
/// Clients are memoized by secret key so repeated intent calls reuse the
/// same connection pool; rotating the configured key naturally builds a new
/// client.
#[derive(Clone)]
pub struct GatewayFactory {
    timeout_ms: u64,
    clients: Arc<DashMap<String, Arc<StripeClient>>>,
}

impl GatewayFactory {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            clients: Arc::new(DashMap::new()),
        }
    }

    /// Get or build the client for `api_key`
    pub fn client(&self, api_key: &str) -> Result<Arc<StripeClient>, AppError> {
        if let Some(existing) = self.clients.get(api_key) {
            return Ok(existing.clone());
        }
        let client = Arc::new(StripeClient::new(api_key, self.timeout_ms)?);
        self.clients
            .insert(api_key.to_string(), client.clone());
        Ok(client)
    }
}

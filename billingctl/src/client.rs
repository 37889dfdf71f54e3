//! HTTP client for communicating with the billing API.

use std::time::Duration;

use billing_core::{
    AddCardRequest, AddCardResponse, ApiResponse, BillingError, CardCollection, CardsResponse,
    Result, Scope, SetDefaultRequest,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Translate a transport-level failure into an API error message.
fn connection_error(endpoint: &str, error: reqwest::Error) -> BillingError {
    if error.is_timeout() {
        BillingError::Api(format!("Request to {} timed out", endpoint))
    } else if error.is_connect() {
        BillingError::Api(format!("Could not connect to the billing API: {}", error))
    } else {
        BillingError::Api(format!("Request to {} failed: {}", endpoint, error))
    }
}

/// HTTP client for the billing API's card endpoints.
///
/// Every request carries the account's bearer token, and team-scoped
/// accounts add a `teamId` query parameter. Requests are sent exactly
/// once: there is no retry layer, and a failed mutation is reported
/// rather than replayed.
#[derive(Debug)]
pub struct CardsClient {
    client: Client,
    base_url: String,
    scope: Scope,
}

impl CardsClient {
    /// Create a new client for the given API URL and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be sent as an HTTP header or
    /// the HTTP client cannot be created.
    pub fn new(base_url: &str, token: &str, scope: Scope, timeout_secs: u64) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            BillingError::Config("API token contains characters that cannot be sent".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .user_agent(format!("billingctl/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BillingError::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_url(base_url),
            scope,
        })
    }

    /// The team or user the client operates on.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Attach the team scope to a request when the account is team-owned.
    fn scoped(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.scope {
            Scope::Team(slug) => request.query(&[("teamId", slug.as_str())]),
            Scope::User(_) => request,
        }
    }

    /// Process an HTTP response and extract the API data.
    ///
    /// Error statuses still carry the response envelope when the API
    /// produced them; that message is preferred over the bare status code.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP status code indicates failure (4xx or 5xx)
    /// - The response body cannot be read
    /// - The JSON cannot be deserialized
    /// - The API returns an error response
    async fn handle_response<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            BillingError::Api(format!(
                "Failed to read response body from {}: {}",
                endpoint, e
            ))
        })?;

        if !status.is_success() {
            if let Ok(ApiResponse::Error { error }) =
                serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            {
                return Err(BillingError::Api(error));
            }
            let message = match status {
                StatusCode::UNAUTHORIZED => {
                    format!("Unauthorized access to {}: check your API token", endpoint)
                }
                StatusCode::FORBIDDEN => format!("Access forbidden to {}", endpoint),
                StatusCode::NOT_FOUND => format!("Endpoint {} not found", endpoint),
                StatusCode::SERVICE_UNAVAILABLE => format!("Service unavailable at {}", endpoint),
                _ => format!("HTTP {} error at {}: {}", status, endpoint, text),
            };
            return Err(BillingError::Api(message));
        }

        let api_response: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
            BillingError::Api(format!(
                "Failed to parse JSON response from {}: {}",
                endpoint, e
            ))
        })?;

        match api_response {
            ApiResponse::Success { data } => Ok(data),
            ApiResponse::Error { error } => Err(BillingError::Api(error)),
        }
    }

    /// Retrieve all cards on the account along with the default card id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the listing is
    /// inconsistent (a default card id naming no listed card).
    pub async fn list_cards(&self) -> Result<CardCollection> {
        let url = format!("{}/api/v1/cards", self.base_url);
        let endpoint = "cards";

        let response = self
            .scoped(self.client.get(&url))
            .send()
            .await
            .map_err(|e| connection_error(endpoint, e))?;

        let cards: CardsResponse = Self::handle_response(response, endpoint).await?;
        let collection = CardCollection::from(cards);
        collection
            .validate()
            .map_err(|e| BillingError::Api(format!("Inconsistent card listing: {}", e)))?;
        Ok(collection)
    }

    /// Make an existing card the account default.
    ///
    /// The id is sent as-is; the server decides whether it names a card.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or the server rejects it.
    pub async fn set_default_card(&self, card_id: &str) -> Result<()> {
        if card_id.trim().is_empty() {
            return Err(BillingError::InvalidInput(
                "Card id cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/api/v1/cards/default", self.base_url);
        let endpoint = "cards/default";
        let request = SetDefaultRequest {
            card_id: card_id.to_string(),
        };

        let response = self
            .scoped(self.client.post(&url).json(&request))
            .send()
            .await
            .map_err(|e| connection_error(endpoint, e))?;

        Self::handle_response(response, endpoint)
            .await
            .map(|_: ()| ())
    }

    /// Detach a card from the account.
    ///
    /// The id is sent as-is; the server decides whether it names a card.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or the server rejects it.
    pub async fn remove_card(&self, card_id: &str) -> Result<()> {
        if card_id.trim().is_empty() {
            return Err(BillingError::InvalidInput(
                "Card id cannot be empty".to_string(),
            ));
        }

        let encoded_id = card_id.replace(' ', "%20").replace('&', "%26");
        let url = format!("{}/api/v1/cards/{}", self.base_url, encoded_id);
        let endpoint = &format!("cards/{}", card_id);

        let response = self
            .scoped(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| connection_error(endpoint, e))?;

        Self::handle_response(response, endpoint)
            .await
            .map(|_: ()| ())
    }

    /// Attach a new card to the account.
    ///
    /// # Returns
    ///
    /// Returns the stored card along with the default card id after the
    /// addition (the server promotes the first card on an empty account).
    pub async fn add_card(&self, request: &AddCardRequest) -> Result<AddCardResponse> {
        let url = format!("{}/api/v1/cards", self.base_url);
        let endpoint = "cards";

        let response = self
            .scoped(self.client.post(&url).json(request))
            .send()
            .await
            .map_err(|e| connection_error(endpoint, e))?;

        Self::handle_response(response, endpoint).await
    }

    /// Release the API session. Every command path calls this exactly
    /// once before the process exits.
    pub fn close(self) {
        // Dropping the inner client tears down its connection pool.
    }
}

//! Test utilities for CLI testing
//!
//! Provides a mock billing server and a scripted prompter for driving
//! the interactive flows without a terminal.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use billing_core::{
    AddCardRequest, AddCardResponse, ApiResponse, Card, CardsResponse, SetDefaultRequest,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Mock server state
#[derive(Debug, Clone, Default)]
pub struct MockServerState {
    /// Cards currently on the account
    pub cards: Arc<Mutex<Vec<Card>>>,
    /// Id of the current default card
    pub default_card_id: Arc<Mutex<Option<String>>>,
    /// Number of list requests received
    pub list_calls: Arc<Mutex<usize>>,
    /// Number of set-default requests received
    pub set_default_calls: Arc<Mutex<usize>>,
    /// Number of remove requests received
    pub remove_calls: Arc<Mutex<usize>>,
    /// Number of add requests received
    pub add_calls: Arc<Mutex<usize>>,
    /// When set, the next request fails with this message (one-shot)
    pub fail_next: Arc<Mutex<Option<String>>>,
    /// teamId query parameter seen on the most recent request
    pub last_team_id: Arc<Mutex<Option<String>>>,
    /// Counter used to mint card ids
    next_id: Arc<Mutex<usize>>,
}

impl MockServerState {
    /// Arrange for the next request to fail with an API error.
    pub fn fail_next_request(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// Snapshot of the cards on the account.
    pub fn cards(&self) -> Vec<Card> {
        self.cards.lock().unwrap().clone()
    }

    /// The current default card id.
    pub fn default_card_id(&self) -> Option<String> {
        self.default_card_id.lock().unwrap().clone()
    }

    /// Number of list requests received so far.
    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    /// Number of set-default requests received so far.
    pub fn set_default_calls(&self) -> usize {
        *self.set_default_calls.lock().unwrap()
    }

    /// Number of remove requests received so far.
    pub fn remove_calls(&self) -> usize {
        *self.remove_calls.lock().unwrap()
    }

    /// Number of add requests received so far.
    pub fn add_calls(&self) -> usize {
        *self.add_calls.lock().unwrap()
    }

    /// teamId seen on the most recent request, if any.
    pub fn last_team_id(&self) -> Option<String> {
        self.last_team_id.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Option<String> {
        self.fail_next.lock().unwrap().take()
    }

    fn record_scope(&self, team_id: Option<String>) {
        *self.last_team_id.lock().unwrap() = team_id;
    }

    fn mint_id(&self) -> String {
        let mut next_id = self.next_id.lock().unwrap();
        let id = format!("card_{}", *next_id);
        *next_id += 1;
        id
    }
}

/// A realistic card for seeding test accounts. Ids follow the mock
/// server's own numbering ("card_1", "card_2", ...).
pub fn sample_card(n: usize) -> Card {
    let brands = ["Visa", "Mastercard", "American Express"];
    Card {
        id: format!("card_{}", n),
        brand: brands[(n.max(1) - 1) % brands.len()].to_string(),
        last4: format!("{:04}", 4240 + n),
        name: "Jane Doe".to_string(),
        address_line1: "123 Main St".to_string(),
        address_line2: None,
        address_city: "San Francisco".to_string(),
        address_state: Some("CA".to_string()),
        address_zip: "94107".to_string(),
        address_country: "USA".to_string(),
    }
}

/// `count` sample cards, ids "card_1" through "card_{count}".
pub fn sample_cards(count: usize) -> Vec<Card> {
    (1..=count).map(sample_card).collect()
}

/// Query parameters carrying the account scope
#[derive(Debug, Deserialize)]
struct ScopeQuery {
    #[serde(rename = "teamId")]
    team_id: Option<String>,
}

/// Mock billing server implementation
#[derive(Debug)]
pub struct MockBillingServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockBillingServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBillingServer {
    /// Create a mock server for an account with no cards.
    pub fn new() -> Self {
        let state = MockServerState::default();
        *state.next_id.lock().unwrap() = 1;
        Self { state, port: 0 }
    }

    /// Create a mock server seeded with cards and a default.
    pub fn with_cards(cards: Vec<Card>, default_card_id: Option<String>) -> Self {
        let server = Self::new();
        *server.state.next_id.lock().unwrap() = cards.len() + 1;
        *server.state.cards.lock().unwrap() = cards;
        *server.state.default_card_id.lock().unwrap() = default_card_id;
        server
    }

    /// Start the mock server and return the address
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    /// Create the mock server router
    fn create_router(&self) -> Router {
        Router::new()
            .route(
                "/api/v1/cards",
                get(list_cards_handler).post(add_card_handler),
            )
            .route("/api/v1/cards/default", post(set_default_handler))
            .route("/api/v1/cards/:id", delete(remove_card_handler))
            .with_state(self.state.clone())
    }
}

fn success<T: Serialize>(data: T) -> Response {
    Json(ApiResponse::success(data)).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::<()>::error(message.to_string()))).into_response()
}

// Handler functions

async fn list_cards_handler(
    State(state): State<MockServerState>,
    Query(query): Query<ScopeQuery>,
) -> Response {
    *state.list_calls.lock().unwrap() += 1;
    state.record_scope(query.team_id);

    if let Some(message) = state.take_failure() {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, &message);
    }

    let response = CardsResponse {
        cards: state.cards.lock().unwrap().clone(),
        default_card_id: state.default_card_id.lock().unwrap().clone(),
    };
    success(response)
}

async fn add_card_handler(
    State(state): State<MockServerState>,
    Query(query): Query<ScopeQuery>,
    Json(request): Json<AddCardRequest>,
) -> Response {
    *state.add_calls.lock().unwrap() += 1;
    state.record_scope(query.team_id);

    if let Some(message) = state.take_failure() {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, &message);
    }

    let card = Card {
        id: state.mint_id(),
        brand: infer_brand(&request.number).to_string(),
        last4: last4(&request.number),
        name: request.name,
        address_line1: request.address_line1,
        address_line2: request.address_line2,
        address_city: request.address_city,
        address_state: request.address_state,
        address_zip: request.address_zip,
        address_country: request.address_country,
    };

    state.cards.lock().unwrap().push(card.clone());

    // The first card on an account becomes its default.
    let mut default_card_id = state.default_card_id.lock().unwrap();
    if default_card_id.is_none() {
        *default_card_id = Some(card.id.clone());
    }

    success(AddCardResponse {
        card,
        default_card_id: default_card_id.clone(),
    })
}

async fn set_default_handler(
    State(state): State<MockServerState>,
    Query(query): Query<ScopeQuery>,
    Json(request): Json<SetDefaultRequest>,
) -> Response {
    *state.set_default_calls.lock().unwrap() += 1;
    state.record_scope(query.team_id);

    if let Some(message) = state.take_failure() {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, &message);
    }

    let known = state
        .cards
        .lock()
        .unwrap()
        .iter()
        .any(|card| card.id == request.card_id);
    if !known {
        return failure(
            StatusCode::NOT_FOUND,
            &format!("No such card: {}", request.card_id),
        );
    }

    *state.default_card_id.lock().unwrap() = Some(request.card_id);
    success(())
}

async fn remove_card_handler(
    Path(id): Path<String>,
    Query(query): Query<ScopeQuery>,
    State(state): State<MockServerState>,
) -> Response {
    *state.remove_calls.lock().unwrap() += 1;
    state.record_scope(query.team_id);

    if let Some(message) = state.take_failure() {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, &message);
    }

    let mut cards = state.cards.lock().unwrap();
    let Some(index) = cards.iter().position(|card| card.id == id) else {
        return failure(StatusCode::NOT_FOUND, &format!("No such card: {}", id));
    };
    cards.remove(index);

    // Removing the default promotes the first remaining card.
    let mut default_card_id = state.default_card_id.lock().unwrap();
    if default_card_id.as_deref() == Some(id.as_str()) {
        *default_card_id = cards.first().map(|card| card.id.clone());
    }

    success(())
}

fn infer_brand(number: &str) -> &'static str {
    if number.starts_with('4') {
        "Visa"
    } else if number.starts_with('5') {
        "Mastercard"
    } else if number.starts_with("34") || number.starts_with("37") {
        "American Express"
    } else {
        "Unknown"
    }
}

fn last4(number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    digits[digits.len().saturating_sub(4)..].to_string()
}

/// Prompter that answers from pre-scripted queues and panics on any
/// question it was not told to expect.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    selects: VecDeque<Option<String>>,
    confirms: VecDeque<bool>,
    inputs: VecDeque<Option<String>>,
    /// Number of selection menus shown
    pub select_calls: usize,
    /// Number of confirmations asked
    pub confirm_calls: usize,
    /// Number of inputs asked
    pub input_calls: usize,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next selection menu (`None` = abort).
    pub fn will_select(mut self, answer: Option<&str>) -> Self {
        self.selects.push_back(answer.map(str::to_string));
        self
    }

    /// Queue an answer for the next confirmation.
    pub fn will_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue an answer for the next input (`None` = left empty).
    pub fn will_input(mut self, answer: Option<&str>) -> Self {
        self.inputs.push_back(answer.map(str::to_string));
        self
    }
}

impl crate::prompt::Prompter for ScriptedPrompter {
    fn select(
        &mut self,
        _prompt: &str,
        items: &[crate::prompt::SelectItem],
    ) -> billing_core::Result<Option<String>> {
        self.select_calls += 1;
        let answer = self.selects.pop_front().expect("unexpected selection menu");
        if let Some(value) = &answer {
            assert!(
                items.iter().any(|item| &item.value == value),
                "scripted answer {:?} is not among the offered items",
                value
            );
        }
        Ok(answer)
    }

    fn confirm(&mut self, _prompt: &str, _default: bool) -> billing_core::Result<bool> {
        self.confirm_calls += 1;
        Ok(self.confirms.pop_front().expect("unexpected confirmation"))
    }

    fn input(&mut self, _prompt: &str, _allow_empty: bool) -> billing_core::Result<Option<String>> {
        self.input_calls += 1;
        Ok(self.inputs.pop_front().expect("unexpected input prompt"))
    }
}

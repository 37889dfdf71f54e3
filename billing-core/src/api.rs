//! API models for the billing REST API
//!
//! Request and response models exchanged with the billing server. The
//! envelope and request/response field names are camelCase on the wire;
//! card entities keep the legacy card-entry naming (see [`crate::Card`]).

use crate::types::{Card, CardCollection};
use serde::{Deserialize, Serialize};

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "success")]
    Success { data: T },
    #[serde(rename = "error")]
    Error { error: String },
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Create an error response
    pub fn error(error: String) -> Self {
        Self::Error { error }
    }
}

/// Card listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsResponse {
    /// All cards on the account
    pub cards: Vec<Card>,
    /// Id of the default card, if one is set
    #[serde(default)]
    pub default_card_id: Option<String>,
}

impl From<CardsResponse> for CardCollection {
    fn from(response: CardsResponse) -> Self {
        CardCollection {
            cards: response.cards,
            default_card_id: response.default_card_id,
        }
    }
}

/// Request to make an existing card the account default
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDefaultRequest {
    /// Id of the card to promote
    pub card_id: String,
}

/// Request to attach a new card to the account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCardRequest {
    /// Full card number
    pub number: String,
    /// Expiration month (1-12)
    pub exp_month: String,
    /// Expiration year (four digits)
    pub exp_year: String,
    /// Card verification code
    pub cvc: String,
    /// Cardholder name
    pub name: String,
    /// Street address, first line
    pub address_line1: String,
    /// Street address, second line (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// City
    pub address_city: String,
    /// State or province (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_state: Option<String>,
    /// Postal code
    pub address_zip: String,
    /// Country
    pub address_country: String,
}

/// Response to a card addition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCardResponse {
    /// The card as stored by the server
    pub card: Card,
    /// Id of the default card after the addition (the server promotes the
    /// first card added to an empty account)
    #[serde(default)]
    pub default_card_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        match response {
            ApiResponse::Success { data } => assert_eq!(data, "test data"),
            _ => panic!("Expected success response"),
        }
    }

    #[test]
    fn test_api_response_error() {
        let response: ApiResponse<()> = ApiResponse::error("test error".to_string());
        match response {
            ApiResponse::Error { error } => assert_eq!(error, "test error"),
            _ => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_api_response_envelope_decoding() {
        let success = r#"{"status":"success","data":{"cards":[],"defaultCardId":null}}"#;
        let decoded: ApiResponse<CardsResponse> = serde_json::from_str(success).unwrap();
        match decoded {
            ApiResponse::Success { data } => {
                assert!(data.cards.is_empty());
                assert!(data.default_card_id.is_none());
            }
            _ => panic!("Expected success response"),
        }

        let error = r#"{"status":"error","error":"card not found"}"#;
        let decoded: ApiResponse<CardsResponse> = serde_json::from_str(error).unwrap();
        match decoded {
            ApiResponse::Error { error } => assert_eq!(error, "card not found"),
            _ => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_cards_response_wire_names() {
        let response = CardsResponse {
            cards: vec![],
            default_card_id: Some("card_1".to_string()),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"defaultCardId\":\"card_1\""));
    }

    #[test]
    fn test_set_default_request_wire_names() {
        let request = SetDefaultRequest {
            card_id: "card_7".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"cardId\":\"card_7\""));
    }

    #[test]
    fn test_add_card_request_skips_absent_fields() {
        let request = AddCardRequest {
            number: "4242424242424242".to_string(),
            exp_month: "12".to_string(),
            exp_year: "2030".to_string(),
            cvc: "123".to_string(),
            name: "Jane Doe".to_string(),
            address_line1: "123 Main St".to_string(),
            address_line2: None,
            address_city: "San Francisco".to_string(),
            address_state: None,
            address_zip: "94107".to_string(),
            address_country: "USA".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"exp_month\":\"12\""));
        assert!(!json.contains("address_line2"));
        assert!(!json.contains("address_state"));
    }

    #[test]
    fn test_cards_response_into_collection() {
        let response = CardsResponse {
            cards: vec![],
            default_card_id: Some("card_1".to_string()),
        };

        let collection: CardCollection = response.into();
        assert!(collection.is_empty());
        assert_eq!(collection.default_card_id.as_deref(), Some("card_1"));
    }
}

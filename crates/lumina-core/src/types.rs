use serde::{Deserialize, Serialize};

// =============================================================================
// Products
// =============================================================================

/// Catalog-wide product identifier.
pub type ProductId = i64;

/// A product record from the catalog.
///
/// Records are immutable once loaded. The selection persists these records
/// in full, so every field must survive a JSON round trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Unique within the catalog.
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    /// Category label used by the product grid filter.
    pub category: String,
    pub description: String,
    /// Image URL.
    pub image: String,
}

/// The projection of a product sent to the model when generating a routine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

/// Author role of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona / instructions.
    System,
    /// The person using the assistant.
    User,
    /// The remote model.
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat message exchanged with the completion service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Which kind of exchange the chat adapter is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeMode {
    /// Fresh two-message routine generation from the selection.
    Routine,
    /// Free-form chat carrying the conversation history.
    Chat,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serum() -> Product {
        Product {
            id: 7,
            name: "Revitalift Serum".to_string(),
            brand: "L'Oréal Paris".to_string(),
            category: "skincare".to_string(),
            description: "Pure hyaluronic acid serum.".to_string(),
            image: "https://example.com/serum.png".to_string(),
        }
    }

    #[test]
    fn test_product_json_field_names() {
        let json = serde_json::to_value(serum()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["brand", "category", "description", "id", "image", "name"]
        );
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_summary_drops_id_and_image() {
        let summary = ProductSummary::from(&serum());
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("image").is_none());
        assert_eq!(json["name"], "Revitalift Serum");
        assert_eq!(json["brand"], "L'Oréal Paris");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = Message::assistant("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);

        let back: Message = serde_json::from_str(r#"{"role":"system","content":"x"}"#).unwrap();
        assert_eq!(back.role, Role::System);
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let parsed: Result<Message, _> = serde_json::from_str(r#"{"role":"tool","content":"x"}"#);
        assert!(parsed.is_err());
    }
}

//! Console records: one struct per managed REST resource plus the draft
//! payload submitted by its create/edit form.
//!
//! Timestamps stay RFC3339 strings exactly as the server sends them; the
//! console only displays and sorts them, and RFC3339 sorts lexicographically.

use serde::{Deserialize, Serialize};

use crate::models::entity::{CollectionItem, EntityId};

fn default_true() -> bool {
    true
}

/// Inventory product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl CollectionItem for Product {
    const RESOURCE: &'static str = "products";
    const LABEL: &'static str = "product";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "sku", "category"];

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Create/update payload for a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub active: bool,
}

/// Price-list entry tied to one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: EntityId,
    pub product_id: EntityId,
    pub label: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl CollectionItem for Price {
    const RESOURCE: &'static str = "prices";
    const LABEL: &'static str = "price";
    const SEARCH_FIELDS: &'static [&'static str] = &["label", "currency"];

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Create/update payload for a price entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDraft {
    pub product_id: EntityId,
    pub label: String,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
}

/// Payment recorded against a sale. Search is server-side for payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: EntityId,
    pub sale_id: EntityId,
    pub method: String,
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl CollectionItem for Payment {
    const RESOURCE: &'static str = "payments";
    const LABEL: &'static str = "payment";
    const SEARCH_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Create/update payload for a payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub sale_id: EntityId,
    pub method: String,
    pub amount: f64,
    pub status: String,
}

/// Completed sale. Search is server-side for sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: EntityId,
    pub cashier_id: EntityId,
    pub total: f64,
    #[serde(default)]
    pub item_count: i64,
    pub status: String,
    #[serde(default)]
    pub sold_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl CollectionItem for Sale {
    const RESOURCE: &'static str = "sales";
    const LABEL: &'static str = "sale";
    const SEARCH_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Create/update payload for a sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub cashier_id: EntityId,
    pub total: f64,
    pub item_count: i64,
    pub status: String,
}

/// Cashier account operating the registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cashier {
    pub id: EntityId,
    pub name: String,
    pub code: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl CollectionItem for Cashier {
    const RESOURCE: &'static str = "cashiers";
    const LABEL: &'static str = "cashier";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code"];

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Create/update payload for a cashier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashierDraft {
    pub name: String,
    pub code: String,
    pub active: bool,
}

/// Console user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl CollectionItem for User {
    const RESOURCE: &'static str = "users";
    const LABEL: &'static str = "user";
    const SEARCH_FIELDS: &'static [&'static str] = &["username", "email", "role"];

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Create/update payload for a user. `password` is only sent when set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_with_numeric_id_and_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"id":7,"name":"Cable","price":4.5}"#).unwrap();
        assert_eq!(product.id, EntityId::from(7));
        assert_eq!(product.stock, 0);
        assert!(product.active);
        assert_eq!(product.deleted_at, None);
    }

    #[test]
    fn test_field_text_uses_wire_names() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","username":"ana","role":"admin","createdAt":"2026-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(user.field_text("username").as_deref(), Some("ana"));
        assert_eq!(
            user.field_text("createdAt").as_deref(),
            Some("2026-01-05T10:00:00Z")
        );
        assert_eq!(user.field_text("email"), None);
    }

    #[test]
    fn test_draft_skips_unset_options() {
        let draft = ProductDraft {
            name: "Cable".to_string(),
            sku: None,
            category: None,
            price: 4.5,
            stock: 3,
            active: true,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("sku").is_none());
        assert_eq!(value["name"], "Cable");
    }
}

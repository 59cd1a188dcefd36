use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer record as held by the repository.
///
/// `id` and `created_at` are assigned on creation and never change afterwards.
/// `updated_at` stays `None` until the first successful update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub national_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Input for creating a customer. The repository assigns the id and timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub national_id: String,
    pub active: bool,
}

/// Input for updating a customer. Only `name`, `email` and `phone` are applied;
/// `national_id` is checked but the stored value is kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerChanges {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub national_id: String,
}

impl Customer {
    pub fn from_draft(id: CustomerId, draft: CustomerDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            national_id: draft.national_id,
            created_at,
            updated_at: None,
            active: draft.active,
        }
    }

    /// Applies the mutable fields of `changes`. `updated_at` never precedes
    /// `created_at`, even if the clock moved backwards in between.
    pub fn apply_changes(&mut self, changes: CustomerChanges, now: DateTime<Utc>) {
        self.name = changes.name;
        self.email = changes.email;
        self.phone = changes.phone;
        self.updated_at = Some(now.max(self.created_at));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{Customer, CustomerChanges, CustomerDraft, CustomerId};

    fn draft() -> CustomerDraft {
        CustomerDraft {
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: Some("+55 11 91234-5678".to_string()),
            national_id: "11144477735".to_string(),
            active: true,
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("timestamp");
        let customer = Customer::from_draft(CustomerId(7), draft(), created_at);

        let json = serde_json::to_value(&customer).expect("serialize customer");

        assert_eq!(json["id"], 7);
        assert_eq!(json["nationalId"], "11144477735");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
        assert!(json["updatedAt"].is_null());
        assert_eq!(json["active"], true);
    }

    #[test]
    fn apply_changes_keeps_identity_fields() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("timestamp");
        let mut customer = Customer::from_draft(CustomerId(3), draft(), created_at);

        customer.apply_changes(
            CustomerChanges {
                id: CustomerId(3),
                name: "Ana S. Lima".to_string(),
                email: "ana.lima@example.com".to_string(),
                phone: None,
                national_id: "52998224725".to_string(),
            },
            created_at + Duration::minutes(5),
        );

        assert_eq!(customer.id, CustomerId(3));
        assert_eq!(customer.name, "Ana S. Lima");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.national_id, "11144477735");
        assert_eq!(customer.created_at, created_at);
        assert_eq!(customer.updated_at, Some(created_at + Duration::minutes(5)));
    }

    #[test]
    fn updated_at_is_clamped_to_created_at() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("timestamp");
        let mut customer = Customer::from_draft(CustomerId(1), draft(), created_at);

        customer.apply_changes(
            CustomerChanges {
                id: CustomerId(1),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
                national_id: "11144477735".to_string(),
            },
            created_at - Duration::seconds(30),
        );

        assert_eq!(customer.updated_at, Some(created_at));
    }
}

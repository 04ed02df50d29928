// models.rs
// Domain models for recurring templates, the ledger transactions they
// generate, and the JSON seed data (templates.json).

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Direction of money movement, shared by templates and transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

/// Recurrence cadence of a template. Stored as a plain string on the
/// document; see [`RecurringTemplate::effective_frequency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            "yearly" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// Lifecycle of a template. Only `Active` templates are materialized; the
/// transitions themselves happen outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStatus {
    Active,
    Paused,
    Cancelled,
}

impl TemplateStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "active" => Some(TemplateStatus::Active),
            "paused" => Some(TemplateStatus::Paused),
            "cancelled" => Some(TemplateStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStatus::Active => "active",
            TemplateStatus::Paused => "paused",
            TemplateStatus::Cancelled => "cancelled",
        }
    }
}

/// Recurring template document stored in MongoDB.
///
/// `status`, `is_active`, and `frequency` stay raw because older documents
/// carry only the boolean flag or omit the cadence entirely; the
/// `effective_*` accessors normalize them once, at the read boundary, so the
/// scheduler never branches on the legacy shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub category: String,
    pub payment_method: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub frequency: Option<String>,
    /// Original start date; the permanent reference for recurrence math.
    pub anchor_date: DateTime,
    pub next_run_date: Option<DateTime>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

impl RecurringTemplate {
    /// Normalized lifecycle status. An explicit recognizable `status` wins;
    /// otherwise the legacy `is_active` flag decides, and a document with
    /// neither stays paused.
    pub fn effective_status(&self) -> TemplateStatus {
        if let Some(parsed) = self.status.as_deref().and_then(TemplateStatus::parse) {
            return parsed;
        }
        if self.is_active.unwrap_or(false) {
            TemplateStatus::Active
        } else {
            TemplateStatus::Paused
        }
    }

    /// Normalized cadence; templates without a recognizable frequency fall
    /// back to monthly.
    pub fn effective_frequency(&self) -> Frequency {
        self.frequency
            .as_deref()
            .and_then(Frequency::parse)
            .unwrap_or(Frequency::Monthly)
    }
}

/// Ledger transaction document stored in MongoDB. Materialized rows carry
/// the originating template id and a fixed "auto-generated" note; this
/// service never mutates a transaction after creating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub date: DateTime,
    pub description: String,
    pub kind: TransactionKind,
    pub category: String,
    pub payment_method: String,
    pub amount: f64,
    pub recurring_template_id: Option<ObjectId>,
    pub note: Option<String>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// Template definition as stored in templates.json (dates are YYYY-MM-DD).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTemplate {
    pub name: String,
    pub category: String,
    pub payment_method: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub frequency: String,
    pub anchor_date: String,
    pub next_run_date: Option<String>,
}

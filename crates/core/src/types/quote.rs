//! Quote metadata stored on draft orders.
//!
//! Shopify draft orders have no schema for quote data, so everything the
//! workflow needs lives as flat key/value custom attributes on the first
//! line item. This module owns the key names and the merge rules; the API
//! crate only moves attributes between Shopify and JSON.

use core::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{FileId, QuoteAmount, StorageKind};

/// A single line-item custom attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    pub key: String,
    pub value: String,
}

impl CustomAttribute {
    #[must_use]
    pub fn new(key: AttributeKey, value: impl Into<String>) -> Self {
        Self {
            key: key.as_str().to_owned(),
            value: value.into(),
        }
    }
}

/// Attribute keys understood by the quote workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    QuoteId,
    FileName,
    FileId,
    PlatformFileId,
    Status,
    Material,
    Color,
    Precision,
    StorageKind,
    QuotedAmount,
    QuotedAt,
    Note,
    SenderEmail,
}

impl AttributeKey {
    /// Keys replaced when an order is quoted.
    pub const QUOTE_KEYS: [Self; 5] = [
        Self::Status,
        Self::QuotedAmount,
        Self::QuotedAt,
        Self::Note,
        Self::SenderEmail,
    ];

    /// Attribute key as stored on the line item.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::QuoteId => "Quote ID",
            Self::FileName => "File",
            Self::FileId => "File ID",
            Self::PlatformFileId => "Shopify File ID",
            Self::Status => "Status",
            Self::Material => "Material",
            Self::Color => "Color",
            Self::Precision => "Precision",
            Self::StorageKind => "File Storage",
            Self::QuotedAmount => "Quoted Amount",
            Self::QuotedAt => "Quoted At",
            Self::Note => "Note",
            Self::SenderEmail => "Support Email",
        }
    }

    /// Older spellings still present on historical orders, including the
    /// Chinese keys written by the first version of the quote form.
    #[must_use]
    pub const fn legacy_aliases(&self) -> &'static [&'static str] {
        match self {
            Self::QuoteId => &[],
            Self::FileName => &["File Name", "文件", "文件名称"],
            Self::FileId => &["文件ID"],
            Self::PlatformFileId => &["Shopify文件ID"],
            Self::Status => &["状态"],
            Self::Material => &["材料"],
            Self::Color => &["颜色"],
            Self::Precision => &["精度"],
            Self::StorageKind => &["文件存储方式"],
            Self::QuotedAmount => &["报价金额"],
            Self::QuotedAt => &["报价时间"],
            Self::Note => &["备注"],
            Self::SenderEmail => &["客服邮箱"],
        }
    }

    fn matches(self, key: &str) -> bool {
        key == self.as_str() || self.legacy_aliases().contains(&key)
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuoteStatus {
    /// Submitted by the customer, no price yet.
    #[default]
    Pending,
    /// Priced by staff, invoice can be sent.
    Quoted,
    /// Converted into a real order.
    Completed,
    /// Any label written by another tool; preserved verbatim.
    Other(String),
}

impl QuoteStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending Quote",
            Self::Quoted => "Quoted",
            Self::Completed => "Completed",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for QuoteStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending Quote" | "待报价" => Self::Pending,
            "Quoted" | "已报价" => Self::Quoted,
            "Completed" => Self::Completed,
            _ => Self::Other(value),
        }
    }
}

impl From<QuoteStatus> for String {
    fn from(status: QuoteStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view over a draft order's quote attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAttributes {
    pub quote_id: Option<String>,
    pub file_name: Option<String>,
    pub file_id: Option<String>,
    pub platform_file_id: Option<String>,
    pub status: QuoteStatus,
    pub material: Option<String>,
    pub color: Option<String>,
    pub precision: Option<String>,
    pub storage_kind: Option<StorageKind>,
    pub quoted_amount: Option<String>,
    pub quoted_at: Option<String>,
    pub note: Option<String>,
    pub sender_email: Option<String>,
}

impl QuoteAttributes {
    /// Read the known keys out of a line item's attribute list.
    ///
    /// Missing status means the order has never been quoted.
    #[must_use]
    pub fn from_attributes(attributes: &[CustomAttribute]) -> Self {
        let get = |key: AttributeKey| {
            attributes
                .iter()
                .find(|a| key.matches(&a.key))
                .map(|a| a.value.clone())
        };

        Self {
            quote_id: get(AttributeKey::QuoteId),
            file_name: get(AttributeKey::FileName),
            file_id: get(AttributeKey::FileId),
            platform_file_id: get(AttributeKey::PlatformFileId),
            status: get(AttributeKey::Status).map(QuoteStatus::from).unwrap_or_default(),
            material: get(AttributeKey::Material),
            color: get(AttributeKey::Color),
            precision: get(AttributeKey::Precision),
            storage_kind: get(AttributeKey::StorageKind).and_then(|v| v.parse().ok()),
            quoted_amount: get(AttributeKey::QuotedAmount),
            quoted_at: get(AttributeKey::QuotedAt),
            note: get(AttributeKey::Note),
            sender_email: get(AttributeKey::SenderEmail),
        }
    }

    /// Serialise back into line-item attributes, skipping unset fields.
    #[must_use]
    pub fn to_attributes(&self) -> Vec<CustomAttribute> {
        let storage = self.storage_kind.map(|k| k.as_str().to_owned());
        let pairs = [
            (AttributeKey::QuoteId, self.quote_id.as_ref()),
            (AttributeKey::FileName, self.file_name.as_ref()),
            (AttributeKey::FileId, self.file_id.as_ref()),
            (AttributeKey::PlatformFileId, self.platform_file_id.as_ref()),
            (AttributeKey::Material, self.material.as_ref()),
            (AttributeKey::Color, self.color.as_ref()),
            (AttributeKey::Precision, self.precision.as_ref()),
            (AttributeKey::StorageKind, storage.as_ref()),
            (AttributeKey::QuotedAmount, self.quoted_amount.as_ref()),
            (AttributeKey::QuotedAt, self.quoted_at.as_ref()),
            (AttributeKey::Note, self.note.as_ref()),
            (AttributeKey::SenderEmail, self.sender_email.as_ref()),
        ];

        let mut attributes = vec![CustomAttribute::new(
            AttributeKey::Status,
            self.status.as_str(),
        )];
        attributes.extend(pairs.into_iter().filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| CustomAttribute::new(key, v.clone()))
        }));
        attributes
    }

    /// Record where an uploaded file ended up.
    pub fn attach_file(
        &mut self,
        file_id: &FileId,
        file_name: &str,
        storage: StorageKind,
        platform_file_id: Option<&str>,
    ) {
        self.file_id = Some(file_id.to_string());
        self.file_name = Some(file_name.to_owned());
        self.storage_kind = Some(storage);
        self.platform_file_id = platform_file_id.map(str::to_owned);
    }
}

/// Generate a customer-facing quote number, e.g. `Q-20240131-7KD2XQ`.
#[must_use]
pub fn generate_quote_id<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let suffix: String = (0..6)
        .filter_map(|_| ALPHABET.get(rng.random_range(0..ALPHABET.len())))
        .map(|&b| char::from(b))
        .collect();
    format!("Q-{}-{suffix}", now.format("%Y%m%d"))
}

/// Staff-entered pricing for a pending quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteUpdate {
    pub amount: QuoteAmount,
    pub quoted_at: DateTime<Utc>,
    pub note: Option<String>,
    pub sender_email: Option<String>,
}

impl QuoteUpdate {
    /// Merge the quote into an existing attribute list.
    ///
    /// Attributes outside [`AttributeKey::QUOTE_KEYS`] keep their order and
    /// values; every quote key appears exactly once afterwards (optional
    /// ones only when provided).
    #[must_use]
    pub fn merge_into(&self, existing: &[CustomAttribute]) -> Vec<CustomAttribute> {
        let mut merged: Vec<CustomAttribute> = existing
            .iter()
            .filter(|a| !AttributeKey::QUOTE_KEYS.iter().any(|k| k.matches(&a.key)))
            .cloned()
            .collect();

        merged.push(CustomAttribute::new(
            AttributeKey::Status,
            QuoteStatus::Quoted.as_str(),
        ));
        merged.push(CustomAttribute::new(
            AttributeKey::QuotedAmount,
            self.amount.to_money_string(),
        ));
        merged.push(CustomAttribute::new(
            AttributeKey::QuotedAt,
            self.quoted_at.to_rfc3339(),
        ));
        if let Some(note) = self.note.as_deref().filter(|n| !n.trim().is_empty()) {
            merged.push(CustomAttribute::new(AttributeKey::Note, note));
        }
        if let Some(email) = self.sender_email.as_deref().filter(|e| !e.trim().is_empty()) {
            merged.push(CustomAttribute::new(AttributeKey::SenderEmail, email));
        }
        merged
    }

    /// Human-readable draft-order note summarising the quote.
    #[must_use]
    pub fn order_note(&self) -> String {
        let mut note = format!(
            "Quoted: {}\nQuoted at: {}",
            self.amount,
            self.quoted_at.format("%Y-%m-%d %H:%M UTC")
        );
        if let Some(extra) = self.note.as_deref().filter(|n| !n.trim().is_empty()) {
            note.push('\n');
            note.push_str(extra);
        }
        note
    }
}

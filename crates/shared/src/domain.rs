use serde::{Deserialize, Serialize};

/// Stable identity of a row within an editing session.
///
/// Assigned from a monotonic counter when the row is created and never
/// reused, so diagnostics stay attached to their row across deletes and
/// inserts. Display position is derived, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaxCategory {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "Income Tax")]
    Income,
    #[serde(rename = "Sales Tax")]
    Sales,
    #[serde(rename = "Property Tax")]
    Property,
    #[serde(rename = "Corporate Tax")]
    Corporate,
    #[serde(rename = "Luxury Tax")]
    Luxury,
    #[serde(rename = "Excise Tax")]
    Excise,
}

impl TaxCategory {
    pub const ALL: [TaxCategory; 6] = [
        TaxCategory::Income,
        TaxCategory::Sales,
        TaxCategory::Property,
        TaxCategory::Corporate,
        TaxCategory::Luxury,
        TaxCategory::Excise,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaxCategory::Unset => "",
            TaxCategory::Income => "Income Tax",
            TaxCategory::Sales => "Sales Tax",
            TaxCategory::Property => "Property Tax",
            TaxCategory::Corporate => "Corporate Tax",
            TaxCategory::Luxury => "Luxury Tax",
            TaxCategory::Excise => "Excise Tax",
        }
    }

    /// Resolves a selection-list label. Anything unrecognized maps to
    /// `None`; callers decide whether that resets to `Unset`.
    pub fn from_label(label: &str) -> Option<TaxCategory> {
        TaxCategory::ALL.iter().copied().find(|c| c.label() == label)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, TaxCategory::Unset)
    }
}

/// Which user-editable field a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditedField {
    Identifier,
    Category,
    Price,
}

/// A recorded validation failure, keyed by stable row id rather than by
/// display position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub row: RowId,
    pub field: EditedField,
    pub message: String,
}

impl Diagnostic {
    pub fn new(row: RowId, field: EditedField, message: impl Into<String>) -> Self {
        Self {
            row,
            field,
            message: message.into(),
        }
    }
}

/// One editable tax record. `tax_amount`, `total` and
/// `last_payment_date` are derived; the reducer is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRow {
    #[serde(skip)]
    pub id: RowId,
    pub identifier: u64,
    pub category: TaxCategory,
    pub price: f64,
    pub tax_amount: f64,
    pub last_payment_date: String,
    pub total: f64,
}

impl TaxRow {
    /// The default all-zero/unset state a freshly added row starts in.
    pub fn blank(id: RowId) -> Self {
        Self {
            id,
            identifier: 0,
            category: TaxCategory::Unset,
            price: 0.0,
            tax_amount: 0.0,
            last_payment_date: String::new(),
            total: 0.0,
        }
    }
}

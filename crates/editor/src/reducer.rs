use shared::domain::{Diagnostic, EditedField, RowId, TaxCategory};

use crate::categories;
use crate::command::EditCommand;
use crate::error::EditorError;
use crate::snapshot::EditorSnapshot;

pub const IDENTIFIER_DIGITS: usize = 11;
pub const PRICE_MAX_INTEGER_DIGITS: usize = 7;

pub const IDENTIFIER_MESSAGE: &str = "identifier must be 11 digits, numeric only";
pub const PRICE_MESSAGE: &str = "price must not exceed 7 digits";

/// Pure reducer: maps the current snapshot plus one field edit to the
/// next snapshot. Validation failures clamp the offending field to its
/// default and record a diagnostic; they never reject the edit itself.
/// Only an out-of-bounds position is an error, and then the snapshot
/// is untouched.
pub fn apply_edit(
    snapshot: &EditorSnapshot,
    position: usize,
    command: &EditCommand,
) -> Result<EditorSnapshot, EditorError> {
    let mut next = snapshot.clone();
    let len = next.rows.len();
    let row = next
        .rows
        .get_mut(position)
        .ok_or(EditorError::IndexOutOfRange { position, len })?;
    let row_id = row.id;

    match command {
        EditCommand::Identifier(raw) => match parse_identifier(raw) {
            Some(identifier) => {
                row.identifier = identifier;
                clear_field_diagnostics(&mut next, row_id, EditedField::Identifier);
            }
            None => {
                row.identifier = 0;
                next.diagnostics.push(Diagnostic::new(
                    row_id,
                    EditedField::Identifier,
                    IDENTIFIER_MESSAGE,
                ));
            }
        },
        EditCommand::Category(raw) => match categories::lookup(raw) {
            Some((category, date)) => {
                row.category = category;
                row.last_payment_date = date.to_string();
            }
            // Unrecognized labels reset silently: the category column is
            // fed by the editor's own selection list, not free text.
            None => {
                row.category = TaxCategory::Unset;
                row.last_payment_date.clear();
            }
        },
        EditCommand::Price(raw) => match parse_price(raw) {
            Some(price) => {
                let (tax_amount, total) = derive_tax(price);
                row.price = price;
                row.tax_amount = tax_amount;
                row.total = total;
                clear_field_diagnostics(&mut next, row_id, EditedField::Price);
            }
            None => {
                row.price = 0.0;
                row.tax_amount = 0.0;
                row.total = 0.0;
                next.diagnostics
                    .push(Diagnostic::new(row_id, EditedField::Price, PRICE_MESSAGE));
            }
        },
        // Pass-through: no typed field to write, no validation, no
        // derived-field recomputation.
        EditCommand::Other { .. } => {}
    }

    Ok(next)
}

/// Derived fields as a pure function of price; recomputed inline on
/// every price edit so they can never go stale.
pub fn derive_tax(price: f64) -> (f64, f64) {
    let tax_amount = price * 0.1;
    (tax_amount, price - tax_amount)
}

fn parse_identifier(raw: &str) -> Option<u64> {
    if raw.len() != IDENTIFIER_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_price(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // Digit-count check against the value's string form, like the
    // identifier rule: the integer part may not exceed 7 digits.
    if integer_digits(value) > PRICE_MAX_INTEGER_DIGITS {
        return None;
    }
    Some(value)
}

fn integer_digits(value: f64) -> usize {
    // Saturates for values beyond u64::MAX, which is already far past
    // the 7-digit limit.
    format!("{}", value.trunc() as u64).len()
}

/// A successful edit to a row+field removes that row+field's earlier
/// failure diagnostics. Failures accumulate until then.
fn clear_field_diagnostics(snapshot: &mut EditorSnapshot, row: RowId, field: EditedField) {
    snapshot
        .diagnostics
        .retain(|d| !(d.row == row && d.field == field));
}

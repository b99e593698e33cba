use shared::domain::TaxCategory;

/// Static category -> last-payment-date table. Dates are fixed display
/// strings, not computed values.
pub fn last_payment_date(category: TaxCategory) -> &'static str {
    match category {
        TaxCategory::Unset => "",
        TaxCategory::Income => "11/12/2024",
        TaxCategory::Sales => "12/11/2024",
        TaxCategory::Property => "09/09/2024",
        TaxCategory::Corporate => "10/12/2024",
        TaxCategory::Luxury => "27/10/2024",
        TaxCategory::Excise => "16/09/2024",
    }
}

/// Resolves a selection-list label to its category and date, or `None`
/// for labels outside the table.
pub fn lookup(label: &str) -> Option<(TaxCategory, &'static str)> {
    TaxCategory::from_label(label).map(|category| (category, last_payment_date(category)))
}

use shared::protocol::CellEditEvent;

/// A field edit as a tagged variant, dispatched by structural matching
/// instead of comparing field-name strings inside the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    Identifier(String),
    Category(String),
    Price(String),
    /// Any other column the grid reports; accepted as a pass-through.
    Other { field: String, value: String },
}

impl From<&CellEditEvent> for EditCommand {
    fn from(event: &CellEditEvent) -> Self {
        let raw = event.raw_value.as_text();
        match event.field.as_str() {
            "identifier" => EditCommand::Identifier(raw),
            "category" => EditCommand::Category(raw),
            "price" => EditCommand::Price(raw),
            other => EditCommand::Other {
                field: other.to_string(),
                value: raw,
            },
        }
    }
}

pub mod categories;
pub mod command;
pub mod error;
pub mod reducer;
pub mod snapshot;
pub mod store;

pub use command::EditCommand;
pub use error::EditorError;
pub use snapshot::EditorSnapshot;
pub use store::RowStore;

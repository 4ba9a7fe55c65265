// Entity Models
//
// Each entity has:
// - Stable identity that expenses and the UI refer to
// - Immutable values once created (records are never edited in a session)
// - A registry or store that owns the collection

pub mod category;
pub mod record;

pub use category::{Category, CategoryId, CategoryRegistry, IconRef, OTHER_LABEL};
pub use record::{Dated, Expense, Income};

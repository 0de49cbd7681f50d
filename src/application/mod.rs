// Application layer - the ledger facade used by every client, plus the
// input contract the presentation side checks before recording an expense.

pub mod error;
pub mod form;
pub mod service;

pub use error::*;
pub use form::*;
pub use service::*;

// Application layer - use cases on top of the repository.
// Writes (orders, expenses, settlement) and the read-side reports live here;
// presentation code only talks to `CafeService`.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;

pub mod query;
pub mod response;
pub mod types;

pub use query::*;
pub use response::*;
pub use types::*;

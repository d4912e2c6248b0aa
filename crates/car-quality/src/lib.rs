pub mod schema;
pub mod contract;
pub mod metadata;
pub mod dispatch;

pub use schema::*;
pub use contract::*;
pub use metadata::*;
pub use dispatch::{invoke, DispatchError};

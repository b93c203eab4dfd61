pub mod amount;
pub mod project;

pub use amount::{Amount, ParseAmountError};
pub use project::{Category, NewService, Project, Service};

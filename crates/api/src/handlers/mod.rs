pub mod common;
pub mod engines;
pub mod health;
pub mod query;

pub use engines::get_engines;
pub use health::health;
pub use query::post_query;

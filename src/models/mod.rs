//! Data models shared by every parser, serializer and the validator

pub mod schema;
pub mod value;

pub use schema::*;
pub use value::*;

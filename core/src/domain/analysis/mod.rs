pub mod decoding;
pub mod entities;
pub mod prompts;
pub mod schema;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;

pub mod entities;
pub mod machine;
pub mod messages;
pub mod value_objects;

pub use entities::*;
pub use machine::Conversation;
pub use value_objects::*;

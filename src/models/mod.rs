pub mod counter;
pub mod message;
pub mod user;

pub use counter::*;
pub use message::*;
pub use user::*;

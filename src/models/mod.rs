pub mod tag;
pub mod task;
pub mod user;

pub use tag::{Tag, TagInput};
pub use task::{Task, TaskInput};
pub use user::{User, UserResponse};

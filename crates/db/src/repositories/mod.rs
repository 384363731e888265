//! Database repositories.

pub mod content;
pub mod course;
pub mod item;
pub mod module;
pub mod subject;
pub mod user;

pub use content::ContentRepository;
pub use course::CourseRepository;
pub use item::{Item, ItemPayload, ItemRepository, ItemTable};
pub use module::ModuleRepository;
pub use subject::SubjectRepository;
pub use user::UserRepository;

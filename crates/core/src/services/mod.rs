//! Business logic services.

pub mod content;
pub mod course;
pub mod item;
pub mod module;
pub mod ownership;
pub mod subject;

pub use content::{ContentService, ModuleContent};
pub use course::{CourseFields, CourseService, CourseStore};
pub use item::{ItemFields, ItemService, ItemStore, parse_item_kind};
pub use module::{ModuleInput, ModuleService};
pub use ownership::{Actor, Attributed, OwnerScoped, RecordStore};
pub use subject::{SubjectInput, SubjectService, validate_slug};

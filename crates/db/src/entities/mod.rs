//! Database entities.

pub mod content;
pub mod course;
pub mod file;
pub mod image;
pub mod module;
pub mod subject;
pub mod text;
pub mod user;
pub mod video;

pub use content::{Entity as Content, ItemKind};
pub use course::Entity as Course;
pub use file::Entity as File;
pub use image::Entity as Image;
pub use module::Entity as Module;
pub use subject::Entity as Subject;
pub use text::Entity as Text;
pub use user::Entity as User;
pub use video::Entity as Video;

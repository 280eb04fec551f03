mod error;
mod tables;
mod traits;

pub use error::{RepositoryError, Result};
pub use tables::Table;
pub use traits::{
    NotificationRepository, RatingRepository, SchemaRepository, SessionRepository,
    TeacherSubjectRepository, TutoringStore, UserRepository,
};

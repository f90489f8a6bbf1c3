mod recorder;
pub mod repo;
mod repo_types;

pub use recorder::{ActivityRecorder, ActivitySink, PgActivitySink};
pub use repo_types::ActivityLogEntry;

pub mod actions {
    pub const REGISTRATION: &str = "registration";
    pub const LOGIN: &str = "login";
    pub const COURSE_VIEW: &str = "course_view";
    pub const COURSE_CREATE: &str = "course_create";
    pub const COURSE_UPDATE: &str = "course_update";
    pub const COURSE_DELETE: &str = "course_delete";
    pub const FILE_UPLOAD: &str = "file_upload";
    pub const TEACHER_APPLICATION: &str = "teacher_application";
    pub const METADATA_UPDATE: &str = "metadata_update";
}

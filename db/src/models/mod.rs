pub mod attendance_record;
pub mod event;
pub mod session;
pub mod student;

pub use attendance_record::Entity as AttendanceRecord;
pub use event::Entity as Event;
pub use session::Entity as Session;
pub use student::Entity as Student;

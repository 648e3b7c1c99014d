pub mod m202510010001_create_events;
pub mod m202510010002_create_students;
pub mod m202510010003_create_sessions;
pub mod m202510010004_create_attendance_records;

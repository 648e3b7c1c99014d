pub mod attendance_report;
pub mod attendance_status;
pub mod event;
pub mod export;
pub mod scan;
pub mod session;
pub mod session_conflict;
pub mod session_form;
pub mod session_window;
pub mod student;

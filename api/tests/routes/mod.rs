mod attendance_test;
mod events_test;
mod health_test;
mod scanning_test;
mod sessions_test;
mod students_test;

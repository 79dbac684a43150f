pub mod attendance;
pub mod registration_numbers;
pub mod registrations;
pub mod schedules;
pub mod sessions;

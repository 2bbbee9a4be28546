//! Appointment booking: slot arithmetic, start-time parsing and the booking API.

pub mod calculator;
pub mod start_time;
pub mod service;

pub use calculator::compute_end_time;
pub use service::{AppointmentView, BookingPolicy, CreateAppointment};

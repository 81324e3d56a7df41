pub mod appointment;
pub mod booking;
pub mod discount;
pub mod offering;

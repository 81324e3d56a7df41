pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod discounts;
pub mod quotes;

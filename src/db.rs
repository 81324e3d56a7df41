pub mod offering_repo;
pub use offering_repo::{OfferingRepository, PgOfferingRepository};
pub mod discount_repo;
pub use discount_repo::{DiscountRepository, PgDiscountRepository, UsageCommit};
pub mod appointment_repo;
pub use appointment_repo::{AppointmentRepository, CreateOutcome, PgAppointmentRepository};

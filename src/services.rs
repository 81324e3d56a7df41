pub mod booking_service;
pub use booking_service::{BookingInput, BookingService, PreparedQuote};
pub mod discount_service;
pub use discount_service::DiscountService;
pub mod pricing_service;
pub use pricing_service::PricingService;
pub mod schedule_service;
pub use schedule_service::ScheduleService;

// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Catalog ---
        handlers::catalog::create_session,

        // --- Availability ---
        handlers::availability::list_session_slots,

        // --- Pricing ---
        handlers::quotes::create_quote,

        // --- Booking ---
        handlers::bookings::create_booking,

        // --- Discounts ---
        handlers::discounts::create_discount,
        handlers::discounts::preview_discount,
    ),
    components(
        schemas(
            // --- Offerings ---
            models::offering::SessionFrequency,
            models::offering::WeekDay,
            models::offering::BillingPeriod,
            models::offering::OfferingKind,
            models::offering::ScheduleRule,
            models::offering::TrainingSession,
            models::offering::SessionPackage,
            models::offering::Membership,

            // --- Discounts ---
            models::discount::DiscountType,
            models::discount::Discount,

            // --- Appointments ---
            models::appointment::PaymentMethod,
            models::appointment::AppointmentStatus,
            models::appointment::PaidStatus,
            models::appointment::Appointment,

            // --- Booking / Pricing ---
            models::booking::Slot,
            models::booking::OpenSlot,
            models::booking::SlotChoice,
            models::booking::Quote,
            models::booking::BatchStatus,
            models::booking::FailedSlot,
            models::booking::BookingReport,

            // --- Payloads ---
            handlers::catalog::RuleInput,
            handlers::catalog::CreateSessionPayload,
            handlers::quotes::QuotePayload,
            handlers::bookings::BookingPayload,
            handlers::discounts::CreateDiscountPayload,
            handlers::discounts::DiscountPreview,
        )
    ),
    tags(
        (name = "Catalog", description = "Publicação de sessões e agendas"),
        (name = "Availability", description = "Expansão da agenda em horários reserváveis"),
        (name = "Pricing", description = "Orçamentos (preço, desconto, imposto)"),
        (name = "Booking", description = "Reservas em lote e desfecho por horário"),
        (name = "Discounts", description = "Cupons: cadastro, preview e uso")
    )
)]
pub struct ApiDoc;

// src/models/offering.rs

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "session_frequency", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionFrequency {
    OneTime,   // Data única
    Recurring, // Padrão semanal dentro de um intervalo
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "week_day", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    pub fn from_chrono(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }

    pub fn matches(self, date: NaiveDate) -> bool {
        Self::from_chrono(date.weekday()) == self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "billing_period", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingPeriod {
    Weekly,
    Monthly,
    Yearly,
}

// A etiqueta fechada de tipo de oferta. Nada de comparar strings de "kind":
// quem adicionar uma variante nova é obrigado pelo compilador a tratar
// o preço e a reserva dela.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "offering_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum OfferingKind {
    Session,
    Package,
    Membership,
}

// --- Structs ---

// Uma linha por dia da semana selecionado. `position` preserva a ordem de
// cadastro: quando mais de uma regra cobre o mesmo dia, a primeira cadastrada
// aparece primeiro na expansão.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRule {
    pub id: Uuid,
    pub session_id: Uuid,

    pub weekday: WeekDay,

    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,

    pub position: i32,
}

impl ScheduleRule {
    // Rótulo da janela de horário, gravado verbatim no agendamento.
    pub fn time_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub id: Uuid,
    pub trainer_id: Uuid,

    #[schema(example = "Treino Funcional")]
    pub name: String,
    pub description: Option<String>,

    #[schema(example = "60 min")]
    pub duration_label: Option<String>,
    pub location: Option<String>,

    // Preço ausente NÃO derruba o orçamento: vira zero com aviso ao chamador,
    // para o treinador corrigir o cadastro.
    #[schema(example = "100.00")]
    pub base_price: Option<Decimal>,

    // Somente sessões em grupo
    pub max_capacity: Option<i32>,

    pub frequency: SessionFrequency,

    // OneTime: `date` preenchida, intervalo vazio.
    // Recurring: intervalo preenchido (start < end) e pelo menos uma regra.
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    pub created_at: Option<DateTime<Utc>>,

    #[sqlx(skip)]
    pub schedule_rules: Vec<ScheduleRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionPackage {
    pub id: Uuid,
    pub trainer_id: Uuid,

    #[schema(example = "Pacote 10 Treinos")]
    pub name: String,
    pub description: Option<String>,

    // Soma dos preços das sessões que compõem o pacote. Fica guardado
    // intocado: o desconto do treinador é SEMPRE derivado daqui, nunca
    // gravado por cima (senão edições repetidas compõem desconto sobre
    // desconto).
    #[schema(example = "200.00")]
    pub base_price: Option<Decimal>,

    // Desconto definido pelo dono, em percentual (0..=100)
    #[schema(example = "25.00")]
    pub discount_percent: Option<Decimal>,

    pub valid_days: i32,

    pub created_at: Option<DateTime<Utc>>,
}

impl SessionPackage {
    // Preço exibido: base com o desconto do dono aplicado (derivado, nunca gravado)
    pub fn discounted_base(&self) -> Option<Decimal> {
        let base = self.base_price?;
        match self.discount_percent {
            Some(pct) => Some(base * (Decimal::ONE - pct / Decimal::ONE_HUNDRED)),
            None => Some(base),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub trainer_id: Uuid,

    #[schema(example = "Plano Mensal Premium")]
    pub name: String,

    // Pelo menos um período precisa ter preço (constraint no banco)
    #[schema(example = "15.00")]
    pub weekly_price: Option<Decimal>,
    #[schema(example = "50.00")]
    pub monthly_price: Option<Decimal>,
    #[schema(example = "480.00")]
    pub yearly_price: Option<Decimal>,

    pub auto_renewal: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn price_for(&self, period: BillingPeriod) -> Option<Decimal> {
        match period {
            BillingPeriod::Weekly => self.weekly_price,
            BillingPeriod::Monthly => self.monthly_price,
            BillingPeriod::Yearly => self.yearly_price,
        }
    }
}

// A oferta vendável, fechada sobre as três variantes.
#[derive(Debug, Clone)]
pub enum Offering {
    Session(TrainingSession),
    Package(SessionPackage),
    Membership(Membership),
}

impl Offering {
    pub fn kind(&self) -> OfferingKind {
        match self {
            Offering::Session(_) => OfferingKind::Session,
            Offering::Package(_) => OfferingKind::Package,
            Offering::Membership(_) => OfferingKind::Membership,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Offering::Session(s) => s.id,
            Offering::Package(p) => p.id,
            Offering::Membership(m) => m.id,
        }
    }
}

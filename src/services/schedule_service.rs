// src/services/schedule_service.rs

use chrono::NaiveDate;

use crate::{
    common::error::AppError,
    models::{
        booking::{OpenSlot, SlotSelection},
        offering::{SessionFrequency, TrainingSession, WeekDay},
    },
};

// Transforma a definição temporal de uma sessão em horários reserváveis.
// Computação pura: nenhum I/O, nenhuma falha transitória — intervalos
// malformados são rejeitados no cadastro da oferta, não aqui.
#[derive(Clone)]
pub struct ScheduleService;

impl ScheduleService {
    pub fn new() -> Self {
        Self
    }

    // Expande a agenda em uma sequência finita e reiniciável (função pura das
    // entradas), ordenada por data crescente.
    //
    // OneTime: exatamente a data cadastrada, sem horário (o horário é
    // escolhido à parte, de uma lista de disponibilidade compartilhada).
    // Recurring: cada data de [start_date, end_date] cujo dia da semana bate
    // com alguma regra; uma entrada por regra que bater, na ordem de cadastro.
    pub fn expand<'a>(
        &self,
        session: &'a TrainingSession,
        range_limit: Option<usize>,
    ) -> Box<dyn Iterator<Item = OpenSlot> + 'a> {
        let slots: Box<dyn Iterator<Item = OpenSlot> + 'a> = match session.frequency {
            SessionFrequency::OneTime => Box::new(session.date.into_iter().map(|date| OpenSlot {
                date,
                time_label: None,
            })),

            SessionFrequency::Recurring => {
                let (Some(start), Some(end)) = (session.start_date, session.end_date) else {
                    return Box::new(std::iter::empty());
                };

                Box::new(
                    start
                        .iter_days()
                        .take_while(move |date| *date <= end)
                        .flat_map(move |date| {
                            session
                                .schedule_rules
                                .iter()
                                .filter(move |rule| rule.weekday.matches(date))
                                .map(move |rule| OpenSlot {
                                    date,
                                    time_label: Some(rule.time_label()),
                                })
                        }),
                )
            }
        };

        match range_limit {
            Some(limit) => Box::new(slots.take(limit)),
            None => slots,
        }
    }

    // Toda data selecionada precisa caber na agenda da sessão. Um par sem
    // horário não é erro aqui — ele só trava o avanço na etapa de preço.
    pub fn validate_selection(
        &self,
        session: &TrainingSession,
        selection: &SlotSelection,
    ) -> Result<(), AppError> {
        for choice in selection.choices() {
            match session.frequency {
                SessionFrequency::OneTime => {
                    if session.date != Some(choice.date) {
                        return Err(AppError::SlotOutOfRange(format!(
                            "a sessão acontece apenas em {}, não em {}",
                            session
                                .date
                                .map(|d| d.to_string())
                                .unwrap_or_else(|| "data não definida".to_string()),
                            choice.date
                        )));
                    }
                }

                SessionFrequency::Recurring => {
                    if !Self::inside_range(session, choice.date) {
                        return Err(AppError::SlotOutOfRange(format!(
                            "{} está fora do período de vigência da sessão",
                            choice.date
                        )));
                    }
                    if !Self::weekday_scheduled(session, choice.date) {
                        return Err(AppError::SlotOutOfRange(format!(
                            "{} não cai em um dia de semana da agenda",
                            choice.date
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn inside_range(session: &TrainingSession, date: NaiveDate) -> bool {
        match (session.start_date, session.end_date) {
            (Some(start), Some(end)) => date >= start && date <= end,
            _ => false,
        }
    }

    fn weekday_scheduled(session: &TrainingSession, date: NaiveDate) -> bool {
        session
            .schedule_rules
            .iter()
            .any(|rule| rule.weekday.matches(date))
    }
}

impl Default for ScheduleService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::SlotChoice;
    use crate::models::offering::ScheduleRule;
    use chrono::NaiveTime;
    use uuid::Uuid;

    fn rule(session_id: Uuid, weekday: WeekDay, start_h: u32, end_h: u32, position: i32) -> ScheduleRule {
        ScheduleRule {
            id: Uuid::new_v4(),
            session_id,
            weekday,
            start_time: NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end_h, 0, 0).unwrap(),
            position,
        }
    }

    fn recurring_session(
        start: NaiveDate,
        end: NaiveDate,
        weekdays: &[WeekDay],
    ) -> TrainingSession {
        let id = Uuid::new_v4();
        TrainingSession {
            id,
            trainer_id: Uuid::new_v4(),
            name: "Treino Funcional".to_string(),
            description: None,
            duration_label: Some("60 min".to_string()),
            location: None,
            base_price: Some(rust_decimal::Decimal::from(100u32)),
            max_capacity: None,
            frequency: SessionFrequency::Recurring,
            date: None,
            start_date: Some(start),
            end_date: Some(end),
            created_at: None,
            schedule_rules: weekdays
                .iter()
                .enumerate()
                .map(|(i, w)| rule(id, *w, 9, 10, i as i32))
                .collect(),
        }
    }

    fn one_time_session(date: NaiveDate) -> TrainingSession {
        TrainingSession {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Avaliação Física".to_string(),
            description: None,
            duration_label: None,
            location: None,
            base_price: Some(rust_decimal::Decimal::from(100u32)),
            max_capacity: None,
            frequency: SessionFrequency::OneTime,
            date: Some(date),
            start_date: None,
            end_date: None,
            created_at: None,
            schedule_rules: vec![],
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn expand_stays_inside_range_and_weekdays() {
        // Junho/2025: dia 2 é segunda-feira
        let session = recurring_session(
            d(2025, 6, 2),
            d(2025, 6, 30),
            &[WeekDay::Monday, WeekDay::Wednesday],
        );
        let slots: Vec<_> = ScheduleService::new().expand(&session, None).collect();

        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(slot.date >= d(2025, 6, 2) && slot.date <= d(2025, 6, 30));
            assert!(
                WeekDay::Monday.matches(slot.date) || WeekDay::Wednesday.matches(slot.date),
                "{} caiu fora dos dias agendados",
                slot.date
            );
            assert_eq!(slot.time_label.as_deref(), Some("09:00 - 10:00"));
        }
        // 5 segundas (2,9,16,23,30) + 4 quartas (4,11,18,25)
        assert_eq!(slots.len(), 9);
    }

    #[test]
    fn expand_is_ordered_by_date_ascending() {
        let session = recurring_session(
            d(2025, 6, 2),
            d(2025, 6, 30),
            &[WeekDay::Friday, WeekDay::Tuesday],
        );
        let slots: Vec<_> = ScheduleService::new().expand(&session, None).collect();
        for pair in slots.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
    }

    #[test]
    fn expand_respects_range_limit() {
        let session = recurring_session(d(2025, 6, 2), d(2025, 6, 30), &[WeekDay::Monday]);
        let slots: Vec<_> = ScheduleService::new().expand(&session, Some(3)).collect();
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn expand_one_time_yields_single_date_without_time() {
        let session = one_time_session(d(2025, 7, 10));
        let slots: Vec<_> = ScheduleService::new().expand(&session, None).collect();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].date, d(2025, 7, 10));
        assert!(slots[0].time_label.is_none());
    }

    #[test]
    fn expand_emits_one_slot_per_rule_on_shared_weekday() {
        let mut session = recurring_session(d(2025, 6, 2), d(2025, 6, 8), &[WeekDay::Monday]);
        // Segunda regra no mesmo dia (caso raro): ambas aparecem, na ordem de cadastro
        session
            .schedule_rules
            .push(rule(session.id, WeekDay::Monday, 18, 19, 1));

        let slots: Vec<_> = ScheduleService::new().expand(&session, None).collect();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].time_label.as_deref(), Some("09:00 - 10:00"));
        assert_eq!(slots[1].time_label.as_deref(), Some("18:00 - 19:00"));
    }

    #[test]
    fn validate_selection_rejects_off_schedule_weekday() {
        let session = recurring_session(d(2025, 6, 2), d(2025, 6, 30), &[WeekDay::Monday]);
        // 3 de junho de 2025 é terça
        let selection = SlotSelection::new(vec![SlotChoice {
            date: d(2025, 6, 3),
            time_label: Some("09:00 - 10:00".to_string()),
        }])
        .unwrap();

        let result = ScheduleService::new().validate_selection(&session, &selection);
        assert!(matches!(result, Err(AppError::SlotOutOfRange(_))));
    }

    #[test]
    fn validate_selection_rejects_date_outside_range() {
        let session = recurring_session(d(2025, 6, 2), d(2025, 6, 30), &[WeekDay::Monday]);
        let selection = SlotSelection::new(vec![SlotChoice {
            date: d(2025, 7, 7), // segunda, mas depois do fim da vigência
            time_label: Some("09:00 - 10:00".to_string()),
        }])
        .unwrap();

        let result = ScheduleService::new().validate_selection(&session, &selection);
        assert!(matches!(result, Err(AppError::SlotOutOfRange(_))));
    }

    #[test]
    fn validate_selection_allows_pending_time() {
        let session = recurring_session(d(2025, 6, 2), d(2025, 6, 30), &[WeekDay::Monday]);
        // Horário pendente não é erro — só não entra no orçamento
        let selection = SlotSelection::new(vec![SlotChoice {
            date: d(2025, 6, 9),
            time_label: None,
        }])
        .unwrap();

        assert!(ScheduleService::new()
            .validate_selection(&session, &selection)
            .is_ok());
    }

    #[test]
    fn selection_rejects_duplicate_dates() {
        let result = SlotSelection::new(vec![
            SlotChoice {
                date: d(2025, 6, 9),
                time_label: Some("09:00 - 10:00".to_string()),
            },
            SlotChoice {
                date: d(2025, 6, 9),
                time_label: Some("18:00 - 19:00".to_string()),
            },
        ]);
        assert!(matches!(result, Err(AppError::SelectionInvalid(_))));
    }
}

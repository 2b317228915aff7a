//! Pricing rule resolver
//!
//! Selects the price per hour for a court/date/slot from the venue's active
//! rule set and returns the computed total. Resolution is a pure function of
//! the rule list: same rules, same slot, same quote.

use courtside_core::{
    models::{DayOfWeek, PricingRule, TimeSlot},
    traits::{CourtStore, PricingRuleStore},
    AppError, AppResult,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::constants::DEFAULT_RULE_LABEL;

/// Result of a price resolution
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    /// Price per hour applied
    pub price_per_hour: Decimal,

    /// Slot duration in hours, fractional
    pub duration_hours: Decimal,

    /// `price_per_hour * duration_hours`
    pub total: Decimal,

    /// Display name of the winning rule, or the default label
    pub applied_rule: String,
}

/// Pricing engine
///
/// Rules are matched per their restrictions: a day-restricted rule only
/// matches its day, and a time-windowed rule only matches slots fully inside
/// the window. Among matches the highest priority wins; at equal priority the
/// first rule in retrieval order (priority descending, id ascending) keeps
/// the slot.
pub struct PricingEngine<C: CourtStore, R: PricingRuleStore> {
    courts: Arc<C>,
    rules: Arc<R>,
    fallback_price: Decimal,
}

impl<C: CourtStore, R: PricingRuleStore> PricingEngine<C, R> {
    /// Create a new pricing engine
    ///
    /// `fallback_price` applies when a venue has no default rule at all.
    pub fn new(courts: Arc<C>, rules: Arc<R>, fallback_price: Decimal) -> Self {
        Self {
            courts,
            rules,
            fallback_price,
        }
    }

    /// Quote a slot on a court, resolving the court's venue first
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        court_id: i32,
        date: NaiveDate,
        slot: &TimeSlot,
    ) -> AppResult<PriceQuote> {
        let found = self
            .courts
            .find_with_venue(court_id)
            .await?
            .ok_or(AppError::CourtNotFound(court_id))?;

        self.quote_for_venue(found.venue.id, date, slot).await
    }

    /// Quote a slot against a venue's rule set
    #[instrument(skip(self))]
    pub async fn quote_for_venue(
        &self,
        venue_id: i32,
        date: NaiveDate,
        slot: &TimeSlot,
    ) -> AppResult<PriceQuote> {
        let day = DayOfWeek::from(date.weekday());
        let rules = self.rules.list_active_by_venue(venue_id).await?;

        // Seed with the venue-wide default so restricted rules only win by
        // outranking it, then let any higher-priority candidate take over.
        let mut best: Option<&PricingRule> = rules.iter().find(|r| r.is_default());

        for rule in &rules {
            if !rule.applies_to(day, slot) {
                continue;
            }
            match best {
                Some(current) if rule.priority > current.priority => best = Some(rule),
                None => best = Some(rule),
                _ => {}
            }
        }

        let (price_per_hour, applied_rule) = match best {
            Some(rule) => {
                debug!(
                    "Rule '{}' (priority {}) prices slot {} on {}",
                    rule.name, rule.priority, slot, date
                );
                (rule.price_per_hour, rule.name.clone())
            }
            None => {
                debug!(
                    "No pricing rule for venue {}, falling back to {}",
                    venue_id, self.fallback_price
                );
                (self.fallback_price, DEFAULT_RULE_LABEL.to_string())
            }
        };

        let duration_hours = slot.duration_hours();

        Ok(PriceQuote {
            price_per_hour,
            duration_hours,
            total: price_per_hour * duration_hours,
            applied_rule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveTime, Utc};
    use courtside_core::models::{Court, CourtStatus, CourtWithVenue, Venue};
    use rust_decimal_macros::dec;

    struct MockCourtStore {
        court: Option<CourtWithVenue>,
    }

    #[async_trait]
    impl CourtStore for MockCourtStore {
        async fn find_with_venue(&self, _id: i32) -> AppResult<Option<CourtWithVenue>> {
            Ok(self.court.clone())
        }

        async fn list_active_by_venue(&self, _venue_id: i32) -> AppResult<Vec<Court>> {
            Ok(vec![])
        }
    }

    struct MockRuleStore {
        rules: Vec<PricingRule>,
    }

    #[async_trait]
    impl PricingRuleStore for MockRuleStore {
        async fn list_active_by_venue(&self, venue_id: i32) -> AppResult<Vec<PricingRule>> {
            let mut rules: Vec<PricingRule> = self
                .rules
                .iter()
                .filter(|r| r.venue_id == venue_id && r.is_active)
                .cloned()
                .collect();
            rules.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
            Ok(rules)
        }
    }

    fn rule(
        id: i32,
        name: &str,
        price: Decimal,
        priority: i32,
        day: Option<DayOfWeek>,
        window: Option<(&str, &str)>,
    ) -> PricingRule {
        let parse = |s| NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        PricingRule {
            id,
            venue_id: 1,
            name: name.to_string(),
            day_of_week: day,
            start_time: window.map(|(s, _)| parse(s)),
            end_time: window.map(|(_, e)| parse(e)),
            price_per_hour: price,
            priority,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn court_with_venue() -> CourtWithVenue {
        let now = Utc::now();
        CourtWithVenue {
            court: Court {
                id: 7,
                venue_id: 1,
                name: "Court 1".to_string(),
                status: CourtStatus::Active,
                sort_order: 1,
                created_at: now,
                updated_at: now,
            },
            venue: Venue {
                id: 1,
                name: "Center".to_string(),
                open_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                close_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn engine(rules: Vec<PricingRule>) -> PricingEngine<MockCourtStore, MockRuleStore> {
        PricingEngine::new(
            Arc::new(MockCourtStore {
                court: Some(court_with_venue()),
            }),
            Arc::new(MockRuleStore { rules }),
            dec!(100000),
        )
    }

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::parse(start, end).unwrap()
    }

    // 2026-06-09 is a Tuesday, 2026-06-13 a Saturday
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 9).unwrap()
    }

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 13).unwrap()
    }

    #[tokio::test]
    async fn test_peak_window_prices_contained_slot() {
        let engine = engine(vec![
            rule(1, "standard", dec!(150000), 0, None, None),
            rule(2, "peak", dec!(200000), 10, None, Some(("17:00", "21:00"))),
        ]);

        let quote = engine
            .quote(7, tuesday(), &slot("18:00", "19:30"))
            .await
            .unwrap();

        assert_eq!(quote.price_per_hour, dec!(200000));
        assert_eq!(quote.duration_hours, dec!(1.5));
        assert_eq!(quote.total, dec!(300000));
        assert_eq!(quote.applied_rule, "peak");
    }

    #[tokio::test]
    async fn test_partial_window_overlap_uses_default() {
        let engine = engine(vec![
            rule(1, "standard", dec!(150000), 0, None, None),
            rule(2, "peak", dec!(200000), 10, None, Some(("17:00", "21:00"))),
        ]);

        // Overlaps the peak window but is not contained in it
        let quote = engine
            .quote(7, tuesday(), &slot("16:00", "18:00"))
            .await
            .unwrap();

        assert_eq!(quote.price_per_hour, dec!(150000));
        assert_eq!(quote.applied_rule, "standard");
        assert_eq!(quote.total, dec!(300000));
    }

    #[tokio::test]
    async fn test_day_rule_outranks_default() {
        let engine = engine(vec![
            rule(1, "standard", dec!(100000), 0, None, None),
            rule(2, "weekend", dec!(150000), 5, Some(DayOfWeek::Saturday), None),
        ]);

        let quote = engine
            .quote(7, saturday(), &slot("10:00", "11:00"))
            .await
            .unwrap();
        assert_eq!(quote.price_per_hour, dec!(150000));
        assert_eq!(quote.applied_rule, "weekend");

        // Same request on a weekday falls back to the default rule
        let quote = engine
            .quote(7, tuesday(), &slot("10:00", "11:00"))
            .await
            .unwrap();
        assert_eq!(quote.price_per_hour, dec!(100000));
        assert_eq!(quote.applied_rule, "standard");
    }

    #[tokio::test]
    async fn test_priority_tie_keeps_first_seen() {
        let engine = engine(vec![
            rule(1, "morning-a", dec!(120000), 5, None, Some(("06:00", "12:00"))),
            rule(2, "morning-b", dec!(130000), 5, None, Some(("06:00", "12:00"))),
        ]);

        let quote = engine
            .quote(7, tuesday(), &slot("08:00", "09:00"))
            .await
            .unwrap();

        // Strict > comparison: the tie does not displace the earlier rule
        assert_eq!(quote.applied_rule, "morning-a");
    }

    #[tokio::test]
    async fn test_no_rules_falls_back_to_configured_price() {
        let engine = engine(vec![]);

        let quote = engine
            .quote(7, tuesday(), &slot("08:00", "09:00"))
            .await
            .unwrap();

        assert_eq!(quote.price_per_hour, dec!(100000));
        assert_eq!(quote.applied_rule, "default");
    }

    #[tokio::test]
    async fn test_quote_is_deterministic() {
        let engine = engine(vec![
            rule(1, "standard", dec!(150000), 0, None, None),
            rule(2, "peak", dec!(200000), 10, None, Some(("17:00", "21:00"))),
        ]);

        let a = engine
            .quote(7, tuesday(), &slot("18:00", "19:30"))
            .await
            .unwrap();
        let b = engine
            .quote(7, tuesday(), &slot("18:00", "19:30"))
            .await
            .unwrap();

        assert_eq!(a.total, b.total);
        assert_eq!(a.applied_rule, b.applied_rule);
    }

    #[tokio::test]
    async fn test_unknown_court_is_not_found() {
        let engine = PricingEngine::new(
            Arc::new(MockCourtStore { court: None }),
            Arc::new(MockRuleStore { rules: vec![] }),
            dec!(100000),
        );

        let err = engine
            .quote(99, tuesday(), &slot("08:00", "09:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CourtNotFound(99)));
    }
}

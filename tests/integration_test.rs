//! Integration tests for the backtest engine.
//!
//! Tests cover:
//! - Reference weekly run against a hand-computed result
//! - Forward purchase resolution versus backward valuation
//! - Empty outcomes (empty series, schedule past the data)
//! - Monthly schedules with short months
//! - Invariants over generated series and schedules (proptest)

mod common;

use approx::assert_relative_eq;
use common::*;
use dripback::domain::accumulation::accumulate;
use dripback::domain::backtest::{run_backtest, BacktestOutcome};
use dripback::domain::price_series::PriceSeries;
use dripback::domain::resolver;
use dripback::domain::returns::{compare_to_lump_sum, finalize};
use dripback::domain::schedule::{monthly_dates, weekly_dates};
use dripback::domain::strategy::{Cadence, Strategy};

mod reference_run {
    use super::*;

    #[test]
    fn weekly_mondays_over_first_two_weeks() {
        let series = reference_series();
        let strategy = Strategy {
            compare_to_lump_sum: false,
            ..weekly_strategy(date(2023, 1, 1), date(2023, 1, 13))
        };

        let outcome = run_backtest(&series, &strategy).unwrap();
        let result = outcome.drip().unwrap();

        assert_eq!(result.investment_count(), 2);
        assert_relative_eq!(result.total_investment, 200.0);
        assert_relative_eq!(
            result.final_value,
            (1.0 + 100.0 / 110.0) * 114.0,
            epsilon = 1e-9
        );
        assert_eq!(result.records[0].execution_date, date(2023, 1, 2));
        assert_eq!(result.records[1].execution_date, date(2023, 1, 9));
    }

    #[test]
    fn step_by_step_matches_one_shot() {
        let series = reference_series();
        let start = date(2023, 1, 1);
        let end = date(2023, 1, 13);

        let schedule = weekly_dates(start, end, 0).unwrap();
        let acc = accumulate(&series, &schedule, 100.0).unwrap();
        let stepwise = compare_to_lump_sum(acc.records, &series, start, end).unwrap();

        let outcome = run_backtest(&series, &weekly_strategy(start, end)).unwrap();
        assert_eq!(outcome, BacktestOutcome::Compared(stepwise));
    }

    #[test]
    fn lump_sum_beats_drip_in_rising_market() {
        let outcome = run_backtest(
            &reference_series(),
            &weekly_strategy(date(2023, 1, 1), date(2023, 1, 13)),
        )
        .unwrap();
        let cmp = outcome.lump_sum().unwrap();

        assert_relative_eq!(cmp.lump_sum_value, 228.0, epsilon = 1e-9);
        assert!(cmp.difference < 0.0);
        assert!(!cmp.drip_outperformed());
    }
}

mod resolution_policies {
    use super::*;

    #[test]
    fn weekend_purchase_goes_forward_valuation_goes_backward() {
        let series = reference_series();
        let sunday = date(2023, 1, 8);

        let purchase = resolver::resolve(&series, sunday).unwrap();
        let valuation = resolver::resolve_valuation(&series, sunday).unwrap();

        assert_eq!(purchase.execution_date, date(2023, 1, 9));
        assert_relative_eq!(purchase.price, 110.0);
        assert_eq!(valuation.date, date(2023, 1, 6));
        assert_relative_eq!(valuation.close, 106.0);
    }

    #[test]
    fn weekend_end_date_marks_at_friday_close() {
        let series = reference_series();
        let strategy = Strategy {
            cadence: Cadence::Weekly { weekday: 2 },
            compare_to_lump_sum: false,
            ..weekly_strategy(date(2023, 1, 1), date(2023, 1, 8))
        };
        let outcome = run_backtest(&series, &strategy).unwrap();
        let result = outcome.drip().unwrap();

        assert_eq!(result.investment_count(), 1);
        assert_relative_eq!(result.records[0].price, 105.0);
        assert_relative_eq!(result.final_price, 106.0);
    }

    #[test]
    fn saturday_contributions_fill_on_monday() {
        let series = reference_series();
        let strategy = Strategy {
            cadence: Cadence::Weekly { weekday: 5 },
            ..weekly_strategy(date(2023, 1, 1), date(2023, 1, 13))
        };
        let outcome = run_backtest(&series, &strategy).unwrap();
        let result = outcome.drip().unwrap();

        assert_eq!(result.investment_count(), 1);
        assert_eq!(result.records[0].scheduled_date, date(2023, 1, 7));
        assert_eq!(result.records[0].execution_date, date(2023, 1, 9));
    }
}

mod empty_outcomes {
    use super::*;

    #[test]
    fn empty_series() {
        let outcome = run_backtest(
            &PriceSeries::new(),
            &weekly_strategy(date(2023, 1, 1), date(2023, 3, 1)),
        )
        .unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn schedule_entirely_after_series_end() {
        let outcome = run_backtest(
            &reference_series(),
            &weekly_strategy(date(2023, 2, 1), date(2023, 6, 1)),
        )
        .unwrap();
        assert_eq!(outcome, BacktestOutcome::Empty);
    }

    #[test]
    fn window_with_no_scheduled_day() {
        // Tuesday to Thursday never contains a Monday
        let outcome = run_backtest(
            &reference_series(),
            &weekly_strategy(date(2023, 1, 3), date(2023, 1, 5)),
        )
        .unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn finalize_refuses_empty_records() {
        assert!(finalize(Vec::new(), &reference_series(), date(2023, 1, 1), date(2023, 1, 13)).is_err());
    }
}

mod monthly {
    use super::*;

    #[test]
    fn thirty_first_skips_thirty_day_months_and_february() {
        let dates = monthly_dates(date(2024, 1, 1), date(2024, 12, 31), 31).unwrap();
        let months: Vec<u32> = dates.iter().map(chrono::Datelike::month).collect();
        assert_eq!(months, vec![1, 3, 5, 7, 8, 10, 12]);
    }

    #[test]
    fn monthly_backtest_over_a_year_of_weekdays() {
        let closes = generate_weekday_closes(date(2023, 1, 2), 260, 100.0, 0.1);
        let series = PriceSeries::from_points(closes).unwrap();
        let strategy = Strategy {
            cadence: Cadence::Monthly { day_of_month: 1 },
            ..weekly_strategy(date(2023, 1, 1), date(2023, 12, 31))
        };
        let outcome = run_backtest(&series, &strategy).unwrap();
        let result = outcome.drip().unwrap();

        // 2023-01-01 is a Sunday and resolves forward to the 2nd
        assert_eq!(result.investment_count(), 12);
        assert_eq!(result.records[0].execution_date, date(2023, 1, 2));
        assert_relative_eq!(result.total_investment, 1200.0, epsilon = 1e-9);
        assert!(result.annualized_return_pct > 0.0);
    }
}

mod invariants {
    use super::*;
    use proptest::prelude::*;
    use proptest::strategy::Strategy;

    fn arb_series() -> impl Strategy<Value = PriceSeries> {
        (
            0i64..60,
            prop::collection::vec((1i64..5, 1.0f64..500.0), 1..120),
        )
            .prop_map(|(offset, steps)| {
                let mut day = date(2022, 1, 1) + chrono::Duration::days(offset);
                let points: Vec<_> = steps
                    .into_iter()
                    .map(|(gap, close)| {
                        day += chrono::Duration::days(gap);
                        (day, close)
                    })
                    .collect();
                PriceSeries::from_points(points).unwrap()
            })
    }

    proptest! {
        #[test]
        fn accumulation_invariants(
            series in arb_series(),
            weekday in 0u8..7,
            amount in 1.0f64..10_000.0,
            span in 0i64..400,
        ) {
            let start = date(2022, 1, 1);
            let end = start + chrono::Duration::days(span);
            let schedule = weekly_dates(start, end, weekday).unwrap();
            let acc = accumulate(&series, &schedule, amount).unwrap();

            prop_assert_eq!(acc.records.len() + acc.dropped, schedule.len());

            let mut prev_shares = 0.0;
            for r in &acc.records {
                prop_assert!((r.shares - amount / r.price).abs() < 1e-9);
                prop_assert!(r.cumulative_shares >= prev_shares);
                prop_assert!(r.execution_date >= r.scheduled_date);
                prev_shares = r.cumulative_shares;
            }

            if let Some(last) = acc.records.last() {
                let n = acc.records.len() as f64;
                prop_assert!((last.cumulative_amount - amount * n).abs() < 1e-6);
                let summed: f64 = acc.records.iter().map(|r| r.amount).sum();
                prop_assert!((summed - last.cumulative_amount).abs() < 1e-6);
            }
        }

        #[test]
        fn final_value_is_shares_times_final_price(
            series in arb_series(),
            day_of_month in 1u8..32,
            span in 30i64..500,
        ) {
            let start = date(2022, 1, 1);
            let end = start + chrono::Duration::days(span);
            let strategy = dripback::domain::strategy::Strategy {
                cadence: Cadence::Monthly { day_of_month },
                amount: 100.0,
                start_date: start,
                end_date: end,
                compare_to_lump_sum: true,
            };
            match run_backtest(&series, &strategy).unwrap() {
                BacktestOutcome::Empty => {}
                BacktestOutcome::Drip(_) => prop_assert!(false, "comparison was requested"),
                BacktestOutcome::Compared(cmp) => {
                    let drip = &cmp.drip;
                    let last = drip.records.last().unwrap();
                    prop_assert!((drip.final_value - last.cumulative_shares * drip.final_price).abs() < 1e-6);
                    prop_assert!((drip.total_investment - last.cumulative_amount).abs() < 1e-9);
                    prop_assert!(
                        (cmp.difference - (drip.total_return_pct - cmp.lump_sum_return_pct)).abs() < 1e-9
                    );
                }
            }
        }
    }
}

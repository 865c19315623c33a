//! Plain-text console report.

use crate::domain::backtest::BacktestOutcome;
use crate::domain::error::DripError;
use crate::domain::returns::BacktestResult;
use crate::ports::report_port::{ReportContext, ReportPort};
use std::io::Write;

/// Renders a summary table; optionally lists every fill.
#[derive(Debug, Clone, Default)]
pub struct TextReport {
    pub show_records: bool,
}

impl TextReport {
    pub fn new(show_records: bool) -> Self {
        Self { show_records }
    }

    fn write_drip(
        &self,
        result: &BacktestResult,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> std::io::Result<()> {
        let unit = ctx.strategy.cadence.period_unit();
        let plural = if result.investment_count() == 1 { "" } else { "s" };

        writeln!(out, "=== {} DRIP Backtest ===", ctx.symbol)?;
        writeln!(out, "Schedule:          {}", ctx.strategy.cadence)?;
        writeln!(
            out,
            "Period:            {} to {}",
            result.start_date, result.end_date
        )?;
        writeln!(
            out,
            "Investments:       {} {}{}",
            result.investment_count(),
            unit,
            plural
        )?;
        writeln!(
            out,
            "Amount per {:<7} ${:.2}",
            format!("{}:", unit),
            result.amount_per_period().unwrap_or(0.0)
        )?;
        writeln!(out, "Total Invested:    ${:.2}", result.total_investment)?;
        writeln!(out, "Shares Held:       {:.4}", result.total_shares)?;
        writeln!(out, "Average Cost:      ${:.2}", result.average_cost())?;
        writeln!(out, "Final Price:       ${:.2}", result.final_price)?;
        writeln!(out, "Final Value:       ${:.2}", result.final_value)?;
        writeln!(out, "Total Return:      {:.2}%", result.total_return_pct)?;
        writeln!(out, "Annualized:        {:.2}%", result.annualized_return_pct)?;

        if self.show_records {
            writeln!(out)?;
            writeln!(
                out,
                "{:<12} {:<12} {:>10} {:>10} {:>12} {:>12}",
                "Scheduled", "Executed", "Price", "Shares", "Cum Shares", "Cum Amount"
            )?;
            for r in &result.records {
                writeln!(
                    out,
                    "{:<12} {:<12} {:>10.2} {:>10.4} {:>12.4} {:>12.2}",
                    r.scheduled_date.to_string(),
                    r.execution_date.to_string(),
                    r.price,
                    r.shares,
                    r.cumulative_shares,
                    r.cumulative_amount
                )?;
            }
        }
        Ok(())
    }

    fn write_outcome(
        &self,
        outcome: &BacktestOutcome,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> std::io::Result<()> {
        match outcome {
            BacktestOutcome::Empty => {
                writeln!(
                    out,
                    "{}: no scheduled contribution could be filled between {} and {}, nothing to backtest",
                    ctx.symbol, ctx.strategy.start_date, ctx.strategy.end_date
                )?;
            }
            BacktestOutcome::Drip(result) => self.write_drip(result, ctx, out)?,
            BacktestOutcome::Compared(cmp) => {
                self.write_drip(&cmp.drip, ctx, out)?;
                writeln!(out)?;
                writeln!(out, "=== Lump Sum Comparison ===")?;
                writeln!(
                    out,
                    "Entry:             {} at ${:.2}",
                    cmp.lump_sum_date, cmp.lump_sum_price
                )?;
                writeln!(out, "Lump Sum Value:    ${:.2}", cmp.lump_sum_value)?;
                writeln!(out, "Lump Sum Return:   {:.2}%", cmp.lump_sum_return_pct)?;
                writeln!(out, "Difference:        {:+.2}%", cmp.difference)?;
                if cmp.drip_outperformed() {
                    writeln!(out, "DRIP outperformed the lump sum")?;
                } else {
                    writeln!(out, "Lump sum outperformed DRIP")?;
                }
            }
        }
        Ok(())
    }
}

impl ReportPort for TextReport {
    fn write(
        &self,
        outcome: &BacktestOutcome,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> Result<(), DripError> {
        self.write_outcome(outcome, ctx, out)?;
        Ok(())
    }
}

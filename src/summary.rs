// backend/src/summary.rs
//
// Financial summary over a date range. Fixed costs are prorated with an
// average Gregorian month: months = inclusive days / 30.4375 (365.25 / 12).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    error::AppError,
    models::{
        Breakeven, BreakevenStatus, BreakevenTarget, DateRange, FinancialSettings, FlightRecord,
        Summary,
    },
    store::{FlightStore, SettingsStore},
};

pub const AVERAGE_DAYS_PER_MONTH: Decimal = dec!(30.4375);

const HUNDRED: Decimal = dec!(100);

/// Fractional number of months covered by `range`.
pub fn months_spanned(range: &DateRange) -> Decimal {
    Decimal::from(range.days()) / AVERAGE_DAYS_PER_MONTH
}

#[derive(Debug, Default)]
struct Totals {
    flights: usize,
    flight_minutes: i64,
    billable_hours: Decimal,
    revenue: Decimal,
}

impl Totals {
    fn with(mut self, flight: &FlightRecord) -> Result<Self, AppError> {
        self.flights += 1;
        self.flight_minutes += i64::from(flight.flight_duration_minutes);
        self.billable_hours = checked(
            self.billable_hours.checked_add(flight.billable_hours),
            "total billable hours",
        )?;
        self.revenue = checked(self.revenue.checked_add(flight.estimated_revenue), "total revenue")?;
        Ok(self)
    }
}

fn checked(value: Option<Decimal>, what: &str) -> Result<Decimal, AppError> {
    value.ok_or_else(|| AppError::OutOfRange(format!("{what} is too large to compute")))
}

/// Pure computation: totals come from the stored flight values, rates from
/// `settings`. Records are assumed to already be filtered to `range`.
/// Fails with `OutOfRange` instead of overflowing.
pub fn compute_summary(
    range: &DateRange,
    flights: &[FlightRecord],
    settings: &FinancialSettings,
) -> Result<Summary, AppError> {
    let totals = flights.iter().try_fold(Totals::default(), Totals::with)?;
    let months = months_spanned(range);

    let total_variable_costs = checked(
        totals.billable_hours.checked_mul(settings.variable_cost_per_hour),
        "total variable costs",
    )?;
    let total_fixed_costs = checked(
        settings.monthly_fixed_costs.checked_mul(months),
        "total fixed costs",
    )?;
    let net_profit = checked(
        totals
            .revenue
            .checked_sub(total_variable_costs)
            .and_then(|p| p.checked_sub(total_fixed_costs)),
        "net profit",
    )?;
    let profit_margin = if totals.revenue > Decimal::ZERO {
        checked(net_profit.checked_div(totals.revenue), "profit margin")?
    } else {
        Decimal::ZERO
    };

    let profit_margin_per_hour = checked(
        settings.revenue_per_hour.checked_sub(settings.variable_cost_per_hour),
        "profit margin per hour",
    )?;
    let status = breakeven_status(
        settings,
        profit_margin_per_hour,
        months,
        totals.billable_hours,
        totals.revenue,
    )?;

    Ok(Summary {
        start_date: range.start(),
        end_date: range.end(),
        total_flights: totals.flights,
        total_flight_minutes: totals.flight_minutes,
        total_billable_hours: totals.billable_hours,
        total_revenue: totals.revenue,
        total_variable_costs,
        total_fixed_costs,
        net_profit,
        profit_margin,
        breakeven: Breakeven {
            revenue_per_hour: settings.revenue_per_hour,
            variable_cost_per_hour: settings.variable_cost_per_hour,
            monthly_fixed_costs: settings.monthly_fixed_costs,
            total_fixed_costs,
            profit_margin_per_hour,
            current_hours: totals.billable_hours,
            current_revenue: totals.revenue,
            status,
        },
    })
}

fn breakeven_status(
    settings: &FinancialSettings,
    profit_margin_per_hour: Decimal,
    months: Decimal,
    current_hours: Decimal,
    current_revenue: Decimal,
) -> Result<BreakevenStatus, AppError> {
    if profit_margin_per_hour <= Decimal::ZERO {
        return Ok(BreakevenStatus::Unreachable);
    }

    let breakeven_hours = checked(
        settings.monthly_fixed_costs.checked_div(profit_margin_per_hour),
        "breakeven hours",
    )?;
    let breakeven_billable_hours = checked(
        breakeven_hours.checked_mul(months),
        "breakeven billable hours",
    )?;
    let breakeven_revenue = checked(
        breakeven_billable_hours.checked_mul(settings.revenue_per_hour),
        "breakeven revenue",
    )?;

    let percentage_to_breakeven = if breakeven_revenue > Decimal::ZERO {
        checked(
            current_revenue
                .checked_div(breakeven_revenue)
                .and_then(|r| r.checked_mul(HUNDRED)),
            "percentage to breakeven",
        )?
    } else if current_revenue >= Decimal::ZERO {
        // no fixed costs to recover
        HUNDRED
    } else {
        Decimal::ZERO
    };

    let additional_hours_needed = checked(
        breakeven_billable_hours.checked_sub(current_hours),
        "additional hours needed",
    )?
    .max(Decimal::ZERO);
    let additional_revenue_needed = checked(
        breakeven_revenue.checked_sub(current_revenue),
        "additional revenue needed",
    )?
    .max(Decimal::ZERO);

    Ok(BreakevenStatus::Reachable(BreakevenTarget {
        breakeven_hours,
        breakeven_billable_hours,
        breakeven_revenue,
        additional_hours_needed,
        additional_revenue_needed,
        percentage_to_breakeven,
    }))
}

/// Reads the flights and the current settings concurrently, then computes.
/// Nothing is cached between calls.
pub async fn summarize(
    flight_store: &dyn FlightStore,
    settings_store: &dyn SettingsStore,
    tail_number: &str,
    range: &DateRange,
) -> Result<Summary, AppError> {
    let (records, settings) = tokio::try_join!(
        flight_store.list_flights(tail_number, range, None),
        settings_store.get_settings()
    )?;

    let summary = compute_summary(range, &records, &settings)?;
    tracing::debug!(
        tail_number,
        start = %range.start(),
        end = %range.end(),
        flights = summary.total_flights,
        reachable = summary.breakeven.is_reachable(),
        percentage = ?summary.breakeven.target().map(|t| t.percentage_to_breakeven),
        "computed summary"
    );
    Ok(summary)
}

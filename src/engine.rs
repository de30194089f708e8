use crate::error::Result;
use crate::ledger::Ledger;
use crate::metrics::{Metric, MetricSet, MetricUnit};
use crate::schema::{LayoutHint, ReportConfig, SeriesLabel};
use crate::series::{EmptySeriesResult, Series, SeriesResult, SeriesTable};
use crate::utils::{count_present, mean_present, normalize_label, sum_present};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Stateless report builder over a fixed label configuration.
///
/// Every operation is a pure function of the ledger snapshot and the
/// configuration, so one engine can serve any number of ledgers and threads.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    config: ReportConfig,
}

/// Every view the reporting surface needs, computed from one ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metrics: MetricSet,
    pub year_comparison: SeriesResult,
    pub trend: SeriesTable,
    pub margin: SeriesTable,
    pub revenue_detail: SeriesResult,
    pub expense_detail: SeriesResult,
    pub ledger: SeriesTable,
}

impl ReportEngine {
    pub fn new(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn summarize(&self, ledger: &Ledger) -> Result<MetricSet> {
        let cfg = &self.config;

        let revenue = ledger.row(&cfg.total_revenue_label)?;
        let prior = ledger.row(&cfg.prior_year_revenue_label)?;
        let expenses = ledger.row(&cfg.total_expense_label)?;
        let margin = ledger.row(&cfg.margin_label)?;
        let profit = ledger.row(&cfg.consolidated_profit_label)?;

        let current_total = sum_present(revenue.values());
        let prior_total = sum_present(prior.values());

        if count_present(margin.values()) == 0 {
            warn!(
                "Margin row '{}' has no values; average margin is undefined",
                margin.label()
            );
        }

        Ok(MetricSet {
            total_revenue_current: Metric::new(
                "total_revenue_current",
                current_total,
                MetricUnit::Currency,
                vec![revenue.label().to_string()],
            ),
            total_revenue_prior: Metric::new(
                "total_revenue_prior",
                prior_total,
                MetricUnit::Currency,
                vec![prior.label().to_string()],
            ),
            revenue_delta: Metric::new(
                "revenue_delta",
                current_total - prior_total,
                MetricUnit::Currency,
                vec![revenue.label().to_string(), prior.label().to_string()],
            ),
            total_expenses: Metric::new(
                "total_expenses",
                sum_present(expenses.values()),
                MetricUnit::Currency,
                vec![expenses.label().to_string()],
            ),
            average_margin: Metric::new(
                "average_margin",
                mean_present(margin.values()),
                MetricUnit::Percentage,
                vec![margin.label().to_string()],
            ),
            total_consolidated_profit: Metric::new(
                "total_consolidated_profit",
                sum_present(profit.values()),
                MetricUnit::Currency,
                vec![profit.label().to_string()],
            ),
        })
    }

    /// Grouped comparison of the present labels of `labels`, in requested order.
    pub fn comparison_series(&self, ledger: &Ledger, labels: &[SeriesLabel]) -> SeriesResult {
        pivot_present(ledger, labels, LayoutHint::Grouped)
    }

    /// Same presence policy as [`Self::comparison_series`], hinted as a stacked breakdown.
    pub fn detail_composition(&self, ledger: &Ledger, labels: &[SeriesLabel]) -> SeriesResult {
        pivot_present(ledger, labels, LayoutHint::Stacked)
    }

    /// Revenue and consolidated profit per month with a flat break-even line.
    pub fn trend_series(&self, ledger: &Ledger) -> Result<SeriesTable> {
        let cfg = &self.config;
        let revenue = ledger.row(&cfg.total_revenue_label)?;
        let profit = ledger.row(&cfg.consolidated_profit_label)?;

        let mut table = SeriesTable::new(
            ledger.months().to_vec(),
            vec![
                Series::new(cfg.revenue_series_name.clone(), revenue.values().to_vec()),
                Series::new(cfg.profit_series_name.clone(), profit.values().to_vec()),
            ],
            LayoutHint::Overlay,
        );
        table.push_series(Series::constant(
            cfg.break_even_series_name.clone(),
            cfg.break_even_threshold,
            ledger.month_count(),
        ));

        Ok(table)
    }

    pub fn margin_series(&self, ledger: &Ledger) -> Result<SeriesTable> {
        let margin = ledger.row(&self.config.margin_label)?;

        Ok(SeriesTable::new(
            ledger.months().to_vec(),
            vec![Series::new(margin.label(), margin.values().to_vec())],
            LayoutHint::Line,
        ))
    }

    pub fn year_comparison(&self, ledger: &Ledger) -> SeriesResult {
        self.comparison_series(ledger, &self.config.year_comparison_labels)
    }

    pub fn revenue_detail(&self, ledger: &Ledger) -> SeriesResult {
        self.detail_composition(ledger, &self.config.revenue_detail_labels)
    }

    pub fn expense_detail(&self, ledger: &Ledger) -> SeriesResult {
        self.detail_composition(ledger, &self.config.expense_detail_labels)
    }

    /// Required labels absent from `ledger`, normalized, in configuration order.
    pub fn missing_required_labels(&self, ledger: &Ledger) -> Vec<String> {
        let cfg = &self.config;
        [
            &cfg.total_revenue_label,
            &cfg.prior_year_revenue_label,
            &cfg.total_expense_label,
            &cfg.margin_label,
            &cfg.consolidated_profit_label,
        ]
        .iter()
        .filter(|l| !ledger.has_label(l))
        .map(|l| normalize_label(l))
        .collect()
    }

    pub fn report(&self, ledger: &Ledger) -> Result<Report> {
        let missing = self.missing_required_labels(ledger);
        if !missing.is_empty() {
            warn!("Ledger is missing required lines: {}", missing.join(", "));
        }

        let report = Report {
            metrics: self.summarize(ledger)?,
            year_comparison: self.year_comparison(ledger),
            trend: self.trend_series(ledger)?,
            margin: self.margin_series(ledger)?,
            revenue_detail: self.revenue_detail(ledger),
            expense_detail: self.expense_detail(ledger),
            ledger: ledger.to_series_table(),
        };

        let empty_views = [
            &report.year_comparison,
            &report.revenue_detail,
            &report.expense_detail,
        ]
        .iter()
        .filter(|r| r.is_empty())
        .count();

        info!(
            "Report assembled over {} months with {} empty optional views",
            ledger.month_count(),
            empty_views
        );

        Ok(report)
    }
}

fn pivot_present(ledger: &Ledger, labels: &[SeriesLabel], layout: LayoutHint) -> SeriesResult {
    let selection = ledger.select(labels);

    if selection.rows.is_empty() {
        debug!("No requested labels present: {:?}", selection.skipped);
        return SeriesResult::Empty(EmptySeriesResult {
            requested: selection.skipped,
        });
    }

    if !selection.skipped.is_empty() {
        debug!("Skipping absent labels: {:?}", selection.skipped);
    }

    let series = selection
        .rows
        .iter()
        .map(|(requested, row)| {
            let name = match &requested.alias {
                Some(alias) => alias.clone(),
                None => row.label().to_string(),
            };
            Series::new(name, row.values().to_vec())
        })
        .collect();

    SeriesResult::Table(
        SeriesTable::new(ledger.months().to_vec(), series, layout)
            .with_skipped(selection.skipped),
    )
}

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MetricUnit {
    Currency,
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    /// `NaN` (serialized as `null`) when no source value was present.
    #[serde(deserialize_with = "nan_from_null")]
    pub value: f64,
    pub unit: MetricUnit,
    /// Normalized ledger labels this metric was derived from.
    pub source_labels: Vec<String>,
}

impl Metric {
    pub fn new(name: &str, value: f64, unit: MetricUnit, source_labels: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            value,
            unit,
            source_labels,
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.value.is_nan()
    }
}

fn nan_from_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Scalar summary of a ledger, recomputed on every `summarize` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub total_revenue_current: Metric,
    pub total_revenue_prior: Metric,
    /// Current minus prior, signed.
    pub revenue_delta: Metric,
    pub total_expenses: Metric,
    pub average_margin: Metric,
    pub total_consolidated_profit: Metric,
}

impl MetricSet {
    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        [
            &self.total_revenue_current,
            &self.total_revenue_prior,
            &self.revenue_delta,
            &self.total_expenses,
            &self.average_margin,
            &self.total_consolidated_profit,
        ]
        .into_iter()
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(name: &str, value: f64) -> Metric {
        Metric::new(name, value, MetricUnit::Currency, vec!["ROW".to_string()])
    }

    #[test]
    fn test_metric_set_lookup_by_name() {
        let set = MetricSet {
            total_revenue_current: metric("total_revenue_current", 300.0),
            total_revenue_prior: metric("total_revenue_prior", 230.0),
            revenue_delta: metric("revenue_delta", 70.0),
            total_expenses: metric("total_expenses", 50.0),
            average_margin: Metric::new(
                "average_margin",
                f64::NAN,
                MetricUnit::Percentage,
                vec!["7. MARGEM".to_string()],
            ),
            total_consolidated_profit: metric("total_consolidated_profit", 10.0),
        };

        assert_eq!(set.iter().count(), 6);
        assert_eq!(set.get("revenue_delta").unwrap().value, 70.0);
        assert!(!set.get("average_margin").unwrap().is_defined());
        assert!(set.get("unknown").is_none());

        let json = serde_json::to_string(&set.average_margin).unwrap();
        assert!(json.contains(r#""value":null"#));

        let back: Metric = serde_json::from_str(&json).unwrap();
        assert!(back.value.is_nan());
    }
}

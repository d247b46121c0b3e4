use std::fmt;
use std::sync::Arc;

use crate::data::{DataEntry, MetricValue};

type ComputeFn = dyn Fn(&[&MetricValue]) -> Option<MetricValue> + Send + Sync;

/// A derived metric: the key it produces, the keys it reads, and how to
/// compute it.
#[derive(Clone)]
pub struct DerivationRule {
    pub key: String,
    pub arguments: Vec<String>,
    compute: Arc<ComputeFn>,
}

impl DerivationRule {
    pub fn new<F>(key: &str, arguments: &[&str], compute: F) -> Self
    where
        F: Fn(&[&MetricValue]) -> Option<MetricValue> + Send + Sync + 'static,
    {
        DerivationRule {
            key: key.to_string(),
            arguments: arguments.iter().map(|arg| arg.to_string()).collect(),
            compute: Arc::new(compute),
        }
    }

    /// A rule over numeric arguments. If any argument is not a number the
    /// rule yields nothing.
    pub fn numeric<F>(key: &str, arguments: &[&str], compute: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::new(key, arguments, move |values| {
            let numbers: Option<Vec<f64>> = values.iter().map(|value| value.as_f64()).collect();
            numbers.map(|numbers| MetricValue::Number(compute(&numbers)))
        })
    }

    /// Evaluates the rule against one entity.
    ///
    /// Returns `None` when an argument is absent or when the result is falsy
    /// (zero, empty, non-finite): incomplete derived metrics are hidden, not
    /// shown as zero.
    pub fn evaluate(&self, entry: &DataEntry) -> Option<MetricValue> {
        let values: Option<Vec<&MetricValue>> =
            self.arguments.iter().map(|arg| entry.get(arg)).collect();
        let values = values?;

        (self.compute)(&values).filter(MetricValue::is_truthy)
    }
}

impl fmt::Debug for DerivationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRule")
            .field("key", &self.key)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

use crate::domain::reading::ReadingKind;
use crate::domain::thresholds::AlertThresholds;
use crate::ports::inbound::AlertEvaluationApi;
use tracing::warn;

/// Stateless evaluator over a fixed set of thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }
}

impl AlertEvaluationApi for AlertEvaluator {
    fn evaluate(&self, kind: ReadingKind, value: f64) -> bool {
        let is_alert = self.thresholds.is_alert(kind, value);
        if is_alert {
            warn!(kind = %kind, value, "Environmental reading outside safe range");
        }
        is_alert
    }
}

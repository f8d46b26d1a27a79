use shared::metrics_defs::{MetricDef, MetricType};

pub const MIRROR_OUTCOME: MetricDef = MetricDef {
    name: "fanout.mirror.outcome",
    metric_type: MetricType::Counter,
    description: "Per-mirror outcomes of a fan-out. Tagged with result.",
};

pub const FANOUT_DURATION: MetricDef = MetricDef {
    name: "fanout.duration",
    metric_type: MetricType::Histogram,
    description: "Time until every mirror of a fan-out has answered or failed, in seconds",
};

pub const RECONCILE_RESULT: MetricDef = MetricDef {
    name: "fanout.reconcile",
    metric_type: MetricType::Counter,
    description: "Reconciliation results. Tagged with policy, result.",
};

pub const ALL_METRICS: &[MetricDef] = &[MIRROR_OUTCOME, FANOUT_DURATION, RECONCILE_RESULT];

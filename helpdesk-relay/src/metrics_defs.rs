use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS: MetricDef = MetricDef {
    name: "helpdesk_relay.requests",
    metric_type: MetricType::Counter,
    description: "Relayed requests. Tagged with branch (upload, forward) and outcome.",
};

pub const UPSTREAM_DURATION: MetricDef = MetricDef {
    name: "helpdesk_relay.upstream.duration",
    metric_type: MetricType::Histogram,
    description: "Time until the helpdesk answered, in seconds. Tagged with branch.",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUESTS, UPSTREAM_DURATION];

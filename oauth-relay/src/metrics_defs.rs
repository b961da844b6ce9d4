use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS: MetricDef = MetricDef {
    name: "oauth_relay.requests",
    metric_type: MetricType::Counter,
    description: "Handled OAuth requests. Tagged with endpoint (authorize, token, unsupported) and outcome.",
};

pub const UPSTREAM_DURATION: MetricDef = MetricDef {
    name: "oauth_relay.upstream.duration",
    metric_type: MetricType::Histogram,
    description: "Time until the OAuth backend answered, in seconds. Tagged with endpoint.",
};

pub const ENVIRONMENT_SELECTED: MetricDef = MetricDef {
    name: "oauth_relay.environment.selected",
    metric_type: MetricType::Counter,
    description: "Token requests routed to a backend environment. Tagged with environment.",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUESTS, UPSTREAM_DURATION, ENVIRONMENT_SELECTED];

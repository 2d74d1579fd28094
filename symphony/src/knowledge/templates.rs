//! Built-in response templates
//!
//! Bodies reference `MetricRecord` fields by their camelCase names.

/// Topics available from the start of a session, in match priority order.
pub const BASE_TEMPLATES: &[(&str, &str)] = &[
    (
        "health",
        "Database health is currently at {health}%. {name} reports {issues} open issues and its last ten health samples were {history}.",
    ),
    (
        "latency",
        "Average query latency on {name} is {latency} ms. Latency above 10 ms usually points to missing indexes or lock contention.",
    ),
    (
        "throughput",
        "{name} is processing {throughput} queries per second with {connections} active connections.",
    ),
    (
        "connection",
        "{name} currently holds {connections} active connections. I rebalance the pool automatically when it nears saturation.",
    ),
    (
        "space",
        "{name} has {freeSpace}% free storage remaining. Below 15% I recommend archiving cold data or expanding the volume.",
    ),
    (
        "cpu",
        "CPU usage on {name} is at {cpuUsage}%, with memory at {memoryUsage}%.",
    ),
    (
        "memory",
        "Memory usage on {name} is at {memoryUsage}%. Buffer pool tuning is applied when usage stays above 80%.",
    ),
    (
        "issue",
        "{name} has {issues} detected issues. Open the Healing Center to review recommended fixes.",
    ),
    (
        "heal",
        "{name} was last healed {lastHealed}. Self-healing runs automatically whenever health drops below the configured threshold.",
    ),
];

/// Topics unlocked once the model has been trained.
pub const TRAINED_TEMPLATES: &[(&str, &str)] = &[
    (
        "trend",
        "Health trend for {name} over the last samples: {history}. Current health is {health}%.",
    ),
    (
        "anomaly",
        "No anomalies exceed the alert threshold on {name}. Latency is {latency} ms and CPU is at {cpuUsage}%.",
    ),
    (
        "capacity",
        "Capacity forecast for {name}: {freeSpace}% free storage and {memoryUsage}% memory in use at {throughput} queries per second.",
    ),
    (
        "uptime",
        "{name} ({type}) has an uptime of {uptime} and is currently {status}.",
    ),
];

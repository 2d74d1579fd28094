//! Read-only dashboard data supplied to the assistant

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    DetectedIssue, HealingEvent, HealingOutcome, HealthStatus, Insight, MetricRecord, Severity,
};

/// Source of the fixed records the assistant reasons over.
pub trait DataProvider: Send + Sync {
    fn metric_records(&self) -> &[MetricRecord];
    fn detected_issues(&self) -> &[DetectedIssue];
    fn healing_events(&self) -> &[HealingEvent];
    fn insights(&self) -> &[Insight];
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureSet {
    #[serde(default)]
    pub databases: Vec<MetricRecord>,
    #[serde(default)]
    pub issues: Vec<DetectedIssue>,
    #[serde(default)]
    pub healing_events: Vec<HealingEvent>,
    #[serde(default)]
    pub insights: Vec<Insight>,
}

impl DataProvider for FixtureSet {
    fn metric_records(&self) -> &[MetricRecord] {
        &self.databases
    }

    fn detected_issues(&self) -> &[DetectedIssue] {
        &self.issues
    }

    fn healing_events(&self) -> &[HealingEvent] {
        &self.healing_events
    }

    fn insights(&self) -> &[Insight] {
        &self.insights
    }
}

impl FixtureSet {
    /// Load a JSON fixture document. Missing sections are empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let fixtures: FixtureSet = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            databases = fixtures.databases.len(),
            issues = fixtures.issues.len(),
            "Loaded fixtures"
        );
        Ok(fixtures)
    }

    /// The four monitored databases shown on the dashboard.
    pub fn dashboard() -> Self {
        Self {
            databases: vec![
                database(
                    ("db1", "Production DB", "PostgreSQL"),
                    HealthStatus::Healthy,
                    "99.98%",
                    [97.0, 5.2, 1320.0, 72.5, 34.0, 41.0],
                    (84, 2),
                    "2 hours ago",
                    [98.0, 97.0, 99.0, 96.0, 97.0, 98.0, 97.0, 99.0, 98.0, 97.0],
                ),
                database(
                    ("db2", "Analytics DB", "MySQL"),
                    HealthStatus::Warning,
                    "99.92%",
                    [88.0, 8.7, 870.0, 31.2, 58.0, 72.0],
                    (42, 5),
                    "6 hours ago",
                    [92.0, 90.0, 88.0, 89.0, 85.0, 87.0, 90.0, 92.0, 90.0, 88.0],
                ),
                database(
                    ("db3", "Customer Data", "MongoDB"),
                    HealthStatus::Healthy,
                    "99.97%",
                    [94.0, 3.8, 2240.0, 68.4, 45.0, 53.0],
                    (112, 3),
                    "1 day ago",
                    [93.0, 94.0, 96.0, 95.0, 94.0, 93.0, 94.0, 92.0, 93.0, 94.0],
                ),
                database(
                    ("db4", "Archive DB", "MariaDB"),
                    HealthStatus::Critical,
                    "98.76%",
                    [71.0, 15.3, 420.0, 12.8, 78.0, 86.0],
                    (28, 12),
                    "3 days ago",
                    [75.0, 72.0, 70.0, 74.0, 76.0, 73.0, 72.0, 71.0, 69.0, 71.0],
                ),
            ],
            issues: vec![
                issue(
                    ("issue1", "Analytics DB"),
                    Severity::Warning,
                    "Slow-running queries detected",
                    ("pending", "2023-06-15T07:12:43"),
                    "Optimize query cache and indexes",
                    91,
                    &["user_analytics", "session_data"],
                    "Medium",
                ),
                issue(
                    ("issue2", "Archive DB"),
                    Severity::Critical,
                    "Low disk space (12.8% remaining)",
                    ("pending", "2023-06-15T05:44:21"),
                    "Clean up old data or increase storage",
                    98,
                    &["system_logs", "audit_history"],
                    "High",
                ),
                issue(
                    ("issue3", "Production DB"),
                    Severity::Low,
                    "Suboptimal index usage on customer_orders table",
                    ("pending", "2023-06-15T02:12:18"),
                    "Create composite index on (customer_id, order_date)",
                    87,
                    &["customer_orders"],
                    "Low",
                ),
                issue(
                    ("issue4", "Customer Data"),
                    Severity::Warning,
                    "Potential data inconsistency in user_preferences collection",
                    ("investigating", "2023-06-14T23:55:07"),
                    "Run data integrity check and repair",
                    82,
                    &["user_preferences"],
                    "Medium",
                ),
            ],
            healing_events: vec![
                event(
                    ("event1", "Production DB"),
                    "2023-06-15T08:43:21",
                    "Automatic index optimization performed",
                    HealingOutcome::Success,
                    ("1m 45s", "Improved query performance by 28%"),
                    96,
                ),
                event(
                    ("event2", "Analytics DB"),
                    "2023-06-15T06:12:05",
                    "Query cache optimized",
                    HealingOutcome::Success,
                    ("3m 12s", "Reduced memory usage by 12%"),
                    92,
                ),
                event(
                    ("event3", "Customer Data"),
                    "2023-06-14T22:37:49",
                    "Data inconsistency detected and repaired",
                    HealingOutcome::Success,
                    ("4m 38s", "Fixed 3 schema integrity issues"),
                    89,
                ),
                event(
                    ("event4", "Archive DB"),
                    "2023-06-14T19:54:12",
                    "Attempted disk space optimization",
                    HealingOutcome::Failed,
                    ("2m 03s", "Insufficient permissions to compress tables"),
                    76,
                ),
                event(
                    ("event5", "Production DB"),
                    "2023-06-14T14:22:36",
                    "Connection pool rebalanced",
                    HealingOutcome::Success,
                    ("0m 47s", "Improved connection throughput by 15%"),
                    94,
                ),
            ],
            insights: vec![
                insight(
                    ("insight1", "performance", "2023-06-15T07:30:22"),
                    "Potential Performance Pattern Detected",
                    "Analytics DB shows cyclical performance issues every Monday at 9 AM, correlating with weekly reporting jobs.",
                    "Consider staggering report generation or optimizing the involved queries.",
                    86,
                ),
                insight(
                    ("insight2", "resource", "2023-06-14T18:45:39"),
                    "Resource Allocation Inefficiency",
                    "Archive DB is over-provisioned by approximately 40% based on actual usage patterns over the last 30 days.",
                    "Consider downscaling to reduce costs while maintaining performance.",
                    92,
                ),
                insight(
                    ("insight3", "security", "2023-06-14T03:12:56"),
                    "Anomalous Access Pattern",
                    "Unusual query pattern detected on Production DB outside normal business hours.",
                    "Review security logs and access controls for potential unauthorized access.",
                    79,
                ),
            ],
        }
    }
}

fn database(
    (id, name, engine): (&str, &str, &str),
    status: HealthStatus,
    uptime: &str,
    [health, latency, throughput, free_space, cpu_usage, memory_usage]: [f64; 6],
    (connections, issues): (u32, u32),
    last_healed: &str,
    history: [f64; 10],
) -> MetricRecord {
    MetricRecord {
        id: Some(id.to_string()),
        engine: Some(engine.to_string()),
        status: Some(status),
        uptime: Some(uptime.to_string()),
        health,
        latency,
        throughput,
        connections,
        free_space,
        cpu_usage,
        memory_usage,
        issues,
        last_healed: Some(last_healed.to_string()),
        ..MetricRecord::new(name)
    }
    .with_history(history)
}

#[allow(clippy::too_many_arguments)]
fn issue(
    (id, database): (&str, &str),
    severity: Severity,
    description: &str,
    (status, detected_at): (&str, &str),
    recommendation: &str,
    ai_confidence: u8,
    affected_tables: &[&str],
    estimated_impact: &str,
) -> DetectedIssue {
    DetectedIssue {
        id: id.to_string(),
        database: database.to_string(),
        severity,
        description: description.to_string(),
        status: status.to_string(),
        detected_at: detected_at.to_string(),
        recommendation: recommendation.to_string(),
        ai_confidence,
        affected_tables: affected_tables.iter().map(|t| t.to_string()).collect(),
        estimated_impact: estimated_impact.to_string(),
    }
}

fn event(
    (id, database): (&str, &str),
    timestamp: &str,
    description: &str,
    status: HealingOutcome,
    (duration, impact): (&str, &str),
    ai_confidence: u8,
) -> HealingEvent {
    HealingEvent {
        id: id.to_string(),
        database: database.to_string(),
        timestamp: timestamp.to_string(),
        description: description.to_string(),
        status,
        duration: duration.to_string(),
        impact: impact.to_string(),
        ai_confidence,
    }
}

fn insight(
    (id, category, timestamp): (&str, &str, &str),
    title: &str,
    description: &str,
    recommendation: &str,
    confidence: u8,
) -> Insight {
    Insight {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        recommendation: recommendation.to_string(),
        confidence,
        category: category.to_string(),
        timestamp: timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_dashboard_fixtures() {
        let fixtures = FixtureSet::dashboard();
        let names: Vec<&str> = fixtures
            .metric_records()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Production DB", "Analytics DB", "Customer Data", "Archive DB"]
        );
        assert!(fixtures
            .metric_records()
            .iter()
            .all(|r| r.history.len() <= MetricRecord::HISTORY_LIMIT));
        assert_eq!(fixtures.detected_issues().len(), 4);
        assert_eq!(fixtures.healing_events().len(), 5);
        assert_eq!(fixtures.insights().len(), 3);
    }

    #[test]
    fn test_dashboard_issues_keep_their_own_status_and_detection_time() {
        let fixtures = FixtureSet::dashboard();
        let issues = fixtures.detected_issues();

        assert_eq!(issues[0].detected_at, "2023-06-15T07:12:43");
        assert_eq!(issues[3].id, "issue4");
        assert_eq!(issues[3].status, "investigating");
        assert_eq!(issues[3].detected_at, "2023-06-14T23:55:07");

        let failed: Vec<&str> = fixtures
            .healing_events()
            .iter()
            .filter(|e| e.status == HealingOutcome::Failed)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(failed, vec!["event4"]);
    }

    #[test]
    fn test_load_fixture_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "databases": [{{
                    "name": "Staging DB",
                    "health": 91,
                    "latency": 4.1,
                    "throughput": 300,
                    "connections": 12,
                    "freeSpace": 55.5,
                    "cpuUsage": 20,
                    "memoryUsage": 33,
                    "issues": 1
                }}]
            }}"#
        )
        .unwrap();

        let fixtures = FixtureSet::load(file.path()).unwrap();
        assert_eq!(fixtures.metric_records().len(), 1);
        assert_eq!(fixtures.metric_records()[0].name, "Staging DB");
        assert!(fixtures.detected_issues().is_empty());
        assert!(fixtures.insights().is_empty());
    }

    #[test]
    fn test_load_keeps_only_recent_history() {
        let samples: Vec<String> = (1..=15).map(|n| n.to_string()).collect();
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"databases": [{{
                "name": "Staging DB",
                "health": 91,
                "latency": 4.1,
                "throughput": 300,
                "connections": 12,
                "freeSpace": 55.5,
                "cpuUsage": 20,
                "memoryUsage": 33,
                "issues": 1,
                "history": [{}]
            }}]}}"#,
            samples.join(", ")
        )
        .unwrap();

        let fixtures = FixtureSet::load(file.path()).unwrap();
        let history = &fixtures.metric_records()[0].history;
        assert_eq!(history.len(), MetricRecord::HISTORY_LIMIT);
        assert_eq!(history.first(), Some(&6.0));
        assert_eq!(history.last(), Some(&15.0));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = FixtureSet::load("/nonexistent/symphony-fixtures.json");
        assert!(matches!(result, Err(crate::error::SymphonyError::Io(_))));
    }

    #[test]
    fn test_load_malformed_file_is_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let result = FixtureSet::load(file.path());
        assert!(matches!(result, Err(crate::error::SymphonyError::Json(_))));
    }
}

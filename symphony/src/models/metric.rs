use serde::{Deserialize, Deserializer, Serialize};

/// One monitored database instance as reported by the dashboard data provider.
///
/// Records are read-only for the lifetime of a session. Field names follow the
/// dashboard's camelCase keys, which are also the placeholder names templates
/// may reference (`{freeSpace}`, `{cpuUsage}`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub status: Option<HealthStatus>,
    #[serde(default)]
    pub uptime: Option<String>,
    pub health: f64,
    pub latency: f64,
    pub throughput: f64,
    pub connections: u32,
    pub free_space: f64,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub issues: u32,
    #[serde(default)]
    pub last_healed: Option<String>,
    #[serde(default, deserialize_with = "recent_history")]
    pub history: Vec<f64>,
}

fn recent_history<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let samples = Vec::<f64>::deserialize(deserializer)?;
    Ok(keep_recent(samples))
}

fn keep_recent(mut history: Vec<f64>) -> Vec<f64> {
    if history.len() > MetricRecord::HISTORY_LIMIT {
        history.drain(..history.len() - MetricRecord::HISTORY_LIMIT);
    }
    history
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl MetricRecord {
    /// Upper bound on retained health samples.
    pub const HISTORY_LIMIT: usize = 10;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            engine: None,
            status: None,
            uptime: None,
            health: 0.0,
            latency: 0.0,
            throughput: 0.0,
            connections: 0,
            free_space: 0.0,
            cpu_usage: 0.0,
            memory_usage: 0.0,
            issues: 0,
            last_healed: None,
            history: Vec::new(),
        }
    }

    /// Keep only the most recent `HISTORY_LIMIT` samples.
    pub fn with_history(mut self, samples: impl IntoIterator<Item = f64>) -> Self {
        self.history = keep_recent(samples.into_iter().collect());
        self
    }

    /// Render a field by its placeholder name.
    ///
    /// Numbers use their native decimal representation (`97.0` renders as `97`).
    /// Returns `None` for unknown names and for optional fields that are absent.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "name" => Some(self.name.clone()),
            "type" => self.engine.clone(),
            "status" => self.status.map(|s| s.to_string()),
            "uptime" => self.uptime.clone(),
            "health" => Some(self.health.to_string()),
            "latency" => Some(self.latency.to_string()),
            "throughput" => Some(self.throughput.to_string()),
            "connections" => Some(self.connections.to_string()),
            "freeSpace" => Some(self.free_space.to_string()),
            "cpuUsage" => Some(self.cpu_usage.to_string()),
            "memoryUsage" => Some(self.memory_usage.to_string()),
            "issues" => Some(self.issues.to_string()),
            "lastHealed" => self.last_healed.clone(),
            "history" => Some(
                self.history
                    .iter()
                    .map(|sample| sample.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> MetricRecord {
        MetricRecord {
            health: 97.0,
            latency: 5.2,
            connections: 84,
            free_space: 72.5,
            issues: 2,
            ..MetricRecord::new("Production DB")
        }
        .with_history([98.0, 97.0, 99.0])
    }

    #[test]
    fn test_numeric_fields_use_native_decimal_representation() {
        let record = production();
        assert_eq!(record.field("health").as_deref(), Some("97"));
        assert_eq!(record.field("latency").as_deref(), Some("5.2"));
        assert_eq!(record.field("freeSpace").as_deref(), Some("72.5"));
        assert_eq!(record.field("connections").as_deref(), Some("84"));
    }

    #[test]
    fn test_history_renders_comma_separated() {
        assert_eq!(
            production().field("history").as_deref(),
            Some("98, 97, 99")
        );
    }

    #[test]
    fn test_unknown_and_absent_fields() {
        let record = production();
        assert!(record.field("replicationLag").is_none());
        assert!(record.field("uptime").is_none());
        assert!(record.field("free_space").is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let record = MetricRecord::new("Archive DB").with_history((0..15).map(f64::from));
        assert_eq!(record.history.len(), MetricRecord::HISTORY_LIMIT);
        assert_eq!(record.history.first(), Some(&5.0));
        assert_eq!(record.history.last(), Some(&14.0));
    }

    #[test]
    fn test_deserializes_dashboard_keys() {
        let json = r#"{
            "id": "db2",
            "name": "Analytics DB",
            "type": "MySQL",
            "health": 88,
            "status": "warning",
            "uptime": "99.92%",
            "issues": 5,
            "latency": 8.7,
            "throughput": 870,
            "connections": 42,
            "freeSpace": 31.2,
            "cpuUsage": 58,
            "memoryUsage": 72,
            "lastHealed": "6 hours ago",
            "history": [92, 90, 88]
        }"#;

        let record: MetricRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Analytics DB");
        assert_eq!(record.engine.as_deref(), Some("MySQL"));
        assert_eq!(record.status, Some(HealthStatus::Warning));
        assert_eq!(record.field("cpuUsage").as_deref(), Some("58"));
        assert_eq!(record.field("type").as_deref(), Some("MySQL"));
        assert_eq!(record.history, vec![92.0, 90.0, 88.0]);
    }
}

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::intelligence::CapabilityGate;
use crate::knowledge::KnowledgeStore;
use crate::models::{Capability, MetricRecord};

/// Returned when no rule matches the query.
pub const DEFAULT_RESPONSE: &str = "I don't have specific information about that yet. Try asking about health, latency, throughput, connections, storage space, CPU, memory or issues, or ask what I can do.";

/// Phrases that ask the assistant to describe itself.
pub const META_PHRASES: &[&str] = &["capabilities", "what can you do"];

/// Trigger phrase for each capability-specific answer, in priority order.
pub const CAPABILITY_PHRASES: &[(&str, Capability)] = &[
    ("orchestration", Capability::AutonomousOrchestration),
    ("optimize", Capability::QueryOptimization),
    ("learn", Capability::ContinuousLearning),
    ("federated", Capability::FederatedLearning),
    ("index", Capability::CognitiveIndexing),
    ("threat", Capability::PredictiveThreat),
    ("workload", Capability::WorkloadShaping),
];

/// Live values some capability answers interpolate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub iterations: u32,
    pub db_count: usize,
}

impl Counters {
    pub fn new(iterations: u32, db_count: usize) -> Self {
        Self {
            iterations,
            db_count,
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Replace every `{field}` the record can render; anything else stays literal.
pub fn fill_placeholders(body: &str, record: Option<&MetricRecord>) -> String {
    placeholder_pattern()
        .replace_all(body, |caps: &Captures| {
            record
                .and_then(|r| r.field(&caps[1]))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Record named in the query (case-insensitive substring), else the first record.
pub fn select_record<'r>(query: &str, records: &'r [MetricRecord]) -> Option<&'r MetricRecord> {
    let query = query.to_lowercase();
    records
        .iter()
        .find(|r| !r.name.is_empty() && query.contains(&r.name.to_lowercase()))
        .or_else(|| records.first())
}

pub fn capabilities_sentence(gate: &CapabilityGate) -> String {
    let names = gate
        .enabled()
        .into_iter()
        .map(Capability::display_name)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "I'm an AI database co-pilot. My currently enabled capabilities are: {names}. Use /enable or /disable to switch a capability on or off, and /caps to list them all."
    )
}

pub fn capability_answer(capability: Capability, counters: Counters) -> String {
    match capability {
        Capability::AutonomousOrchestration => "Autonomous orchestration is active. I coordinate healing actions across your databases and schedule index rebuilds and failovers during low-traffic windows without waiting for manual approval.".to_string(),
        Capability::QueryOptimization => "Query optimization is enabled. I analyze slow query logs, rewrite inefficient joins and suggest composite indexes for the hottest access paths.".to_string(),
        Capability::ContinuousLearning => format!(
            "Continuous learning is running. I have completed {} learning iterations so far and refine my models with every new health sample.",
            counters.iterations
        ),
        Capability::FederatedLearning => format!(
            "Federated learning is enabled across {} databases. Each instance trains locally and only model updates are shared, so raw data never leaves its host.",
            counters.db_count
        ),
        Capability::CognitiveIndexing => "Cognitive indexing is active. I track how query patterns shift over time and create or retire indexes to match.".to_string(),
        Capability::PredictiveThreat => "Predictive threat detection is enabled. I watch for anomalous access patterns and injection signatures and flag suspicious sessions before they reach your data.".to_string(),
        Capability::WorkloadShaping => "Workload shaping is active. Heavy analytical queries are throttled during peak hours and batch jobs move to quieter windows to keep latency stable.".to_string(),
    }
}

/// Turns a free-text query into the assistant's answer.
///
/// Rules are tried in order and the first match wins:
/// 1. meta phrases list the enabled capabilities,
/// 2. a capability phrase whose flag is enabled yields its long-form answer,
/// 3. the first knowledge-store keyword in the query yields its filled template,
/// 4. otherwise [`DEFAULT_RESPONSE`].
#[derive(Debug, Clone, Copy)]
pub struct ResponseResolver<'a> {
    store: &'a KnowledgeStore,
    gate: &'a CapabilityGate,
}

impl<'a> ResponseResolver<'a> {
    pub fn new(store: &'a KnowledgeStore, gate: &'a CapabilityGate) -> Self {
        Self { store, gate }
    }

    pub fn resolve(&self, query: &str, records: &[MetricRecord], counters: Counters) -> String {
        let lowered = query.to_lowercase();

        if META_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            tracing::debug!(rule = "meta", "Resolved query");
            return capabilities_sentence(self.gate);
        }

        if let Some((_, capability)) = CAPABILITY_PHRASES
            .iter()
            .find(|(phrase, cap)| lowered.contains(phrase) && self.gate.is_enabled(*cap))
        {
            tracing::debug!(rule = "capability", capability = %capability, "Resolved query");
            return capability_answer(*capability, counters);
        }

        if let Some(template) = self.store.find_match(&lowered) {
            let record = select_record(&lowered, records);
            tracing::debug!(
                rule = "knowledge",
                keyword = %template.keyword,
                record = record.map(|r| r.name.as_str()).unwrap_or("<none>"),
                "Resolved query"
            );
            return fill_placeholders(&template.body, record);
        }

        tracing::debug!(rule = "default", "No rule matched query");
        DEFAULT_RESPONSE.to_string()
    }
}

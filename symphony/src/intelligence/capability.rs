use std::collections::BTreeMap;

use crate::models::Capability;

/// Runtime on/off switches for extended assistant answers.
///
/// Changes are visible to the next resolve call.
#[derive(Debug, Clone, Default)]
pub struct CapabilityGate {
    flags: BTreeMap<Capability, bool>,
}

impl CapabilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        let mut gate = Self::new();
        for capability in capabilities {
            gate.enable(capability);
        }
        gate
    }

    pub fn enable(&mut self, capability: Capability) {
        self.flags.insert(capability, true);
    }

    pub fn disable(&mut self, capability: Capability) {
        self.flags.insert(capability, false);
    }

    /// Flip a flag and return its new state.
    pub fn toggle(&mut self, capability: Capability) -> bool {
        let enabled = !self.is_enabled(capability);
        self.flags.insert(capability, enabled);
        enabled
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.flags.get(&capability).copied().unwrap_or(false)
    }

    /// Enabled capabilities in declaration order.
    pub fn enabled(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.is_enabled(*cap))
            .collect()
    }

    /// Every capability with its current state, in declaration order.
    pub fn snapshot(&self) -> Vec<(Capability, bool)> {
        Capability::ALL
            .into_iter()
            .map(|cap| (cap, self.is_enabled(cap)))
            .collect()
    }
}

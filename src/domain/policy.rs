//! Per-organization policy preferences.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrgId;

/// Organization guardrails and persona prompt.
///
/// Guardrails merge on write (set union, exact-string dedup); the
/// persona prompt replaces on write. The merge itself happens in the
/// policy repository so concurrent writers union rather than clobber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyPreferences {
    pub org_id: OrgId,
    pub guardrails: Vec<String>,
    pub persona_prompt: Option<String>,
}

impl PolicyPreferences {
    /// The default policy for an organization that has set nothing.
    pub fn empty(org_id: OrgId) -> Self {
        Self {
            org_id,
            guardrails: Vec::new(),
            persona_prompt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_policy_has_no_guardrails_and_no_persona() {
        let policy = PolicyPreferences::empty(OrgId::new());
        assert!(policy.guardrails.is_empty());
        assert!(policy.persona_prompt.is_none());
    }
}

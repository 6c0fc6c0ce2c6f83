//! Versioned rule catalog.
//!
//! Every rule is an ordered list of versions numbered from 1. At most one
//! version per rule is published at a time; creating a version never
//! changes which one that is.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::clock::{Clock, SystemClock};
use crate::error::CatalogError;
use crate::record::{
    check_case_names, NewRuleVersion, RegressionCase, RuleListing, RuleStatus, RuleSummary,
    RuleVersion,
};

type Rules = BTreeMap<String, Vec<RuleVersion>>;

/// In-memory rule catalog, safe to share across threads.
///
/// Reads hand out clones, so a caller never observes a version being
/// modified under it.
pub struct RuleCatalog {
    rules: RwLock<Rules>,
    clock: Arc<dyn Clock>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleCatalog")
            .field("rules", &self.read().len())
            .finish_non_exhaustive()
    }
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        RuleCatalog {
            rules: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    // A panic while holding the lock cannot leave a half-applied update:
    // every mutation is validated before it touches the map.
    fn read(&self) -> RwLockReadGuard<'_, Rules> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Rules> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append the next version of a rule as a draft.
    ///
    /// The first version of an unknown stable id creates the rule.
    pub fn create_version(&self, payload: NewRuleVersion) -> Result<RuleVersion, CatalogError> {
        payload.check()?;
        let now = self.clock.now();

        let mut rules = self.write();
        let versions = rules.entry(payload.stable_id.clone()).or_default();
        let number = versions.last().map_or(1, |latest| latest.version + 1);
        let record = RuleVersion {
            stable_id: payload.stable_id,
            version: number,
            name: payload.name,
            description: payload.description,
            labels: payload.labels,
            definition: payload.definition,
            status: RuleStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
            revision_notes: payload.revision_notes,
            regression_cases: payload.regression_cases,
        };
        versions.push(record.clone());

        tracing::info!(stable_id = %record.stable_id, version = number, "rule version created");
        Ok(record)
    }

    /// One summary per rule, ordered by stable id.
    pub fn list_rules(&self) -> RuleListing {
        let rules = self.read();
        let summaries: Vec<RuleSummary> = rules
            .iter()
            .filter_map(|(stable_id, versions)| {
                let latest = versions.last()?;
                Some(RuleSummary {
                    stable_id: stable_id.clone(),
                    name: latest.name.clone(),
                    description: latest.description.clone(),
                    labels: latest.labels.clone(),
                    latest_version: latest.version,
                    published_version: versions
                        .iter()
                        .find(|v| v.is_published())
                        .map(|v| v.version),
                    status: latest.status,
                })
            })
            .collect();
        RuleListing {
            total: summaries.len(),
            rules: summaries,
        }
    }

    /// All versions of a rule, oldest first.
    pub fn list_versions(&self, stable_id: &str) -> Result<Vec<RuleVersion>, CatalogError> {
        self.read()
            .get(stable_id)
            .cloned()
            .ok_or_else(|| not_found(stable_id))
    }

    /// Make `version` the published version, demoting whichever was
    /// published before. Publishing the already published version refreshes
    /// its timestamps.
    pub fn publish_version(
        &self,
        stable_id: &str,
        version: u32,
        notes: Option<&str>,
    ) -> Result<RuleVersion, CatalogError> {
        let now = self.clock.now();
        let mut rules = self.write();
        let versions = rules.get_mut(stable_id).ok_or_else(|| not_found(stable_id))?;
        let target = versions
            .iter()
            .position(|v| v.version == version)
            .ok_or_else(|| CatalogError::RuleVersionNotFound {
                stable_id: stable_id.to_string(),
                version,
            })?;

        for other in versions.iter_mut().filter(|v| v.is_published()) {
            other.status = RuleStatus::Draft;
            other.published_at = None;
        }

        let record = &mut versions[target];
        record.status = RuleStatus::Published;
        record.published_at = Some(now);
        record.updated_at = now;
        if let Some(notes) = notes.filter(|n| !n.is_empty()) {
            record.revision_notes = Some(notes.to_string());
        }

        tracing::info!(stable_id, version, "rule version published");
        Ok(record.clone())
    }

    /// Look up a version.
    ///
    /// With an explicit `version` that exact version is returned. Otherwise
    /// the published version wins unless `prefer_latest` is set or nothing
    /// is published, in which case the highest-numbered version is used.
    pub fn get_version(
        &self,
        stable_id: &str,
        version: Option<u32>,
        prefer_latest: bool,
    ) -> Result<RuleVersion, CatalogError> {
        let rules = self.read();
        let versions = rules.get(stable_id).ok_or_else(|| not_found(stable_id))?;

        let found = match version {
            Some(number) => versions.iter().find(|v| v.version == number),
            None if prefer_latest => versions.last(),
            None => versions
                .iter()
                .find(|v| v.is_published())
                .or_else(|| versions.last()),
        };
        found.cloned().ok_or_else(|| match version {
            Some(number) => CatalogError::RuleVersionNotFound {
                stable_id: stable_id.to_string(),
                version: number,
            },
            None => not_found(stable_id),
        })
    }

    /// Replace the stored regression cases of one version wholesale.
    pub fn replace_regression_cases(
        &self,
        stable_id: &str,
        version: u32,
        cases: Vec<RegressionCase>,
    ) -> Result<RuleVersion, CatalogError> {
        if cases.is_empty() {
            return Err(CatalogError::invalid("at least one regression case is required"));
        }
        check_case_names(&cases)?;

        let now = self.clock.now();
        let mut rules = self.write();
        let versions = rules.get_mut(stable_id).ok_or_else(|| not_found(stable_id))?;
        let record = versions
            .iter_mut()
            .find(|v| v.version == version)
            .ok_or_else(|| CatalogError::RuleVersionNotFound {
                stable_id: stable_id.to_string(),
                version,
            })?;
        record.regression_cases = cases;
        record.updated_at = now;

        tracing::info!(
            stable_id,
            version,
            cases = record.regression_cases.len(),
            "regression cases replaced"
        );
        Ok(record.clone())
    }

    pub fn clear(&self) {
        self.write().clear();
        tracing::debug!("rule catalog cleared");
    }
}

fn not_found(stable_id: &str) -> CatalogError {
    CatalogError::RuleNotFound {
        stable_id: stable_id.to_string(),
    }
}

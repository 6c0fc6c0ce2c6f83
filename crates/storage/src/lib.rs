mod catalog;
mod clock;
mod error;
mod proofs;
mod record;

pub use catalog::RuleCatalog;
pub use clock::{Clock, SystemClock};
pub use error::{CatalogError, ProofError};
pub use proofs::ProofStore;
pub use record::{
    is_valid_stable_id, EvaluationProof, EvaluationProofArtifact, NewRuleVersion, RegressionCase,
    RuleListing, RuleStatus, RuleSummary, RuleVersion,
};

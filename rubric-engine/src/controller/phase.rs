//! Selection-change cycle state

use crate::error::FetchError;
use crate::reconciler::ReconcileStats;
use crate::service::AttributeDefinitionService;
use serde::Serialize;
use shared::models::AttributeAst;
use shared::types::CategoryId;
use std::collections::BTreeSet;
use std::fmt;

/// Monotonic tag of a selection change
///
/// Every change (and every refresh) gets a new version; only a fetch
/// carrying the current version may be applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SelectionVersion(u64);

impl SelectionVersion {
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SelectionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Where the controller is in its current cycle
#[derive(Debug, Clone, Default)]
pub enum FormPhase {
    /// No fetch issued yet
    #[default]
    Idle,
    /// Waiting for the AST of `version`
    Fetching { version: SelectionVersion },
    /// AST of `version` applied
    Reconciled { version: SelectionVersion },
    /// Fetch for `version` failed; values are those of the last applied cycle
    FetchFailed {
        version: SelectionVersion,
        error: FetchError,
    },
}

impl FormPhase {
    pub fn version(&self) -> Option<SelectionVersion> {
        match self {
            Self::Idle => None,
            Self::Fetching { version }
            | Self::Reconciled { version }
            | Self::FetchFailed { version, .. } => Some(*version),
        }
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching { .. })
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::FetchFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// An issued but not yet performed AST fetch
///
/// Owns everything it needs, so the fetch can run while the controller
/// keeps accepting edits and newer selection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub version: SelectionVersion,
    pub selection: BTreeSet<CategoryId>,
}

impl PendingFetch {
    /// Perform the fetch
    pub async fn run<S>(self, service: &S) -> FetchCompletion
    where
        S: AttributeDefinitionService + ?Sized,
    {
        tracing::debug!(
            version = %self.version,
            categories = self.selection.len(),
            "Fetching attribute AST"
        );
        let result = service.get_ast(&self.selection).await;
        FetchCompletion {
            version: self.version,
            selection: self.selection,
            result,
        }
    }
}

/// Outcome of a fetch, tagged with the version it was issued for
#[derive(Debug, Clone)]
pub struct FetchCompletion {
    pub version: SelectionVersion,
    pub selection: BTreeSet<CategoryId>,
    pub result: Result<AttributeAst, FetchError>,
}

/// What applying a completion did
#[derive(Debug, Clone)]
pub enum ApplyOutcome {
    /// AST adopted and values reconciled
    Applied(ReconcileStats),
    /// Fetch failed; values untouched
    Failed(FetchError),
    /// Completion belongs to a superseded selection; ignored
    Discarded,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}

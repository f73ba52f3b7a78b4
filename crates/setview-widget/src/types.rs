//! Widget types — lifecycle states, display slots, status.

use serde::Serialize;
use setview_core::ErrorReport;
use uuid::Uuid;

/// Widget lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Unattached,
    Attached,
    Started,
    Stopped,
    Detached,
}

impl LifecycleState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unattached => "unattached",
            Self::Attached => "attached",
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Detached => "detached",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Summary fields of the widget layout, each shown as loading on start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplaySlot {
    Description,
    ItemType,
    ItemCount,
    TotalReads,
    TotalBasePairs,
}

impl DisplaySlot {
    pub fn all() -> &'static [DisplaySlot] {
        &[
            Self::Description,
            Self::ItemType,
            Self::ItemCount,
            Self::TotalReads,
            Self::TotalBasePairs,
        ]
    }

    /// Element name used by markup-based renderers.
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Description => "reads-set-description",
            Self::ItemType => "reads-set-type",
            Self::ItemCount => "reads-set-libraries-count",
            Self::TotalReads => "reads-set-total-reads",
            Self::TotalBasePairs => "reads-set-total-basepairs",
        }
    }
}

/// Private container a widget mounts into its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub id: Uuid,
    pub slots: Vec<DisplaySlot>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            slots: DisplaySlot::all().to_vec(),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// How the most recent start ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Rendered,
    Failed,
}

/// Snapshot of a widget's lifecycle.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetStatus {
    pub state: LifecycleState,
    #[serde(skip_serializing_if = "Option::is_none", rename = "containerId")]
    pub container_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "startedAt")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "finishedAt")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "lastOutcome")]
    pub last_outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "lastError")]
    pub last_error: Option<ErrorReport>,
}

//! User-visible status messages.

use core::fmt;

use stocktake_inventory::{ExportError, ItemStatus, OutcomeEvent, OutcomeKind};
use stocktake_infra::{BaselineStatus, EngineError, StartupReport};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Distinct wording for confirmed, repeated and newly discovered codes.
    pub fn for_outcome(outcome: &OutcomeEvent) -> Self {
        let row = outcome.position + 1;
        match outcome.kind {
            OutcomeKind::Matched {
                previous: ItemStatus::Pending,
            } => Notice::success(format!("{} found (row {row})", outcome.code)),
            OutcomeKind::Matched {
                previous: ItemStatus::Found,
            } => Notice::info(format!("{} already found (row {row})", outcome.code)),
            OutcomeKind::Added => Notice::warning(format!(
                "{} is not in the inventory; added as found (row {row})",
                outcome.code
            )),
        }
    }

    pub fn for_error(err: &EngineError) -> Self {
        match err {
            EngineError::InvalidInput(_) => Notice::error("invalid code: enter a non-empty code"),
            EngineError::Store(err) => Notice::error(format!("could not save, change discarded: {err}")),
            EngineError::Baseline(err) => Notice::warning(format!("baseline unavailable: {err}")),
            EngineError::Export(ExportError::NothingToExport) => Notice::warning("nothing to export: the inventory is empty"),
            EngineError::ExportWrite(err) => Notice::error(format!("export failed: {err}")),
            EngineError::Invariant(_) => Notice::error(format!("internal error: {err}")),
        }
    }

    pub fn for_startup(report: &StartupReport) -> Self {
        match report {
            StartupReport::Restored { items } => Notice::info(format!("resumed previous session ({items} items)")),
            StartupReport::BaselineLoaded { items } => Notice::success(format!("baseline loaded ({items} items)")),
            StartupReport::BaselineUnavailable(err) => Notice::warning(format!(
                "{}; manual entry and scanning still work",
                Notice::for_error(err).message
            )),
            StartupReport::Empty => Notice::info("no baseline configured; every code will be added as found"),
        }
    }

    pub fn for_baseline(status: &BaselineStatus) -> Self {
        match status {
            BaselineStatus::Loaded { items } => Notice::success(format!("inventory reset; baseline reloaded ({items} items)")),
            BaselineStatus::Unavailable(err) => Notice::warning(format!(
                "inventory reset; {}",
                Notice::for_error(err).message
            )),
            BaselineStatus::NotConfigured => Notice::success("inventory reset"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.tag(), self.message)
    }
}

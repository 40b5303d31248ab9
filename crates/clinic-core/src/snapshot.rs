//! Owned bundle of resolver inputs.

use chrono::NaiveDate;

use crate::exception::ExceptionCalendar;
use crate::resolver::ScheduleResolver;
use crate::status_override::{StatusOverride, current_override};
use crate::types::ValidationError;
use crate::weekly::WeeklyTemplate;

/// Everything the resolver reads, loaded together by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    pub template: WeeklyTemplate,
    pub exceptions: ExceptionCalendar,
    pub status: Option<StatusOverride>,
}

impl ScheduleSnapshot {
    /// Builds a snapshot, selecting the current override from `history`.
    pub fn from_history(
        template: WeeklyTemplate,
        exceptions: ExceptionCalendar,
        history: &[StatusOverride],
        today: NaiveDate,
    ) -> Self {
        Self {
            template,
            exceptions,
            status: current_override(history, today).cloned(),
        }
    }

    /// Borrows a resolver over this snapshot.
    pub fn resolver(&self) -> Result<ScheduleResolver<'_>, ValidationError> {
        ScheduleResolver::new(&self.template, &self.exceptions, self.status.as_ref())
    }
}

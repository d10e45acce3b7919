//! [`TaskTemplate`] definitions.

use std::fmt;

use common::Date;

use crate::domain::{
    deal::{self, task, Task},
    workflow::Role,
};

/// Checklist item every [`Deal`] of some [`deal::Kind`] starts with.
///
/// [`Deal`]: crate::domain::Deal
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TaskTemplate {
    /// [`deal::Kind`] this [`TaskTemplate`] applies to.
    pub lead_type: deal::Kind,

    /// [`Role`] responsible for the checklist item.
    pub role: Role,

    /// Name of the checklist item.
    pub name: &'static str,

    /// Position of the checklist item.
    pub order: u16,

    /// [`DeadlineRule`] computing the due date of the checklist item.
    pub deadline: DeadlineRule,

    /// Indicator whether the checklist item collects the signed Agreement of
    /// Purchase and Sale.
    pub is_aps_task: bool,
}

impl TaskTemplate {
    /// All the [`TaskTemplate`]s, in their order.
    pub const ALL: &'static [Self] = &[
        Self::purchase(
            1,
            "Upload Complete Agreement of Purchase and Sale and Amendments",
            DeadlineRule::AfterCreation { business_days: 2 },
            true,
        ),
        Self::purchase(
            2,
            "Provide Personal Information",
            DeadlineRule::BeforeClosing { days: 30 },
            false,
        ),
        Self::purchase(
            3,
            "Upload Identification",
            DeadlineRule::BeforeClosing { days: 30 },
            false,
        ),
        Self::purchase(
            4,
            "Status of Mortgage",
            DeadlineRule::BeforeClosing { days: 21 },
            false,
        ),
        Self::purchase(
            5,
            "Upload Home Insurance Policy",
            DeadlineRule::BeforeClosing { days: 10 },
            false,
        ),
        Self::purchase(
            6,
            "Schedule an Appointment",
            DeadlineRule::BeforeClosing { days: 7 },
            false,
        ),
    ];

    /// Creates a new [`TaskTemplate`] of a [`deal::Kind::Purchase`] performed
    /// by the [`Role::Client`].
    const fn purchase(
        order: u16,
        name: &'static str,
        deadline: DeadlineRule,
        is_aps_task: bool,
    ) -> Self {
        Self {
            lead_type: deal::Kind::Purchase,
            role: Role::Client,
            name,
            order,
            deadline,
            is_aps_task,
        }
    }

    /// Creates a new [`Task`] out of this [`TaskTemplate`] for a [`Deal`]
    /// opened on the `created` [`Date`] and closing on the `closing` one.
    ///
    /// [`Deal`]: crate::domain::Deal
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn task(&self, created: Date, closing: Option<Date>) -> Task {
        Task::new(
            task::Title::new(self.name).expect("`TaskTemplate` name is valid"),
            self.deadline.due_date(created, closing),
        )
    }

    /// Returns the [`TaskTemplate`]s applying to the provided
    /// [`deal::Kind`], in their order.
    pub fn of(kind: deal::Kind) -> impl Iterator<Item = &'static Self> {
        Self::ALL.iter().filter(move |t| t.lead_type == kind)
    }
}

/// Rule computing the due date of a checklist item.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeadlineRule {
    /// Due in the number of business days after the item is created.
    AfterCreation {
        /// Number of business days.
        business_days: u32,
    },

    /// Due in the number of calendar days before the closing date.
    BeforeClosing {
        /// Number of calendar days.
        days: u32,
    },
}

impl DeadlineRule {
    /// Computes the due [`Date`] of an item created on the provided
    /// `created` [`Date`] for a [`Deal`] closing on the provided `closing`
    /// [`Date`].
    ///
    /// [`None`] is returned if the rule depends on an unknown closing date.
    ///
    /// [`Deal`]: crate::domain::Deal
    #[must_use]
    pub fn due_date(self, created: Date, closing: Option<Date>) -> Option<Date> {
        match self {
            Self::AfterCreation { business_days } => {
                Some(created.add_business_days(business_days))
            }
            Self::BeforeClosing { days } => {
                closing.map(|c| c.add_days(-i64::from(days)))
            }
        }
    }
}

impl fmt::Display for DeadlineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AfterCreation { business_days } => {
                write!(f, "{business_days} business days after task creation")
            }
            Self::BeforeClosing { days } => {
                write!(f, "{days} days before lead closing date")
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::deal;

    use super::{DeadlineRule, TaskTemplate};

    #[test]
    fn purchase_has_single_aps_task() {
        let purchase = TaskTemplate::of(deal::Kind::Purchase).collect::<Vec<_>>();

        assert_eq!(purchase.len(), 6);
        assert_eq!(purchase.iter().filter(|t| t.is_aps_task).count(), 1);
        assert!(purchase[0].is_aps_task);
        assert_eq!(TaskTemplate::of(deal::Kind::Sale).count(), 0);
    }

    #[test]
    fn computes_due_dates() {
        // Friday.
        let created = Date::from_ymd(2026, 3, 13).unwrap();
        let closing = Date::from_ymd(2026, 4, 30).unwrap();

        assert_eq!(
            DeadlineRule::AfterCreation { business_days: 2 }
                .due_date(created, None),
            Date::from_ymd(2026, 3, 17),
        );
        assert_eq!(
            DeadlineRule::BeforeClosing { days: 10 }
                .due_date(created, Some(closing)),
            Date::from_ymd(2026, 4, 20),
        );
        assert_eq!(
            DeadlineRule::BeforeClosing { days: 10 }.due_date(created, None),
            None,
        );
    }

    #[test]
    fn creates_tasks_with_due_dates() {
        let created = Date::from_ymd(2026, 3, 13).unwrap();
        let closing = Date::from_ymd(2026, 4, 30).unwrap();

        let tasks = TaskTemplate::of(deal::Kind::Purchase)
            .map(|t| t.task(created, Some(closing)))
            .collect::<Vec<_>>();

        assert_eq!(
            tasks[0].title.to_string(),
            "Upload Complete Agreement of Purchase and Sale and Amendments",
        );
        assert_eq!(tasks[0].due_date, Date::from_ymd(2026, 3, 17));
        assert_eq!(tasks[5].due_date, Date::from_ymd(2026, 4, 23));
        assert!(tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn describes_rules() {
        assert_eq!(
            DeadlineRule::AfterCreation { business_days: 2 }.to_string(),
            "2 business days after task creation",
        );
        assert_eq!(
            DeadlineRule::BeforeClosing { days: 7 }.to_string(),
            "7 days before lead closing date",
        );
    }
}

//! [`Milestone`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::Deal;
use super::task::Title;

/// Workflow stage of a [`Deal`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    /// ID of this [`Milestone`].
    pub id: Id,

    /// [`Title`] of this [`Milestone`].
    pub title: Title,

    /// [`Status`] of this [`Milestone`].
    pub status: Status,

    /// [`Date`] this [`Milestone`] is targeted for, if any.
    pub date: Option<Date>,

    /// [`DateTime`] when this [`Milestone`] was completed.
    pub completed_at: Option<CompletionDateTime>,

    /// Indicator whether the client was emailed about this [`Milestone`].
    pub email_sent: bool,

    /// Name of the email template to notify the client with, if any.
    pub email_template: Option<String>,
}

impl Milestone {
    /// Creates a new [`Milestone`] without any [`Status`] set.
    #[must_use]
    pub fn new(title: Title, email_template: Option<String>) -> Self {
        Self {
            id: Id::new(),
            title,
            status: Status::Unset,
            date: None,
            completed_at: None,
            email_sent: false,
            email_template,
        }
    }

    /// Sets the [`Status`] of this [`Milestone`].
    ///
    /// Becoming [`Status::Completed`] keeps the existing completion
    /// [`DateTime`], if any.
    pub fn set_status(&mut self, status: Status, now: CompletionDateTime) {
        self.status = status;
        self.completed_at = (status == Status::Completed)
            .then(|| self.completed_at.unwrap_or(now));
    }
}

/// ID of a [`Milestone`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Milestone`]."]
    enum Status {
        #[doc = "Not chosen yet."]
        Unset = 0,

        #[doc = "Not started yet."]
        Pending = 1,

        #[doc = "Being worked on."]
        InProgress = 2,

        #[doc = "Done."]
        Completed = 3,
    }
}

/// [`DateTime`] when a [`Milestone`] was completed.
pub type CompletionDateTime = DateTimeOf<(Milestone, unit::Completion)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, DateTimeOf};

    use super::{Milestone, Status, Title};

    fn milestone() -> Milestone {
        Milestone::new(Title::new("Review APS").unwrap(), None)
    }

    #[test]
    fn completion_keeps_existing_timestamp() {
        let mut milestone = milestone();
        let first = DateTimeOf::from_unix_timestamp(1_700_000_000).unwrap();

        milestone.set_status(Status::Completed, first);
        milestone.set_status(Status::Completed, DateTime::now().coerce());

        assert_eq!(milestone.completed_at, Some(first));
    }

    #[test]
    fn other_statuses_clear_timestamp() {
        for status in [Status::Unset, Status::Pending, Status::InProgress] {
            let mut milestone = milestone();
            milestone.set_status(Status::Completed, DateTime::now().coerce());

            milestone.set_status(status, DateTime::now().coerce());

            assert_eq!(milestone.status, status);
            assert_eq!(milestone.completed_at, None);
        }
    }
}

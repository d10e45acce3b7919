//! [`Task`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::Deal;

/// Checklist item of a [`Deal`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Task {
    /// ID of this [`Task`].
    pub id: Id,

    /// [`Title`] of this [`Task`].
    pub title: Title,

    /// Indicator whether this [`Task`] is completed.
    ///
    /// Always agrees with the [`Status::Completed`].
    pub completed: bool,

    /// [`Status`] of this [`Task`].
    pub status: Status,

    /// [`Date`] this [`Task`] is due on, if any.
    pub due_date: Option<Date>,

    /// [`Assignee`] responsible for this [`Task`], if any.
    pub assignee: Option<Assignee>,

    /// [`LinkedDocument`] of this [`Task`], if any.
    pub document: Option<LinkedDocument>,

    /// [`DateTime`] when this [`Task`] was completed.
    pub completed_at: Option<CompletionDateTime>,
}

impl Task {
    /// Creates a new pending [`Task`].
    #[must_use]
    pub fn new(title: Title, due_date: Option<Date>) -> Self {
        Self {
            id: Id::new(),
            title,
            completed: false,
            status: Status::Pending,
            due_date,
            assignee: None,
            document: None,
            completed_at: None,
        }
    }

    /// Sets the [`Status`] of this [`Task`], keeping its completion in sync.
    pub fn set_status(&mut self, status: Status, now: CompletionDateTime) {
        self.status = status;
        self.completed = status == Status::Completed;
        self.completed_at = self.completed.then_some(now);
    }
}

/// ID of a [`Task`].
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

/// Title of a [`Task`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Name of a person a [`Task`] is assigned to.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Assignee(String);

impl Assignee {
    /// Creates a new [`Assignee`] if the given `name` is non-empty after
    /// trimming.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        (!name.is_empty()).then(|| Self(name.to_owned()))
    }
}

/// Document linked to a [`Task`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkedDocument {
    /// Name of the linked document.
    pub name: String,

    /// URL the linked document is available at.
    pub url: String,
}

define_kind! {
    #[doc = "Status of a [`Task`]."]
    enum Status {
        #[doc = "Not started yet."]
        Pending = 1,

        #[doc = "Being worked on."]
        InProgress = 2,

        #[doc = "Done."]
        Completed = 3,
    }
}

/// [`DateTime`] when a [`Task`] was completed.
pub type CompletionDateTime = DateTimeOf<(Task, unit::Completion)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use super::{Status, Task, Title};

    #[test]
    fn completing_sets_timestamp() {
        let mut task = Task::new(Title::new("Upload APS").unwrap(), None);
        let now = DateTime::now().coerce();

        task.set_status(Status::Completed, now);

        assert!(task.completed);
        assert_eq!(task.status, Status::Completed);
        assert_eq!(task.completed_at, Some(now));
    }

    #[test]
    fn reopening_clears_timestamp() {
        let mut task = Task::new(Title::new("Upload APS").unwrap(), None);
        task.set_status(Status::Completed, DateTime::now().coerce());

        task.set_status(Status::InProgress, DateTime::now().coerce());

        assert!(!task.completed);
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn validates_title() {
        assert!(Title::new("Book signing appointment").is_some());
        assert!(Title::new("").is_none());
        assert!(Title::new(" padded ").is_none());
    }
}

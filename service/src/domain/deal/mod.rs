//! [`Deal`] definitions.

pub mod document;
pub mod milestone;
pub mod task;

use std::{fmt, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    contact,
    workflow::{Role, Stage},
    TaskTemplate, Workflow,
};

pub use self::{document::Document, milestone::Milestone, task::Task};

/// Real-estate transaction file tracked through its closing.
#[derive(Clone, Debug)]
pub struct Deal {
    /// ID of this [`Deal`].
    pub id: Id,

    /// Human-readable [`FileNumber`] of this [`Deal`].
    pub file_number: FileNumber,

    /// [`Client`] this [`Deal`] is opened for.
    pub client: Client,

    /// [`Kind`] of this [`Deal`].
    pub kind: Kind,

    /// [`Status`] of this [`Deal`].
    pub status: Status,

    /// [`Address`] of the property this [`Deal`] is about.
    pub property_address: Address,

    /// [`Date`] this [`Deal`] closes on, if scheduled already.
    pub closing_date: Option<Date>,

    /// [`Date`] this [`Deal`] was opened on.
    pub opening_date: Option<Date>,

    /// [`Date`] requisitions are due for this [`Deal`].
    pub requisition_date: Option<Date>,

    /// Price of the property.
    pub price: Money,

    /// Progress of this [`Deal`] towards its closing.
    pub progress: Percent,

    /// Checklist of this [`Deal`], in the order it's worked through.
    pub tasks: Vec<Task>,

    /// Workflow stages of this [`Deal`], in their order.
    pub milestones: Vec<Milestone>,

    /// [`Document`]s attached to this [`Deal`].
    pub documents: Vec<Document>,

    /// Free-form [`Note`]s left on this [`Deal`].
    pub notes: Vec<Note>,

    /// [`DateTime`] when this [`Deal`] was created.
    pub created_at: CreationDateTime,
}

impl Deal {
    /// Returns the [`Task`]s of this [`Deal`] which are completed.
    pub fn completed_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.completed)
    }

    /// Returns the [`Task`]s of this [`Deal`] which are still outstanding.
    pub fn outstanding_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    /// Returns the [`Task`] of this [`Deal`] with the provided [`task::Id`].
    #[must_use]
    pub fn task_mut(&mut self, id: task::Id) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Returns the [`Milestone`] of this [`Deal`] with the provided
    /// [`milestone::Id`].
    #[must_use]
    pub fn milestone_mut(
        &mut self,
        id: milestone::Id,
    ) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.id == id)
    }

    /// Replaces the [`Task`]s and [`Milestone`]s of this [`Deal`] with the
    /// ones its [`Kind`] starts with: the [`TaskTemplate`]s of the [`Kind`]
    /// and the client stages of its [`Workflow`].
    ///
    /// Due dates are computed against the provided `opened` [`Date`] and the
    /// [`Deal::closing_date`].
    pub fn seed_checklist(&mut self, opened: Date) {
        self.tasks = TaskTemplate::of(self.kind)
            .map(|t| t.task(opened, self.closing_date))
            .collect();
        self.milestones = Workflow::of(self.kind)
            .stages_of(Role::Client)
            .map(Stage::milestone)
            .collect();
    }

    /// Recomputes the [`Deal::progress`] out of its completed [`Task`]s.
    ///
    /// A [`Deal`] without [`Task`]s keeps its current progress.
    pub fn recalculate_progress(&mut self) {
        if !self.tasks.is_empty() {
            self.progress =
                Percent::of(self.completed_tasks().count(), self.tasks.len());
        }
    }
}

/// ID of a [`Deal`].
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

/// File number of a [`Deal`] in a `{YY}{K}-{NNNN}` format, where `YY` is the
/// opening year, `K` is the letter of the [`Kind`] and `NNNN` is the
/// [`Serial`] number.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FileNumber(String);

impl FileNumber {
    /// Composes a new [`FileNumber`] out of its parts.
    #[must_use]
    pub fn compose(year: i32, kind: Kind, serial: Serial) -> Self {
        Self(format!(
            "{:02}{}-{:04}",
            year.rem_euclid(100),
            kind.letter(),
            serial.0,
        ))
    }

    /// Creates a new [`FileNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`FileNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`FileNumber`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\d{2}[PSR]-\d{4,}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for FileNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim_start_matches('#')).ok_or("invalid `FileNumber`")
    }
}

/// Serial number of a [`Deal`], unique across all the [`Deal`]s.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Serial(u32);

/// Client a [`Deal`] is opened for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Client {
    /// Given name of this [`Client`].
    pub first_name: contact::Name,

    /// Family name of this [`Client`].
    pub last_name: contact::Name,

    /// [`contact::Email`] of this [`Client`].
    pub email: contact::Email,

    /// [`contact::Phone`] of this [`Client`], if known.
    pub phone: Option<contact::Phone>,

    /// [`contact::Corporation`] this [`Client`] represents, if any.
    pub corporation: Option<contact::Corporation>,
}

impl Client {
    /// Returns the full name of this [`Client`].
    #[must_use]
    pub fn full_name(&self) -> String {
        let parts: [&str; 2] =
            [self.first_name.as_ref(), self.last_name.as_ref()];
        parts
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Postal address of a [`Deal`] property.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Address {
    /// Street line of this [`Address`].
    pub street: AddressPart,

    /// Unit (apartment, suite) of this [`Address`], if any.
    pub unit: Option<AddressPart>,

    /// City of this [`Address`].
    pub city: AddressPart,

    /// Province of this [`Address`].
    pub province: AddressPart,

    /// Postal code of this [`Address`], if known.
    pub postal_code: Option<AddressPart>,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            street,
            unit,
            city,
            province,
            postal_code,
        } = self;

        if let Some(unit) = unit {
            write!(f, "{unit}-")?;
        }
        write!(f, "{street}, {city}, {province}")?;
        if let Some(code) = postal_code {
            write!(f, " {code}")?;
        }
        Ok(())
    }
}

/// Single part of an [`Address`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct AddressPart(String);

impl AddressPart {
    /// Creates a new [`AddressPart`] if the given `part` is non-empty after
    /// trimming.
    #[must_use]
    pub fn new(part: impl AsRef<str>) -> Option<Self> {
        let part = part.as_ref().trim();
        (!part.is_empty() && part.len() <= 512).then(|| Self(part.to_owned()))
    }
}

impl FromStr for AddressPart {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `AddressPart`")
    }
}

/// Free-form note left on a [`Deal`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`] if the given `text` is non-empty after
    /// trimming.
    #[must_use]
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let text = text.as_ref().trim();
        (!text.is_empty()).then(|| Self(text.to_owned()))
    }
}

define_kind! {
    #[doc = "Kind of a [`Deal`]."]
    enum Kind {
        #[doc = "Purchase of a property."]
        Purchase = 1,

        #[doc = "Sale of a property."]
        Sale = 2,

        #[doc = "Refinance of a mortgage on a property."]
        Refinance = 3,
    }
}

impl Kind {
    /// Returns the letter this [`Kind`] is abbreviated with.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Purchase => 'P',
            Self::Sale => 'S',
            Self::Refinance => 'R',
        }
    }

    /// Returns the human-readable title of this [`Kind`].
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Purchase => "Purchase",
            Self::Sale => "Sale",
            Self::Refinance => "Refinance",
        }
    }
}

define_kind! {
    #[doc = "Status of a [`Deal`]."]
    enum Status {
        #[doc = "Being worked on."]
        Active = 1,

        #[doc = "Waiting on a third party."]
        Pending = 2,

        #[doc = "Closed successfully."]
        Closed = 3,

        #[doc = "Cancelled before closing."]
        Cancelled = 4,

        #[doc = "Requires immediate attention."]
        Urgent = 5,
    }
}

/// [`DateTime`] when a [`Deal`] was created.
pub type CreationDateTime = DateTimeOf<(Deal, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Money, Percent};
    use rust_decimal::Decimal;

    use crate::domain::contact;

    use super::{
        task, Address, AddressPart, Client, Deal, FileNumber, Id, Kind,
        Serial, Status, Task,
    };

    fn deal(tasks: Vec<Task>) -> Deal {
        Deal {
            id: Id::new(),
            file_number: FileNumber::compose(2026, Kind::Purchase, 59.into()),
            client: Client {
                first_name: contact::Name::new("Jane").unwrap(),
                last_name: contact::Name::new("Doe").unwrap(),
                email: contact::Email::new("jane@doe.ca").unwrap(),
                phone: None,
                corporation: None,
            },
            kind: Kind::Purchase,
            status: Status::Active,
            property_address: Address {
                street: AddressPart::new("1 Yonge St").unwrap(),
                unit: None,
                city: AddressPart::new("Toronto").unwrap(),
                province: AddressPart::new("ON").unwrap(),
                postal_code: None,
            },
            closing_date: None,
            opening_date: None,
            requisition_date: None,
            price: Money::cad(Decimal::from(500_000)),
            progress: Percent::ZERO,
            tasks,
            milestones: vec![],
            documents: vec![],
            notes: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn composes_file_number() {
        let number = FileNumber::compose(2026, Kind::Purchase, Serial(59));
        assert_eq!(number.to_string(), "26P-0059");

        let number =
            FileNumber::compose(2025, Kind::Refinance, Serial(12345));
        assert_eq!(number.to_string(), "25R-12345");

        assert_eq!(
            "#26S-0001".parse::<FileNumber>().unwrap().to_string(),
            "26S-0001",
        );
        assert!("26X-0001".parse::<FileNumber>().is_err());
    }

    #[test]
    fn formats_address() {
        let mut address = deal(vec![]).property_address;
        assert_eq!(address.to_string(), "1 Yonge St, Toronto, ON");

        address.unit = AddressPart::new("1203");
        address.postal_code = AddressPart::new("M5E 1W7");
        assert_eq!(address.to_string(), "1203-1 Yonge St, Toronto, ON M5E 1W7");
    }

    #[test]
    fn recalculates_progress() {
        let mut deal = deal(vec![
            Task::new(task::Title::new("Upload APS").unwrap(), None),
            Task::new(task::Title::new("Upload ID").unwrap(), None),
            Task::new(task::Title::new("Insurance").unwrap(), None),
            Task::new(task::Title::new("Appointment").unwrap(), None),
        ]);

        let id = deal.tasks[1].id;
        deal.task_mut(id)
            .unwrap()
            .set_status(task::Status::Completed, DateTime::now().coerce());
        deal.recalculate_progress();

        assert_eq!(deal.progress.value(), Decimal::from(25));
        assert_eq!(deal.completed_tasks().count(), 1);
        assert_eq!(deal.outstanding_tasks().count(), 3);
    }

    #[test]
    fn keeps_progress_without_tasks() {
        let mut deal = deal(vec![]);
        deal.progress = Percent::of(1, 2);

        deal.recalculate_progress();

        assert_eq!(deal.progress.value(), Decimal::from(50));
    }

    #[test]
    fn seeds_checklist_of_kind() {
        let mut deal = deal(vec![]);
        deal.closing_date = Date::from_ymd(2026, 4, 30);

        deal.seed_checklist(Date::from_ymd(2026, 3, 13).unwrap());

        assert_eq!(deal.tasks.len(), 6);
        assert_eq!(deal.milestones.len(), 14);
        assert_eq!(
            deal.milestones[0].title.to_string(),
            "Agreement of Purchase and Sale",
        );
        assert_eq!(deal.tasks[1].due_date, Date::from_ymd(2026, 3, 31));

        deal.kind = Kind::Sale;
        deal.seed_checklist(Date::from_ymd(2026, 3, 13).unwrap());

        assert!(deal.tasks.is_empty());
        assert_eq!(deal.milestones.len(), 6);
    }

    #[test]
    fn formats_client_name() {
        let mut client = deal(vec![]).client;
        assert_eq!(client.full_name(), "Jane Doe");

        client.last_name = contact::Name::default();
        assert_eq!(client.full_name(), "Jane");
    }
}

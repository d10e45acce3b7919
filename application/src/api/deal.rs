//! [`Deal`]-related definitions.

use common::{Date, DateTime, Money, Percent};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::Context;

/// A closing file.
#[derive(Clone, Debug, From, Into)]
pub struct Deal(domain::Deal);

/// A closing file.
#[graphql_object(context = Context)]
impl Deal {
    /// Unique identifier of this `Deal`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// File number of this `Deal` (e.g. `2026-P-0001`).
    #[must_use]
    pub fn file_number(&self) -> &str {
        self.0.file_number.as_ref()
    }

    /// Client this `Deal` is handled for.
    #[must_use]
    pub fn client(&self) -> Client {
        Client(self.0.client.clone())
    }

    /// Kind of this `Deal`.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Status of this `Deal`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Address of the property this `Deal` is about.
    #[must_use]
    pub fn property_address(&self) -> Address {
        Address(self.0.property_address.clone())
    }

    /// `Date` this `Deal` closes on, if scheduled.
    #[must_use]
    pub fn closing_date(&self) -> Option<Date> {
        self.0.closing_date
    }

    /// `Date` this `Deal` was opened on, if known.
    #[must_use]
    pub fn opening_date(&self) -> Option<Date> {
        self.0.opening_date
    }

    /// `Date` the requisitions of this `Deal` are due on, if known.
    #[must_use]
    pub fn requisition_date(&self) -> Option<Date> {
        self.0.requisition_date
    }

    /// Price of the property.
    #[must_use]
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// Share of the completed `Task`s of this `Deal`.
    #[must_use]
    pub fn progress(&self) -> Percent {
        self.0.progress
    }

    /// Checklist of this `Deal`, in its order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.0.tasks.iter().cloned().map(Task).collect()
    }

    /// Timeline of this `Deal`, in its order.
    #[must_use]
    pub fn milestones(&self) -> Vec<Milestone> {
        self.0.milestones.iter().cloned().map(Milestone).collect()
    }

    /// Documents of this `Deal`.
    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.0.documents.iter().cloned().map(Document).collect()
    }

    /// Notes left on this `Deal`.
    #[must_use]
    pub fn notes(&self) -> Vec<String> {
        self.0.notes.iter().map(ToString::to_string).collect()
    }

    /// `DateTime` when this `Deal` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Client of a `Deal`.
#[derive(Clone, Debug)]
pub struct Client(domain::deal::Client);

/// Client of a `Deal`.
#[graphql_object(name = "DealClient", context = Context)]
impl Client {
    /// Given name of this `DealClient`.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.0.first_name.as_ref()
    }

    /// Family name of this `DealClient`.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.0.last_name.as_ref()
    }

    /// Full name of this `DealClient`.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.0.full_name()
    }

    /// Email address of this `DealClient`.
    #[must_use]
    pub fn email(&self) -> &str {
        self.0.email.as_ref()
    }

    /// Phone number of this `DealClient`, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.0.phone.as_ref().map(AsRef::as_ref)
    }

    /// Name of the corporation this `DealClient` acts on behalf of, if any.
    #[must_use]
    pub fn corporation(&self) -> Option<&str> {
        self.0.corporation.as_ref().map(|c| c.name.as_ref())
    }
}

/// Address of a property.
#[derive(Clone, Debug)]
pub struct Address(domain::deal::Address);

/// Address of a property.
#[graphql_object(name = "PropertyAddress", context = Context)]
impl Address {
    /// Street line of this `PropertyAddress`.
    #[must_use]
    pub fn street(&self) -> &str {
        self.0.street.as_ref()
    }

    /// Unit of this `PropertyAddress`, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.0.unit.as_ref().map(AsRef::as_ref)
    }

    /// City of this `PropertyAddress`.
    #[must_use]
    pub fn city(&self) -> &str {
        self.0.city.as_ref()
    }

    /// Province of this `PropertyAddress`.
    #[must_use]
    pub fn province(&self) -> &str {
        self.0.province.as_ref()
    }

    /// Postal code of this `PropertyAddress`, if any.
    #[must_use]
    pub fn postal_code(&self) -> Option<&str> {
        self.0.postal_code.as_ref().map(AsRef::as_ref)
    }

    /// Single-line form of this `PropertyAddress`.
    #[must_use]
    pub fn formatted(&self) -> String {
        self.0.to_string()
    }
}

/// Checklist item of a `Deal`.
#[derive(Clone, Debug)]
pub struct Task(domain::deal::Task);

/// Checklist item of a `Deal`.
#[graphql_object(context = Context)]
impl Task {
    /// Unique identifier of this `Task`.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.0.id.into()
    }

    /// Title of this `Task`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.0.title.as_ref()
    }

    /// Indicator whether this `Task` is completed.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.0.completed
    }

    /// Status of this `Task`.
    #[must_use]
    pub fn status(&self) -> TaskStatus {
        self.0.status.into()
    }

    /// `Date` this `Task` is due on, if any.
    #[must_use]
    pub fn due_date(&self) -> Option<Date> {
        self.0.due_date
    }

    /// Person this `Task` is assigned to, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.0.assignee.as_ref().map(AsRef::as_ref)
    }

    /// Name of the document linked to this `Task`, if any.
    #[must_use]
    pub fn document_name(&self) -> Option<&str> {
        self.0.document.as_ref().map(|d| d.name.as_str())
    }

    /// URL of the document linked to this `Task`, if any.
    #[must_use]
    pub fn document_url(&self) -> Option<&str> {
        self.0.document.as_ref().map(|d| d.url.as_str())
    }

    /// `DateTime` when this `Task` was completed, if it is.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }
}

/// Timeline stage of a `Deal`.
#[derive(Clone, Debug)]
pub struct Milestone(domain::deal::Milestone);

/// Timeline stage of a `Deal`.
#[graphql_object(context = Context)]
impl Milestone {
    /// Unique identifier of this `Milestone`.
    #[must_use]
    pub fn id(&self) -> MilestoneId {
        self.0.id.into()
    }

    /// Title of this `Milestone`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.0.title.as_ref()
    }

    /// Status of this `Milestone`.
    #[must_use]
    pub fn status(&self) -> MilestoneStatus {
        self.0.status.into()
    }

    /// `Date` of this `Milestone`, if scheduled.
    #[must_use]
    pub fn date(&self) -> Option<Date> {
        self.0.date
    }

    /// `DateTime` when this `Milestone` was completed, if it is.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }

    /// Indicator whether the client was emailed about this `Milestone`.
    #[must_use]
    pub fn email_sent(&self) -> bool {
        self.0.email_sent
    }

    /// Name of the email template notifying the client about this
    /// `Milestone`, if any.
    #[must_use]
    pub fn email_template(&self) -> Option<&str> {
        self.0.email_template.as_deref()
    }
}

/// Document of a `Deal`.
#[derive(Clone, Debug)]
pub struct Document(domain::deal::Document);

/// Document of a `Deal`.
#[graphql_object(name = "DealDocument", context = Context)]
impl Document {
    /// Name of this `DealDocument`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name.as_ref()
    }

    /// Type label of this `DealDocument`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.0.label.as_ref()
    }

    /// Status of this `DealDocument`.
    #[must_use]
    pub fn status(&self) -> DocumentStatus {
        self.0.status.into()
    }

    /// `DateTime` when this `DealDocument` was uploaded.
    #[must_use]
    pub fn uploaded_at(&self) -> DateTime {
        self.0.uploaded_at.coerce()
    }
}

/// Numbers of `Deal`s in total and per `DealKind`.
#[derive(Clone, Copy, Debug, From)]
pub struct Counts(read::deal::list::Counts);

/// Numbers of `Deal`s in total and per `DealKind`.
#[graphql_object(name = "DealCounts", context = Context)]
impl Counts {
    /// Total number of `Deal`s.
    #[must_use]
    pub fn total(&self) -> i32 {
        saturate(self.0.total)
    }

    /// Number of `PURCHASE` `Deal`s.
    #[must_use]
    pub fn purchases(&self) -> i32 {
        saturate(self.0.purchases)
    }

    /// Number of `SALE` `Deal`s.
    #[must_use]
    pub fn sales(&self) -> i32 {
        saturate(self.0.sales)
    }

    /// Number of `REFINANCE` `Deal`s.
    #[must_use]
    pub fn refinances(&self) -> i32 {
        saturate(self.0.refinances)
    }
}

/// Converts the provided count into a GraphQL `Int`.
fn saturate(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Unique identifier of a `Deal`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::deal::Id)]
#[into(domain::deal::Id)]
#[graphql(name = "DealId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a `Task`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::deal::task::Id)]
#[into(domain::deal::task::Id)]
#[graphql(transparent)]
pub struct TaskId(Uuid);

/// Unique identifier of a `Milestone`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::deal::milestone::Id)]
#[into(domain::deal::milestone::Id)]
#[graphql(transparent)]
pub struct MilestoneId(Uuid);

/// Kind of a `Deal`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "DealKind")]
pub enum Kind {
    /// Purchase of a property.
    Purchase,

    /// Sale of a property.
    Sale,

    /// Refinance of a mortgage on a property.
    Refinance,
}

impl From<domain::deal::Kind> for Kind {
    fn from(kind: domain::deal::Kind) -> Self {
        use domain::deal::Kind as K;
        match kind {
            K::Purchase => Self::Purchase,
            K::Sale => Self::Sale,
            K::Refinance => Self::Refinance,
        }
    }
}

impl From<Kind> for domain::deal::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Purchase => Self::Purchase,
            Kind::Sale => Self::Sale,
            Kind::Refinance => Self::Refinance,
        }
    }
}

/// Status of a `Deal`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "DealStatus")]
pub enum Status {
    /// Being worked on.
    Active,

    /// Waiting on a third party.
    Pending,

    /// Closed successfully.
    Closed,

    /// Cancelled before closing.
    Cancelled,

    /// Requires immediate attention.
    Urgent,
}

impl From<domain::deal::Status> for Status {
    fn from(status: domain::deal::Status) -> Self {
        use domain::deal::Status as S;
        match status {
            S::Active => Self::Active,
            S::Pending => Self::Pending,
            S::Closed => Self::Closed,
            S::Cancelled => Self::Cancelled,
            S::Urgent => Self::Urgent,
        }
    }
}

impl From<Status> for domain::deal::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => Self::Active,
            Status::Pending => Self::Pending,
            Status::Closed => Self::Closed,
            Status::Cancelled => Self::Cancelled,
            Status::Urgent => Self::Urgent,
        }
    }
}

/// Status of a `Task`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum TaskStatus {
    /// Not started yet.
    Pending,

    /// Being worked on.
    InProgress,

    /// Done.
    Completed,
}

impl From<domain::deal::task::Status> for TaskStatus {
    fn from(status: domain::deal::task::Status) -> Self {
        use domain::deal::task::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::InProgress => Self::InProgress,
            S::Completed => Self::Completed,
        }
    }
}

impl From<TaskStatus> for domain::deal::task::Status {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => Self::Pending,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Completed => Self::Completed,
        }
    }
}

/// Status of a `Milestone`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum MilestoneStatus {
    /// Not chosen yet.
    Unset,

    /// Not started yet.
    Pending,

    /// Being worked on.
    InProgress,

    /// Done.
    Completed,
}

impl From<domain::deal::milestone::Status> for MilestoneStatus {
    fn from(status: domain::deal::milestone::Status) -> Self {
        use domain::deal::milestone::Status as S;
        match status {
            S::Unset => Self::Unset,
            S::Pending => Self::Pending,
            S::InProgress => Self::InProgress,
            S::Completed => Self::Completed,
        }
    }
}

impl From<MilestoneStatus> for domain::deal::milestone::Status {
    fn from(status: MilestoneStatus) -> Self {
        match status {
            MilestoneStatus::Unset => Self::Unset,
            MilestoneStatus::Pending => Self::Pending,
            MilestoneStatus::InProgress => Self::InProgress,
            MilestoneStatus::Completed => Self::Completed,
        }
    }
}

/// Status of a `DealDocument`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "DealDocumentStatus")]
pub enum DocumentStatus {
    /// Being prepared.
    Draft,

    /// Under review.
    Review,

    /// Signed by the parties.
    Signed,

    /// Registered with the land registry.
    Registered,
}

impl From<domain::deal::document::Status> for DocumentStatus {
    fn from(status: domain::deal::document::Status) -> Self {
        use domain::deal::document::Status as S;
        match status {
            S::Draft => Self::Draft,
            S::Review => Self::Review,
            S::Signed => Self::Signed,
            S::Registered => Self::Registered,
        }
    }
}

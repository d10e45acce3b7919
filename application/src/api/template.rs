//! Template libraries definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, Context};

/// Workflow of a `DealKind` with its stages narrowed by a search.
#[derive(Clone, Debug, From)]
pub struct Workflow(read::template::WorkflowView);

/// Ordered list of stages a `DealKind` goes through.
#[graphql_object(context = Context)]
impl Workflow {
    /// `DealKind` this `Workflow` is defined for.
    #[must_use]
    pub fn kind(&self) -> api::deal::Kind {
        self.0.workflow.kind.into()
    }

    /// Human-readable title of this `Workflow`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.0.workflow.title
    }

    /// `WorkflowStage`s of this `Workflow` matching the search.
    #[must_use]
    pub fn stages(&self) -> Vec<Stage> {
        self.0.stages.iter().copied().map(Stage).collect()
    }
}

/// Single stage of a `Workflow`.
#[derive(Clone, Copy, Debug)]
pub struct Stage(&'static domain::workflow::Stage);

/// Single stage of a `Workflow`.
#[graphql_object(name = "WorkflowStage", context = Context)]
impl Stage {
    /// Position of this `WorkflowStage` among the ones of the same `Role`.
    #[must_use]
    pub fn order(&self) -> i32 {
        self.0.order.into()
    }

    /// Name of this `WorkflowStage`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name
    }

    /// `Role` performing this `WorkflowStage`.
    #[must_use]
    pub fn role(&self) -> Role {
        self.0.role.into()
    }

    /// Name of the email template notifying the client once this
    /// `WorkflowStage` is completed, if any.
    #[must_use]
    pub fn email_template(&self) -> Option<&str> {
        self.0.email_template
    }

    /// Indicator whether this `WorkflowStage` is shared with the client.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.0.is_shared
    }
}

/// Checklist item every `Deal` of some `DealKind` starts with.
#[derive(Clone, Copy, Debug, From)]
pub struct TaskTemplate(&'static domain::TaskTemplate);

/// Checklist item every `Deal` of some `DealKind` starts with.
#[graphql_object(context = Context)]
impl TaskTemplate {
    /// `DealKind` this `TaskTemplate` applies to.
    #[must_use]
    pub fn lead_type(&self) -> api::deal::Kind {
        self.0.lead_type.into()
    }

    /// `Role` responsible for the checklist item.
    #[must_use]
    pub fn role(&self) -> Role {
        self.0.role.into()
    }

    /// Name of the checklist item.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name
    }

    /// Position of the checklist item.
    #[must_use]
    pub fn order(&self) -> i32 {
        self.0.order.into()
    }

    /// Human-readable rule computing the due date of the checklist item.
    #[must_use]
    pub fn deadline(&self) -> String {
        self.0.deadline.to_string()
    }

    /// Indicator whether the checklist item collects the signed Agreement of
    /// Purchase and Sale.
    #[must_use]
    pub fn is_aps_task(&self) -> bool {
        self.0.is_aps_task
    }
}

/// Reusable email text with merge tag placeholders.
#[derive(Clone, Debug, From)]
pub struct EmailTemplate(domain::EmailTemplate);

/// Reusable email text with merge tag placeholders.
#[graphql_object(context = Context)]
impl EmailTemplate {
    /// Unique identifier of this `EmailTemplate`.
    #[must_use]
    pub fn id(&self) -> EmailTemplateId {
        self.0.id.into()
    }

    /// Name of this `EmailTemplate`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name.as_ref()
    }

    /// Body of this `EmailTemplate`.
    #[must_use]
    pub fn body(&self) -> &str {
        self.0.body.as_ref()
    }

    /// Indicator whether this `EmailTemplate` is offered for use.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// `DateTime` when this `EmailTemplate` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of an `EmailTemplate`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::email_template::Id)]
#[into(domain::email_template::Id)]
#[graphql(transparent)]
pub struct EmailTemplateId(Uuid);

/// Placeholder of an `EmailTemplate` body substituted on rendering.
#[derive(Clone, Copy, Debug, From)]
pub struct MergeTag(domain::email_template::MergeTag);

/// Placeholder of an `EmailTemplate` body substituted on rendering.
#[graphql_object(context = Context)]
impl MergeTag {
    /// Placeholder as it's written in a body (e.g. `{{ user.first_name }}`).
    #[must_use]
    pub fn placeholder(&self) -> String {
        self.0.placeholder()
    }

    /// Human-readable description of this `MergeTag`.
    #[must_use]
    pub fn description(&self) -> &str {
        self.0.description()
    }
}

/// Party performing a `WorkflowStage` or a `TaskTemplate`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum Role {
    /// Client of the firm.
    Client,

    /// Mortgage lender.
    Lender,
}

impl From<domain::workflow::Role> for Role {
    fn from(role: domain::workflow::Role) -> Self {
        use domain::workflow::Role as R;
        match role {
            R::Client => Self::Client,
            R::Lender => Self::Lender,
        }
    }
}

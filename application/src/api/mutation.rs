//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Sets the status of a `Task`, completing it on `COMPLETED`.
    ///
    /// Recalculates the progress of the `Deal`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist;
    /// - `TASK_NOT_EXISTS` - the `Task` with the specified ID does not exist
    ///                       in the `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "updateTaskStatus",
            otel.name = Self::SPAN_NAME,
            status = ?status,
            task_id = %task_id,
        ),
    )]
    pub async fn update_task_status(
        deal_id: api::deal::Id,
        task_id: api::deal::TaskId,
        status: api::deal::TaskStatus,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        ctx.service()
            .execute(command::UpdateTaskStatus {
                deal_id: deal_id.into(),
                task_id: task_id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets the status of a `Milestone`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist;
    /// - `MILESTONE_NOT_EXISTS` - the `Milestone` with the specified ID does
    ///                            not exist in the `Deal`.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "updateMilestoneStatus",
            milestone_id = %milestone_id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_milestone_status(
        deal_id: api::deal::Id,
        milestone_id: api::deal::MilestoneId,
        status: api::deal::MilestoneStatus,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        ctx.service()
            .execute(command::UpdateMilestoneStatus {
                deal_id: deal_id.into(),
                milestone_id: milestone_id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves a `Task` of a `Deal` to another position in its checklist.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist;
    /// - `OUT_OF_BOUNDS` - either position is out of the checklist bounds.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            from = from,
            gql.name = "reorderTasks",
            otel.name = Self::SPAN_NAME,
            to = to,
        ),
    )]
    pub async fn reorder_tasks(
        deal_id: api::deal::Id,
        from: i32,
        to: i32,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        ctx.service()
            .execute(command::ReorderTasks {
                deal_id: deal_id.into(),
                from: position(from),
                to: position(to),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves a `Milestone` of a `Deal` to another position in its timeline.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist;
    /// - `OUT_OF_BOUNDS` - either position is out of the timeline bounds.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            from = from,
            gql.name = "reorderMilestones",
            otel.name = Self::SPAN_NAME,
            to = to,
        ),
    )]
    pub async fn reorder_milestones(
        deal_id: api::deal::Id,
        from: i32,
        to: i32,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        ctx.service()
            .execute(command::ReorderMilestones {
                deal_id: deal_id.into(),
                from: position(from),
                to: position(to),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Opens new `Deal`s out of a completed intake, one per transaction
    /// side.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INCOMPLETE_INTAKE` - the intake misses an answer;
    /// - `INVALID_EMAIL` - the client email is missing or malformed;
    /// - `INVALID_PHONE` - the client phone is malformed;
    /// - `INVALID_ADDRESS` - the property address is incomplete;
    /// - `INVALID_PRICE` - the property price is not a non-negative amount;
    /// - `ATTACHMENT_NOT_PDF` - an uploaded file is not a PDF document;
    /// - `ATTACHMENT_TOO_LARGE` - an uploaded file exceeds 10MB.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "openDeal",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn open_deal(
        intake: api::intake::Intake,
        ctx: &Context,
    ) -> Result<Vec<api::Deal>, Error> {
        let intake = domain::Intake::try_from(intake)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::OpenDeal { intake })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|deals| deals.into_iter().map(Into::into).collect())
    }

    /// Creates a new `Lead`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createLead",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_lead(
        input: api::lead::Input,
        ctx: &Context,
    ) -> Result<api::Lead, Error> {
        ctx.service()
            .execute(command::CreateLead::from(input))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Drafts a status email to the client of a `Deal`.
    ///
    /// Failures of the text generation are reported right in the returned
    /// draft.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            deal_id = %deal_id,
            gql.name = "draftClientEmail",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn draft_client_email(
        deal_id: api::deal::Id,
        instruction: Option<String>,
        ctx: &Context,
    ) -> Result<String, Error> {
        ctx.service()
            .execute(command::DraftClientEmail {
                deal_id: deal_id.into(),
                instruction,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

/// Converts the provided GraphQL position into an index.
///
/// Negative positions are mapped beyond any bounds.
fn position(pos: i32) -> usize {
    usize::try_from(pos).unwrap_or(usize::MAX)
}

define_error! {
    enum DealError {
        #[code = "DEAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Deal` with the specified ID does not exist"]
        NotExists,

        #[code = "OUT_OF_BOUNDS"]
        #[status = BAD_REQUEST]
        #[message = "Position is out of bounds"]
        OutOfBounds,
    }
}

impl AsError for command::update_task_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "TASK_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Task` with the specified ID does not exist"]
                TaskNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DealNotExists(_) => Some(DealError::NotExists.into()),
            Self::TaskNotExists(_) => Some(Error::TaskNotExists.into()),
        }
    }
}

impl AsError for command::update_milestone_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MILESTONE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Milestone` with the specified ID does not exist"]
                MilestoneNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DealNotExists(_) => Some(DealError::NotExists.into()),
            Self::MilestoneNotExists(_) => {
                Some(Error::MilestoneNotExists.into())
            }
        }
    }
}

impl AsError for command::reorder_tasks::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DealNotExists(_) => Some(DealError::NotExists.into()),
            Self::OutOfBounds(_) => Some(DealError::OutOfBounds.into()),
        }
    }
}

impl AsError for command::reorder_milestones::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DealNotExists(_) => Some(DealError::NotExists.into()),
            Self::OutOfBounds(_) => Some(DealError::OutOfBounds.into()),
        }
    }
}

impl AsError for command::open_deal::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_EMAIL"]
                #[status = BAD_REQUEST]
                #[message = "Client email is invalid"]
                InvalidEmail,

                #[code = "INVALID_PHONE"]
                #[status = BAD_REQUEST]
                #[message = "Client phone is invalid"]
                InvalidPhone,

                #[code = "INVALID_ADDRESS"]
                #[status = BAD_REQUEST]
                #[message = "Property address is incomplete"]
                InvalidAddress,

                #[code = "INVALID_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "Property price is invalid"]
                InvalidPrice,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Incomplete(missing) => missing.try_as_error(),
            Self::InvalidEmail => Some(Error::InvalidEmail.into()),
            Self::InvalidPhone => Some(Error::InvalidPhone.into()),
            Self::InvalidAddress => Some(Error::InvalidAddress.into()),
            Self::InvalidPrice => Some(Error::InvalidPrice.into()),
        }
    }
}

impl AsError for command::draft_client_email::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DealNotExists(_) => Some(DealError::NotExists.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use juniper::{
        graphql_value, DefaultScalarValue, EmptySubscription, ExecutionError,
        Value, Variables,
    };
    use service::{
        command::{Command as _, SeedFixtures},
        domain::draft::Firm,
        infra::{llm::gemini, Gemini, Memory},
        query, read,
    };

    use crate::{api, Context, Service};

    async fn context() -> Context {
        let service = Service::new(
            service::Config {
                firm: Firm::default(),
            },
            Memory::new(),
            Gemini::new(gemini::Config {
                api_key: None,
                model: "gemini-3-flash-preview".into(),
                endpoint: "http://localhost".into(),
            }),
        );
        _ = service.execute(SeedFixtures).await.unwrap();
        Context::new(service)
    }

    type Errors = Vec<ExecutionError<DefaultScalarValue>>;

    async fn run(query: &str, ctx: &Context) -> (Value, Errors) {
        let schema = api::Schema::new(
            api::Query,
            api::Mutation,
            EmptySubscription::new(),
        );
        juniper::execute(query, None, &schema, &Variables::new(), ctx)
            .await
            .unwrap()
    }

    async fn first_deal(ctx: &Context) -> service::domain::Deal {
        ctx.service()
            .execute(query::deals::List::by(read::deal::list::Filter::default()))
            .await
            .unwrap()
            .remove(0)
    }

    #[tokio::test]
    async fn completes_task_and_recalculates_progress() {
        let ctx = context().await;
        let deal = first_deal(&ctx).await;
        let task = deal.tasks.iter().find(|t| !t.completed).unwrap();

        let (value, errors) = run(
            &format!(
                r#"mutation {{
                    updateTaskStatus(
                        dealId: "{}",
                        taskId: "{}",
                        status: COMPLETED,
                    ) {{ tasks {{ id completed }} }}
                }}"#,
                deal.id, task.id,
            ),
            &ctx,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        let tasks = value
            .as_object_value()
            .and_then(|o| o.get_field_value("updateTaskStatus"))
            .and_then(|v| v.as_object_value())
            .and_then(|o| o.get_field_value("tasks"))
            .and_then(|v| v.as_list_value())
            .unwrap();
        assert!(tasks.iter().any(|t| {
            t.as_object_value().is_some_and(|t| {
                t.get_field_value("id")
                    == Some(&Value::scalar(task.id.to_string()))
                    && t.get_field_value("completed")
                        == Some(&Value::scalar(true))
            })
        }));
    }

    #[tokio::test]
    async fn reports_error_codes() {
        let ctx = context().await;
        let deal = first_deal(&ctx).await;

        let (_, errors) = run(
            &format!(
                r#"mutation {{
                    reorderTasks(dealId: "{}", from: -1, to: 0) {{ id }}
                }}"#,
                deal.id,
            ),
            &ctx,
        )
        .await;
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0]
                .error()
                .extensions()
                .as_object_value()
                .and_then(|o| o.get_field_value("code")),
            Some(&Value::scalar("OUT_OF_BOUNDS")),
        );

        let (_, errors) = run(
            r#"mutation {
                draftClientEmail(
                    dealId: "00000000-0000-0000-0000-000000000000",
                )
            }"#,
            &ctx,
        )
        .await;
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].error().message(),
            "`Deal` with the specified ID does not exist",
        );
    }

    #[tokio::test]
    async fn drafts_fixed_error_without_api_key() {
        let ctx = context().await;
        let deal = first_deal(&ctx).await;

        let (value, errors) = run(
            &format!(
                r#"mutation {{ draftClientEmail(dealId: "{}") }}"#,
                deal.id,
            ),
            &ctx,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            value,
            graphql_value!({
                "draftClientEmail": "Error: API Key not configured.",
            }),
        );
    }

    #[tokio::test]
    async fn opens_deal_from_intake() {
        let ctx = context().await;

        let (value, errors) = run(
            r#"mutation {
                openDeal(intake: {
                    service: CLOSING,
                    subService: BUYING,
                    clientType: RESIDENTIAL,
                    price: "500000",
                    address: {
                        street: "1 King St",
                        city: "Toronto",
                        province: "ON",
                    },
                    apsSigned: true,
                    contact: {
                        fullName: "Jane Doe",
                        email: "jane@example.com",
                    },
                }) { kind client { lastName } }
            }"#,
            &ctx,
        )
        .await;

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            value,
            graphql_value!({"openDeal": [{
                "kind": "PURCHASE",
                "client": {"lastName": "Doe"},
            }]}),
        );
    }
}

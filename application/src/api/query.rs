//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Lists the `Deal`s, the most recently created first.
    ///
    /// The `search` term is matched case-insensitively against the file
    /// number, the property address and the client's last name. A `quick`
    /// search also matches the client's first name, matches a `#`-prefixed
    /// term against the file number only, and lists the 5 most recent
    /// `Deal`s on a blank term.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deals",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            quick = ?quick,
            search = ?search,
            status = ?status,
        ),
    )]
    pub async fn deals(
        search: Option<String>,
        quick: Option<bool>,
        kind: Option<api::deal::Kind>,
        status: Option<api::deal::Status>,
        ctx: &Context,
    ) -> Result<Vec<api::Deal>, Error> {
        use read::deal::list::Search;

        let search = if quick.unwrap_or_default() {
            Some(Search::Quick(search.unwrap_or_default()))
        } else {
            search.map(Search::List)
        };

        ctx.service()
            .execute(query::deals::List::by(read::deal::list::Filter {
                search,
                kind: kind.map(Into::into),
                status: status.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|deals| deals.into_iter().map(Into::into).collect())
    }

    /// Returns the `Deal` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEAL_NOT_EXISTS` - the `Deal` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deal",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deal(
        id: api::deal::Id,
        ctx: &Context,
    ) -> Result<api::Deal, Error> {
        ctx.service()
            .execute(query::deal::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| DealError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the numbers of `Deal`s in total and per `DealKind`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "dealCounts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deal_counts(
        ctx: &Context,
    ) -> Result<api::deal::Counts, Error> {
        ctx.service()
            .execute(query::deals::Counts::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Lead`s, the most recently created first.
    ///
    /// The `search` term is matched case-insensitively against the names,
    /// the email and the corporation name.
    #[tracing::instrument(
        skip_all,
        fields(
            corporate = ?corporate,
            gql.name = "leads",
            otel.name = Self::SPAN_NAME,
            search = ?search,
        ),
    )]
    pub async fn leads(
        search: Option<String>,
        corporate: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::Lead>, Error> {
        ctx.service()
            .execute(query::leads::List::by(read::lead::list::Filter {
                search,
                corporate,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|leads| leads.into_iter().map(Into::into).collect())
    }

    /// Returns the `Lead` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEAD_NOT_EXISTS` - the `Lead` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "lead",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn lead(
        id: api::lead::Id,
        ctx: &Context,
    ) -> Result<api::Lead, Error> {
        ctx.service()
            .execute(query::lead::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| LeadError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Workflow`s with their stages whose name or email template
    /// name contains the `search` term.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "workflows",
            otel.name = Self::SPAN_NAME,
            search = ?search,
        ),
    )]
    pub async fn workflows(
        search: Option<String>,
        ctx: &Context,
    ) -> Vec<api::template::Workflow> {
        ctx.service()
            .execute(query::workflows::List { search })
            .await
            .unwrap_or_else(|e| match e {})
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Lists the `TaskTemplate`s whose name or lead type contains the
    /// `search` term.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "taskTemplates",
            otel.name = Self::SPAN_NAME,
            search = ?search,
        ),
    )]
    pub async fn task_templates(
        search: Option<String>,
        ctx: &Context,
    ) -> Vec<api::template::TaskTemplate> {
        ctx.service()
            .execute(query::task_templates::List { search })
            .await
            .unwrap_or_else(|e| match e {})
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Lists the `EmailTemplate`s, the most recently created first.
    ///
    /// The `search` term is matched case-insensitively against the name and
    /// the body.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "emailTemplates",
            otel.name = Self::SPAN_NAME,
            search = ?search,
        ),
    )]
    pub async fn email_templates(
        search: Option<String>,
        ctx: &Context,
    ) -> Result<Vec<api::template::EmailTemplate>, Error> {
        ctx.service()
            .execute(query::email_templates::List::newest_first(search))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Lists the `MergeTag`s an `EmailTemplate` body may contain.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "mergeTags",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn merge_tags() -> Vec<api::template::MergeTag> {
        domain::email_template::MergeTag::ALL
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Returns the `IntakeStep` following the provided one for the provided
    /// answers.
    ///
    /// Stays at the provided `IntakeStep` if its answers are incomplete.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "nextIntakeStep",
            otel.name = Self::SPAN_NAME,
            step = ?step,
        ),
    )]
    pub fn next_intake_step(
        step: api::intake::Step,
        intake: api::intake::Intake,
        ctx: &Context,
    ) -> Result<api::intake::Step, Error> {
        let intake = domain::Intake::try_from(intake)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(domain::intake::Wizard::resume(step.into(), intake)
            .advance()
            .step
            .into())
    }

    /// Returns the `IntakeStep` preceding the provided one for the provided
    /// answers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "previousIntakeStep",
            otel.name = Self::SPAN_NAME,
            step = ?step,
        ),
    )]
    pub fn previous_intake_step(
        step: api::intake::Step,
        intake: api::intake::Intake,
        ctx: &Context,
    ) -> Result<api::intake::Step, Error> {
        let intake = domain::Intake::try_from(intake)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(domain::intake::Wizard::resume(step.into(), intake)
            .retreat()
            .step
            .into())
    }
}

define_error! {
    enum DealError {
        #[code = "DEAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Deal` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum LeadError {
        #[code = "LEAD_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Lead` with the specified ID does not exist"]
        NotExists,
    }
}

#[cfg(test)]
mod spec {
    use juniper::{graphql_value, EmptySubscription, Variables};
    use service::{
        command::{Command as _, SeedFixtures},
        domain::draft::Firm,
        infra::{llm::gemini, Gemini, Memory},
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

    async fn run(query: &str, ctx: &Context) -> juniper::Value {
        let schema = api::Schema::new(
            api::Query,
            api::Mutation,
            EmptySubscription::new(),
        );
        let (value, errors) =
            juniper::execute(query, None, &schema, &Variables::new(), ctx)
                .await
                .unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        value
    }

    #[tokio::test]
    async fn counts_seeded_deals() {
        let ctx = context().await;

        let value = run(
            "{ dealCounts { total purchases sales refinances } }",
            &ctx,
        )
        .await;

        assert_eq!(
            value,
            graphql_value!({"dealCounts": {
                "total": 9,
                "purchases": 4,
                "sales": 3,
                "refinances": 2,
            }}),
        );
    }

    #[tokio::test]
    async fn filters_deals_by_kind() {
        let ctx = context().await;

        let value = run("{ deals(kind: REFINANCE) { kind } }", &ctx).await;

        assert_eq!(
            value,
            graphql_value!({"deals": [
                {"kind": "REFINANCE"},
                {"kind": "REFINANCE"},
            ]}),
        );
    }

    #[tokio::test]
    async fn walks_intake_steps() {
        let ctx = context().await;

        let value = run(
            r#"{
                next: nextIntakeStep(
                    step: CONTACT,
                    intake: { clientType: RESIDENTIAL },
                )
                stuck: nextIntakeStep(step: SERVICE, intake: {})
                back: previousIntakeStep(
                    step: SCHEDULE,
                    intake: { clientType: RESIDENTIAL },
                )
            }"#,
            &ctx,
        )
        .await;

        assert_eq!(
            value,
            graphql_value!({
                "next": "SCHEDULE",
                "stuck": "SERVICE",
                "back": "CONTACT",
            }),
        );
    }

    #[tokio::test]
    async fn searches_task_templates() {
        let ctx = context().await;

        let value =
            run(r#"{ taskTemplates(search: "insurance") { name } }"#, &ctx)
                .await;

        let list = value
            .as_object_value()
            .and_then(|o| o.get_field_value("taskTemplates"))
            .and_then(|v| v.as_list_value())
            .unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn lists_merge_tags() {
        let ctx = context().await;

        let value = run("{ mergeTags { placeholder } }", &ctx).await;

        let list = value
            .as_object_value()
            .and_then(|o| o.get_field_value("mergeTags"))
            .and_then(|v| v.as_list_value())
            .unwrap();
        assert_eq!(list.len(), 10);
    }
}

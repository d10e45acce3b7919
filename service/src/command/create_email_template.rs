//! [`Command`] for creating a new [`EmailTemplate`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{email_template, EmailTemplate},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`EmailTemplate`].
#[derive(Clone, Debug)]
pub struct CreateEmailTemplate {
    /// [`email_template::Name`] of a new [`EmailTemplate`].
    pub name: email_template::Name,

    /// [`email_template::Body`] of a new [`EmailTemplate`].
    pub body: email_template::Body,

    /// Indicator whether a new [`EmailTemplate`] is active.
    pub is_active: bool,
}

impl CreateEmailTemplate {
    /// Creates a new active [`CreateEmailTemplate`] [`Command`].
    #[must_use]
    pub fn active(
        name: email_template::Name,
        body: email_template::Body,
    ) -> Self {
        Self {
            name,
            body,
            is_active: true,
        }
    }
}

impl<Db, L> Command<CreateEmailTemplate> for Service<Db, L>
where
    Db: Database<
        Insert<EmailTemplate>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = EmailTemplate;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEmailTemplate,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateEmailTemplate {
            name,
            body,
            is_active,
        } = cmd;

        let template = EmailTemplate {
            id: email_template::Id::new(),
            name,
            body,
            is_active,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(template.clone()))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(template)
    }
}

/// Error of [`CreateEmailTemplate`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        domain::{email_template, EmailTemplate},
        infra::{Database as _, Memory},
        read::email_template::list::{Order, Selector},
        Command as _, Config, Service,
    };

    use super::CreateEmailTemplate;

    #[tokio::test]
    async fn creates_active_template() {
        let svc = Service::new(Config::default(), Memory::new(), ());

        let created = svc
            .execute(CreateEmailTemplate::active(
                email_template::Name::new("Test").unwrap(),
                email_template::Body::new("Hello").unwrap(),
            ))
            .await
            .unwrap();

        assert!(created.is_active);
        let stored = svc
            .database()
            .execute(Select(By::<Vec<EmailTemplate>, _>::new(Selector::all(
                Order::NewestFirst,
            ))))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, created.id);
        assert_eq!(stored[0].name.to_string(), "Test");
    }

    #[tokio::test]
    async fn surfaces_store_failure() {
        let svc = Service::new(Config::default(), Memory::unavailable(), ());

        let err = svc
            .execute(CreateEmailTemplate::active(
                email_template::Name::new("Test").unwrap(),
                email_template::Body::new("Hello").unwrap(),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "in-memory database is unavailable");
    }
}

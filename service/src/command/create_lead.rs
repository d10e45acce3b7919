//! [`Command`] for creating a new [`Lead`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{contact, lead, Lead},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Lead`].
#[derive(Clone, Debug)]
pub struct CreateLead {
    /// Given name of a new [`Lead`].
    pub first_name: contact::Name,

    /// Family name of a new [`Lead`].
    pub last_name: contact::Name,

    /// [`contact::Email`] of a new [`Lead`].
    pub email: contact::Email,

    /// [`contact::Phone`] of a new [`Lead`], if any.
    pub phone: Option<contact::Phone>,

    /// [`contact::Corporation`] a new [`Lead`] acts on behalf of, if any.
    pub corporation: Option<contact::Corporation>,

    /// [`lead::Address`] of a new [`Lead`], if known.
    pub address: Option<lead::Address>,

    /// [`lead::Profile`] of a new [`Lead`].
    pub profile: lead::Profile,
}

impl<Db, L> Command<CreateLead> for Service<Db, L>
where
    Db: Database<Insert<Lead>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Lead;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateLead) -> Result<Self::Ok, Self::Err> {
        let CreateLead {
            first_name,
            last_name,
            email,
            phone,
            corporation,
            address,
            profile,
        } = cmd;

        let lead = Lead {
            id: lead::Id::new(),
            first_name,
            last_name,
            email,
            phone,
            corporation,
            address,
            profile,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(lead.clone()))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(lead)
    }
}

/// Error of [`CreateLead`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        domain::{contact, lead, Lead},
        infra::{Database as _, Memory},
        read::lead::list::Filter,
        Command as _, Config, Service,
    };

    use super::CreateLead;

    #[tokio::test]
    async fn creates_corporate_lead() {
        let svc = Service::new(Config::default(), Memory::new(), ());

        let created = svc
            .execute(CreateLead {
                first_name: contact::Name::new("Sarah").unwrap(),
                last_name: contact::Name::new("Miller").unwrap(),
                email: contact::Email::new("sarah@miller.ca").unwrap(),
                phone: None,
                corporation: Some(contact::Corporation {
                    name: contact::Detail::new("Miller Asset Management Inc.")
                        .unwrap(),
                    incorporation_number: None,
                    jurisdiction: contact::Detail::new("Ontario"),
                }),
                address: None,
                profile: lead::Profile::default(),
            })
            .await
            .unwrap();

        assert!(created.is_corporate());
        let corporate = svc
            .database()
            .execute(Select(By::<Vec<Lead>, _>::new(Filter {
                search: None,
                corporate: Some(true),
            })))
            .await
            .unwrap();
        assert_eq!(corporate.len(), 1);
        assert_eq!(corporate[0].id, created.id);
    }
}

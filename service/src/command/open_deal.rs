//! [`Command`] for opening new [`Deal`]s out of a completed [`Intake`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date, DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        contact,
        deal::{self, document, Document},
        intake::{self, Intake, Missing},
        Deal,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for opening new [`Deal`]s out of a completed [`Intake`].
///
/// A separate [`Deal`] is opened for every transaction side of the
/// [`Intake`], each with the checklist of its [`deal::Kind`].
#[derive(Clone, Debug)]
pub struct OpenDeal {
    /// Completed [`Intake`] to open [`Deal`]s of.
    pub intake: Intake,
}

impl<Db, L> Command<OpenDeal> for Service<Db, L>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<deal::Serial, ()>>,
            Ok = deal::Serial,
            Err = Traced<database::Error>,
        > + Database<Insert<Deal>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Vec<Deal>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: OpenDeal) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let OpenDeal { intake } = cmd;

        intake
            .check_complete()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let client = client(&intake).map_err(tracerr::wrap!())?;
        let property_address = address(&intake.address)
            .ok_or(E::InvalidAddress)
            .map_err(tracerr::wrap!())?;
        let price = price(&intake.price)
            .ok_or(E::InvalidPrice)
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let today = Date::today();
        let mut deals = vec![];
        for kind in intake.deal_kinds() {
            let serial = tx
                .execute(Select(By::<deal::Serial, _>::new(())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            let created_at = DateTime::now().coerce();
            let mut deal = Deal {
                id: deal::Id::new(),
                file_number: deal::FileNumber::compose(
                    today.year(),
                    kind,
                    serial,
                ),
                client: client.clone(),
                kind,
                status: deal::Status::Active,
                property_address: property_address.clone(),
                closing_date: None,
                opening_date: Some(today),
                requisition_date: None,
                price,
                progress: Percent::ZERO,
                tasks: vec![],
                milestones: vec![],
                documents: documents(&intake, created_at.coerce()),
                notes: vec![],
                created_at,
            };
            deal.seed_checklist(today);

            tx.execute(Insert(deal.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            deals.push(deal);
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(deals)
    }
}

/// Builds the [`deal::Client`] out of the provided [`Intake`] answers.
///
/// Corporate clients without a personal email are reached through the
/// corporate one.
fn client(intake: &Intake) -> Result<deal::Client, ExecutionError> {
    use ExecutionError as E;

    let (first_name, last_name) =
        contact::Name::split_full(&intake.contact.full_name);

    let email = Some(intake.contact.email.trim())
        .filter(|e| !e.is_empty())
        .or_else(|| {
            intake
                .is_corporate()
                .then(|| intake.corporate.email.trim())
        })
        .and_then(contact::Email::new)
        .ok_or(E::InvalidEmail)?;

    let phone = intake.contact.phone.trim();
    let phone = if phone.is_empty() {
        None
    } else {
        Some(contact::Phone::new(phone).ok_or(E::InvalidPhone)?)
    };

    let corporation = if intake.is_corporate() {
        let intake::Corporate {
            name,
            incorporation_number,
            jurisdiction,
            ..
        } = &intake.corporate;
        Some(contact::Corporation {
            name: contact::Detail::new(name)
                .ok_or(E::Incomplete(Missing::CorporateName))?,
            incorporation_number: contact::Detail::new(incorporation_number),
            jurisdiction: contact::Detail::new(jurisdiction),
        })
    } else {
        None
    };

    Ok(deal::Client {
        first_name,
        last_name,
        email,
        phone,
        corporation,
    })
}

/// Builds the [`deal::Address`] out of the provided [`intake::Address`].
///
/// [`None`] is returned if the street, the city or the province is blank.
fn address(address: &intake::Address) -> Option<deal::Address> {
    Some(deal::Address {
        street: deal::AddressPart::new(&address.street)?,
        unit: deal::AddressPart::new(&address.unit),
        city: deal::AddressPart::new(&address.city)?,
        province: deal::AddressPart::new(&address.province)?,
        postal_code: deal::AddressPart::new(&address.postal_code),
    })
}

/// Parses the entered `price`, considering a blank one as not negotiated yet.
fn price(price: &str) -> Option<Money> {
    if price.trim().is_empty() {
        Some(Money::cad(Decimal::ZERO))
    } else {
        Money::parse_cad(price)
    }
}

/// Converts the uploaded [`intake::CorporateDocument`]s into [`Document`]s
/// awaiting review.
fn documents(intake: &Intake, now: document::UploadDateTime) -> Vec<Document> {
    if !intake.is_corporate() {
        return vec![];
    }
    intake
        .corporate_documents
        .iter()
        .filter_map(|doc| {
            let file = doc.file.as_ref()?;
            Some(Document {
                id: document::Id::new(),
                name: document::Name::new(&file.file_name)?,
                label: document::Name::new(doc.label())?,
                status: document::Status::Review,
                uploaded_at: now,
            })
        })
        .collect()
}

/// Error of [`OpenDeal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Intake`] misses an answer.
    #[display("Intake is incomplete: {_0}")]
    Incomplete(Missing),

    /// Client email is missing or malformed.
    #[display("Client email is invalid")]
    #[from(ignore)]
    InvalidEmail,

    /// Client phone is malformed.
    #[display("Client phone is invalid")]
    #[from(ignore)]
    InvalidPhone,

    /// Property address misses its street, city or province.
    #[display("Property address is incomplete")]
    #[from(ignore)]
    InvalidAddress,

    /// Property price is not a non-negative amount.
    #[display("Property price is invalid")]
    #[from(ignore)]
    InvalidPrice,
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Money,
    };
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            deal,
            intake::{
                document::{Attachment, Type},
                ClientType, CorporateDocument, Intake, Missing, Service,
                SubService,
            },
            Deal,
        },
        infra::{Database as _, Memory},
        read::deal::list::Counts,
        Command as _, Config, Service as DomainService,
    };

    use super::{ExecutionError, OpenDeal};

    fn intake() -> Intake {
        let mut intake = Intake {
            service: Some(Service::Closing),
            sub_service: Some(SubService::Buying),
            client_type: Some(ClientType::Residential),
            price: "$1,250,000".into(),
            aps_signed: Some(true),
            ..Intake::default()
        };
        intake.address.street = "88 Harbour St".into();
        intake.address.unit = "1203".into();
        intake.address.city = "Toronto".into();
        intake.contact.full_name = "Olivia Bennett".into();
        intake.contact.email = "olivia.bennett@example.com".into();
        intake.contact.phone = "416-555-0199".into();
        intake
    }

    #[tokio::test]
    async fn opens_purchase_with_checklist() {
        let svc = DomainService::new(Config::default(), Memory::new(), ());

        let deals = svc.execute(OpenDeal { intake: intake() }).await.unwrap();

        assert_eq!(deals.len(), 1);
        let deal = &deals[0];
        assert_eq!(deal.kind, deal::Kind::Purchase);
        assert_eq!(deal.status, deal::Status::Active);
        assert!(deal.file_number.to_string().ends_with("P-0001"));
        assert_eq!(deal.client.first_name.to_string(), "Olivia");
        assert_eq!(deal.client.last_name.to_string(), "Bennett");
        assert_eq!(deal.tasks.len(), 6);
        assert_eq!(deal.milestones.len(), 14);
        assert_eq!(deal.price, Money::cad(Decimal::from(1_250_000)));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Deal>, _>::new(deal.id)))
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn opens_both_sides() {
        let svc = DomainService::new(Config::default(), Memory::new(), ());
        let mut intake = intake();
        intake.sub_service = Some(SubService::Both);

        let deals = svc.execute(OpenDeal { intake }).await.unwrap();

        let kinds = deals.iter().map(|d| d.kind).collect::<Vec<_>>();
        assert_eq!(kinds, [deal::Kind::Purchase, deal::Kind::Sale]);
        assert!(deals[1].file_number.to_string().ends_with("S-0002"));

        let counts = svc
            .database()
            .execute(Select(By::<Counts, _>::new(())))
            .await
            .unwrap();
        assert_eq!(counts.total, 2);
    }

    #[tokio::test]
    async fn attaches_corporate_documents() {
        let svc = DomainService::new(Config::default(), Memory::new(), ());
        let mut intake = intake();
        intake.client_type = Some(ClientType::Corporate);
        intake.contact.email = String::new();
        intake.corporate.name = "Miller Asset Management Inc.".into();
        intake.corporate.email = "office@miller.ca".into();
        let mut doc = CorporateDocument::new();
        doc.file = Some(
            Attachment::new("articles.pdf", "application/pdf", 1024).unwrap(),
        );
        intake.corporate_documents.push(doc);
        intake.corporate_documents.push(CorporateDocument::new());

        let deals = svc.execute(OpenDeal { intake }).await.unwrap();

        let deal = &deals[0];
        assert_eq!(deal.client.email.to_string(), "office@miller.ca");
        assert_eq!(
            deal.client.corporation.as_ref().unwrap().name.to_string(),
            "Miller Asset Management Inc.",
        );
        assert_eq!(deal.documents.len(), 1);
        assert_eq!(deal.documents[0].name.to_string(), "articles.pdf");
        assert_eq!(
            deal.documents[0].label.to_string(),
            Type::default().title(),
        );
    }

    #[tokio::test]
    async fn rejects_incomplete_intake() {
        let svc = DomainService::new(Config::default(), Memory::new(), ());
        let mut intake = intake();
        intake.aps_signed = None;

        let err = svc.execute(OpenDeal { intake }).await.unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::Incomplete(Missing::ApsAnswer),
        ));
    }

    #[tokio::test]
    async fn rejects_malformed_answers() {
        let svc = DomainService::new(Config::default(), Memory::new(), ());

        let mut bad_email = intake();
        bad_email.contact.email = "olivia".into();
        let err = svc
            .execute(OpenDeal { intake: bad_email })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::InvalidEmail));

        let mut bad_price = intake();
        bad_price.price = "a lot".into();
        let err = svc
            .execute(OpenDeal { intake: bad_price })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::InvalidPrice));

        let mut no_city = intake();
        no_city.address.city = " ".into();
        let err = svc.execute(OpenDeal { intake: no_city }).await.unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::InvalidAddress));
    }
}

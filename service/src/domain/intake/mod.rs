//! Guided [`Intake`] of a new client.
//!
//! The [`Wizard`] walks through the [`Step`]s, collecting the [`Intake`]
//! answers. Each transition consumes the [`Wizard`] and returns the next one,
//! so a rejected transition simply returns the same state back.

pub mod document;

use common::define_kind;
use derive_more::{Display, Error};
use smart_default::SmartDefault;

use crate::domain::deal;

pub use self::document::CorporateDocument;

/// Answers collected by the [`Wizard`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Intake {
    /// Requested legal [`Service`].
    pub service: Option<Service>,

    /// Side of the transaction the client is on.
    pub sub_service: Option<SubService>,

    /// Type of the client.
    pub client_type: Option<ClientType>,

    /// Price of the property, as entered.
    pub price: String,

    /// [`Address`] of the property.
    pub address: Address,

    /// Whether the Agreement of Purchase and Sale is signed already.
    pub aps_signed: Option<bool>,

    /// [`Contact`] details of the client.
    pub contact: Contact,

    /// [`Corporate`] details of a corporate client.
    pub corporate: Corporate,

    /// [`CorporateDocument`]s of a corporate client.
    pub corporate_documents: Vec<CorporateDocument>,
}

impl Intake {
    /// Indicates whether the client of this [`Intake`] is a corporate one.
    #[must_use]
    pub fn is_corporate(&self) -> bool {
        self.client_type == Some(ClientType::Corporate)
    }

    /// Checks whether every [`Step`] on the path of this [`Intake`] is
    /// answered, as if it was walked through by a [`Wizard`].
    ///
    /// # Errors
    ///
    /// With the first [`Missing`] answer, if any.
    pub fn check_complete(&self) -> Result<(), Missing> {
        Step::ALL
            .iter()
            .filter(|s| **s != Step::Tasks || self.is_corporate())
            .try_for_each(|s| s.check(self))
    }

    /// Returns the [`deal::Kind`]s of the files this [`Intake`] opens.
    ///
    /// Buying and selling at once opens both a purchase and a sale file.
    #[must_use]
    pub fn deal_kinds(&self) -> Vec<deal::Kind> {
        match (self.service, self.sub_service) {
            (Some(Service::Refinance), _) => vec![deal::Kind::Refinance],
            (_, Some(SubService::Buying)) => vec![deal::Kind::Purchase],
            (_, Some(SubService::Selling)) => vec![deal::Kind::Sale],
            (_, Some(SubService::Both)) => {
                vec![deal::Kind::Purchase, deal::Kind::Sale]
            }
            (_, None) => vec![],
        }
    }
}

/// Property address entered into an [`Intake`].
#[derive(Clone, Debug, Eq, PartialEq, SmartDefault)]
pub struct Address {
    /// Street line.
    pub street: String,

    /// Unit (apartment, suite) number.
    pub unit: String,

    /// City.
    pub city: String,

    /// Postal code.
    pub postal_code: String,

    /// Province.
    #[default("Ontario".into())]
    pub province: String,
}

/// Contact details entered into an [`Intake`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Contact {
    /// Full name of the client.
    pub full_name: String,

    /// Email address of the client.
    pub email: String,

    /// Phone number of the client.
    pub phone: String,
}

/// Corporate details entered into an [`Intake`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Corporate {
    /// Registered name of the corporation.
    pub name: String,

    /// Incorporation number of the corporation.
    pub incorporation_number: String,

    /// Jurisdiction the corporation is registered in.
    pub jurisdiction: String,

    /// Email address of the corporation.
    pub email: String,
}

define_kind! {
    #[doc = "Legal service requested in an [`Intake`]."]
    enum Service {
        #[doc = "Closing of a purchase or a sale."]
        Closing = 1,

        #[doc = "Refinance of a mortgage."]
        Refinance = 2,

        #[doc = "Closing of a condominium unit."]
        Condo = 3,
    }
}

define_kind! {
    #[doc = "Side of the transaction the client of an [`Intake`] is on."]
    enum SubService {
        #[doc = "Buying a property."]
        Buying = 1,

        #[doc = "Selling a property."]
        Selling = 2,

        #[doc = "Buying and selling at once."]
        Both = 3,
    }
}

define_kind! {
    #[doc = "Type of the client of an [`Intake`]."]
    enum ClientType {
        #[doc = "Individual."]
        Residential = 1,

        #[doc = "Corporation."]
        Corporate = 2,
    }
}

define_kind! {
    #[doc = "Step of a [`Wizard`]."]
    enum Step {
        #[doc = "Choosing a [`Service`]."]
        Service = 1,

        #[doc = "Choosing a [`SubService`]."]
        SubService = 2,

        #[doc = "Choosing a [`ClientType`]."]
        ClientType = 3,

        #[doc = "Entering the property price."]
        Price = 4,

        #[doc = "Entering the property [`Address`]."]
        Address = 5,

        #[doc = "Answering whether the Agreement of Purchase and Sale is signed."]
        Aps = 6,

        #[doc = "Entering the [`Contact`] details."]
        Contact = 7,

        #[doc = "Uploading the [`CorporateDocument`]s."]
        Tasks = 8,

        #[doc = "Scheduling a meeting."]
        Schedule = 9,

        #[doc = "Intake is completed."]
        Success = 10,
    }
}

impl Step {
    /// Returns the [`Step`] following this one in the declaration order.
    fn following(self) -> Option<Self> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    /// Returns the [`Step`] preceding this one in the declaration order.
    fn preceding(self) -> Option<Self> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        idx.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    /// Checks whether the provided [`Intake`] satisfies the guard of this
    /// [`Step`].
    ///
    /// # Errors
    ///
    /// With the first [`Missing`] answer, if any.
    pub fn check(self, intake: &Intake) -> Result<(), Missing> {
        match self {
            Self::Service if intake.service.is_none() => Err(Missing::Service),
            Self::SubService if intake.sub_service.is_none() => {
                Err(Missing::SubService)
            }
            Self::ClientType => match intake.client_type {
                None => Err(Missing::ClientType),
                Some(ClientType::Corporate)
                    if intake.corporate.name.is_empty() =>
                {
                    Err(Missing::CorporateName)
                }
                Some(ClientType::Corporate)
                    if intake.corporate.email.is_empty() =>
                {
                    Err(Missing::CorporateEmail)
                }
                Some(ClientType::Residential | ClientType::Corporate) => Ok(()),
            },
            Self::Aps if intake.aps_signed.is_none() => Err(Missing::ApsAnswer),
            Self::Service
            | Self::SubService
            | Self::Price
            | Self::Address
            | Self::Aps
            | Self::Contact
            | Self::Tasks
            | Self::Schedule
            | Self::Success => Ok(()),
        }
    }
}

/// Answer an [`Intake`] is missing to leave its current [`Step`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum Missing {
    /// [`Service`] is not chosen.
    #[display("Service is not chosen")]
    Service,

    /// [`SubService`] is not chosen.
    #[display("Transaction side is not chosen")]
    SubService,

    /// [`ClientType`] is not chosen.
    #[display("Client type is not chosen")]
    ClientType,

    /// [`Corporate::name`] is empty.
    #[display("Corporation name is required")]
    CorporateName,

    /// [`Corporate::email`] is empty.
    #[display("Corporation email is required")]
    CorporateEmail,

    /// Whether the Agreement of Purchase and Sale is signed is not answered.
    #[display("Agreement of Purchase and Sale answer is required")]
    ApsAnswer,
}

/// State of a guided [`Intake`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Wizard {
    /// Current [`Step`] of this [`Wizard`].
    pub step: Step,

    /// [`Intake`] collected so far.
    pub intake: Intake,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Creates a new [`Wizard`] at its first [`Step`] with empty answers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: Step::Service,
            intake: Intake::default(),
        }
    }

    /// Creates a new [`Wizard`] resumed at the provided [`Step`].
    #[must_use]
    pub fn resume(step: Step, intake: Intake) -> Self {
        Self { step, intake }
    }

    /// Indicates whether the current [`Step`] guard allows to
    /// [`advance`](Wizard::advance).
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.step.check(&self.intake).is_ok()
    }

    /// Moves this [`Wizard`] to the next [`Step`].
    ///
    /// Non-corporate clients skip the [`Step::Tasks`] going from
    /// [`Step::Contact`] straight to [`Step::Schedule`]. Stays as is if the
    /// current [`Step`] guard fails, or at [`Step::Success`].
    #[must_use]
    pub fn advance(self) -> Self {
        if !self.can_advance() {
            return self;
        }
        let next = match self.step {
            Step::Contact if !self.intake.is_corporate() => Some(Step::Schedule),
            step => step.following(),
        };
        match next {
            Some(step) => Self { step, ..self },
            None => self,
        }
    }

    /// Moves this [`Wizard`] to the previous [`Step`].
    ///
    /// Non-corporate clients skip the [`Step::Tasks`] going from
    /// [`Step::Schedule`] straight to [`Step::Contact`]. Stays as is at
    /// [`Step::Service`].
    #[must_use]
    pub fn retreat(self) -> Self {
        let prev = match self.step {
            Step::Schedule if !self.intake.is_corporate() => {
                Some(Step::Contact)
            }
            step => step.preceding(),
        };
        match prev {
            Some(step) => Self { step, ..self },
            None => self,
        }
    }

    /// Starts a new [`Intake`] from scratch once the current one succeeded.
    ///
    /// Stays as is at any [`Step`] but [`Step::Success`].
    #[must_use]
    pub fn restart(self) -> Self {
        if self.step == Step::Success {
            Self::new()
        } else {
            self
        }
    }

    /// Adds a new empty [`CorporateDocument`] to the [`Intake`].
    #[must_use]
    pub fn add_document(mut self) -> Self {
        self.intake.corporate_documents.push(CorporateDocument::new());
        self
    }

    /// Removes the [`CorporateDocument`] with the provided [`document::Id`]
    /// from the [`Intake`].
    #[must_use]
    pub fn remove_document(mut self, id: document::Id) -> Self {
        self.intake.corporate_documents.retain(|d| d.id != id);
        self
    }

    /// Applies the provided [`document::Patch`] to the [`CorporateDocument`]
    /// with the provided [`document::Id`].
    #[must_use]
    pub fn update_document(
        mut self,
        id: document::Id,
        patch: document::Patch,
    ) -> Self {
        if let Some(doc) =
            self.intake.corporate_documents.iter_mut().find(|d| d.id == id)
        {
            doc.apply(patch);
        }
        self
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::deal;

    use super::{
        document, ClientType, Intake, Missing, Service, Step, SubService,
        Wizard,
    };

    fn at(step: Step, intake: Intake) -> Wizard {
        Wizard::resume(step, intake)
    }

    fn residential() -> Intake {
        Intake {
            service: Some(Service::Closing),
            sub_service: Some(SubService::Buying),
            client_type: Some(ClientType::Residential),
            aps_signed: Some(true),
            ..Intake::default()
        }
    }

    fn corporate() -> Intake {
        let mut intake = residential();
        intake.client_type = Some(ClientType::Corporate);
        intake.corporate.name = "Miller Asset Management Inc.".into();
        intake.corporate.email = "sarah@miller-assets.com".into();
        intake
    }

    #[test]
    fn starts_with_defaults() {
        let wizard = Wizard::new();

        assert_eq!(wizard.step, Step::Service);
        assert_eq!(wizard.intake.address.province, "Ontario");
        assert!(wizard.intake.service.is_none());
        assert!(wizard.intake.price.is_empty());
        assert!(wizard.intake.corporate_documents.is_empty());
    }

    #[test]
    fn walks_residential_path() {
        let mut wizard = at(Step::Service, residential());
        let mut visited = vec![wizard.step];
        while wizard.step != Step::Success {
            wizard = wizard.advance();
            visited.push(wizard.step);
        }

        assert_eq!(
            visited,
            [
                Step::Service,
                Step::SubService,
                Step::ClientType,
                Step::Price,
                Step::Address,
                Step::Aps,
                Step::Contact,
                Step::Schedule,
                Step::Success,
            ],
        );
    }

    #[test]
    fn corporate_visits_documents_step() {
        assert_eq!(at(Step::Contact, corporate()).advance().step, Step::Tasks);
        assert_eq!(at(Step::Tasks, corporate()).advance().step, Step::Schedule);
        assert_eq!(at(Step::Schedule, corporate()).retreat().step, Step::Tasks);
    }

    #[test]
    fn non_corporate_skips_documents_step() {
        assert_eq!(
            at(Step::Contact, residential()).advance().step,
            Step::Schedule,
        );
        assert_eq!(
            at(Step::Schedule, residential()).retreat().step,
            Step::Contact,
        );

        // Not chosen yet counts as non-corporate too.
        assert_eq!(
            at(Step::Contact, Intake::default()).advance().step,
            Step::Schedule,
        );
    }

    #[test]
    fn blocked_advance_keeps_state() {
        for (step, missing) in [
            (Step::Service, Missing::Service),
            (Step::SubService, Missing::SubService),
            (Step::ClientType, Missing::ClientType),
            (Step::Aps, Missing::ApsAnswer),
        ] {
            let wizard = at(step, Intake::default());
            assert!(!wizard.can_advance());
            assert_eq!(step.check(&wizard.intake), Err(missing));
            assert_eq!(wizard.clone().advance(), wizard);
        }
    }

    #[test]
    fn corporate_requires_name_and_email() {
        let mut intake = corporate();
        intake.corporate.email.clear();
        let wizard = at(Step::ClientType, intake);
        assert_eq!(
            Step::ClientType.check(&wizard.intake),
            Err(Missing::CorporateEmail),
        );
        assert_eq!(wizard.clone().advance(), wizard);

        let mut intake = corporate();
        intake.corporate.name.clear();
        assert_eq!(
            Step::ClientType.check(&intake),
            Err(Missing::CorporateName),
        );

        assert_eq!(
            at(Step::ClientType, corporate()).advance().step,
            Step::Price,
        );
    }

    #[test]
    fn corporate_accepts_any_non_empty_answers() {
        let mut intake = corporate();
        intake.corporate.name = " ".into();
        intake.corporate.email = "a@b.c".into();

        assert_eq!(Step::ClientType.check(&intake), Ok(()));
        assert_eq!(at(Step::ClientType, intake).advance().step, Step::Price);
    }

    #[test]
    fn unguarded_steps_advance_with_empty_answers() {
        for step in [Step::Price, Step::Address] {
            assert!(at(step, Intake::default()).can_advance());
        }
    }

    #[test]
    fn stays_at_ends() {
        let success = at(Step::Success, residential());
        assert_eq!(success.clone().advance(), success);

        let first = Wizard::new();
        assert_eq!(first.clone().retreat(), first);
    }

    #[test]
    fn retreat_is_never_guarded() {
        assert_eq!(
            at(Step::Aps, Intake::default()).retreat().step,
            Step::Address,
        );
    }

    #[test]
    fn restarts_only_from_success() {
        let mut intake = corporate();
        intake.price = "899,000".into();
        intake.address.province = "Quebec".into();

        let restarted = at(Step::Success, intake.clone()).restart();
        assert_eq!(restarted, Wizard::new());

        let wizard = at(Step::Schedule, intake);
        assert_eq!(wizard.clone().restart(), wizard);
    }

    #[test]
    fn manages_documents() {
        let wizard = at(Step::Tasks, corporate()).add_document().add_document();
        let docs = &wizard.intake.corporate_documents;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].kind, document::Type::ArticleOfIncorporation);
        assert_ne!(docs[0].id, docs[1].id);
        let (first, second) = (docs[0].id, docs[1].id);

        let file =
            document::Attachment::new("profile.pdf", "application/pdf", 2048)
                .unwrap();
        let wizard = wizard.update_document(
            second,
            document::Patch {
                kind: Some(document::Type::CorporationProfile),
                file: Some(file.clone()),
                ..document::Patch::default()
            },
        );
        let doc = &wizard.intake.corporate_documents[1];
        assert_eq!(doc.kind, document::Type::CorporationProfile);
        assert_eq!(doc.file, Some(file));

        let wizard = wizard.remove_document(first);
        assert_eq!(wizard.intake.corporate_documents.len(), 1);
        assert_eq!(wizard.intake.corporate_documents[0].id, second);
    }

    #[test]
    fn maps_deal_kinds() {
        let mut intake = residential();
        assert_eq!(intake.deal_kinds(), [deal::Kind::Purchase]);

        intake.sub_service = Some(SubService::Selling);
        assert_eq!(intake.deal_kinds(), [deal::Kind::Sale]);

        intake.sub_service = Some(SubService::Both);
        assert_eq!(
            intake.deal_kinds(),
            [deal::Kind::Purchase, deal::Kind::Sale],
        );

        intake.service = Some(Service::Refinance);
        assert_eq!(intake.deal_kinds(), [deal::Kind::Refinance]);

        intake.service = Some(Service::Condo);
        intake.sub_service = None;
        assert!(intake.deal_kinds().is_empty());
    }

    #[test]
    fn checks_completeness_along_path() {
        assert_eq!(residential().check_complete(), Ok(()));
        assert_eq!(
            Intake::default().check_complete(),
            Err(Missing::Service),
        );

        let mut intake = residential();
        intake.aps_signed = None;
        assert_eq!(intake.check_complete(), Err(Missing::ApsAnswer));

        intake.aps_signed = Some(false);
        intake.client_type = Some(ClientType::Corporate);
        intake.corporate.name = "Acme Holdings Inc.".into();
        assert_eq!(intake.check_complete(), Err(Missing::CorporateEmail));
    }
}

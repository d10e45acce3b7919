//! [`Intake`]-related definitions.

use juniper::{GraphQLEnum, GraphQLInputObject};
use service::domain::{self, intake};

use crate::{define_error, AsError, Error};

/// Answers of a client intake.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "IntakeInput")]
pub struct Intake {
    /// Requested legal service.
    pub service: Option<Service>,

    /// Side of the transaction the client is on.
    pub sub_service: Option<SubService>,

    /// Type of the client.
    pub client_type: Option<ClientType>,

    /// Price of the property, as entered.
    #[graphql(default)]
    pub price: String,

    /// Address of the property.
    pub address: Option<Address>,

    /// Whether the Agreement of Purchase and Sale is signed already.
    pub aps_signed: Option<bool>,

    /// Contact details of the client.
    pub contact: Option<Contact>,

    /// Details of a corporate client.
    pub corporate: Option<Corporate>,

    /// Documents of a corporate client.
    #[graphql(default)]
    pub corporate_documents: Vec<CorporateDocument>,
}

impl TryFrom<Intake> for domain::Intake {
    type Error = intake::document::AttachmentError;

    fn try_from(input: Intake) -> Result<Self, Self::Error> {
        let Intake {
            service,
            sub_service,
            client_type,
            price,
            address,
            aps_signed,
            contact,
            corporate,
            corporate_documents,
        } = input;

        Ok(Self {
            service: service.map(Into::into),
            sub_service: sub_service.map(Into::into),
            client_type: client_type.map(Into::into),
            price,
            address: address.map(Into::into).unwrap_or_default(),
            aps_signed,
            contact: contact.map(Into::into).unwrap_or_default(),
            corporate: corporate.map(Into::into).unwrap_or_default(),
            corporate_documents: corporate_documents
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Address of the property of an intake.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "IntakeAddressInput")]
pub struct Address {
    /// Street line.
    #[graphql(default)]
    pub street: String,

    /// Unit.
    #[graphql(default)]
    pub unit: String,

    /// City.
    #[graphql(default)]
    pub city: String,

    /// Postal code.
    #[graphql(default)]
    pub postal_code: String,

    /// Province.
    #[graphql(default)]
    pub province: String,
}

impl From<Address> for intake::Address {
    fn from(a: Address) -> Self {
        Self {
            street: a.street,
            unit: a.unit,
            city: a.city,
            postal_code: a.postal_code,
            province: a.province,
        }
    }
}

/// Contact details of the client of an intake.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "IntakeContactInput")]
pub struct Contact {
    /// Full name of the client.
    #[graphql(default)]
    pub full_name: String,

    /// Email address of the client.
    #[graphql(default)]
    pub email: String,

    /// Phone number of the client.
    #[graphql(default)]
    pub phone: String,
}

impl From<Contact> for intake::Contact {
    fn from(c: Contact) -> Self {
        Self {
            full_name: c.full_name,
            email: c.email,
            phone: c.phone,
        }
    }
}

/// Details of a corporate client of an intake.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "IntakeCorporateInput")]
pub struct Corporate {
    /// Registered name of the corporation.
    #[graphql(default)]
    pub name: String,

    /// Incorporation number of the corporation.
    #[graphql(default)]
    pub incorporation_number: String,

    /// Jurisdiction the corporation is registered in.
    #[graphql(default)]
    pub jurisdiction: String,

    /// Email address of the corporation.
    #[graphql(default)]
    pub email: String,
}

impl From<Corporate> for intake::Corporate {
    fn from(c: Corporate) -> Self {
        Self {
            name: c.name,
            incorporation_number: c.incorporation_number,
            jurisdiction: c.jurisdiction,
            email: c.email,
        }
    }
}

/// Legal document of a corporate client of an intake.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "CorporateDocumentInput")]
pub struct CorporateDocument {
    /// Type of the document.
    pub kind: CorporateDocumentType,

    /// Label of the document of the `OTHER` type.
    pub custom_type: Option<String>,

    /// Uploaded file of the document, if any.
    pub file: Option<Attachment>,
}

impl TryFrom<CorporateDocument> for intake::CorporateDocument {
    type Error = intake::document::AttachmentError;

    fn try_from(input: CorporateDocument) -> Result<Self, Self::Error> {
        let CorporateDocument {
            kind,
            custom_type,
            file,
        } = input;

        let mut doc = Self::new();
        doc.apply(intake::document::Patch {
            kind: Some(kind.into()),
            custom_type,
            file: file
                .map(|f| {
                    intake::document::Attachment::new(
                        f.file_name,
                        &f.content_type,
                        u64::try_from(f.size).unwrap_or_default(),
                    )
                })
                .transpose()?,
        });
        Ok(doc)
    }
}

/// Uploaded file of a `CorporateDocumentInput`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "AttachmentInput")]
pub struct Attachment {
    /// Name of the uploaded file.
    pub file_name: String,

    /// MIME type of the uploaded file.
    pub content_type: String,

    /// Size of the uploaded file in bytes.
    pub size: i32,
}

/// Legal service requested in an intake.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "IntakeService")]
pub enum Service {
    /// Closing of a purchase or a sale.
    Closing,

    /// Refinance of a mortgage.
    Refinance,

    /// Closing of a condominium unit.
    Condo,
}

impl From<Service> for intake::Service {
    fn from(s: Service) -> Self {
        match s {
            Service::Closing => Self::Closing,
            Service::Refinance => Self::Refinance,
            Service::Condo => Self::Condo,
        }
    }
}

/// Side of the transaction the client of an intake is on.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "IntakeSubService")]
pub enum SubService {
    /// Buying a property.
    Buying,

    /// Selling a property.
    Selling,

    /// Buying and selling at once.
    Both,
}

impl From<SubService> for intake::SubService {
    fn from(s: SubService) -> Self {
        match s {
            SubService::Buying => Self::Buying,
            SubService::Selling => Self::Selling,
            SubService::Both => Self::Both,
        }
    }
}

/// Type of the client of an intake.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "IntakeClientType")]
pub enum ClientType {
    /// Individual.
    Residential,

    /// Corporation.
    Corporate,
}

impl From<ClientType> for intake::ClientType {
    fn from(t: ClientType) -> Self {
        match t {
            ClientType::Residential => Self::Residential,
            ClientType::Corporate => Self::Corporate,
        }
    }
}

/// Type of a `CorporateDocumentInput`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum CorporateDocumentType {
    /// Article of Incorporation.
    ArticleOfIncorporation,

    /// Corporation Profile.
    CorporationProfile,

    /// Special Shareholder Agreement.
    SpecialShareholderAgreement,

    /// Directors Resolution.
    DirectorsResolution,

    /// Any other document, described by a custom label.
    Other,
}

impl From<CorporateDocumentType> for intake::document::Type {
    fn from(t: CorporateDocumentType) -> Self {
        use CorporateDocumentType as T;
        match t {
            T::ArticleOfIncorporation => Self::ArticleOfIncorporation,
            T::CorporationProfile => Self::CorporationProfile,
            T::SpecialShareholderAgreement => Self::SpecialShareholderAgreement,
            T::DirectorsResolution => Self::DirectorsResolution,
            T::Other => Self::Other,
        }
    }
}

/// Step of the intake wizard.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "IntakeStep")]
pub enum Step {
    /// Choosing a service.
    Service,

    /// Choosing a transaction side.
    SubService,

    /// Choosing a client type.
    ClientType,

    /// Entering the property price.
    Price,

    /// Entering the property address.
    Address,

    /// Answering whether the Agreement of Purchase and Sale is signed.
    Aps,

    /// Entering the contact details.
    Contact,

    /// Uploading the corporate documents.
    Tasks,

    /// Scheduling a meeting.
    Schedule,

    /// Intake is completed.
    Success,
}

impl From<intake::Step> for Step {
    fn from(step: intake::Step) -> Self {
        use intake::Step as S;
        match step {
            S::Service => Self::Service,
            S::SubService => Self::SubService,
            S::ClientType => Self::ClientType,
            S::Price => Self::Price,
            S::Address => Self::Address,
            S::Aps => Self::Aps,
            S::Contact => Self::Contact,
            S::Tasks => Self::Tasks,
            S::Schedule => Self::Schedule,
            S::Success => Self::Success,
        }
    }
}

impl From<Step> for intake::Step {
    fn from(step: Step) -> Self {
        match step {
            Step::Service => Self::Service,
            Step::SubService => Self::SubService,
            Step::ClientType => Self::ClientType,
            Step::Price => Self::Price,
            Step::Address => Self::Address,
            Step::Aps => Self::Aps,
            Step::Contact => Self::Contact,
            Step::Tasks => Self::Tasks,
            Step::Schedule => Self::Schedule,
            Step::Success => Self::Success,
        }
    }
}

impl AsError for intake::document::AttachmentError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ATTACHMENT_NOT_PDF"]
                #[status = BAD_REQUEST]
                #[message = "Please upload PDF files only."]
                NotPdf,

                #[code = "ATTACHMENT_TOO_LARGE"]
                #[status = BAD_REQUEST]
                #[message = "Each file size must not exceed 10MB."]
                TooLarge,
            }
        }

        Some(
            match self {
                Self::NotPdf => Error::NotPdf,
                Self::TooLarge => Error::TooLarge,
            }
            .into(),
        )
    }
}

impl AsError for intake::Missing {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            "INCOMPLETE_INTAKE",
            http::StatusCode::BAD_REQUEST,
            self,
        ))
    }
}

#[cfg(test)]
mod spec {
    use service::domain::{self, intake};

    use crate::AsError as _;

    use super::{
        Attachment, ClientType, CorporateDocument, CorporateDocumentType,
        Intake, Step,
    };

    fn intake(documents: Vec<CorporateDocument>) -> Intake {
        Intake {
            service: None,
            sub_service: None,
            client_type: Some(ClientType::Corporate),
            price: "100".into(),
            address: None,
            aps_signed: None,
            contact: None,
            corporate: None,
            corporate_documents: documents,
        }
    }

    fn document(content_type: &str, size: i32) -> CorporateDocument {
        CorporateDocument {
            kind: CorporateDocumentType::Other,
            custom_type: Some("Bylaws".into()),
            file: Some(Attachment {
                file_name: "bylaws.pdf".into(),
                content_type: content_type.into(),
                size,
            }),
        }
    }

    #[test]
    fn converts_documents_with_attachments() {
        let converted = domain::Intake::try_from(intake(vec![document(
            "application/pdf",
            1024,
        )]))
        .unwrap();

        assert!(converted.is_corporate());
        assert_eq!(converted.corporate_documents.len(), 1);
        let doc = &converted.corporate_documents[0];
        assert_eq!(doc.label(), "Bylaws");
        assert_eq!(doc.file.as_ref().unwrap().file_name, "bylaws.pdf");
    }

    #[test]
    fn rejects_invalid_attachments() {
        let err = domain::Intake::try_from(intake(vec![document(
            "image/png",
            1024,
        )]))
        .unwrap_err();
        assert_eq!(err, intake::document::AttachmentError::NotPdf);
        assert_eq!(err.as_error().code, "ATTACHMENT_NOT_PDF");

        let err = domain::Intake::try_from(intake(vec![document(
            "application/pdf",
            11 * 1024 * 1024,
        )]))
        .unwrap_err();
        assert_eq!(err, intake::document::AttachmentError::TooLarge);
    }

    #[test]
    fn maps_steps_both_ways() {
        for step in intake::Step::ALL {
            assert_eq!(intake::Step::from(Step::from(*step)), *step);
        }
    }
}

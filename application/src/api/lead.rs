//! [`Lead`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::{command, domain};
use uuid::Uuid;

use crate::{api::scalar, Context};

/// A prospective client.
#[derive(Clone, Debug, From, Into)]
pub struct Lead(domain::Lead);

/// A prospective client.
#[graphql_object(context = Context)]
impl Lead {
    /// Unique identifier of this `Lead`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Given name of this `Lead`.
    #[must_use]
    pub fn first_name(&self) -> Name {
        self.0.first_name.clone().into()
    }

    /// Family name of this `Lead`.
    #[must_use]
    pub fn last_name(&self) -> Name {
        self.0.last_name.clone().into()
    }

    /// Full name of this `Lead`.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.0.full_name()
    }

    /// Email address of this `Lead`.
    #[must_use]
    pub fn email(&self) -> Email {
        self.0.email.clone().into()
    }

    /// Phone number of this `Lead`, if any.
    #[must_use]
    pub fn phone(&self) -> Option<Phone> {
        self.0.phone.clone().map(Into::into)
    }

    /// Indicator whether this `Lead` acts on behalf of a corporation.
    #[must_use]
    pub fn is_corporate(&self) -> bool {
        self.0.is_corporate()
    }

    /// Registered name of the corporation, if any.
    #[must_use]
    pub fn corporation_name(&self) -> Option<Detail> {
        self.0.corporation.as_ref().map(|c| c.name.clone().into())
    }

    /// Incorporation number of the corporation, if known.
    #[must_use]
    pub fn incorporation_number(&self) -> Option<Detail> {
        self.0
            .corporation
            .as_ref()
            .and_then(|c| c.incorporation_number.clone())
            .map(Into::into)
    }

    /// Street line of the current address of this `Lead`, if known.
    #[must_use]
    pub fn address_street(&self) -> Option<String> {
        self.0.address.as_ref().map(|a| a.street.to_string())
    }

    /// City of the current address of this `Lead`, if known.
    #[must_use]
    pub fn address_city(&self) -> Option<String> {
        self.0
            .address
            .as_ref()
            .and_then(|a| a.city.as_ref())
            .map(ToString::to_string)
    }

    /// Occupation of this `Lead`, if known.
    #[must_use]
    pub fn occupation(&self) -> Option<Detail> {
        self.0.profile.occupation.clone().map(Into::into)
    }

    /// Marital status of this `Lead`, if known.
    #[must_use]
    pub fn marital_status(&self) -> Option<Detail> {
        self.0.profile.marital_status.clone().map(Into::into)
    }

    /// `DateTime` when this `Lead` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Lead`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::lead::Id)]
#[into(domain::lead::Id)]
#[graphql(name = "LeadId", transparent)]
pub struct Id(Uuid);

/// Name of a contact.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ContactName", with = scalar::Via::<domain::contact::Name>)]
pub struct Name(domain::contact::Name);

/// Email address of a contact.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContactEmail",
    with = scalar::Via::<domain::contact::Email>,
)]
pub struct Email(domain::contact::Email);

/// Phone number of a contact.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContactPhone",
    with = scalar::Via::<domain::contact::Phone>,
)]
pub struct Phone(domain::contact::Phone);

/// Free-form detail about a contact.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContactDetail",
    with = scalar::Via::<domain::contact::Detail>,
)]
pub struct Detail(domain::contact::Detail);

/// Part of an address.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "AddressPart",
    with = scalar::Via::<domain::deal::AddressPart>,
)]
pub struct AddressPart(domain::deal::AddressPart);

/// Details of a new `Lead`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "LeadInput")]
pub struct Input {
    /// Given name of the new `Lead`.
    pub first_name: Name,

    /// Family name of the new `Lead`.
    pub last_name: Name,

    /// Email address of the new `Lead`.
    pub email: Email,

    /// Phone number of the new `Lead`, if any.
    pub phone: Option<Phone>,

    /// Corporation the new `Lead` acts on behalf of, if any.
    pub corporation: Option<CorporationInput>,

    /// Current address of the new `Lead`, if known.
    pub address: Option<AddressInput>,

    /// Occupation of the new `Lead`, if known.
    pub occupation: Option<Detail>,

    /// Marital status of the new `Lead`, if known.
    pub marital_status: Option<Detail>,

    /// Citizenship status of the new `Lead`, if known.
    pub citizenship_status: Option<Detail>,

    /// Type of the property the new `Lead` is after, if known.
    pub property_type: Option<Detail>,

    /// Whether the new `Lead` owned a property before, if known.
    pub ownership_history: Option<Detail>,

    /// Phone number of the new `Lead`'s employer, if known.
    pub employer_phone: Option<Phone>,
}

/// Corporation of a new `Lead`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "LeadCorporationInput")]
pub struct CorporationInput {
    /// Registered name of the corporation.
    pub name: Detail,

    /// Incorporation number of the corporation, if known.
    pub incorporation_number: Option<Detail>,

    /// Jurisdiction the corporation is registered in, if known.
    pub jurisdiction: Option<Detail>,
}

/// Current address of a new `Lead`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "LeadAddressInput")]
pub struct AddressInput {
    /// Street line of the address.
    pub street: AddressPart,

    /// City of the address, if known.
    pub city: Option<AddressPart>,

    /// Postal code of the address, if known.
    pub postal_code: Option<AddressPart>,
}

impl From<Input> for command::CreateLead {
    fn from(input: Input) -> Self {
        let Input {
            first_name,
            last_name,
            email,
            phone,
            corporation,
            address,
            occupation,
            marital_status,
            citizenship_status,
            property_type,
            ownership_history,
            employer_phone,
        } = input;

        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.map(Into::into),
            corporation: corporation.map(|c| domain::contact::Corporation {
                name: c.name.into(),
                incorporation_number: c.incorporation_number.map(Into::into),
                jurisdiction: c.jurisdiction.map(Into::into),
            }),
            address: address.map(|a| domain::lead::Address {
                street: a.street.into(),
                city: a.city.map(Into::into),
                postal_code: a.postal_code.map(Into::into),
            }),
            profile: domain::lead::Profile {
                property_type: property_type.map(Into::into),
                ownership_history: ownership_history.map(Into::into),
                marital_status: marital_status.map(Into::into),
                citizenship_status: citizenship_status.map(Into::into),
                occupation: occupation.map(Into::into),
                employer_phone: employer_phone.map(Into::into),
            },
        }
    }
}

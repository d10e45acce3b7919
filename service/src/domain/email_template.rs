//! [`EmailTemplate`] definitions.

use std::{borrow::Cow, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    deal::{milestone, Milestone},
    Deal,
};

/// Reusable email text with [`MergeTag`] placeholders.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmailTemplate {
    /// ID of this [`EmailTemplate`].
    pub id: Id,

    /// [`Name`] of this [`EmailTemplate`].
    pub name: Name,

    /// [`Body`] of this [`EmailTemplate`].
    pub body: Body,

    /// Indicator whether this [`EmailTemplate`] is offered for use.
    pub is_active: bool,

    /// [`DateTime`] when this [`EmailTemplate`] was created.
    pub created_at: CreationDateTime,
}

impl EmailTemplate {
    /// Renders the [`Body`] of this [`EmailTemplate`] for the provided
    /// [`Deal`] and its optional stage [`Milestone`].
    #[must_use]
    pub fn render(&self, deal: &Deal, stage: Option<&Milestone>) -> String {
        self.body.render(deal, stage)
    }
}

/// ID of an [`EmailTemplate`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of an [`EmailTemplate`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is non-empty.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.is_empty()).then_some(Self(name))
    }
}

/// Text of an [`EmailTemplate`], possibly containing [`MergeTag`]s.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Body(String);

impl Body {
    /// Creates a new [`Body`] if the given `text` is non-empty.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.is_empty()).then_some(Self(text))
    }

    /// Substitutes the known [`MergeTag`]s of this [`Body`] with the values
    /// of the provided [`Deal`] and its optional stage [`Milestone`].
    ///
    /// Unknown tags are left untouched.
    #[must_use]
    pub fn render(&self, deal: &Deal, stage: Option<&Milestone>) -> String {
        /// Regular expression matching a `{{ tag }}` placeholder with an
        /// optional whitespace inside the braces.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}")
                .expect("valid regex")
        });

        REGEX
            .replace_all(&self.0, |caps: &Captures<'_>| {
                MergeTag::from_key(&caps[1]).map_or_else(
                    || caps[0].to_owned(),
                    |tag| tag.value(deal, stage).into_owned(),
                )
            })
            .into_owned()
    }
}

/// Placeholder in a [`Body`] substituted on rendering.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MergeTag {
    /// Client's first name.
    FirstName,

    /// Client's last name.
    LastName,

    /// Client's full name.
    FullName,

    /// Formatted property address.
    Address,

    /// Street line of the property address.
    AddressLine1,

    /// City of the property address.
    AddressCity,

    /// Province of the property address.
    AddressProvince,

    /// File number of the deal.
    FileNumber,

    /// Name of the current stage.
    StageName,

    /// Status of the current stage.
    StageStatus,
}

impl MergeTag {
    /// All the [`MergeTag`]s, in their reference order.
    pub const ALL: [Self; 10] = [
        Self::FirstName,
        Self::LastName,
        Self::FullName,
        Self::Address,
        Self::AddressLine1,
        Self::AddressCity,
        Self::AddressProvince,
        Self::FileNumber,
        Self::StageName,
        Self::StageStatus,
    ];

    /// Returns the key this [`MergeTag`] is written with inside the braces.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "user.first_name",
            Self::LastName => "user.last_name",
            Self::FullName => "user.get_full_name",
            Self::Address => "lead_address",
            Self::AddressLine1 => "lead.address_line1",
            Self::AddressCity => "lead.address_city",
            Self::AddressProvince => "lead.address_province",
            Self::FileNumber => "lead.file_number",
            Self::StageName => "stage_name",
            Self::StageStatus => "stage_status",
        }
    }

    /// Returns the placeholder of this [`MergeTag`] as it's written in a
    /// [`Body`].
    #[must_use]
    pub fn placeholder(self) -> String {
        format!("{{{{ {} }}}}", self.key())
    }

    /// Returns the human-readable description of this [`MergeTag`].
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstName => "Client's first name",
            Self::LastName => "Client's last name",
            Self::FullName => "Client's full name",
            Self::Address => "Formatted address string",
            Self::AddressLine1 => "Address line 1",
            Self::AddressCity => "City",
            Self::AddressProvince => "Province",
            Self::FileNumber => "File number",
            Self::StageName => "Stage template name",
            Self::StageStatus => "Current stage status",
        }
    }

    /// Looks up the [`MergeTag`] written with the provided `key`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Returns the value this [`MergeTag`] is substituted with.
    fn value<'a>(
        self,
        deal: &'a Deal,
        stage: Option<&'a Milestone>,
    ) -> Cow<'a, str> {
        let address = &deal.property_address;
        match self {
            Self::FirstName => Cow::Borrowed(deal.client.first_name.as_ref()),
            Self::LastName => Cow::Borrowed(deal.client.last_name.as_ref()),
            Self::FullName => Cow::Owned(deal.client.full_name()),
            Self::Address => Cow::Owned(address.to_string()),
            Self::AddressLine1 => Cow::Borrowed(address.street.as_ref()),
            Self::AddressCity => Cow::Borrowed(address.city.as_ref()),
            Self::AddressProvince => Cow::Borrowed(address.province.as_ref()),
            Self::FileNumber => Cow::Borrowed(deal.file_number.as_ref()),
            Self::StageName => {
                Cow::Borrowed(stage.map_or("", |s| s.title.as_ref()))
            }
            Self::StageStatus => Cow::Borrowed(stage.map_or("", |s| {
                match s.status {
                    milestone::Status::Unset => "",
                    milestone::Status::Pending => "Pending",
                    milestone::Status::InProgress => "In Progress",
                    milestone::Status::Completed => "Completed",
                }
            })),
        }
    }
}

/// [`DateTime`] when an [`EmailTemplate`] was created.
pub type CreationDateTime = DateTimeOf<(EmailTemplate, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::deal::{milestone, task::Title, Milestone},
        fixture,
    };

    use super::{Body, EmailTemplate, Id, MergeTag, Name};

    fn template(body: &str) -> EmailTemplate {
        EmailTemplate {
            id: Id::new(),
            name: Name::new("Test").unwrap(),
            body: Body::new(body).unwrap(),
            is_active: true,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn renders_client_and_address_tags() {
        let deal = &fixture::deals()[0];
        let rendered = template(
            "Hi {{ user.first_name }}, file {{lead.file_number}} for \
             {{ lead.address_line1 }} in {{  lead.address_city  }}.",
        )
        .render(deal, None);

        assert_eq!(
            rendered,
            format!(
                "Hi {}, file {} for {} in {}.",
                deal.client.first_name,
                deal.file_number,
                deal.property_address.street,
                deal.property_address.city,
            ),
        );
    }

    #[test]
    fn renders_stage_tags() {
        let deal = &fixture::deals()[0];
        let mut stage =
            Milestone::new(Title::new("Title Search").unwrap(), None);
        stage.set_status(
            milestone::Status::InProgress,
            DateTime::now().coerce(),
        );

        let body = template("{{ stage_name }}: {{ stage_status }}");

        assert_eq!(body.render(deal, Some(&stage)), "Title Search: In Progress");
        assert_eq!(body.render(deal, None), ": ");
    }

    #[test]
    fn keeps_unknown_tags() {
        let deal = &fixture::deals()[0];

        assert_eq!(
            template("{{ unknown.tag }} and {{user.last_name}}")
                .render(deal, None),
            format!("{{{{ unknown.tag }}}} and {}", deal.client.last_name),
        );
    }

    #[test]
    fn lists_placeholders() {
        assert_eq!(MergeTag::ALL.len(), 10);
        assert_eq!(MergeTag::FirstName.placeholder(), "{{ user.first_name }}");
        assert_eq!(
            MergeTag::from_key("user.get_full_name"),
            Some(MergeTag::FullName),
        );
        assert_eq!(MergeTag::from_key("lead.address_postal"), None);
    }
}

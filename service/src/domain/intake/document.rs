//! [`CorporateDocument`] definitions.

use derive_more::{Display, Error, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::Intake;

/// Legal document of a corporate client collected by an [`Intake`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CorporateDocument {
    /// ID of this [`CorporateDocument`].
    pub id: Id,

    /// [`Type`] of this [`CorporateDocument`].
    pub kind: Type,

    /// Label of this [`CorporateDocument`] when its [`Type`] is
    /// [`Type::Other`].
    pub custom_type: Option<String>,

    /// [`Attachment`] of this [`CorporateDocument`], if uploaded already.
    pub file: Option<Attachment>,
}

impl CorporateDocument {
    /// Creates a new empty [`CorporateDocument`] of the default [`Type`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Id::new(),
            kind: Type::default(),
            custom_type: None,
            file: None,
        }
    }

    /// Applies the provided [`Patch`] to this [`CorporateDocument`].
    pub fn apply(&mut self, patch: Patch) {
        let Patch {
            kind,
            custom_type,
            file,
        } = patch;

        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(custom) = custom_type {
            self.custom_type = Some(custom);
        }
        if let Some(file) = file {
            self.file = Some(file);
        }
    }

    /// Returns the human-readable label of this [`CorporateDocument`].
    #[must_use]
    pub fn label(&self) -> &str {
        match (self.kind, self.custom_type.as_deref()) {
            (Type::Other, Some(custom)) if !custom.trim().is_empty() => {
                custom.trim()
            }
            (kind, _) => kind.title(),
        }
    }
}

impl Default for CorporateDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// ID of a [`CorporateDocument`].
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
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Type of a [`CorporateDocument`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Type {
    /// Article of Incorporation.
    #[default]
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

impl Type {
    /// Returns the human-readable title of this [`Type`].
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ArticleOfIncorporation => "Article of Incorporation",
            Self::CorporationProfile => "Corporation Profile",
            Self::SpecialShareholderAgreement => {
                "Special Shareholder Agreement"
            }
            Self::DirectorsResolution => "Directors Resolution",
            Self::Other => "Other",
        }
    }
}

/// Partial update of a [`CorporateDocument`].
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New [`Type`], if changed.
    pub kind: Option<Type>,

    /// New custom label, if changed.
    pub custom_type: Option<String>,

    /// New [`Attachment`], if uploaded.
    pub file: Option<Attachment>,
}

/// Uploaded file of a [`CorporateDocument`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attachment {
    /// Name of the uploaded file.
    pub file_name: String,

    /// Size of the uploaded file in bytes.
    pub size: u64,
}

impl Attachment {
    /// MIME type every [`Attachment`] must have.
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    /// Maximum size of an [`Attachment`] in bytes.
    pub const MAX_SIZE: u64 = 10 * 1024 * 1024;

    /// Creates a new [`Attachment`] if the uploaded file is a PDF document
    /// of an acceptable size.
    ///
    /// # Errors
    ///
    /// - [`AttachmentError::NotPdf`] if the `content_type` isn't a PDF one.
    /// - [`AttachmentError::TooLarge`] if the `size` exceeds
    ///   [`Attachment::MAX_SIZE`].
    pub fn new(
        file_name: impl Into<String>,
        content_type: &str,
        size: u64,
    ) -> Result<Self, AttachmentError> {
        if !content_type.trim().eq_ignore_ascii_case(Self::CONTENT_TYPE) {
            return Err(AttachmentError::NotPdf);
        }
        if size > Self::MAX_SIZE {
            return Err(AttachmentError::TooLarge);
        }
        Ok(Self {
            file_name: file_name.into(),
            size,
        })
    }
}

/// Error of creating a new [`Attachment`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum AttachmentError {
    /// Uploaded file is not a PDF document.
    #[display("Please upload PDF files only.")]
    NotPdf,

    /// Uploaded file is too large.
    #[display("Each file size must not exceed 10MB.")]
    TooLarge,
}

#[cfg(test)]
mod spec {
    use super::{
        Attachment, AttachmentError, CorporateDocument, Patch, Type,
    };

    #[test]
    fn accepts_pdf_only() {
        assert!(Attachment::new("articles.pdf", "application/pdf", 1024).is_ok());
        assert_eq!(
            Attachment::new("articles.docx", "application/msword", 1024),
            Err(AttachmentError::NotPdf),
        );
        assert_eq!(
            Attachment::new(
                "huge.pdf",
                "application/pdf",
                Attachment::MAX_SIZE + 1,
            ),
            Err(AttachmentError::TooLarge),
        );
    }

    #[test]
    fn labels_custom_type() {
        let mut doc = CorporateDocument::new();
        assert_eq!(doc.label(), "Article of Incorporation");

        doc.apply(Patch {
            kind: Some(Type::Other),
            custom_type: Some("Partnership Agreement".into()),
            file: None,
        });
        assert_eq!(doc.label(), "Partnership Agreement");

        doc.apply(Patch {
            kind: Some(Type::DirectorsResolution),
            ..Patch::default()
        });
        assert_eq!(doc.label(), "Directors Resolution");
    }
}

//! [`Workflow`] definitions.

use common::define_kind;

use crate::domain::deal::{self, task, Milestone};

/// Ordered list of stages a [`deal::Kind`] goes through.
#[derive(Clone, Copy, Debug)]
pub struct Workflow {
    /// [`deal::Kind`] this [`Workflow`] is defined for.
    pub kind: deal::Kind,

    /// Human-readable title of this [`Workflow`].
    pub title: &'static str,

    /// [`Stage`]s of this [`Workflow`].
    pub stages: &'static [Stage],
}

impl Workflow {
    /// All the [`Workflow`]s, one per [`deal::Kind`].
    pub const ALL: [Self; 3] = [
        Self {
            kind: deal::Kind::Purchase,
            title: "Purchase Template",
            stages: PURCHASE,
        },
        Self {
            kind: deal::Kind::Sale,
            title: "Sale Template",
            stages: SALE,
        },
        Self {
            kind: deal::Kind::Refinance,
            title: "Refinance Template",
            stages: REFINANCE,
        },
    ];

    /// Returns the [`Workflow`] of the provided [`deal::Kind`].
    #[must_use]
    pub const fn of(kind: deal::Kind) -> Self {
        match kind {
            deal::Kind::Purchase => Self::ALL[0],
            deal::Kind::Sale => Self::ALL[1],
            deal::Kind::Refinance => Self::ALL[2],
        }
    }

    /// Returns the [`Stage`]s of this [`Workflow`] performed by the provided
    /// [`Role`], in their order.
    pub fn stages_of(self, role: Role) -> impl Iterator<Item = &'static Stage> {
        let mut stages = self
            .stages
            .iter()
            .filter(move |s| s.role == role)
            .collect::<Vec<_>>();
        stages.sort_by_key(|s| s.order);
        stages.into_iter()
    }
}

/// Single stage of a [`Workflow`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stage {
    /// Position of this [`Stage`] among the ones of the same [`Role`].
    pub order: u16,

    /// Name of this [`Stage`].
    pub name: &'static str,

    /// [`Role`] performing this [`Stage`].
    pub role: Role,

    /// Name of the email template notifying the client once this [`Stage`]
    /// is completed, if any.
    pub email_template: Option<&'static str>,

    /// Indicator whether this [`Stage`] is shared with the client.
    pub is_shared: bool,
}

impl Stage {
    /// Creates a new [`Stage`] performed by the [`Role::Client`].
    const fn client(
        order: u16,
        name: &'static str,
        email_template: Option<&'static str>,
        is_shared: bool,
    ) -> Self {
        Self {
            order,
            name,
            role: Role::Client,
            email_template,
            is_shared,
        }
    }

    /// Creates a new [`Milestone`] tracking this [`Stage`] on a [`Deal`].
    ///
    /// [`Deal`]: crate::domain::Deal
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn milestone(&self) -> Milestone {
        Milestone::new(
            task::Title::new(self.name).expect("`Stage` name is valid"),
            self.email_template.map(ToOwned::to_owned),
        )
    }

    /// Creates a new [`Stage`] performed by the [`Role::Lender`].
    const fn lender(order: u16, name: &'static str) -> Self {
        Self {
            order,
            name,
            role: Role::Lender,
            email_template: None,
            is_shared: false,
        }
    }
}

define_kind! {
    #[doc = "Party performing a [`Stage`] or a checklist item."]
    enum Role {
        #[doc = "Client of the firm."]
        Client = 1,

        #[doc = "Mortgage lender."]
        Lender = 2,
    }
}

/// [`Stage`]s of a [`deal::Kind::Purchase`].
const PURCHASE: &[Stage] = &[
    Stage::client(1, "Agreement of Purchase and Sale", None, true),
    Stage::client(
        2,
        "Initial Call",
        Some("Initial Intake Completed Email"),
        true,
    ),
    Stage::client(3, "Personal Information", None, false),
    Stage::client(4, "Identification", None, false),
    Stage::client(5, "Title Search", Some("Title Search Completed Email"), true),
    Stage::client(
        6,
        "Financing Firm → Mortgage Instructions",
        Some("Financing Firm → Mortgage Instructions Completed Email"),
        true,
    ),
    Stage::client(
        7,
        "Aligned with Seller → Closing Date Coordination",
        Some("Aligned with Seller → Closing Date Coordination Completed Email"),
        true,
    ),
    Stage::client(
        8,
        "Financial Info Confirmed → Mortgage Details Confirmed",
        Some(
            "Financial Info Confirmed → Mortgage Details Confirmed Email \
             Completed",
        ),
        true,
    ),
    Stage::client(9, "Home Insurance", None, false),
    Stage::client(10, "Appointment Scheduled", None, false),
    Stage::client(11, "Documents Signed", None, false),
    Stage::client(12, "Funds received", None, false),
    Stage::client(
        14,
        "Transaction Completed",
        Some("Transaction Completed Email"),
        true,
    ),
    Stage::client(15, "Final Report Received", None, false),
];

/// [`Stage`]s of a [`deal::Kind::Sale`].
const SALE: &[Stage] = &[
    Stage::client(1, "Agreement of Purchase and Sale", None, true),
    Stage::client(2, "Initial Call & Email", None, true),
    Stage::client(
        3,
        "Financial Info Confirmed & Preparation of Documents",
        None,
        true,
    ),
    Stage::client(4, "Documents Signing", None, true),
    Stage::client(5, "Funds Received", None, true),
    Stage::client(6, "Transaction Completed", None, false),
];

/// [`Stage`]s of a [`deal::Kind::Refinance`].
const REFINANCE: &[Stage] = &[
    Stage::client(
        1,
        "Financing -> Mortgage Instructions & Review of Mortgage Terms",
        None,
        false,
    ),
    Stage::client(2, "Title Search", None, false),
    Stage::client(3, "Initial Call & Intake Email", None, false),
    Stage::client(
        4,
        "Review of Documents provided by you & Follow up for any \
         outstanding documents",
        None,
        false,
    ),
    Stage::client(5, "Documents Signed -> Signing Documents", None, false),
    Stage::client(
        6,
        "Review/Upload Documents to the Lender to obtain file complete",
        None,
        false,
    ),
    Stage::client(
        7,
        "Financial Info Confirmed -> Mortgage Details Confirmed",
        None,
        false,
    ),
    Stage::client(8, "Closing Day", None, false),
    Stage::client(9, "Final Report", None, false),
    Stage::lender(1, "Mortgage Instructions Initiated"),
    Stage::lender(2, "Borrowers Documents Requested"),
    Stage::lender(3, "Review of Borrowers Stage 1 Documents"),
    Stage::lender(4, "Signing Documents Sent to Borrowers Lawyer"),
    Stage::lender(5, "Stage 2 Documents Received and Verified"),
    Stage::lender(6, "Funds Release by the Lender"),
    Stage::lender(7, "Deal completed (Funding For refinance)"),
    Stage::lender(8, "Deal completed (Funding For Refinance)"),
];

#[cfg(test)]
mod spec {
    use crate::domain::deal;

    use super::{Role, Workflow};

    #[test]
    fn defines_workflow_per_kind() {
        for kind in deal::Kind::ALL {
            assert_eq!(Workflow::of(*kind).kind, *kind);
        }
        assert_eq!(Workflow::of(deal::Kind::Purchase).stages.len(), 14);
        assert_eq!(Workflow::of(deal::Kind::Sale).stages.len(), 6);
        assert_eq!(Workflow::of(deal::Kind::Refinance).stages.len(), 17);
    }

    #[test]
    fn splits_stages_by_role() {
        let refinance = Workflow::of(deal::Kind::Refinance);

        let client = refinance.stages_of(Role::Client).collect::<Vec<_>>();
        let lender = refinance.stages_of(Role::Lender).collect::<Vec<_>>();

        assert_eq!(client.len(), 9);
        assert_eq!(lender.len(), 8);
        assert_eq!(lender[0].name, "Mortgage Instructions Initiated");
        assert!(client.windows(2).all(|w| w[0].order < w[1].order));
    }
}

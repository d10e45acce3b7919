//! Mock dataset the [`SeedFixtures`] command loads into an empty store.
//!
//! [`SeedFixtures`]: crate::command::SeedFixtures

use common::{Date, DateTime, Money, Percent};
use rust_decimal::Decimal;

use crate::domain::{
    contact,
    deal::{self, milestone, task, Document},
    email_template, lead, Deal, EmailTemplate, Lead,
};

/// Seconds in a day.
const DAY: i64 = 86_400;

/// Unix timestamp the most recent [`deals()`] were created at
/// (2026-01-05T15:00:00Z).
const DEALS_CREATED_AT: i64 = 1_767_625_200;

/// Unix timestamp the [`email_templates()`] were created around
/// (2025-11-12T14:00:00Z).
const TEMPLATES_CREATED_AT: i64 = 1_762_956_000;

/// Unix timestamp the [`leads()`] were created at (2025-11-20T10:00:00Z).
const LEADS_CREATED_AT: i64 = 1_763_632_800;

/// Returns the [`DateTime`] of the provided Unix `timestamp`.
///
/// [`DateTime`]: common::DateTime
fn at<Of: ?Sized>(timestamp: i64) -> common::DateTimeOf<Of> {
    DateTime::from_unix_timestamp(timestamp)
        .expect("valid timestamp")
        .coerce()
}

/// Returns the [`Date`] of the provided `year`, `month` and `day`.
fn date(year: i32, month: u8, day: u8) -> Date {
    Date::from_ymd(year, month, day).expect("valid date")
}

/// Returns the [`deal::AddressPart`] of the provided `text`.
fn part(text: &str) -> deal::AddressPart {
    deal::AddressPart::new(text).expect("valid address part")
}

/// Seed of a single mock [`Deal`].
struct DealSeed {
    serial: u32,
    kind: deal::Kind,
    status: deal::Status,
    client: (&'static str, &'static str, &'static str, &'static str),
    address: (&'static str, Option<&'static str>, &'static str, &'static str),
    closing: (i32, u8, u8),
    price: i64,
    completed_tasks: usize,
    completed_milestones: usize,
}

impl DealSeed {
    /// Grows this [`DealSeed`] into a [`Deal`] created `age` days before the
    /// most recent one.
    fn grow(self, age: i64) -> Deal {
        let Self {
            serial,
            kind,
            status,
            client: (first_name, last_name, email, phone),
            address: (street, unit, city, postal_code),
            closing: (year, month, day),
            price,
            completed_tasks,
            completed_milestones,
        } = self;

        let created_at = at::<()>(DEALS_CREATED_AT - age * DAY);
        let opening_date = Date::of(created_at);
        let closing_date = date(year, month, day);

        let mut deal = Deal {
            id: deal::Id::new(),
            file_number: deal::FileNumber::compose(
                opening_date.year(),
                kind,
                serial.into(),
            ),
            client: deal::Client {
                first_name: contact::Name::new(first_name).expect("valid name"),
                last_name: contact::Name::new(last_name).expect("valid name"),
                email: contact::Email::new(email).expect("valid email"),
                phone: contact::Phone::new(phone),
                corporation: None,
            },
            kind,
            status,
            property_address: deal::Address {
                street: part(street),
                unit: unit.map(part),
                city: part(city),
                province: part("ON"),
                postal_code: Some(part(postal_code)),
            },
            closing_date: Some(closing_date),
            opening_date: Some(opening_date),
            requisition_date: Some(closing_date.add_days(-14)),
            price: Money::cad(Decimal::from(price)),
            progress: Percent::ZERO,
            tasks: vec![],
            milestones: vec![],
            documents: vec![],
            notes: vec![],
            created_at: created_at.coerce(),
        };
        deal.seed_checklist(opening_date);

        let completed_at = created_at.coerce();
        for t in deal.tasks.iter_mut().take(completed_tasks) {
            t.set_status(task::Status::Completed, completed_at);
        }
        if let Some(t) = deal.tasks.get_mut(completed_tasks) {
            t.set_status(task::Status::InProgress, completed_at);
        }
        for m in deal.milestones.iter_mut().take(completed_milestones) {
            m.set_status(milestone::Status::Completed, completed_at.coerce());
        }
        if let Some(m) = deal.milestones.get_mut(completed_milestones) {
            m.set_status(milestone::Status::InProgress, completed_at.coerce());
        }
        if deal.tasks.is_empty() {
            let stages = deal.milestones.len().max(1);
            deal.progress = Percent::of(completed_milestones.min(stages), stages);
        } else {
            deal.recalculate_progress();
        }
        deal
    }
}

/// Returns the mock [`Deal`]s, the most recently created first.
#[must_use]
pub fn deals() -> Vec<Deal> {
    use deal::{Kind as K, Status as S};

    let seeds = [
        DealSeed {
            serial: 59,
            kind: K::Purchase,
            status: S::Active,
            client: ("Olivia", "Bennett", "olivia.bennett@gmail.com", "416-555-0148"),
            address: ("88 Harbour St", Some("1203"), "Toronto", "M5J 0C3"),
            closing: (2026, 2, 27),
            price: 849_000,
            completed_tasks: 2,
            completed_milestones: 4,
        },
        DealSeed {
            serial: 60,
            kind: K::Sale,
            status: S::Pending,
            client: ("Marcus", "Chen", "marcus.chen@outlook.com", "905-555-0190"),
            address: ("42 Lakeshore Rd E", None, "Mississauga", "L5G 1C9"),
            closing: (2026, 3, 13),
            price: 1_275_000,
            completed_tasks: 0,
            completed_milestones: 2,
        },
        DealSeed {
            serial: 61,
            kind: K::Refinance,
            status: S::Active,
            client: ("Amara", "Okafor", "amara.okafor@yahoo.ca", "647-555-0112"),
            address: ("17 Maple Ave", None, "Toronto", "M4W 2T6"),
            closing: (2026, 2, 16),
            price: 610_000,
            completed_tasks: 0,
            completed_milestones: 3,
        },
        DealSeed {
            serial: 62,
            kind: K::Purchase,
            status: S::Urgent,
            client: ("Daniel", "Kowalski", "dkowalski@gmail.com", "289-555-0177"),
            address: ("315 King St W", None, "Hamilton", "L8P 1B1"),
            closing: (2026, 1, 30),
            price: 529_900,
            completed_tasks: 4,
            completed_milestones: 8,
        },
        DealSeed {
            serial: 63,
            kind: K::Sale,
            status: S::Closed,
            client: ("Sofia", "Russo", "sofia.russo@rogers.com", "905-555-0133"),
            address: ("9 Birch Cres", None, "Oakville", "L6J 3Z4"),
            closing: (2026, 1, 9),
            price: 1_640_000,
            completed_tasks: 0,
            completed_milestones: 6,
        },
        DealSeed {
            serial: 64,
            kind: K::Purchase,
            status: S::Pending,
            client: ("Ethan", "Wright", "ethan.wright@icloud.com", "416-555-0165"),
            address: ("221 Queen St E", Some("406"), "Toronto", "M5A 1S2"),
            closing: (2026, 3, 31),
            price: 715_500,
            completed_tasks: 1,
            completed_milestones: 2,
        },
        DealSeed {
            serial: 65,
            kind: K::Refinance,
            status: S::Active,
            client: ("Hannah", "Lee", "hannah.lee@gmail.com", "647-555-0129"),
            address: ("60 Bloor St W", Some("1810"), "Toronto", "M4W 3B8"),
            closing: (2026, 2, 6),
            price: 455_000,
            completed_tasks: 0,
            completed_milestones: 1,
        },
        DealSeed {
            serial: 66,
            kind: K::Purchase,
            status: S::Active,
            client: ("Rajiv", "Patel", "rajiv.patel@hotmail.com", "905-555-0104"),
            address: ("5 Elm Dr", None, "Brampton", "L6T 1A1"),
            closing: (2026, 2, 20),
            price: 989_000,
            completed_tasks: 3,
            completed_milestones: 5,
        },
        DealSeed {
            serial: 67,
            kind: K::Sale,
            status: S::Urgent,
            client: ("Grace", "Thompson", "grace.t@bell.net", "905-555-0186"),
            address: ("780 Main St", None, "Milton", "L9T 3P9"),
            closing: (2026, 1, 23),
            price: 899_900,
            completed_tasks: 0,
            completed_milestones: 4,
        },
    ];

    let mut deals = seeds
        .into_iter()
        .zip(0..)
        .map(|(seed, age)| seed.grow(age * 3))
        .collect::<Vec<_>>();

    let first = &mut deals[0];
    first.documents.push(Document {
        id: deal::document::Id::new(),
        name: deal::document::Name::new("APS_Signed.pdf")
            .expect("valid name"),
        label: deal::document::Name::new("Agreement of Purchase and Sale")
            .expect("valid name"),
        status: deal::document::Status::Signed,
        uploaded_at: first.created_at.coerce(),
    });
    first.tasks[0].document = Some(task::LinkedDocument {
        name: "APS_Signed.pdf".into(),
        url: "/documents/aps-signed.pdf".into(),
    });
    first.tasks[0].assignee = task::Assignee::new("Nava Wilson");
    first.notes.extend(deal::Note::new(
        "Client prefers email over phone calls.",
    ));

    deals
}

/// Returns the mock [`Lead`]s, the most recently created first.
#[must_use]
pub fn leads() -> Vec<Lead> {
    let detail = |text: &str| contact::Detail::new(text);

    vec![
        Lead {
            id: lead::Id::new(),
            first_name: contact::Name::new("Varnesh").expect("valid name"),
            last_name: contact::Name::new("Vasudevan").expect("valid name"),
            email: contact::Email::new("varnesh@prcoach.ca")
                .expect("valid email"),
            phone: contact::Phone::new("4165408632"),
            corporation: None,
            address: Some(lead::Address {
                street: part("10 Milner Business Court"),
                city: Some(part("Toronto")),
                postal_code: Some(part("M1B 3C6")),
            }),
            profile: lead::Profile {
                property_type: detail("Primary"),
                ownership_history: detail("No (first time)"),
                marital_status: detail("Single"),
                citizenship_status: detail("Canadian Citizen"),
                occupation: detail("Engineer"),
                employer_phone: contact::Phone::new("6479977278"),
            },
            created_at: at(LEADS_CREATED_AT + DAY),
        },
        Lead {
            id: lead::Id::new(),
            first_name: contact::Name::new("Sarah").expect("valid name"),
            last_name: contact::Name::new("Miller").expect("valid name"),
            email: contact::Email::new("sarah@miller-assets.com")
                .expect("valid email"),
            phone: contact::Phone::new("905-555-0122"),
            corporation: Some(contact::Corporation {
                name: contact::Detail::new("Miller Asset Management Inc.")
                    .expect("valid name"),
                incorporation_number: detail("10029384"),
                jurisdiction: detail("Ontario"),
            }),
            address: Some(lead::Address {
                street: part("456 Corporate Way"),
                city: Some(part("Mississauga")),
                postal_code: Some(part("L5B 2K3")),
            }),
            profile: lead::Profile::default(),
            created_at: at(LEADS_CREATED_AT),
        },
    ]
}

/// Returns the mock [`EmailTemplate`]s, in their creation order.
#[must_use]
pub fn email_templates() -> Vec<EmailTemplate> {
    let minutes = |m: i64| TEMPLATES_CREATED_AT + m * 60;

    [
        (
            "Initial Intake Completed Email",
            "Hi {{ user.first_name }},\n\n\
             Thank you for choosing us for your transaction at \
             {{ lead_address }}. Your file number is {{ lead.file_number }}. \
             We have completed your initial intake and will be in touch \
             with the next steps shortly.",
            minutes(0),
        ),
        (
            "Title Search Completed Email",
            "Hi {{ user.first_name }},\n\n\
             We have completed the title search for \
             {{ lead.address_line1 }}, {{ lead.address_city }}. \
             No issues requiring your attention were found.",
            minutes(3),
        ),
        (
            "Financing Firm -> Mortgage Instructions Completed Email",
            "Hi {{ user.first_name }},\n\n\
             We have received the mortgage instructions from your lender \
             for file {{ lead.file_number }}.",
            minutes(7),
        ),
        (
            "Aligned with Seller -> Closing Date Coordination Completed Email",
            "Hi {{ user.get_full_name }},\n\n\
             We have coordinated the closing date with the other side. \
             Current stage: {{ stage_name }} ({{ stage_status }}).",
            minutes(11),
        ),
        (
            "Financial Info Confirmed -> Mortgage Details Confirmed Email \
             Completed",
            "Hi {{ user.first_name }},\n\n\
             Your mortgage details for {{ lead_address }} are confirmed.",
            minutes(13),
        ),
        (
            "Transaction Completed Email",
            "Hi {{ user.first_name }},\n\n\
             Congratulations! The transaction for {{ lead_address }} in \
             {{ lead.address_province }} is complete.",
            minutes(15),
        ),
    ]
    .into_iter()
    .map(|(name, body, created_at)| EmailTemplate {
        id: email_template::Id::new(),
        name: email_template::Name::new(name).expect("valid name"),
        body: email_template::Body::new(body).expect("valid body"),
        is_active: true,
        created_at: at(created_at),
    })
    .collect()
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use rust_decimal::Decimal;

    use crate::domain::deal;

    use super::{deals, email_templates, leads};

    #[test]
    fn deals_have_unique_file_numbers() {
        let deals = deals();

        let numbers = deals
            .iter()
            .map(|d| d.file_number.to_string())
            .collect::<HashSet<_>>();

        assert_eq!(numbers.len(), deals.len());
        assert_eq!(deals[0].file_number.to_string(), "26P-0059");
        assert!(deals.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[test]
    fn purchases_carry_seeded_tasks() {
        let deals = deals();

        let first = &deals[0];
        assert_eq!(first.tasks.len(), 6);
        assert_eq!(first.completed_tasks().count(), 2);
        assert_eq!(first.progress.value(), Decimal::from(33));
        assert!(deals
            .iter()
            .filter(|d| d.kind != deal::Kind::Purchase)
            .all(|d| d.tasks.is_empty()));
    }

    #[test]
    fn leads_and_templates_are_seeded() {
        assert_eq!(leads().len(), 2);
        assert_eq!(email_templates().len(), 6);
        assert!(email_templates().iter().all(|t| t.is_active));
    }
}

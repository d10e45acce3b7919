//! Client email [`Prompt`] definitions.

use std::fmt::Write as _;

use derive_more::{AsRef, Display};
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::domain::Deal;

/// Law firm the drafted emails are written on behalf of.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Firm {
    /// Name of the law firm.
    #[default("Nava Wilson".into())]
    pub name: String,

    /// Division of the law firm handling the closings.
    #[default("iClosed".into())]
    pub division: String,

    /// Signature the drafted emails are signed off with.
    #[default("The iClosed Team".into())]
    pub sign_off: String,
}

/// Instruction used when none is provided.
pub const DEFAULT_INSTRUCTION: &str = "Provide a general status update.";

/// Text generation prompt asking for a client status email.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Prompt(String);

impl Prompt {
    /// Composes a new [`Prompt`] for the provided [`Deal`].
    ///
    /// Blank `instruction` falls back to the [`DEFAULT_INSTRUCTION`].
    #[must_use]
    pub fn compose(firm: &Firm, deal: &Deal, instruction: Option<&str>) -> Self {
        let titles = |completed: bool| {
            let titles = deal
                .tasks
                .iter()
                .filter(|t| t.completed == completed)
                .map(|t| t.title.to_string())
                .collect::<Vec<_>>();
            if titles.is_empty() {
                "None".to_owned()
            } else {
                titles.join(", ")
            }
        };
        let instruction = instruction
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_INSTRUCTION);
        let closing = deal
            .closing_date
            .map_or_else(|| "Not scheduled".to_owned(), |d| d.to_string());

        let mut prompt = String::new();
        _ = writeln!(
            prompt,
            "You are a professional legal assistant at the law firm \"{}\", \
             specifically the \"{}\" division.",
            firm.name, firm.division,
        );
        _ = writeln!(
            prompt,
            "Write a polite, professional, and concise email to the client \
             named {} {}.",
            deal.client.first_name, deal.client.last_name,
        );
        _ = writeln!(prompt);
        _ = writeln!(prompt, "Context:");
        _ = writeln!(
            prompt,
            "- Transaction: {} of {}.",
            deal.kind.title(),
            deal.property_address,
        );
        _ = writeln!(prompt, "- Closing Date: {closing}.");
        _ = writeln!(prompt, "- Current Progress: {}%.", deal.progress);
        _ = writeln!(prompt, "- Completed Tasks: {}.", titles(true));
        _ = writeln!(prompt, "- Outstanding Tasks: {}.", titles(false));
        _ = writeln!(prompt);
        _ = writeln!(prompt, "Instruction:");
        _ = writeln!(prompt, "{instruction}");
        _ = writeln!(prompt);
        _ = writeln!(
            prompt,
            "Do not include a subject line unless asked. Just the body.",
        );
        _ = write!(prompt, "Sign off as \"{}\".", firm.sign_off);

        Self(prompt)
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Percent};

    use crate::{
        domain::deal::{task, Task},
        fixture,
    };

    use super::{Firm, Prompt, DEFAULT_INSTRUCTION};

    #[test]
    fn embeds_deal_context() {
        let mut deal = fixture::deals().remove(0);
        deal.tasks = vec![
            Task::new(task::Title::new("Upload APS").unwrap(), None),
            Task::new(task::Title::new("Upload ID").unwrap(), None),
        ];
        deal.tasks[0]
            .set_status(task::Status::Completed, DateTime::now().coerce());
        deal.progress = Percent::of(1, 2);

        let prompt = Prompt::compose(&Firm::default(), &deal, None).to_string();

        assert!(prompt.starts_with(
            "You are a professional legal assistant at the law firm \
             \"Nava Wilson\", specifically the \"iClosed\" division.\n",
        ));
        assert!(prompt.contains(&format!(
            "to the client named {} {}.",
            deal.client.first_name, deal.client.last_name,
        )));
        assert!(prompt.contains(&format!(
            "- Transaction: {} of {}.",
            deal.kind.title(),
            deal.property_address,
        )));
        assert!(prompt.contains("- Current Progress: 50%."));
        assert!(prompt.contains("- Completed Tasks: Upload APS."));
        assert!(prompt.contains("- Outstanding Tasks: Upload ID."));
        assert!(prompt.contains(&format!("Instruction:\n{DEFAULT_INSTRUCTION}\n")));
        assert!(prompt.ends_with("Sign off as \"The iClosed Team\"."));
    }

    #[test]
    fn lists_none_without_tasks() {
        let mut deal = fixture::deals().remove(0);
        deal.tasks.clear();

        let prompt = Prompt::compose(
            &Firm::default(),
            &deal,
            Some("Ask for the insurance policy."),
        )
        .to_string();

        assert!(prompt.contains("- Completed Tasks: None."));
        assert!(prompt.contains("- Outstanding Tasks: None."));
        assert!(prompt.contains("Instruction:\nAsk for the insurance policy.\n"));
    }

    #[test]
    fn blank_instruction_falls_back() {
        let deal = fixture::deals().remove(0);

        let prompt =
            Prompt::compose(&Firm::default(), &deal, Some("   ")).to_string();

        assert!(prompt.contains(DEFAULT_INSTRUCTION));
    }
}

//! [`Command`] for drafting a status email to a [`Deal`]'s client.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{deal, draft::Prompt, Deal},
    infra::{
        database,
        llm::{self, Generate},
        Database, Llm,
    },
    Service,
};

use super::Command;

/// Draft returned when no [`Llm`] API key is configured.
pub const NOT_CONFIGURED: &str = "Error: API Key not configured.";

/// Draft returned when the [`Llm`] fails to generate a completion.
pub const GENERATION_FAILED: &str =
    "Error generating email. Please try again later.";

/// Draft returned when the [`Llm`] generates nothing.
pub const EMPTY_DRAFT: &str = "Failed to generate email.";

/// [`Command`] for drafting a status email to a [`Deal`]'s client.
///
/// Failures of the text generation are not errors: they're reported right in
/// the draft, so the user may retry.
#[derive(Clone, Debug)]
pub struct DraftClientEmail {
    /// ID of the [`Deal`] to draft the email about.
    pub deal_id: deal::Id,

    /// Instruction on what the email should be about, if any.
    pub instruction: Option<String>,
}

impl<Db, L> Command<DraftClientEmail> for Service<Db, L>
where
    Db: Database<
        Select<By<Option<Deal>, deal::Id>>,
        Ok = Option<Deal>,
        Err = Traced<database::Error>,
    >,
    L: Llm<Generate, Ok = String, Err = Traced<llm::Error>>,
{
    type Ok = String;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DraftClientEmail,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DraftClientEmail {
            deal_id,
            instruction,
        } = cmd;

        let deal = self
            .database()
            .execute(Select(By::<Option<Deal>, _>::new(deal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealNotExists(deal_id))
            .map_err(tracerr::wrap!())?;

        let prompt =
            Prompt::compose(&self.config().firm, &deal, instruction.as_deref());
        let draft = match self.llm().execute(Generate(prompt)).await {
            Ok(text) if text.trim().is_empty() => EMPTY_DRAFT.to_owned(),
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to draft client email: {e}");
                match e.into_inner() {
                    llm::Error::NotConfigured => NOT_CONFIGURED,
                    #[cfg(feature = "gemini")]
                    llm::Error::Gemini(_) => GENERATION_FAILED,
                }
                .to_owned()
            }
        };

        Ok(draft)
    }
}

/// Error of [`DraftClientEmail`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Deal`] doesn't exist.
    #[display("`Deal(id: {_0})` does not exist")]
    #[from(ignore)]
    DealNotExists(#[error(not(source))] deal::Id),
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use common::operations::Insert;
    use tracerr::Traced;

    use crate::{
        domain::deal,
        fixture,
        infra::{
            llm::{self, Generate},
            Database as _, Llm, Memory,
        },
        Command as _, Config, Service,
    };

    use super::{
        DraftClientEmail, ExecutionError, EMPTY_DRAFT, NOT_CONFIGURED,
    };

    /// [`Llm`] replying with a canned completion, and remembering the
    /// prompts it was asked with.
    #[derive(Clone, Debug, Default)]
    struct Stub {
        reply: Option<String>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl Llm<Generate> for Stub {
        type Ok = String;
        type Err = Traced<llm::Error>;

        async fn execute(
            &self,
            Generate(prompt): Generate,
        ) -> Result<Self::Ok, Self::Err> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| tracerr::new!(llm::Error::NotConfigured))
        }
    }

    async fn service(stub: Stub) -> (Service<Memory, Stub>, deal::Id) {
        let deal = fixture::deals().remove(0);
        let db = Memory::new();
        db.execute(Insert(deal.clone())).await.unwrap();
        (Service::new(Config::default(), db, stub), deal.id)
    }

    #[tokio::test]
    async fn returns_generated_draft() {
        let stub = Stub {
            reply: Some("Dear Olivia, ...".into()),
            ..Stub::default()
        };
        let (svc, deal_id) = service(stub.clone()).await;

        let draft = svc
            .execute(DraftClientEmail {
                deal_id,
                instruction: Some("Ask for the void cheque.".into()),
            })
            .await
            .unwrap();

        assert_eq!(draft, "Dear Olivia, ...");
        let prompts = stub.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Ask for the void cheque."));
    }

    #[tokio::test]
    async fn degrades_to_fixed_drafts() {
        let (svc, deal_id) = service(Stub::default()).await;
        let draft = svc
            .execute(DraftClientEmail {
                deal_id,
                instruction: None,
            })
            .await
            .unwrap();
        assert_eq!(draft, NOT_CONFIGURED);

        let blank = Stub {
            reply: Some("  \n".into()),
            ..Stub::default()
        };
        let (svc, deal_id) = service(blank).await;
        let draft = svc
            .execute(DraftClientEmail {
                deal_id,
                instruction: None,
            })
            .await
            .unwrap();
        assert_eq!(draft, EMPTY_DRAFT);
    }

    #[tokio::test]
    async fn rejects_unknown_deal() {
        let (svc, _) = service(Stub::default()).await;

        let err = svc
            .execute(DraftClientEmail {
                deal_id: deal::Id::new(),
                instruction: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::DealNotExists(_),
        ));
    }
}

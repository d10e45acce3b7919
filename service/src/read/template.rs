//! Read models of the static [`Workflow`] and [`TaskTemplate`] libraries.

use crate::domain::{workflow, TaskTemplate, Workflow};

/// Returns the lowercased non-blank search `term`, if any.
fn normalize(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

/// [`Workflow`] with its [`workflow::Stage`]s narrowed by a search.
#[derive(Clone, Debug)]
pub struct WorkflowView {
    /// [`Workflow`] being viewed.
    pub workflow: Workflow,

    /// [`workflow::Stage`]s of the [`Workflow`] matching the search.
    pub stages: Vec<&'static workflow::Stage>,
}

/// Lists all the [`Workflow`]s with their [`workflow::Stage`]s whose name or
/// email template name contains the provided `term`, case-insensitively.
#[must_use]
pub fn workflows(term: Option<&str>) -> Vec<WorkflowView> {
    let term = normalize(term);
    let matches = |stage: &workflow::Stage| {
        term.as_deref().map_or(true, |t| {
            stage.name.to_lowercase().contains(t)
                || stage
                    .email_template
                    .is_some_and(|e| e.to_lowercase().contains(t))
        })
    };
    Workflow::ALL
        .into_iter()
        .map(|workflow| WorkflowView {
            workflow,
            stages: workflow.stages.iter().filter(|s| matches(s)).collect(),
        })
        .collect()
}

/// Lists all the [`TaskTemplate`]s whose name or lead type contains the
/// provided `term`, case-insensitively.
#[must_use]
pub fn task_templates(term: Option<&str>) -> Vec<&'static TaskTemplate> {
    let term = normalize(term);
    TaskTemplate::ALL
        .iter()
        .filter(|t| {
            term.as_deref().map_or(true, |term| {
                t.name.to_lowercase().contains(term)
                    || t.lead_type.title().to_lowercase().contains(term)
            })
        })
        .collect()
}

#[cfg(test)]
mod spec {
    use crate::domain::deal;

    use super::{task_templates, workflows};

    #[test]
    fn searches_stages_by_name_and_email_template() {
        let views = workflows(Some("completed email"));

        let purchase = &views[0];
        assert_eq!(purchase.workflow.kind, deal::Kind::Purchase);
        assert!(!purchase.stages.is_empty());
        assert!(purchase.stages.iter().all(|s| s.email_template.is_some()));

        let views = workflows(Some("title search"));
        assert_eq!(views[0].stages.len(), 1);
        assert_eq!(views[1].stages.len(), 0);
        assert_eq!(views[2].stages.len(), 1);
    }

    #[test]
    fn lists_everything_without_term() {
        let views = workflows(None);

        assert_eq!(views.len(), 3);
        for view in views {
            assert_eq!(view.stages.len(), view.workflow.stages.len());
        }
    }

    #[test]
    fn searches_task_templates_by_name_or_lead_type() {
        assert_eq!(task_templates(Some("purchase")).len(), 6);
        assert_eq!(task_templates(Some("insurance")).len(), 1);
        assert!(task_templates(Some("sale")).iter().all(|t| {
            t.name.to_lowercase().contains("sale")
        }));
        assert_eq!(task_templates(Some("  ")).len(), 6);
    }
}

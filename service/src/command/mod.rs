//! [`Command`] definition.

pub mod create_email_template;
pub mod create_lead;
pub mod draft_client_email;
pub mod open_deal;
pub mod reorder_milestones;
pub mod reorder_tasks;
pub mod seed_fixtures;
pub mod update_milestone_status;
pub mod update_task_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_email_template::CreateEmailTemplate, create_lead::CreateLead,
    draft_client_email::DraftClientEmail, open_deal::OpenDeal,
    reorder_milestones::ReorderMilestones, reorder_tasks::ReorderTasks,
    seed_fixtures::SeedFixtures,
    update_milestone_status::UpdateMilestoneStatus,
    update_task_status::UpdateTaskStatus,
};

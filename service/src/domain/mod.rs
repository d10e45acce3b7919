//! Domain definitions.

pub mod contact;
pub mod deal;
pub mod draft;
pub mod email_template;
pub mod intake;
pub mod lead;
pub mod task_template;
pub mod workflow;

pub use self::{
    deal::Deal, email_template::EmailTemplate, intake::Intake, lead::Lead,
    task_template::TaskTemplate, workflow::Workflow,
};

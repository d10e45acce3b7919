//! Read entities definitions.

pub mod deal;
pub mod email_template;
pub mod lead;
pub mod template;

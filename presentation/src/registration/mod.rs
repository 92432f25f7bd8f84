//! Interactive registration form.

pub mod page;
pub mod prompter;

pub use page::{GatewayFactory, RegistrationPage};
pub use prompter::{FormPrompter, PromptStep};

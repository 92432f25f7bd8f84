//! Registration page: renders controller events and feeds it user input.

use super::prompter::{FormPrompter, PromptStep};
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use signup_application::{
    AuditLog, NoAuditLog, Notice, RegistrationController, RegistrationGateway, RegistrationHandle,
    RegistrationSettings, UiEvent,
};
use signup_domain::{RegistrationForm, RegistrationState};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Builds a gateway from a URL typed in at the setup prompt.
pub type GatewayFactory =
    Arc<dyn Fn(&str) -> Result<Arc<dyn RegistrationGateway>, String> + Send + Sync>;

/// What the next input line is for.
enum Awaiting {
    Nothing,
    WebhookUrl,
    Field(FormPrompter),
    Retry(RegistrationForm),
    /// Form sent; kept in case validation sends it back
    Pending(RegistrationForm),
}

impl Awaiting {
    fn wants_input(&self) -> bool {
        matches!(
            self,
            Awaiting::WebhookUrl | Awaiting::Field(_) | Awaiting::Retry(_)
        )
    }
}

/// Interactive registration page.
pub struct RegistrationPage<W: Write> {
    settings: RegistrationSettings,
    gateway: Option<Arc<dyn RegistrationGateway>>,
    factory: GatewayFactory,
    audit: Arc<dyn AuditLog>,
    cancellation: CancellationToken,
    out: W,
}

impl<W: Write> RegistrationPage<W> {
    pub fn new(settings: RegistrationSettings, factory: GatewayFactory, out: W) -> Self {
        Self {
            settings,
            gateway: None,
            factory,
            audit: Arc::new(NoAuditLog),
            cancellation: CancellationToken::new(),
            out,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_gateway(mut self, gateway: Option<Arc<dyn RegistrationGateway>>) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    fn write(&mut self, text: &str) {
        let _ = write!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn writeln(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn prompt_field(&mut self, prompter: &FormPrompter) {
        if let Some(field) = prompter.current() {
            let prompt = ConsoleFormatter::field_prompt(field, prompter.current_value());
            self.write(&prompt);
        }
    }

    /// Run the page until the controller closes. Returns the final state.
    pub async fn run(mut self, mut lines: mpsc::UnboundedReceiver<String>) -> RegistrationState {
        let (tx, mut events) = mpsc::unbounded_channel();
        let mut controller = RegistrationController::new(self.settings.clone(), tx)
            .with_audit_log(self.audit.clone())
            .with_cancellation(self.cancellation.child_token());
        if let Some(gateway) = self.gateway.take() {
            controller = controller.with_gateway(gateway);
        }
        let mut handle: Option<RegistrationHandle> = Some(controller.spawn());

        let mut state = RegistrationState::Setup;
        let mut awaiting = Awaiting::Nothing;
        let mut input_open = true;
        let mut count = None;

        loop {
            tokio::select! {
                biased;

                event = events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        UiEvent::Closed => break,
                        UiEvent::StateChanged(next) => {
                            state = next;
                            self.on_state(next, count, &mut awaiting);
                            if next.is_terminal()
                                && let Some(handle) = handle.take()
                            {
                                handle.shutdown().await;
                            }
                        }
                        UiEvent::CountUpdated(snapshot) => {
                            count = Some(snapshot);
                            if !state.is_terminal() && state != RegistrationState::Setup {
                                self.writeln(&format!(
                                    "\n{}",
                                    ConsoleFormatter::count_line(snapshot)
                                ));
                                if let Awaiting::Field(prompter) = &awaiting {
                                    self.prompt_field(prompter);
                                }
                            }
                        }
                        UiEvent::Notice(notice) => self.on_notice(&notice),
                        UiEvent::ValidationFailed(errors) => {
                            self.write(&ConsoleFormatter::validation_errors(&errors));
                            if let Awaiting::Pending(form) =
                                std::mem::replace(&mut awaiting, Awaiting::Nothing)
                            {
                                let prompter = FormPrompter::correct(
                                    form,
                                    &errors,
                                    self.settings.email_policy.clone(),
                                );
                                self.prompt_field(&prompter);
                                awaiting = Awaiting::Field(prompter);
                            }
                        }
                        UiEvent::SubmissionRetained(form) => {
                            self.write(&ConsoleFormatter::retry_prompt());
                            awaiting = Awaiting::Retry(form);
                        }
                    }
                }

                line = lines.recv(), if input_open && awaiting.wants_input() => {
                    match line {
                        Some(line) => {
                            awaiting = self.on_line(&line, awaiting, handle.as_ref());
                        }
                        None => {
                            debug!("Input closed, leaving registration page");
                            input_open = false;
                            if let Some(handle) = handle.take() {
                                handle.shutdown().await;
                            }
                        }
                    }
                }
            }
        }

        if let Some(handle) = handle.take() {
            handle.shutdown().await;
        }
        state
    }

    fn on_state(
        &mut self,
        state: RegistrationState,
        count: Option<signup_domain::CapacitySnapshot>,
        awaiting: &mut Awaiting,
    ) {
        match state {
            RegistrationState::Setup => {
                self.write(&ConsoleFormatter::setup_required());
                *awaiting = Awaiting::WebhookUrl;
            }
            RegistrationState::Loading => {
                self.writeln(&format!("{}", "Loading registration count...".dimmed()));
            }
            RegistrationState::Open => {
                if matches!(awaiting, Awaiting::Nothing) {
                    self.write(&ConsoleFormatter::form_header(count));
                    let prompter = FormPrompter::new(self.settings.email_policy.clone());
                    self.prompt_field(&prompter);
                    *awaiting = Awaiting::Field(prompter);
                }
            }
            RegistrationState::Submitting => {
                self.writeln(&ConsoleFormatter::submitting());
            }
            RegistrationState::Submitted => {
                *awaiting = Awaiting::Nothing;
                self.write(&ConsoleFormatter::submitted_view());
            }
            RegistrationState::CapacityReached => {
                *awaiting = Awaiting::Nothing;
                self.write(&ConsoleFormatter::capacity_view());
            }
        }
    }

    fn on_notice(&mut self, notice: &Notice) {
        self.writeln(&ConsoleFormatter::notice(notice));
    }

    fn on_line(
        &mut self,
        line: &str,
        awaiting: Awaiting,
        handle: Option<&RegistrationHandle>,
    ) -> Awaiting {
        let Some(handle) = handle else {
            return Awaiting::Nothing;
        };

        match awaiting {
            Awaiting::WebhookUrl => match (self.factory)(line.trim()) {
                Ok(gateway) => {
                    handle.configure(gateway);
                    Awaiting::Nothing
                }
                Err(message) => {
                    self.writeln(&ConsoleFormatter::notice(&Notice::error(message)));
                    self.write("Webhook URL: ");
                    Awaiting::WebhookUrl
                }
            },
            Awaiting::Field(mut prompter) => match prompter.accept(line) {
                PromptStep::Next => {
                    self.prompt_field(&prompter);
                    Awaiting::Field(prompter)
                }
                PromptStep::Invalid(error) => {
                    self.writeln(&ConsoleFormatter::field_error(error.field, &error.message));
                    self.prompt_field(&prompter);
                    Awaiting::Field(prompter)
                }
                PromptStep::Complete(form) => {
                    handle.submit(form.clone());
                    Awaiting::Pending(form)
                }
            },
            Awaiting::Retry(form) => {
                if line.trim().eq_ignore_ascii_case("edit") {
                    let prompter = FormPrompter::edit(form, self.settings.email_policy.clone());
                    self.prompt_field(&prompter);
                    Awaiting::Field(prompter)
                } else {
                    handle.submit(form.clone());
                    Awaiting::Pending(form)
                }
            }
            other => other,
        }
    }
}

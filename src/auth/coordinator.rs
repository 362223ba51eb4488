//! PIN-entry flow for meetings that ask for a host, guest or panelist PIN.
//!
//! ```text
//! Idle ──request──► RoleSelectionPrompt ──role──► PinEntry ──authenticating──► Submitting
//!  ▲                       ▲                        │  ▲                          │
//!  │                       └──────── Back ──────────┘  └────────── error ─────────┤
//!  └──────────────────────────────── accepted (request None) ─────────────────────┘
//! ```
//!
//! Digit entry and server-side validation are decoupled: every keystroke is
//! forwarded to the meeting as the current response, and the meeting reports
//! back whether it is validating or has rejected the PIN.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::pending::PendingIndicator;
use super::state::{
    AuthPhase, AuthRequestKind, AuthenticationState, ParticipantRole, RoleChoice, BACKSPACE_KEY,
    BACK_KEY,
};
use crate::config::Localization;
use crate::device::panel::display_widget_id;
use crate::device::{DeviceControl, PanelDefinition, UiSurface, WidgetAction, WidgetIdError};

pub struct AuthenticationCoordinator {
    control: Arc<dyn DeviceControl>,
    ui: Arc<dyn UiSurface>,
    panel_id: String,
    localization: Localization,
    state: AuthenticationState,
    pending: PendingIndicator,
}

impl AuthenticationCoordinator {
    pub fn new(
        control: Arc<dyn DeviceControl>,
        ui: Arc<dyn UiSurface>,
        panel_id: impl Into<String>,
        localization: Localization,
    ) -> Self {
        let panel_id = panel_id.into();
        let pending = PendingIndicator::new(Arc::clone(&ui), display_widget_id(&panel_id));
        Self {
            control,
            ui,
            panel_id,
            localization,
            state: AuthenticationState::default(),
            pending,
        }
    }

    pub fn state(&self) -> &AuthenticationState {
        &self.state
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.phase
    }

    pub fn collected_pin(&self) -> Option<&str> {
        self.state.collected_pin()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_running()
    }

    /// The meeting's `AuthenticationRequest` changed.
    pub async fn on_request(&mut self, kind: AuthRequestKind) {
        info!("Authentication request: {}", kind.as_str());
        self.state.request_kind = Some(kind.clone());

        if let Some(choice) = kind.role_choice() {
            self.stop_pending();
            self.state.buffer.clear();
            self.state.accepted_pin = None;
            self.state.role = None;
            self.state.error = false;
            self.state.choice = Some(choice);
            self.show_role_choice(choice).await;
            if let Err(e) = self.ui.open_panel(&self.panel_id).await {
                error!("Failed to open authentication prompt: {}", e);
            }
            return;
        }

        let was_active = self.state.phase != AuthPhase::Idle;
        self.stop_pending();
        if kind == AuthRequestKind::None && was_active {
            let pin = self.state.buffer.take();
            if !pin.is_empty() {
                self.state.accepted_pin = Some(pin);
            }
            info!("Authentication accepted");
        } else {
            self.state.buffer.clear();
        }

        self.state.choice = None;
        self.state.error = false;
        self.state.phase = AuthPhase::Idle;
        if let Err(e) = self.ui.close_panel().await {
            warn!("Failed to close authentication prompt: {}", e);
        }
    }

    /// A click on one of our panel widgets. Clicks on other panels are ignored.
    pub async fn on_widget_clicked(&mut self, widget_id: &str) {
        match WidgetAction::parse(&self.panel_id, widget_id) {
            Ok(WidgetAction::Response { role, .. }) => self.on_role_selected(role).await,
            Ok(WidgetAction::Key { value, role }) => self.on_key(&value, role).await,
            Err(WidgetIdError::ForeignPanel(_)) => {}
            Err(e) => debug!("Ignoring widget click: {}", e),
        }
    }

    pub async fn on_role_selected(&mut self, role: ParticipantRole) {
        if self.state.phase == AuthPhase::Idle {
            debug!("Role {} selected with no authentication in progress", role);
            return;
        }

        info!("Participant role selected: {}", role);
        self.stop_pending();
        self.state.buffer.clear();
        self.state.role = Some(role);
        self.state.error = false;
        self.state.phase = AuthPhase::PinEntry;

        // Some flows accept the role without a PIN, so it goes out first.
        if let Err(e) = self.control.authentication_response(role, None).await {
            error!("Failed to send role {}: {}", role, e);
        }
        self.show_keypad(role).await;
    }

    async fn on_key(&mut self, value: &str, role: ParticipantRole) {
        if self.state.phase != AuthPhase::PinEntry {
            debug!("Ignoring key '{}' in phase {}", value, self.state.phase.as_str());
            return;
        }

        match value {
            BACK_KEY => {
                self.state.buffer.clear();
                self.state.role = None;
                match self.state.choice {
                    Some(choice) => self.show_role_choice(choice).await,
                    None => self.state.phase = AuthPhase::RoleSelectionPrompt,
                }
                return;
            }
            BACKSPACE_KEY => self.state.buffer.backspace(),
            digit => self.state.buffer.push(digit),
        }

        self.state.role = Some(role);
        self.state.error = false;
        self.refresh_masked_display().await;

        let pin = self.state.buffer.as_str().to_string();
        if let Err(e) = self.control.authentication_response(role, Some(&pin)).await {
            error!("Failed to send PIN update: {}", e);
        }
    }

    /// The meeting acknowledged digits, optionally while validating them.
    pub async fn on_pin_entered(&mut self, authenticating: bool, digits_entered: u32) {
        if authenticating {
            if self.state.phase == AuthPhase::Idle {
                debug!("PIN validation reported with no prompt open");
                return;
            }
            self.state.phase = AuthPhase::Submitting;
            self.state.pending = true;
            self.pending.start();
            return;
        }

        if self.state.phase == AuthPhase::Submitting {
            self.stop_pending();
            self.state.phase = AuthPhase::PinEntry;
        }
        if digits_entered as usize != self.state.buffer.len() {
            debug!(
                "Meeting reports {} digits, keypad holds {}",
                digits_entered,
                self.state.buffer.len()
            );
        }
        self.refresh_masked_display().await;
    }

    /// The meeting rejected the PIN.
    pub async fn on_pin_error(&mut self) {
        info!("PIN rejected, prompting again");
        self.stop_pending();
        self.state.buffer.clear();
        self.state.error = true;
        self.state.phase = AuthPhase::PinEntry;
        let message = self.localization.pin_error.clone();
        self.set_display(&message).await;
    }

    /// Drops any remembered PIN once the call is gone.
    pub fn on_call_ended(&mut self) {
        self.stop_pending();
        self.state = AuthenticationState::default();
    }

    fn stop_pending(&mut self) {
        self.pending.stop();
        self.state.pending = false;
    }

    async fn show_role_choice(&mut self, choice: RoleChoice) {
        let question = match choice {
            RoleChoice::HostOrGuest => &self.localization.host_or_guest_prompt,
            RoleChoice::PanelistOrAttendee => &self.localization.panelist_or_attendee_prompt,
        };
        let panel = PanelDefinition::role_choice(&self.panel_id, question, choice);
        self.state.phase = AuthPhase::RoleSelectionPrompt;
        if let Err(e) = self.ui.save_panel(&panel).await {
            error!("Failed to save role prompt: {}", e);
        }
    }

    async fn show_keypad(&mut self, role: ParticipantRole) {
        let title = match self.control.active_call().await {
            Ok(Some(call)) => call.meeting_title(),
            Ok(None) => "Meeting".to_string(),
            Err(e) => {
                warn!("Failed to read active call for keypad title: {}", e);
                "Meeting".to_string()
            }
        };
        let instruction = self.localization.pin_prompt(role);
        let panel = PanelDefinition::keypad(&self.panel_id, &title, instruction, role);
        if let Err(e) = self.ui.save_panel(&panel).await {
            error!("Failed to save keypad: {}", e);
        }
    }

    async fn refresh_masked_display(&self) {
        self.set_display(&self.state.buffer.masked()).await;
    }

    async fn set_display(&self, text: &str) {
        let widget_id = display_widget_id(&self.panel_id);
        if let Err(e) = self.ui.set_widget_value(&widget_id, text).await {
            warn!("Failed to update prompt display: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MASK_GLYPH;
    use crate::device::fakes::{Directive, FakeDevice};
    use crate::device::ActiveCall;

    const DISPLAY: &str = "simacro-display";

    fn coordinator(device: &Arc<FakeDevice>) -> AuthenticationCoordinator {
        AuthenticationCoordinator::new(
            device.clone(),
            device.clone(),
            "simacro",
            Localization::default(),
        )
    }

    async fn at_pin_entry(device: &Arc<FakeDevice>, role: ParticipantRole) -> AuthenticationCoordinator {
        let mut auth = coordinator(device);
        auth.on_request(AuthRequestKind::HostPinOrGuestPin).await;
        auth.on_role_selected(role).await;
        device.clear();
        auth
    }

    async fn press(auth: &mut AuthenticationCoordinator, key: &str) {
        let role = auth.state().role.unwrap_or(ParticipantRole::Guest);
        auth.on_widget_clicked(&format!("simacro-key-{key}-{role}")).await;
    }

    #[tokio::test]
    async fn test_role_choice_request_opens_prompt() {
        let device = FakeDevice::new();
        let mut auth = coordinator(&device);

        auth.on_request(AuthRequestKind::HostPinOrGuestPin).await;

        assert_eq!(auth.phase(), AuthPhase::RoleSelectionPrompt);
        let directives = device.directives();
        match &directives[0] {
            Directive::SavePanel(panel) => assert_eq!(panel.title, "Are you the meeting host?"),
            other => panic!("expected panel save, got {:?}", other),
        }
        assert_eq!(directives[1], Directive::OpenPanel("simacro".to_string()));
    }

    #[tokio::test]
    async fn test_panelist_request_uses_panelist_prompt() {
        let device = FakeDevice::new();
        let mut auth = coordinator(&device);

        auth.on_request(AuthRequestKind::PanelistPinOrAttendee).await;

        match &device.directives()[0] {
            Directive::SavePanel(panel) => {
                assert_eq!(panel.title, "Are you a Panelist or Attendee?");
                assert!(panel.widget("simacro-response-Attendee-Attendee").is_some());
            }
            other => panic!("expected panel save, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_without_choice_closes_prompt() {
        let device = FakeDevice::new();
        let mut auth = coordinator(&device);

        auth.on_request(AuthRequestKind::None).await;

        assert_eq!(auth.phase(), AuthPhase::Idle);
        assert_eq!(device.directives(), vec![Directive::ClosePanel]);
    }

    #[tokio::test]
    async fn test_any_pin_request_closes_open_prompt() {
        let device = FakeDevice::new();
        let mut auth = coordinator(&device);
        auth.on_request(AuthRequestKind::HostPinOrGuest).await;
        device.clear();

        auth.on_request(AuthRequestKind::AnyHostPinOrGuestPin).await;

        assert_eq!(auth.phase(), AuthPhase::Idle);
        assert_eq!(device.directives(), vec![Directive::ClosePanel]);
        assert_eq!(auth.collected_pin(), None);
    }

    #[tokio::test]
    async fn test_host_selection_sends_role_and_shows_keypad() {
        let device = FakeDevice::new();
        device.set_call(Some(ActiveCall {
            display_name: Some("Quarterly Review".to_string()),
            ..Default::default()
        }));
        let mut auth = coordinator(&device);
        auth.on_request(AuthRequestKind::HostPinOrGuestPin).await;
        device.clear();

        auth.on_widget_clicked("simacro-response-Yes-Host").await;

        assert_eq!(auth.phase(), AuthPhase::PinEntry);
        assert!(auth.state().buffer.is_empty());
        let directives = device.directives();
        assert_eq!(directives[0], Directive::AuthResponse(ParticipantRole::Host, None));
        match &directives[1] {
            Directive::SavePanel(panel) => {
                assert_eq!(panel.title, "Quarterly Review");
                assert_eq!(
                    panel.widget("simacro-instruction").map(|w| w.name.as_str()),
                    Some("Enter the host key or personal room PIN followed by #")
                );
                assert!(panel.widget("simacro-key-1-Host").is_some());
            }
            other => panic!("expected keypad, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_each_keystroke_sends_accumulated_pin() {
        let device = FakeDevice::new();
        let mut auth = at_pin_entry(&device, ParticipantRole::Guest).await;

        press(&mut auth, "1").await;
        press(&mut auth, "2").await;
        press(&mut auth, "⌫").await;
        press(&mut auth, "3").await;

        let responses: Vec<_> = device
            .directives()
            .into_iter()
            .filter_map(|d| match d {
                Directive::AuthResponse(ParticipantRole::Guest, pin) => pin,
                _ => None,
            })
            .collect();
        assert_eq!(responses, vec!["1", "12", "1", "13"]);
        assert_eq!(auth.collected_pin(), Some("13"));
    }

    #[tokio::test]
    async fn test_masked_display_tracks_buffer() {
        let device = FakeDevice::new();
        let mut auth = at_pin_entry(&device, ParticipantRole::Guest).await;

        let keys = ["4", "8", "⌫", "⌫", "⌫", "1", "5", "9", "⌫", "0"];
        for key in keys {
            press(&mut auth, key).await;
            let shown = device.widget_values(DISPLAY).pop().unwrap();
            assert_eq!(shown, MASK_GLYPH.repeat(auth.state().buffer.len()));
            assert!(!shown.chars().any(|c| c.is_ascii_digit()));
        }

        auth.on_pin_entered(false, 3).await;
        assert_eq!(device.widget_values(DISPLAY).pop().unwrap(), MASK_GLYPH.repeat(3));
    }

    #[tokio::test]
    async fn test_back_returns_to_role_choice() {
        let device = FakeDevice::new();
        let mut auth = at_pin_entry(&device, ParticipantRole::Host).await;
        press(&mut auth, "1").await;

        press(&mut auth, "Back").await;

        assert_eq!(auth.phase(), AuthPhase::RoleSelectionPrompt);
        assert!(auth.state().buffer.is_empty());
        assert!(matches!(
            device.directives().last(),
            Some(Directive::SavePanel(panel)) if panel.title == "Are you the meeting host?"
        ));
    }

    #[tokio::test]
    async fn test_authenticating_starts_pending_indicator() {
        let device = FakeDevice::new();
        let mut auth = at_pin_entry(&device, ParticipantRole::Guest).await;
        press(&mut auth, "7").await;

        auth.on_pin_entered(true, 1).await;

        assert_eq!(auth.phase(), AuthPhase::Submitting);
        assert!(auth.is_pending());
        assert!(auth.state().pending);
    }

    #[tokio::test]
    async fn test_role_click_while_submitting_stops_pending_indicator() {
        let device = FakeDevice::new();
        let mut auth = at_pin_entry(&device, ParticipantRole::Guest).await;
        press(&mut auth, "1").await;
        auth.on_pin_entered(true, 1).await;
        assert!(auth.is_pending());

        auth.on_widget_clicked("simacro-response-Yes-Host").await;

        assert_eq!(auth.phase(), AuthPhase::PinEntry);
        assert_eq!(auth.state().role, Some(ParticipantRole::Host));
        assert!(!auth.is_pending());
        assert!(!auth.state().pending);
    }

    #[tokio::test]
    async fn test_error_resets_buffer_and_shows_message() {
        let device = FakeDevice::new();
        let mut auth = at_pin_entry(&device, ParticipantRole::Guest).await;
        for key in ["9", "9", "9", "#"] {
            press(&mut auth, key).await;
        }
        auth.on_pin_entered(true, 4).await;

        auth.on_pin_error().await;

        assert_eq!(auth.phase(), AuthPhase::PinEntry);
        assert!(auth.state().buffer.is_empty());
        assert!(auth.state().error);
        assert!(!auth.is_pending());
        assert_eq!(
            device.widget_values(DISPLAY).last().map(String::as_str),
            Some("Incorrect numeric meeting password, please try again.")
        );
    }

    #[tokio::test]
    async fn test_error_from_any_phase_lands_in_pin_entry() {
        let device = FakeDevice::new();
        let mut auth = coordinator(&device);
        auth.on_pin_error().await;
        assert_eq!(auth.phase(), AuthPhase::PinEntry);
        assert!(auth.state().buffer.is_empty());
    }

    #[tokio::test]
    async fn test_acceptance_closes_prompt_and_keeps_pin() {
        let device = FakeDevice::new();
        let mut auth = at_pin_entry(&device, ParticipantRole::Guest).await;
        for key in ["1", "2", "3", "4", "#"] {
            press(&mut auth, key).await;
        }
        auth.on_pin_entered(true, 5).await;
        device.clear();

        auth.on_request(AuthRequestKind::None).await;

        assert_eq!(auth.phase(), AuthPhase::Idle);
        assert!(auth.state().buffer.is_empty());
        assert!(!auth.is_pending());
        assert_eq!(auth.collected_pin(), Some("1234#"));
        assert_eq!(device.directives(), vec![Directive::ClosePanel]);

        auth.on_call_ended();
        assert_eq!(auth.collected_pin(), None);
    }

    #[tokio::test]
    async fn test_keys_ignored_outside_pin_entry() {
        let device = FakeDevice::new();
        let mut auth = coordinator(&device);

        auth.on_widget_clicked("simacro-key-1-Guest").await;
        auth.on_widget_clicked("another-key-1-Guest").await;

        assert!(auth.state().buffer.is_empty());
        assert!(device.directives().is_empty());
    }
}

//! Meeting authentication: role prompts, PIN keypad and validation feedback.

pub mod coordinator;
pub mod pending;
pub mod state;

pub use coordinator::AuthenticationCoordinator;
pub use pending::{PendingIndicator, PENDING_GLYPHS, PENDING_TICK};
pub use state::{
    AuthPhase, AuthRequestKind, AuthenticationState, DigitBuffer, ParticipantRole, RoleChoice,
    BACKSPACE_KEY, BACK_KEY, MASK_GLYPH, PIN_TERMINATOR,
};

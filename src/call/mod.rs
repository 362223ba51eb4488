pub mod coordinator;
pub mod session;

pub use coordinator::CallCoordinator;
pub use session::{CallDirection, CallSession, CallStatusUpdate};

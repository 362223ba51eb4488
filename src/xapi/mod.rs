//! xAPI wire format: command documents, status extraction and the HTTP-backed
//! local device adapter.

pub mod device;
pub mod document;
pub mod panel;
pub mod status;

pub use device::XapiDevice;
pub use document::CommandDocument;

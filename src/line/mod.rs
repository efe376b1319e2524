pub mod events;
pub mod reply;
pub mod signature;

pub use events::{InboundEvent, WebhookPayload};
pub use reply::{LineMessagingClient, ReplySender};
pub use signature::verify_signature;

pub mod sms;
pub mod videos;
pub mod webhooks;

mod webhook_sender;

pub use webhook_sender::HttpWebhookSender;

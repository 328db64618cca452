//! Event names carried by change notifications and webhook subscriptions.

pub const ONCALL_CHANGED: &str = "oncall_changed";
pub const USER_CREATED: &str = "user_created";
pub const OVERRIDE_CREATED: &str = "override_created";
pub const WEBHOOK_TEST: &str = "webhook_test";

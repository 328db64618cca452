//! Per-target payload shaping. The shapes are wire-compatible with what
//! Slack, Discord and Teams incoming webhooks expect; `Generic` is a plain
//! event envelope.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::WebhookKind;

pub fn render(
    kind: WebhookKind,
    event: &str,
    data: &BTreeMap<String, Value>,
    now: DateTime<Utc>,
) -> Value {
    match kind {
        WebhookKind::Slack => slack(event, data),
        WebhookKind::Discord => discord(event, data),
        WebhookKind::Teams => teams(event, data),
        WebhookKind::Generic => json!({
            "event": event,
            "timestamp": now.to_rfc3339(),
            "data": data,
        }),
    }
}

fn slack(event: &str, data: &BTreeMap<String, Value>) -> Value {
    let color = if event.contains("created") {
        "good"
    } else {
        "warning"
    };
    let fields: Vec<Value> = data
        .iter()
        .map(|(key, value)| {
            json!({
                "title": key,
                "value": stringify(value),
                "short": true,
            })
        })
        .collect();
    json!({
        "text": format!("\u{1F514} {}", title_case(event)),
        "attachments": [{
            "color": color,
            "fields": fields,
        }],
    })
}

fn discord(event: &str, data: &BTreeMap<String, Value>) -> Value {
    let color = if event.contains("created") { 65280 } else { 16744192 };
    let description = data
        .iter()
        .map(|(key, value)| format!("**{}:** {}", key, stringify(value)))
        .collect::<Vec<_>>()
        .join("\n");
    json!({
        "content": format!("**{}**", title_case(event)),
        "embeds": [{
            "description": description,
            "color": color,
        }],
    })
}

fn teams(event: &str, data: &BTreeMap<String, Value>) -> Value {
    let title = title_case(event);
    let theme = if event.contains("created") {
        "00FF00"
    } else {
        "FFA500"
    };
    let facts: Vec<Value> = data
        .iter()
        .map(|(key, value)| json!({ "name": key, "value": stringify(value) }))
        .collect();
    json!({
        "@type": "MessageCard",
        "@context": "https://schema.org/extensions",
        "summary": title.clone(),
        "themeColor": theme,
        "title": title,
        "sections": [{ "facts": facts }],
    })
}

/// `oncall_changed` -> `Oncall Changed`.
fn title_case(event: &str) -> String {
    event
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Field values render bare: strings without surrounding quotes, everything
/// else in its JSON form.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Fires sample Freshdesk webhooks at a running relay.
//!
//! Usage: `send_sample [PARENT_ID] [CHILD_ID]`, relay address from `RELAY_URL`
//! (default `http://127.0.0.1:5000`).

use serde_json::{json, Value};

const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = std::env::var("RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
    let mut args = std::env::args().skip(1);
    let parent_id: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1);
    let child_id: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(2);

    let client = reqwest::Client::new();
    let url = format!("{}/webhook", base_url.trim_end_matches('/'));
    println!("Sending samples to {}", url);

    let samples = [
        (
            "public reply",
            json!({
                "ticket": { "id": child_id, "cf_parent_ticket_id": parent_id },
                "latest_public_comment": { "body_text": "Sample reply from send_sample" }
            }),
        ),
        (
            "private note",
            json!({
                "ticket": { "id": child_id, "cf_parent_ticket_id": parent_id },
                "latest_note": { "body_text": "Sample note from send_sample" }
            }),
        ),
        (
            "not a child",
            json!({
                "ticket": { "id": child_id },
                "latest_public_comment": { "body_text": "Should be ignored" }
            }),
        ),
    ];

    for (i, (label, payload)) in samples.iter().enumerate() {
        println!("\n[{}/{}] {}...", i + 1, samples.len(), label);
        let resp = client.post(&url).json(payload).send().await?;
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            println!("   -> ✅ {}: {}", status, body);
        } else {
            println!("   -> ❌ {}: {}", status, body);
        }
    }

    Ok(())
}

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::NotifyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// A browser push endpoint registered for reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushKeys,
}

impl PushSubscription {
    /// Row shape of the `push_subscriptions` table.
    pub fn to_row(&self) -> Value {
        json!({
            "endpoint": self.endpoint,
            "p256dh": self.keys.p256dh,
            "auth": self.keys.auth,
            "user_id": "anonymous",
        })
    }
}

/// Decode a base64url VAPID public key into raw bytes.
///
/// Padding is optional and the standard alphabet is tolerated.
pub fn decode_server_key(key: &str) -> Result<Vec<u8>, NotifyError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(NotifyError::MissingServerKey);
    }
    let normalized: String = key
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| NotifyError::InvalidServerKey(e.to_string()))?;
    if bytes.is_empty() {
        return Err(NotifyError::InvalidServerKey("key decodes to nothing".into()));
    }
    Ok(bytes)
}

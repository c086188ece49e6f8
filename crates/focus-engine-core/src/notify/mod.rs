//! Study reminders.
//!
//! A reminder belongs to a [`NotificationCategory`]. Each category has a
//! small message bank and is gated by one of the notification toggles in
//! [`NotificationSettings`]. Delivery goes through a [`NotificationSink`],
//! optionally after a delay.

mod push;
mod triggers;

pub use push::{decode_server_key, PushKeys, PushSubscription};
pub use triggers::{due_categories, streak_days};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::NotifyError;
use crate::storage::NotificationSettings;

const TITLE: &str = "Focus Engine";
const STREAK_TITLE: &str = "Focus Engine 🔥";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationCategory {
    Morning,
    Inactivity,
    Evening,
    Consistency,
    BrainFog,
    Personal,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 6] = [
        NotificationCategory::Morning,
        NotificationCategory::Inactivity,
        NotificationCategory::Evening,
        NotificationCategory::Consistency,
        NotificationCategory::BrainFog,
        NotificationCategory::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Morning => "morning",
            NotificationCategory::Inactivity => "inactivity",
            NotificationCategory::Evening => "evening",
            NotificationCategory::Consistency => "consistency",
            NotificationCategory::BrainFog => "brainFog",
            NotificationCategory::Personal => "personal",
        }
    }

    /// Message bank as `(title, body)` pairs.
    pub fn messages(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            NotificationCategory::Morning => &[
                (TITLE, "Start small. Momentum beats motivation."),
                (TITLE, "Your study day is ready. One task at a time."),
                (TITLE, "A consistent start builds an unstoppable finish."),
                (TITLE, "Today's targets are waiting. You've got this."),
            ],
            NotificationCategory::Inactivity => &[
                (TITLE, "A short focus sprint keeps the day alive."),
                (TITLE, "Even 20 minutes moves the needle."),
                (TITLE, "Pick up where you left off, it's never too late."),
                (TITLE, "The hardest part is starting. You're already close."),
            ],
            NotificationCategory::Evening => &[
                (TITLE, "Day winding down, every completed task counts."),
                (TITLE, "Finish strong. One more session before the day ends."),
                (TITLE, "Consistent effort, compounding results."),
                (TITLE, "Review what you covered today. Reinforcement matters."),
            ],
            NotificationCategory::Consistency => &[
                (STREAK_TITLE, "Third day in a row. Consistency is building."),
                (STREAK_TITLE, "A week of focused effort. Your future self thanks you."),
                (TITLE, "Steady progress is the surest path to exam readiness."),
            ],
            NotificationCategory::BrainFog => &[
                (TITLE, "Fog is temporary. Motion clears it."),
                (TITLE, "Start before your mind negotiates."),
                (TITLE, "Small progress rebuilds sharpness."),
                (TITLE, "Clarity follows action, not overthinking."),
            ],
            NotificationCategory::Personal => &[
                (TITLE, "Quick check: anything you want to wrap up?"),
                (TITLE, "You logged pending personal tasks today."),
            ],
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], "").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown notification category '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub category: NotificationCategory,
    pub title: String,
    pub body: String,
}

/// Pick a random message for `category`, if its toggle is on.
pub fn compose(
    settings: &NotificationSettings,
    category: NotificationCategory,
) -> Result<Notification, NotifyError> {
    if !settings.allows(category) {
        return Err(NotifyError::Disabled(category.as_str()));
    }
    let bank = category.messages();
    let (title, body) = bank
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or((TITLE, ""));
    Ok(Notification {
        category,
        title: title.to_string(),
        body: body.to_string(),
    })
}

/// A place reminders are shown.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: &Notification);
}

/// Deliver `notification` through `sink` once `delay` has passed.
///
/// Must be called from within a tokio runtime. Aborting the handle cancels
/// delivery.
pub fn schedule(
    sink: Arc<dyn NotificationSink>,
    notification: Notification,
    delay: Duration,
) -> JoinHandle<()> {
    debug!(category = %notification.category, delay_ms = delay.as_millis() as u64, "notification scheduled");
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        sink.deliver(&notification);
    })
}

const QUOTES: [&str; 30] = [
    "Start small. Momentum beats motivation.",
    "Clarity follows action, not overthinking.",
    "Fog is temporary. Motion clears it.",
    "Consistency compounds silently.",
    "Start before your mind negotiates.",
    "Even a 10-minute session keeps the day alive.",
    "Progress, not perfection. That's the standard.",
    "The work doesn't care how you feel. Do it anyway.",
    "Small progress rebuilds sharpness.",
    "One task at a time. That's how mountains move.",
    "Your effort today is tomorrow's advantage.",
    "A focused hour is worth more than a distracted day.",
    "Resume gently. No pressure.",
    "Finish strong. Even partial completion counts.",
    "Every expert was once a beginner.",
    "Motion before emotion. Action before clarity.",
    "Your future self thanks you for today's effort.",
    "Discipline weighs ounces. Regret weighs tons.",
    "You don't need motivation. You need momentum.",
    "The path appears by walking it.",
    "Results come from repetition, not intensity.",
    "Every session is a vote for who you're becoming.",
    "Start where you are. Use what you have.",
    "Slow progress is still progress.",
    "Don't wait for perfect conditions. Start imperfect.",
    "Momentum restores clarity faster than thinking.",
    "Execution beats strategy every time.",
    "You're one session away from a better day.",
    "Results lag behind effort. Trust the lag.",
    "The only bad session is the one you skipped.",
];

/// A motivational line for the home screen.
pub fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<Notification>>);

    impl NotificationSink for RecordingSink {
        fn deliver(&self, notification: &Notification) {
            self.0.lock().unwrap().push(notification.clone());
        }
    }

    fn all_on() -> NotificationSettings {
        NotificationSettings {
            study: true,
            brain_fog: true,
            evening: true,
            personal: true,
        }
    }

    #[test]
    fn compose_draws_from_category_bank() {
        for category in NotificationCategory::ALL {
            let n = compose(&all_on(), category).unwrap();
            assert!(category.messages().iter().any(|(_, body)| *body == n.body));
            assert!(n.title.starts_with("Focus Engine"));
        }
    }

    #[test]
    fn compose_respects_toggles() {
        let settings = NotificationSettings {
            evening: true,
            ..Default::default()
        };
        assert!(compose(&settings, NotificationCategory::Evening).is_ok());
        assert_eq!(
            compose(&settings, NotificationCategory::Morning).unwrap_err(),
            NotifyError::Disabled("morning")
        );
    }

    #[test]
    fn categories_parse_loosely() {
        assert_eq!("brain-fog".parse(), Ok(NotificationCategory::BrainFog));
        assert_eq!("brainFog".parse(), Ok(NotificationCategory::BrainFog));
        assert_eq!("Evening".parse(), Ok(NotificationCategory::Evening));
        assert!("lunch".parse::<NotificationCategory>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_delivery_waits_for_delay() {
        let sink = Arc::new(RecordingSink::default());
        let n = compose(&all_on(), NotificationCategory::Personal).unwrap();
        let handle = schedule(sink.clone(), n, Duration::from_secs(90));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(sink.0.lock().unwrap().is_empty());

        handle.await.unwrap();
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn quotes_are_never_empty() {
        assert!(!random_quote().is_empty());
    }
}

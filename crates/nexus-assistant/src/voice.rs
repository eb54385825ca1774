//! Voice command gating and spoken-time helpers.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Word that wakes the assistant.
pub const WAKE_WORD: &str = "nexus";

/// Reply spoken after the wake word.
pub const WAKE_REPLY: &str = "Yes, boss";

/// Phrases that mark a transcript as a command.
pub const TRIGGER_PHRASES: &[&str] = &[
    "switch to",
    "hospital",
    "chatbot",
    "gemini",
    "info",
    "reminder",
    "set reminder",
    "college",
];

/// Quiet period after a wake word or command.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3);

/// Feature a voice command navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Hospital,
    Chatbot,
    College,
    Reminder,
    Telegram,
    History,
}

impl View {
    /// Resolve the view named in a command transcript.
    pub fn from_command(command: &str) -> Option<Self> {
        let command = command.to_lowercase();
        // Specific names win over the generic "info".
        [
            ("hospital", View::Hospital),
            ("college", View::College),
            ("reminder", View::Reminder),
            ("telegram", View::Telegram),
            ("history", View::History),
            ("chatbot", View::Chatbot),
            ("gemini", View::Chatbot),
            ("chat", View::Chatbot),
            ("info", View::Hospital),
        ]
        .into_iter()
        .find(|(word, _)| command.contains(word))
        .map(|(_, view)| view)
    }

    /// Client route for the view.
    pub fn path(&self) -> &'static str {
        match self {
            View::Chatbot => "/",
            View::Hospital => "/hospital",
            View::College => "/college",
            View::Reminder => "/reminders",
            View::Telegram => "/telegram",
            View::History => "/history",
        }
    }
}

/// Result of feeding one transcript to the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoiceOutcome {
    /// Still cooling down from the previous wake word or command.
    Cooldown,
    /// The wake word was heard.
    Wake { reply: String },
    /// A command was accepted.
    Command { command: String, view: Option<View> },
    /// Nothing actionable.
    Ignored,
}

/// Filters a stream of speech transcripts into commands.
#[derive(Debug, Clone)]
pub struct VoiceGate {
    cooldown: Duration,
    cooldown_until: Option<Instant>,
    last_command: Option<(String, Instant)>,
}

impl Default for VoiceGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl VoiceGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            cooldown_until: None,
            last_command: None,
        }
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// True when the gate would treat the next transcript exactly as a fresh
    /// gate would, so it can be dropped.
    pub fn is_idle(&self, now: Instant) -> bool {
        !self.in_cooldown(now)
            && self
                .last_command
                .as_ref()
                .map_or(true, |(_, forget_at)| now >= *forget_at)
    }

    /// Classify `transcript` heard at `now`.
    pub fn process(&mut self, transcript: &str, now: Instant) -> VoiceOutcome {
        if self.in_cooldown(now) {
            return VoiceOutcome::Cooldown;
        }
        self.cooldown_until = None;

        if self
            .last_command
            .as_ref()
            .is_some_and(|(_, forget_at)| now >= *forget_at)
        {
            self.last_command = None;
        }

        let transcript = transcript.trim().to_lowercase();
        if transcript.is_empty() {
            return VoiceOutcome::Ignored;
        }

        if transcript.contains(WAKE_WORD) {
            self.cooldown_until = Some(now + self.cooldown);
            return VoiceOutcome::Wake {
                reply: WAKE_REPLY.to_string(),
            };
        }

        let is_trigger = TRIGGER_PHRASES.iter().any(|p| transcript.contains(p));
        let is_repeat = self
            .last_command
            .as_ref()
            .is_some_and(|(last, _)| *last == transcript);

        if is_trigger && !is_repeat {
            let until = now + self.cooldown;
            self.cooldown_until = Some(until);
            self.last_command = Some((transcript.clone(), until));
            let view = View::from_command(&transcript);
            return VoiceOutcome::Command {
                command: transcript,
                view,
            };
        }

        VoiceOutcome::Ignored
    }
}

/// Half of a 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

impl FromStr for Meridiem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('.', "").as_str() {
            "am" => Ok(Meridiem::Am),
            "pm" => Ok(Meridiem::Pm),
            other => Err(format!("unknown meridiem: {}", other)),
        }
    }
}

/// Convert a 12-hour clock hour to 24-hour.
pub fn to_24_hour(hour: u32, meridiem: Meridiem) -> u32 {
    match (meridiem, hour) {
        (Meridiem::Pm, h) if h != 12 => h + 12,
        (Meridiem::Am, 12) => 0,
        (_, h) => h,
    }
}

/// Parse `HH:MM` (24-hour) or `h:mm AM|PM`.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let text = text.trim().to_lowercase();

    let (clock, meridiem) = match ["am", "pm", "a.m.", "p.m."]
        .iter()
        .find(|suffix| text.ends_with(*suffix))
    {
        Some(suffix) => (
            text[..text.len() - suffix.len()].trim(),
            Some(suffix.parse::<Meridiem>().ok()?),
        ),
        None => (text.as_str(), None),
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.trim().parse::<u32>().ok()?, m.trim().parse::<u32>().ok()?),
        // "9 pm" has no minutes.
        None if meridiem.is_some() => (clock.parse::<u32>().ok()?, 0),
        None => return None,
    };

    let hour = match meridiem {
        Some(m) if (1..=12).contains(&hour) => to_24_hour(hour, m),
        Some(_) => return None,
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_word_starts_cooldown() {
        let mut gate = VoiceGate::default();
        let t0 = Instant::now();

        assert_eq!(
            gate.process("Hey Nexus", t0),
            VoiceOutcome::Wake {
                reply: "Yes, boss".into()
            }
        );
        assert_eq!(
            gate.process("open hospital", t0 + Duration::from_secs(1)),
            VoiceOutcome::Cooldown
        );
        assert!(matches!(
            gate.process("open hospital", t0 + Duration::from_secs(3)),
            VoiceOutcome::Command { .. }
        ));
    }

    #[test]
    fn test_command_resolves_view() {
        let mut gate = VoiceGate::default();
        let outcome = gate.process("  Switch to College  ", Instant::now());
        assert_eq!(
            outcome,
            VoiceOutcome::Command {
                command: "switch to college".into(),
                view: Some(View::College),
            }
        );
    }

    #[test]
    fn test_non_trigger_is_ignored() {
        let mut gate = VoiceGate::default();
        let t0 = Instant::now();
        assert_eq!(gate.process("what a nice day", t0), VoiceOutcome::Ignored);
        assert_eq!(gate.process("   ", t0), VoiceOutcome::Ignored);
        // Ignored transcripts do not start a cooldown.
        assert!(!gate.in_cooldown(t0));
    }

    #[test]
    fn test_repeat_blocked_until_forgotten() {
        let mut gate = VoiceGate::new(Duration::from_secs(3));
        let t0 = Instant::now();

        assert!(matches!(
            gate.process("set reminder", t0),
            VoiceOutcome::Command { .. }
        ));
        assert_eq!(
            gate.process("set reminder", t0 + Duration::from_secs(2)),
            VoiceOutcome::Cooldown
        );
        // Cooldown over; the remembered command is forgotten with it.
        assert!(matches!(
            gate.process("set reminder", t0 + Duration::from_secs(3)),
            VoiceOutcome::Command { .. }
        ));
    }

    #[test]
    fn test_repeat_ignored_while_remembered() {
        let mut gate = VoiceGate::new(Duration::from_secs(60));
        let t0 = Instant::now();
        gate.process("switch to chatbot", t0);

        // Lift the cooldown only; the command is still remembered.
        gate.cooldown_until = None;
        assert_eq!(
            gate.process("switch to chatbot", t0 + Duration::from_secs(1)),
            VoiceOutcome::Ignored
        );
    }

    #[test]
    fn test_idle_once_everything_expires() {
        let mut gate = VoiceGate::new(Duration::from_secs(3));
        let t0 = Instant::now();
        assert!(gate.is_idle(t0));

        gate.process("switch to hospital", t0);
        assert!(!gate.is_idle(t0 + Duration::from_secs(2)));
        assert!(gate.is_idle(t0 + Duration::from_secs(3)));

        gate.process("nexus", t0 + Duration::from_secs(10));
        assert!(!gate.is_idle(t0 + Duration::from_secs(11)));

        let mut quiet = VoiceGate::default();
        quiet.process("just talking", t0);
        assert!(quiet.is_idle(t0));
    }

    #[test]
    fn test_view_from_command() {
        assert_eq!(View::from_command("show hospital info"), Some(View::Hospital));
        assert_eq!(View::from_command("switch to gemini"), Some(View::Chatbot));
        assert_eq!(View::from_command("set reminder"), Some(View::Reminder));
        assert_eq!(View::from_command("switch to telegram"), Some(View::Telegram));
        assert_eq!(View::from_command("switch to history"), Some(View::History));
        assert_eq!(View::from_command("college info"), Some(View::College));
        assert_eq!(View::from_command("switch to nowhere"), None);
        assert_eq!(View::Reminder.path(), "/reminders");
    }

    #[test]
    fn test_to_24_hour() {
        assert_eq!(to_24_hour(12, Meridiem::Am), 0);
        assert_eq!(to_24_hour(12, Meridiem::Pm), 12);
        assert_eq!(to_24_hour(1, Meridiem::Pm), 13);
        assert_eq!(to_24_hour(11, Meridiem::Am), 11);
    }

    #[test]
    fn test_parse_clock() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        assert_eq!(parse_clock("14:05"), t(14, 5));
        assert_eq!(parse_clock("2:05 PM"), t(14, 5));
        assert_eq!(parse_clock("12:30am"), t(0, 30));
        assert_eq!(parse_clock("12:00 p.m."), t(12, 0));
        assert_eq!(parse_clock("9 pm"), t(21, 0));
        assert_eq!(parse_clock("13:00 PM"), None);
        assert_eq!(parse_clock("25:00"), None);
        assert_eq!(parse_clock("noon"), None);
    }
}

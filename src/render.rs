//! Colored terminal rendering for ttsync types.

use owo_colors::OwoColorize;
use ttsync_core::reconcile::{Action, ItemFailure};
use ttsync_core::{EventDraft, Lesson, ReconcileReport};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Lesson {
    fn render(&self) -> String {
        let time = format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        );
        let details = format!("{}, {}, {}", self.kind, self.room, self.teacher);

        format!("  {} {} {}", time.cyan(), self.name, details.dimmed())
    }
}

impl Render for EventDraft {
    fn render(&self) -> String {
        let time = format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"));

        let reminders = if self.reminders.is_empty() {
            "no reminders".to_string()
        } else {
            let minutes: Vec<String> = self
                .reminders
                .iter()
                .map(|r| format!("{}m", r.minutes))
                .collect();
            format!("remind {}", minutes.join(", "))
        };

        format!("  {} {} {}", time.cyan(), self.title, reminders.yellow())
    }
}

impl Render for ItemFailure {
    fn render(&self) -> String {
        let symbol = match self.action {
            Action::Delete => "-",
            Action::Create => "+",
        };

        format!(
            "   {} {} {}",
            symbol.red(),
            self.summary.red(),
            self.reason.dimmed()
        )
    }
}

impl Render for ReconcileReport {
    fn render(&self) -> String {
        let mut line = format!(
            "Removed {} {}, created {} {}",
            self.deleted,
            pluralize("event", self.deleted),
            self.created,
            pluralize("event", self.created)
        );

        if !self.failures.is_empty() {
            let failed = format!(", {} failed", self.failures.len());
            line.push_str(&failed.red().to_string());
        }

        line
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Date heading for a group of lessons or events.
pub fn date_heading(date: chrono::NaiveDate) -> String {
    date.format("%a %d.%m.%Y").bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 0), "events");
        assert_eq!(pluralize("event", 2), "events");
    }

    #[test]
    fn test_report_summary_mentions_failures_only_when_present() {
        let mut report = ReconcileReport {
            deleted: 1,
            created: 2,
            failures: vec![],
        };

        let clean = report.render();
        assert!(clean.contains("Removed 1 event, created 2 events"));
        assert!(!clean.contains("failed"));

        report.failures.push(ItemFailure {
            action: Action::Create,
            summary: "Math".to_string(),
            reason: "quota exceeded".to_string(),
        });

        assert!(report.render().contains("1 failed"));
    }
}

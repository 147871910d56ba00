//! Per-weapon change lists from an ingestion run, rendered for humans.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::data::merge::ChangeEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changelog {
    entries: Vec<(String, Vec<ChangeEntry>)>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weapons without changes are not recorded.
    pub fn record(&mut self, weapon: impl Into<String>, changes: Vec<ChangeEntry>) {
        if !changes.is_empty() {
            self.entries.push((weapon.into(), changes));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of weapons with at least one change.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn changes_for(&self, weapon: &str) -> Option<&[ChangeEntry]> {
        self.entries
            .iter()
            .find(|(name, _)| name == weapon)
            .map(|(_, changes)| changes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ChangeEntry])> {
        self.entries
            .iter()
            .map(|(name, changes)| (name.as_str(), changes.as_slice()))
    }

    /// `<weapon>.<dotted path>: <old> -> <new>`, one line per change.
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(name, changes)| changes.iter().map(move |change| format!("{name}.{change}")))
            .collect()
    }

    pub fn log(&self) {
        for line in self.lines() {
            tracing::info!("{line}");
        }
    }

    pub fn render_text(&self) -> String {
        let mut text = String::new();
        for (name, changes) in self.iter() {
            let _ = writeln!(text, "{name}:");
            for change in changes {
                let _ = writeln!(text, "\t{change}");
            }
        }
        text
    }

    /// Rendered text under a `# ingested <timestamp>` header line.
    pub fn render_stamped(&self, at: DateTime<Utc>) -> String {
        format!("# ingested {}\n{}", at.format("%Y-%m-%dT%H:%M:%SZ"), self.render_text())
    }

    pub fn write_to(&self, path: impl AsRef<Path>, at: DateTime<Utc>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render_stamped(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn change(path: &[&str], old: Option<serde_json::Value>, new: serde_json::Value) -> ChangeEntry {
        ChangeEntry {
            path: path.iter().map(|p| p.to_string()).collect(),
            old,
            new,
        }
    }

    #[test]
    fn renders_text_and_lines() {
        let mut log = Changelog::new();
        log.record("Messer", vec![change(&["attacks", "slash", "light", "damage"], Some(json!(40)), json!(45))]);
        log.record("Axe", Vec::new());

        assert_eq!(log.len(), 1);
        assert_eq!(log.render_text(), "Messer:\n\tattacks.slash.light.damage: 40 -> 45\n");
        assert_eq!(log.lines(), vec!["Messer.attacks.slash.light.damage: 40 -> 45"]);
    }

    #[test]
    fn stamped_text_leads_with_the_run_time() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T12:30:00Z").unwrap().with_timezone(&Utc);
        let text = Changelog::new().render_stamped(at);
        assert_eq!(text, "# ingested 2024-03-01T12:30:00Z\n");
    }
}

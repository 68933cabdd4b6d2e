use nearby::daemon::DaemonCommand;
use std::path::PathBuf;

/// An item produced off the GTK thread; its icon is loaded when it is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedItem {
    pub label: String,
    pub icon: Option<PathBuf>,
}

/// Places found by one search, tagged with the load that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesBatch {
    pub generation: u64,
    pub items: Vec<LoadedItem>,
}

/// Counts places loads. A refresh advances it, and batches from the
/// searches it replaced no longer match.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadGeneration(u64);

impl LoadGeneration {
    pub fn current(&self) -> u64 {
        self.0
    }

    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn accepts(&self, batch: &PlacesBatch) -> bool {
        batch.generation == self.0
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    Spin,
    Refresh,
    AddItem(String),
    RemoveItem(usize),
    ItemsLoaded(PlacesBatch),
    ConfigReload,
}

impl From<DaemonCommand> for AppEvent {
    fn from(command: DaemonCommand) -> Self {
        match command {
            DaemonCommand::Show => AppEvent::Show,
            DaemonCommand::Hide => AppEvent::Hide,
            DaemonCommand::Spin => AppEvent::Spin,
            DaemonCommand::Refresh => AppEvent::Refresh,
            DaemonCommand::Add(label) => AppEvent::AddItem(label),
            DaemonCommand::Remove(index) => AppEvent::RemoveItem(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(generation: u64, labels: &[&str]) -> PlacesBatch {
        PlacesBatch {
            generation,
            items: labels
                .iter()
                .map(|l| LoadedItem {
                    label: l.to_string(),
                    icon: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_startup_batch_is_accepted() {
        let generation = LoadGeneration::default();
        assert!(generation.accepts(&batch(generation.current(), &["Trattoria"])));
    }

    #[test]
    fn test_refresh_drops_batch_from_earlier_load() {
        let mut generation = LoadGeneration::default();
        let startup = batch(generation.current(), &["Trattoria", "Noodle Bar"]);

        let refreshed = generation.advance();
        let fresh = batch(refreshed, &["Trattoria", "Noodle Bar"]);

        // The slow startup search lands after the refresh cleared the wheel.
        assert!(!generation.accepts(&startup));
        assert!(generation.accepts(&fresh));
    }

    #[test]
    fn test_repeated_refresh_keeps_only_latest() {
        let mut generation = LoadGeneration::default();
        let first = generation.advance();
        let second = generation.advance();

        assert_ne!(first, second);
        assert!(!generation.accepts(&batch(first, &["a"])));
        assert!(generation.accepts(&batch(second, &["a"])));
    }

    #[test]
    fn test_daemon_commands_map_to_events() {
        assert!(matches!(
            AppEvent::from(DaemonCommand::Add("Tacos".to_string())),
            AppEvent::AddItem(label) if label == "Tacos"
        ));
        assert!(matches!(
            AppEvent::from(DaemonCommand::Remove(2)),
            AppEvent::RemoveItem(2)
        ));
        assert!(matches!(
            AppEvent::from(DaemonCommand::Refresh),
            AppEvent::Refresh
        ));
    }
}

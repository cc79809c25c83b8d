use crate::section::Entries;

/// The `[#SETTING]` section: session parameters such as the project path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: Entries,
}

impl Settings {
    pub fn new(entries: Entries) -> Self {
        Settings { entries }
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.set(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Project tempo; `None` when absent or unparsable
    pub fn tempo(&self) -> Option<f64> {
        self.get("Tempo").and_then(|v| v.trim().parse().ok())
    }

    /// Path of the saved `.ust`, absent for unsaved projects
    pub fn project(&self) -> Option<&str> {
        self.get("Project").filter(|p| !p.is_empty())
    }

    pub fn voice_dir(&self) -> Option<&str> {
        self.get("VoiceDir").filter(|p| !p.is_empty())
    }

    /// Whether pitch editing mode 2 (PBS/PBW/PBY/PBM) is on
    pub fn mode2(&self) -> bool {
        self.get("Mode2") == Some("True")
    }
}

//! Game levels and the two music slots each level offers

use std::fmt;

use crate::song::same_name;

/// A vanilla level whose music can be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Tutorial,
    Voke,
    Stygia,
    Yhelm,
    Incaustis,
    Gehenna,
    Nihil,
    Acheron,
    Sheol,
    HellGates,
}

impl Level {
    pub const ALL: [Level; 10] = [
        Level::Tutorial,
        Level::Voke,
        Level::Stygia,
        Level::Yhelm,
        Level::Incaustis,
        Level::Gehenna,
        Level::Nihil,
        Level::Acheron,
        Level::Sheol,
        Level::HellGates,
    ];

    /// Canonical name, as the game spells it in customsongs.json
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Tutorial => "Tutorial",
            Level::Voke => "Voke",
            Level::Stygia => "Stygia",
            Level::Yhelm => "Yhelm",
            Level::Incaustis => "Incaustis",
            Level::Gehenna => "Gehenna",
            Level::Nihil => "Nihil",
            Level::Acheron => "Acheron",
            Level::Sheol => "Sheol",
            Level::HellGates => "Hell_Gates",
        }
    }

    /// Match a user-supplied name against the level set, ignoring case
    pub fn resolve(name: &str) -> Option<Level> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|level| same_name(level.as_str(), wanted))
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Level::as_str).collect()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of a level's two tracks a song replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Main,
    Boss,
}

impl Slot {
    /// Key used for this slot in customsongs.json
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Main => "MainMusic",
            Slot::Boss => "BossMusic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Slot::Main => "Main",
            Slot::Boss => "Boss",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

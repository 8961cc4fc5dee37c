//! Palette symbol catalog and group resolution.
//!
//! The catalog is compiled-in static data: each `GroupId` maps to an ordered
//! slice of `CommandDescriptor`s. Hosts select which groups are shown with a
//! comma-separated list of names (`"basic,greek"`), resolved by
//! [`resolve_groups`]. Unknown names degrade to an empty slot instead of
//! failing the whole list, so a typo hides one row of buttons and nothing more.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, trace};

/// One palette button: the token inserted into the surface plus its glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandDescriptor {
    /// Token handed to the surface's `insert_command`.
    pub command: &'static str,
    /// Glyph shown on the button.
    pub display_name: &'static str,
    /// Optional rendering hint (superscript marker, enlarged glyph).
    pub style_class: Option<&'static str>,
}

impl CommandDescriptor {
    pub const fn new(command: &'static str, display_name: &'static str) -> Self {
        Self {
            command,
            display_name,
            style_class: None,
        }
    }

    pub const fn styled(
        command: &'static str,
        display_name: &'static str,
        style_class: &'static str,
    ) -> Self {
        Self {
            command,
            display_name,
            style_class: Some(style_class),
        }
    }
}

pub const SYMBOLS_BASIC: &[CommandDescriptor] = &[
    CommandDescriptor::new("\\sqrt", "√"),
    CommandDescriptor::styled("\\nthroot", "√", "n-sup"),
    CommandDescriptor::new("\\int", "∫"),
    CommandDescriptor::styled("^", "n", "sup"),
    CommandDescriptor::styled("_", "n", "sub"),
    CommandDescriptor::new("\\rightarrow", "→"),
    CommandDescriptor::new("\\infty", "∞"),
    CommandDescriptor::new("\\neq", "≠"),
    CommandDescriptor::new("\\degree", "°"),
    CommandDescriptor::new("\\div", "÷"),
];

pub const SYMBOLS_GREEK: &[CommandDescriptor] = &[
    CommandDescriptor::new("\\lambda", "λ"),
    CommandDescriptor::new("\\pi", "π"),
    CommandDescriptor::new("\\mu", "μ"),
    CommandDescriptor::new("\\sum", "Σ"),
    CommandDescriptor::new("\\alpha", "α"),
    CommandDescriptor::new("\\beta", "β"),
    CommandDescriptor::new("\\gamma", "γ"),
    CommandDescriptor::styled("\\delta", "ᵟ", "big"),
    CommandDescriptor::new("\\Delta", "Δ"),
];

pub const SYMBOLS_PHYSICS: &[CommandDescriptor] = &[
    CommandDescriptor::new("\\ohm", "Ω"),
    CommandDescriptor::styled("\\phi", "ᶲ", "big"),
];

/// Groups shown when the host has not chosen any.
pub const DEFAULT_GROUPS: &[GroupId] = &[GroupId::Basic, GroupId::Greek];

/// Closed set of catalog groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupId {
    Basic,
    Greek,
    Physics,
}

impl GroupId {
    pub const ALL: [GroupId; 3] = [GroupId::Basic, GroupId::Greek, GroupId::Physics];

    /// Uppercase catalog identifier.
    pub const fn name(self) -> &'static str {
        match self {
            GroupId::Basic => "BASIC",
            GroupId::Greek => "GREEK",
            GroupId::Physics => "PHYSICS",
        }
    }

    pub const fn commands(self) -> &'static [CommandDescriptor] {
        match self {
            GroupId::Basic => SYMBOLS_BASIC,
            GroupId::Greek => SYMBOLS_GREEK,
            GroupId::Physics => SYMBOLS_PHYSICS,
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("unknown symbol group `{0}`")]
    UnknownGroup(String),
}

impl FromStr for GroupId {
    type Err = SymbolError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase();
        GroupId::ALL
            .into_iter()
            .find(|id| id.name() == key)
            .ok_or_else(|| SymbolError::UnknownGroup(s.trim().to_string()))
    }
}

/// One palette row after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup {
    /// `None` when `requested` matched nothing in the catalog.
    pub id: Option<GroupId>,
    /// Token as the host wrote it (trimmed).
    pub requested: String,
    pub commands: &'static [CommandDescriptor],
}

impl ResolvedGroup {
    pub fn from_id(id: GroupId) -> Self {
        Self {
            id: Some(id),
            requested: id.name().to_ascii_lowercase(),
            commands: id.commands(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn get(&self, index: usize) -> Option<&'static CommandDescriptor> {
        self.commands.get(index)
    }
}

/// Resolve a comma-separated group list into palette rows, one per token, in
/// the order given.
pub fn resolve_groups(list: &str) -> Vec<ResolvedGroup> {
    let groups: Vec<ResolvedGroup> = list
        .split(',')
        .map(|token| {
            let requested = token.trim().to_string();
            match requested.parse::<GroupId>() {
                Ok(id) => {
                    trace!(target: "symbols", group = id.name(), commands = id.commands().len(), "group_resolved");
                    ResolvedGroup {
                        id: Some(id),
                        requested,
                        commands: id.commands(),
                    }
                }
                Err(err) => {
                    debug!(target: "symbols", %err, "group_unknown_empty_slot");
                    ResolvedGroup {
                        id: None,
                        requested,
                        commands: &[],
                    }
                }
            }
        })
        .collect();
    debug!(target: "symbols", list, slots = groups.len(), "groups_resolved");
    groups
}

pub fn default_groups() -> Vec<ResolvedGroup> {
    DEFAULT_GROUPS
        .iter()
        .copied()
        .map(ResolvedGroup::from_id)
        .collect()
}

use crate::tui::action::Action;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Maps key events to actions
///
/// The serialized form is a flat list so users can keep several keys for
/// the same action; the lookup map is rebuilt after every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,

    #[serde(skip)]
    lookup: HashMap<KeyPattern, Action>,
}

/// Single keybinding entry, e.g. `{ "key": "Ctrl+d", "action": "PageDown" }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub action: Action,
}

/// Key code plus modifiers, as delivered by crossterm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_bindings(vec![
            // Data
            KeyBinding::new("u", Action::Upload),
            KeyBinding::new("o", Action::Upload),
            KeyBinding::new("r", Action::Refresh),
            KeyBinding::new("F5", Action::Refresh),
            // Chart
            KeyBinding::new("]", Action::IncreaseRows),
            KeyBinding::new("[", Action::DecreaseRows),
            KeyBinding::new("}", Action::IncreaseRowsPage),
            KeyBinding::new("{", Action::DecreaseRowsPage),
            KeyBinding::new("x", Action::NextXAxis),
            KeyBinding::new("y", Action::NextYAxis),
            KeyBinding::new("c", Action::NextChartType),
            KeyBinding::new("C", Action::PrevChartType),
            // Navigation
            KeyBinding::new("Up", Action::MoveUp),
            KeyBinding::new("Down", Action::MoveDown),
            KeyBinding::new("Left", Action::MoveLeft),
            KeyBinding::new("Right", Action::MoveRight),
            KeyBinding::new("k", Action::MoveUp),
            KeyBinding::new("j", Action::MoveDown),
            KeyBinding::new("h", Action::MoveLeft),
            KeyBinding::new("l", Action::MoveRight),
            KeyBinding::new("PageUp", Action::PageUp),
            KeyBinding::new("PageDown", Action::PageDown),
            KeyBinding::new("Ctrl+u", Action::PageUp),
            KeyBinding::new("Ctrl+d", Action::PageDown),
            KeyBinding::new("g", Action::GoToTop),
            KeyBinding::new("G", Action::GoToBottom),
            KeyBinding::new("Home", Action::GoToTop),
            KeyBinding::new("End", Action::GoToBottom),
            // Panels
            KeyBinding::new("Tab", Action::NextPanel),
            KeyBinding::new("Shift+BackTab", Action::PrevPanel),
            // View
            KeyBinding::new("?", Action::ToggleHelp),
            KeyBinding::new("F1", Action::ToggleHelp),
            // Application
            KeyBinding::new("q", Action::Quit),
            KeyBinding::new("Ctrl+c", Action::Quit),
            KeyBinding::new("Esc", Action::Cancel),
            KeyBinding::new("Enter", Action::Confirm),
        ])
    }
}

impl KeyBindings {
    pub fn from_bindings(bindings: Vec<KeyBinding>) -> Self {
        let lookup = Self::build_lookup(&bindings);
        Self { bindings, lookup }
    }

    fn build_lookup(bindings: &[KeyBinding]) -> HashMap<KeyPattern, Action> {
        let mut lookup = HashMap::new();
        for binding in bindings {
            match binding.key.parse::<KeyPattern>() {
                Ok(pattern) => {
                    lookup.entry(pattern).or_insert(binding.action);
                }
                Err(e) => warn!("Ignoring keybinding for {:?}: {}", binding.action, e),
            }
        }
        lookup
    }

    /// Action bound to a key event, if any
    pub fn get_action(&self, key: &KeyEvent) -> Option<Action> {
        self.lookup.get(&KeyPattern::from(key)).copied()
    }

    /// Load bindings from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let parsed: KeyBindings = serde_json::from_str(&content)?;
        Ok(Self::from_bindings(parsed.bindings))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Human-readable keys bound to an action (for the help screen)
    pub fn keys_for_action(&self, action: Action) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|b| b.action == action)
            .map(|b| match b.key.parse::<KeyPattern>() {
                Ok(pattern) => pattern.to_string(),
                Err(_) => b.key.clone(),
            })
            .collect()
    }

    /// Actions with no key at all
    pub fn unbound_actions(&self) -> Vec<Action> {
        let bound: HashSet<Action> = self.bindings.iter().map(|b| b.action).collect();
        Action::all()
            .into_iter()
            .filter(|action| !bound.contains(action))
            .collect()
    }

    /// Problems worth reporting after loading a user file
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut seen: HashMap<KeyPattern, Action> = HashMap::new();
        for binding in &self.bindings {
            match binding.key.parse::<KeyPattern>() {
                Ok(pattern) => {
                    if let Some(existing) = seen.get(&pattern) {
                        if *existing != binding.action {
                            problems.push(format!(
                                "Key '{}' is bound to both {:?} and {:?}",
                                binding.key, existing, binding.action
                            ));
                        }
                    } else {
                        seen.insert(pattern, binding.action);
                    }
                }
                Err(e) => problems.push(format!(
                    "Invalid key '{}' for {:?}: {}",
                    binding.key, binding.action, e
                )),
            }
        }

        for action in self.unbound_actions() {
            problems.push(format!("{:?} has no keybinding", action));
        }

        problems
    }
}

impl KeyBinding {
    pub fn new(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            action,
        }
    }
}

impl KeyPattern {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

impl From<&KeyEvent> for KeyPattern {
    fn from(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

impl FromStr for KeyPattern {
    type Err = String;

    /// Parse "Ctrl+d", "G", "?" or "F5"
    ///
    /// Single characters keep their case; uppercase letters and shifted
    /// symbols imply SHIFT, matching what terminals report.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty key".to_string());
        }

        let (modifier_parts, key_part) = match s.rsplit_once('+') {
            Some((mods, key)) if !key.is_empty() => (mods.split('+').collect::<Vec<_>>(), key),
            _ => (Vec::new(), s),
        };

        let mut modifiers = KeyModifiers::empty();
        for part in modifier_parts {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(format!("unknown modifier '{}'", other)),
            };
        }

        let mut chars = key_part.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch.is_ascii_uppercase() || "!@#$%^&*()_{}|:\"<>?~".contains(ch) {
                modifiers |= KeyModifiers::SHIFT;
            }
            return Ok(Self::new(KeyCode::Char(ch), modifiers));
        }

        let lowered = key_part.to_ascii_lowercase();
        let code = match lowered.as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            f if f.starts_with('f') => match f[1..].parse::<u8>() {
                Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                _ => return Err(format!("invalid function key '{}'", key_part)),
            },
            _ => return Err(format!("unknown key '{}'", key_part)),
        };

        Ok(Self::new(code, modifiers))
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt+")?;
        }
        match self.code {
            // Shift is implied by the character itself
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::BackTab => write!(f, "Shift+Tab"),
            code => {
                if self.modifiers.contains(KeyModifiers::SHIFT) {
                    write!(f, "Shift+")?;
                }
                match code {
                    KeyCode::Up => write!(f, "↑"),
                    KeyCode::Down => write!(f, "↓"),
                    KeyCode::Left => write!(f, "←"),
                    KeyCode::Right => write!(f, "→"),
                    KeyCode::PageUp => write!(f, "PgUp"),
                    KeyCode::PageDown => write!(f, "PgDn"),
                    KeyCode::Delete => write!(f, "Del"),
                    KeyCode::F(n) => write!(f, "F{}", n),
                    other => write!(f, "{:?}", other),
                }
            }
        }
    }
}

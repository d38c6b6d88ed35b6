//! Focus and remote-control navigation
//!
//! The terminal has no focus engine, so tile focus lives here: which tile
//! gets preferred focus on mount, how the cursor moves across a grid, what
//! emphasis a focused or pressed tile receives, and how remote buttons map
//! to navigation. Everything TV-specific is gated on [`Platform::is_tv`].

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// =============================================================================
// Platform
// =============================================================================

/// Capabilities supplied by the host. Never guessed from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    pub is_tv: bool,
}

impl Platform {
    pub fn tv() -> Self {
        Self { is_tv: true }
    }

    pub fn desktop() -> Self {
        Self { is_tv: false }
    }

    /// Non-TV platforms render their own title/navigation header
    pub fn shows_header(&self) -> bool {
        !self.is_tv
    }

    /// TV platforms render the global navigation bar
    pub fn shows_nav_bar(&self) -> bool {
        self.is_tv
    }
}

// =============================================================================
// Focus emphasis
// =============================================================================

/// Visual emphasis applied to a focused or pressed tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusEmphasis {
    pub enabled: bool,
    pub shift_x: f32,
    pub shift_y: f32,
    pub tilt: f32,
    pub magnification: f32,
    pub press_magnification: f32,
    pub duration: Duration,
    pub delay: Duration,
}

impl FocusEmphasis {
    /// The uniform TV contract
    pub const TV: FocusEmphasis = FocusEmphasis {
        enabled: true,
        shift_x: 2.0,
        shift_y: 2.0,
        tilt: 0.03,
        magnification: 1.05,
        press_magnification: 1.02,
        duration: Duration::from_millis(150),
        delay: Duration::ZERO,
    };

    /// No emphasis at all
    pub const NONE: FocusEmphasis = FocusEmphasis {
        enabled: false,
        shift_x: 0.0,
        shift_y: 0.0,
        tilt: 0.0,
        magnification: 1.0,
        press_magnification: 1.0,
        duration: Duration::ZERO,
        delay: Duration::ZERO,
    };

    pub fn for_platform(platform: Platform) -> Self {
        if platform.is_tv {
            Self::TV
        } else {
            Self::NONE
        }
    }

    /// Scale factor for a tile in the given interaction state
    pub fn scale(&self, interaction: TileInteraction) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        match interaction {
            TileInteraction::Idle => 1.0,
            TileInteraction::Focused => self.magnification,
            TileInteraction::Pressed => self.press_magnification,
        }
    }

    /// Positional shift (x, y) for a tile in the given interaction state
    pub fn shift(&self, interaction: TileInteraction) -> (f32, f32) {
        if !self.enabled || interaction == TileInteraction::Idle {
            (0.0, 0.0)
        } else {
            (self.shift_x, self.shift_y)
        }
    }

    /// Extra terminal cells a tile grows by on each side when scaled
    pub fn grow_cells(&self, interaction: TileInteraction, tile_cols: u16) -> u16 {
        let extra = (tile_cols as f32 * (self.scale(interaction) - 1.0) / 2.0).round();
        extra.max(0.0) as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileInteraction {
    #[default]
    Idle,
    Focused,
    Pressed,
}

// =============================================================================
// Remote buttons
// =============================================================================

/// Buttons on a TV remote, as seen through the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteButton {
    Up,
    Down,
    Left,
    Right,
    Select,
    Menu,
    PlayPause,
}

impl RemoteButton {
    /// Translate a key event. `q`/Ctrl+C are handled by the app, not here.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(RemoteButton::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(RemoteButton::Down),
            KeyCode::Left | KeyCode::Char('h') => Some(RemoteButton::Left),
            KeyCode::Right | KeyCode::Char('l') => Some(RemoteButton::Right),
            KeyCode::Enter => Some(RemoteButton::Select),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('m') => Some(RemoteButton::Menu),
            KeyCode::Char(' ') | KeyCode::Char('p') => Some(RemoteButton::PlayPause),
            _ => None,
        }
    }
}

/// High level navigation requested by a remote button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Move(Direction),
    Activate,
    Back,
    TogglePlayback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Tracks whether the menu key has been claimed for the current screen.
///
/// Enabling is idempotent; `enable_count` records real transitions only.
#[derive(Debug, Default, Clone)]
pub struct MenuKey {
    enabled: bool,
    enable_count: u32,
}

impl MenuKey {
    /// Enable the menu key for this mount. Repeat calls are no-ops.
    pub fn enable(&mut self) {
        if !self.enabled {
            self.enabled = true;
            self.enable_count += 1;
            tracing::trace!("menu key enabled");
        }
    }

    /// Called on unmount so the next mount enables again
    pub fn release(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable_count(&self) -> u32 {
        self.enable_count
    }

    /// Map a remote button to a navigation action
    pub fn action_for(&self, button: RemoteButton) -> Option<NavAction> {
        match button {
            RemoteButton::Up => Some(NavAction::Move(Direction::Up)),
            RemoteButton::Down => Some(NavAction::Move(Direction::Down)),
            RemoteButton::Left => Some(NavAction::Move(Direction::Left)),
            RemoteButton::Right => Some(NavAction::Move(Direction::Right)),
            RemoteButton::Select => Some(NavAction::Activate),
            RemoteButton::PlayPause => Some(NavAction::TogglePlayback),
            RemoteButton::Menu if self.enabled => Some(NavAction::Back),
            RemoteButton::Menu => None,
        }
    }
}

// =============================================================================
// Grid focus
// =============================================================================

/// Focus cursor over a grid of tiles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridFocus {
    focused: Option<usize>,
    len: usize,
    pressed: bool,
    /// Mounted but not yet loaded
    fresh: bool,
}

impl GridFocus {
    /// Fresh focus state for a newly mounted screen.
    ///
    /// On TV the first tile takes preferred focus; elsewhere nothing is
    /// focused until the user moves.
    pub fn mount(platform: Platform, len: usize) -> Self {
        let mut focus = Self {
            focused: None,
            len,
            pressed: false,
            fresh: true,
        };
        focus.apply_preferred(platform);
        focus
    }

    /// Index of the preferred-focus tile, if this platform designates one
    pub fn preferred_index(platform: Platform, len: usize) -> Option<usize> {
        (platform.is_tv && len > 0).then_some(0)
    }

    fn apply_preferred(&mut self, platform: Platform) {
        if self.focused.is_none() {
            self.focused = Self::preferred_index(platform, self.len);
        }
    }

    /// New tile count after a (re)load. Preferred focus is applied on the
    /// first load after mounting only; a refresh never pulls focus back
    /// into a grid the user left.
    pub fn set_len(&mut self, platform: Platform, len: usize) {
        self.len = len;
        self.focused = match self.focused {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
        if std::mem::take(&mut self.fresh) {
            self.apply_preferred(platform);
        }
    }

    /// True until the first load after mounting
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn interaction(&self, index: usize) -> TileInteraction {
        match self.focused {
            Some(i) if i == index && self.pressed => TileInteraction::Pressed,
            Some(i) if i == index => TileInteraction::Focused,
            _ => TileInteraction::Idle,
        }
    }

    pub fn press(&mut self) {
        self.pressed = self.focused.is_some();
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Move focus within a grid of `columns` columns.
    ///
    /// Returns false when the move would leave the grid.
    pub fn move_focus(&mut self, direction: Direction, columns: u32) -> bool {
        self.pressed = false;
        if self.len == 0 {
            return false;
        }
        let Some(current) = self.focused else {
            // First movement on a platform without preferred focus lands on 0
            self.focused = Some(0);
            return true;
        };
        let cols = columns.max(1) as usize;
        let next = match direction {
            Direction::Left if current % cols > 0 => Some(current - 1),
            Direction::Right if current % cols < cols - 1 && current + 1 < self.len => {
                Some(current + 1)
            }
            Direction::Up if current >= cols => Some(current - cols),
            Direction::Down if current + cols < self.len => Some(current + cols),
            // Partial last row: drop to its last tile
            Direction::Down if current / cols < (self.len - 1) / cols => Some(self.len - 1),
            _ => None,
        };
        match next {
            Some(i) => {
                self.focused = Some(i);
                true
            }
            None => false,
        }
    }

    /// Clear focus (e.g. when focus moves to the nav bar)
    pub fn blur(&mut self) {
        self.focused = None;
        self.pressed = false;
    }

    /// Focus a specific tile
    pub fn focus(&mut self, index: usize) {
        if index < self.len {
            self.focused = Some(index);
        }
    }
}

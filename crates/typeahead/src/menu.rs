//! Open/closed menu state and the key routing table.

use crate::key::{KeyCode, KeyInput};

/// Whether the candidate menu is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
	#[default]
	Closed,
	Open,
}

impl MenuState {
	pub fn is_open(self) -> bool {
		self == Self::Open
	}
}

impl From<bool> for MenuState {
	fn from(open: bool) -> Self {
		if open { Self::Open } else { Self::Closed }
	}
}

/// Owner of the [`MenuState`]; reports only real transitions.
#[derive(Debug, Default)]
pub struct MenuStateMachine {
	state: MenuState,
}

impl MenuStateMachine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> MenuState {
		self.state
	}

	pub fn is_open(&self) -> bool {
		self.state.is_open()
	}

	/// Moves to `to`. Returns the new state only if it differs from the old.
	pub fn transition(&mut self, to: MenuState) -> Option<MenuState> {
		if self.state == to {
			return None;
		}
		self.state = to;
		Some(to)
	}
}

/// What a key press asks the control to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
	/// Open the menu by dispatching a search.
	Open,
	/// Commit the highlighted candidate and close.
	Commit,
	/// Highlight the next enabled candidate.
	HighlightNext,
	/// Highlight the previous enabled candidate.
	HighlightPrevious,
	/// Close without committing.
	Close,
	/// Reset text and value.
	Clear,
	/// Nothing to do.
	Ignore,
}

/// Maps a key press to a command for the current menu state.
///
/// | Key | Closed | Open |
/// |---|---|---|
/// | Enter / NumpadEnter | open | commit |
/// | ArrowDown | open | next |
/// | ArrowUp | open | previous (Alt: close) |
/// | Escape | - | close |
/// | Tab | - | commit if `select_on_tab`, else close |
/// | Ctrl+Shift+Backspace | clear | clear |
pub fn route_key(state: MenuState, key: KeyInput, select_on_tab: bool) -> MenuCommand {
	if key.is_clear_combo() {
		return MenuCommand::Clear;
	}
	let open = state.is_open();
	match key.code {
		KeyCode::Enter | KeyCode::NumpadEnter if open => MenuCommand::Commit,
		KeyCode::ArrowUp if key.modifiers.alt => MenuCommand::Close,
		KeyCode::ArrowDown if open => MenuCommand::HighlightNext,
		KeyCode::ArrowUp if open => MenuCommand::HighlightPrevious,
		KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::ArrowDown | KeyCode::ArrowUp => MenuCommand::Open,
		KeyCode::Escape if open => MenuCommand::Close,
		KeyCode::Tab if open && select_on_tab => MenuCommand::Commit,
		KeyCode::Tab if open => MenuCommand::Close,
		_ => MenuCommand::Ignore,
	}
}

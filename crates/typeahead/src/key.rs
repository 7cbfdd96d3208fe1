//! Key input understood by the control.

/// Keys the control reacts to. Everything else is [`KeyCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
	Enter,
	NumpadEnter,
	ArrowDown,
	ArrowUp,
	Escape,
	Tab,
	Backspace,
	Other,
}

/// Key modifiers (Ctrl, Alt, Shift).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
	/// Whether Ctrl is held.
	pub ctrl: bool,
	/// Whether Alt is held.
	pub alt: bool,
	/// Whether Shift is held.
	pub shift: bool,
}

impl Modifiers {
	/// No modifiers pressed.
	pub const NONE: Self = Self {
		ctrl: false,
		alt: false,
		shift: false,
	};

	/// Only Alt pressed.
	pub const ALT: Self = Self {
		ctrl: false,
		alt: true,
		shift: false,
	};

	/// Returns a copy with Ctrl added.
	pub fn ctrl(self) -> Self {
		Self { ctrl: true, ..self }
	}

	/// Returns a copy with Alt added.
	pub fn alt(self) -> Self {
		Self { alt: true, ..self }
	}

	/// Returns a copy with Shift added.
	pub fn shift(self) -> Self {
		Self { shift: true, ..self }
	}
}

/// A key press delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
	pub code: KeyCode,
	pub modifiers: Modifiers,
}

impl KeyInput {
	pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
		Self { code, modifiers }
	}

	/// Ctrl+Shift+Backspace, which resets the control.
	pub fn is_clear_combo(&self) -> bool {
		self.code == KeyCode::Backspace && self.modifiers.ctrl && self.modifiers.shift
	}
}

impl From<KeyCode> for KeyInput {
	fn from(code: KeyCode) -> Self {
		Self::new(code, Modifiers::NONE)
	}
}

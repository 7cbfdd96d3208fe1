use tokio_util::sync::CancellationToken;

/// Monotonic generation counter owned by one dispatcher.
///
/// Generation `0` is never handed out, so it can stand for "nothing armed".
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	current: u64,
}

impl GenerationClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Advances the clock and returns the new generation.
	pub fn advance(&mut self) -> u64 {
		self.current = self.current.wrapping_add(1).max(1);
		self.current
	}

	/// Most recently issued generation, `0` before the first advance.
	pub const fn current(&self) -> u64 {
		self.current
	}

	/// Issues a token for a fresh generation.
	pub fn issue(&mut self) -> GenerationToken {
		GenerationToken::new(self.advance(), CancellationToken::new())
	}
}

/// Generation-scoped cancellation token for one unit of superseded-able work.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	pub fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation. Calling this more than once is a no-op.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// The underlying token, handed to external code that only understands
	/// plain cancellation.
	pub fn cancellation_token(&self) -> CancellationToken {
		self.cancel.clone()
	}

	/// True when `generation` names this token and it has not been cancelled.
	pub fn is_live(&self, generation: u64) -> bool {
		self.generation == generation && !self.is_cancelled()
	}
}

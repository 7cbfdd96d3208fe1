/// Execution classes for type-ahead background work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Search invocations whose results are shown to the user.
	Search,
	/// One-shot debounce timers.
	Timer,
}

impl TaskClass {
	/// Stable name used as the `worker_class` trace field.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Search => "search",
			Self::Timer => "timer",
		}
	}
}

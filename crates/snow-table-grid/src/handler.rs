//! Action invocation
//!
//! [`ActionHandler`] runs a row action: click callbacks fire immediately,
//! links report where to navigate, and endpoint calls are confirmed first and
//! tracked by a [`Mutation`]. Failures are routed to the action's `on_error`
//! callback and never escape.

use std::fmt;
use std::future::Future;

use snow_table_reactive::Signal;

use crate::action::{ActionDescriptor, ActionKind, TableAction};
use crate::context::{ConfirmOptions, TableContext};
use crate::error::ErrorResponse;

/// Progress of the last remote call made through a [`Mutation`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationStatus {
	/// Nothing ran yet
	#[default]
	Idle,
	/// A call is in flight
	Pending,
	/// The last call succeeded
	Success,
	/// The last call failed
	Error(ErrorResponse),
}

/// Reactive tracker for remote calls
#[derive(Clone)]
pub struct Mutation {
	status: Signal<MutationStatus>,
}

impl Default for Mutation {
	fn default() -> Self {
		Self::new()
	}
}

impl Mutation {
	/// Idle tracker
	pub fn new() -> Self {
		Self {
			status: Signal::new(MutationStatus::Idle),
		}
	}

	/// Current status
	pub fn status(&self) -> MutationStatus {
		self.status.get()
	}

	/// Whether a call is in flight
	pub fn is_pending(&self) -> bool {
		self.status.with(|status| *status == MutationStatus::Pending)
	}

	/// Awaits `call`, recording its progress
	pub async fn run<K, F>(&self, call: F) -> Result<K, ErrorResponse>
	where
		F: Future<Output = Result<K, ErrorResponse>>,
	{
		self.status.set(MutationStatus::Pending);
		let result = call.await;
		self.status.set(match &result {
			Ok(_) => MutationStatus::Success,
			Err(err) => MutationStatus::Error(err.clone()),
		});
		result
	}
}

impl fmt::Debug for Mutation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mutation")
			.field("status", &self.status.get_untracked())
			.finish()
	}
}

/// What running an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
	/// The action is disabled or hidden for this row
	Ignored,
	/// Confirmation was declined; nothing ran
	Cancelled,
	/// The click callback ran
	Clicked,
	/// The caller should navigate
	Navigated {
		/// Resolved URL
		href: String,
		/// Open in a new tab
		external: bool,
	},
	/// The endpoint succeeded and `on_success` ran
	Completed,
	/// The endpoint failed and `on_error` ran
	Failed(ErrorResponse),
}

/// Runs row actions against a [`TableContext`]
#[derive(Debug, Clone)]
pub struct ActionHandler {
	ctx: TableContext,
	mutation: Mutation,
}

impl ActionHandler {
	/// Handler using `ctx` for confirmation and links
	pub fn new(ctx: TableContext) -> Self {
		Self {
			ctx,
			mutation: Mutation::new(),
		}
	}

	/// Tracker shared by every endpoint call of this handler
	pub fn mutation(&self) -> &Mutation {
		&self.mutation
	}

	/// Resolves `action` for `item` and runs it
	pub async fn handle<T, K>(&self, action: &TableAction<T, K>, item: &T) -> ActionOutcome {
		self.run(&action.resolve(item), item).await
	}

	/// Runs an already resolved action
	pub async fn run<T, K>(&self, action: &ActionDescriptor<T, K>, item: &T) -> ActionOutcome {
		if action.hidden || action.disabled {
			return ActionOutcome::Ignored;
		}

		match &action.kind {
			ActionKind::Click(on_click) => {
				if !self.confirm_with_descriptor(action).await {
					return ActionOutcome::Cancelled;
				}
				on_click(item);
				ActionOutcome::Clicked
			}
			ActionKind::Link { href, external } => {
				if !self.confirm_with_descriptor(action).await {
					return ActionOutcome::Cancelled;
				}
				ActionOutcome::Navigated {
					href: self.ctx.resolve_link(&href(item)),
					external: *external,
				}
			}
			ActionKind::Endpoint(endpoint) => {
				let confirmed = match &endpoint.with_confirm {
					Some(predicate) => predicate(item).await,
					None => {
						let options = action
							.confirm
							.clone()
							.unwrap_or_else(|| ConfirmOptions::new(action.label.clone()));
						self.ctx.confirm(options).await
					}
				};
				if !confirmed {
					tracing::debug!(action = %action.label, "endpoint action cancelled");
					return ActionOutcome::Cancelled;
				}

				match self.mutation.run((endpoint.endpoint)(item)).await {
					Ok(data) => {
						if let Some(on_success) = &endpoint.on_success {
							on_success(&data, item);
						}
						ActionOutcome::Completed
					}
					Err(err) => {
						tracing::warn!(action = %action.label, %err, "endpoint action failed");
						if let Some(on_error) = &endpoint.on_error {
							on_error(&err, item);
						}
						ActionOutcome::Failed(err)
					}
				}
			}
		}
	}

	async fn confirm_with_descriptor<T, K>(&self, action: &ActionDescriptor<T, K>) -> bool {
		match &action.confirm {
			Some(options) => self.ctx.confirm(options.clone()).await,
			None => true,
		}
	}
}

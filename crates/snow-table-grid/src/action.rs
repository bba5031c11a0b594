//! Row actions
//!
//! An action is either a static [`ActionDescriptor`] or a function producing
//! one per row ([`TableAction::Dynamic`]). [`ActionCell::build`] resolves the
//! actions of one row and lays them out as inline buttons and a dropdown.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::context::{ConfirmOptions, TableContext};
use crate::error::ErrorResponse;

/// Visual emphasis of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVariant {
	/// Neutral
	#[default]
	Default,
	/// Needs attention
	Warning,
	/// Destructive
	Danger,
	/// Informational
	Info,
	/// Positive
	Success,
}

/// Where an action is placed in its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionDisplay {
	/// Inline button
	#[default]
	Button,
	/// Entry of the overflow menu
	Dropdown,
}

type ItemCallback<T> = Rc<dyn Fn(&T)>;
type Endpoint<T, K> = Rc<dyn Fn(&T) -> LocalBoxFuture<'static, Result<K, ErrorResponse>>>;
type ConfirmPredicate<T> = Rc<dyn Fn(&T) -> LocalBoxFuture<'static, bool>>;

/// Remote call performed by an endpoint action
pub struct EndpointAction<T, K> {
	pub(crate) endpoint: Endpoint<T, K>,
	pub(crate) with_confirm: Option<ConfirmPredicate<T>>,
	pub(crate) on_success: Option<Rc<dyn Fn(&K, &T)>>,
	pub(crate) on_error: Option<Rc<dyn Fn(&ErrorResponse, &T)>>,
}

impl<T, K> EndpointAction<T, K> {
	/// Calls `endpoint` with the row
	pub fn new<F>(endpoint: F) -> Self
	where
		F: Fn(&T) -> LocalBoxFuture<'static, Result<K, ErrorResponse>> + 'static,
	{
		Self {
			endpoint: Rc::new(endpoint),
			with_confirm: None,
			on_success: None,
			on_error: None,
		}
	}

	/// Asks `predicate` instead of the context's confirmation dialog
	pub fn with_confirm<F>(mut self, predicate: F) -> Self
	where
		F: Fn(&T) -> LocalBoxFuture<'static, bool> + 'static,
	{
		self.with_confirm = Some(Rc::new(predicate));
		self
	}

	/// Called with the endpoint's result and the row
	pub fn on_success(mut self, f: impl Fn(&K, &T) + 'static) -> Self {
		self.on_success = Some(Rc::new(f));
		self
	}

	/// Called with the failure and the row
	pub fn on_error(mut self, f: impl Fn(&ErrorResponse, &T) + 'static) -> Self {
		self.on_error = Some(Rc::new(f));
		self
	}
}

impl<T, K> Clone for EndpointAction<T, K> {
	fn clone(&self) -> Self {
		Self {
			endpoint: self.endpoint.clone(),
			with_confirm: self.with_confirm.clone(),
			on_success: self.on_success.clone(),
			on_error: self.on_error.clone(),
		}
	}
}

/// What an action does
pub enum ActionKind<T, K> {
	/// Run a callback
	Click(ItemCallback<T>),
	/// Navigate to a URL built from the row
	Link {
		/// Builds the href
		href: Rc<dyn Fn(&T) -> String>,
		/// Open in a new tab
		external: bool,
	},
	/// Call a remote endpoint
	Endpoint(EndpointAction<T, K>),
}

impl<T, K> Clone for ActionKind<T, K> {
	fn clone(&self) -> Self {
		match self {
			Self::Click(f) => Self::Click(f.clone()),
			Self::Link { href, external } => Self::Link {
				href: href.clone(),
				external: *external,
			},
			Self::Endpoint(endpoint) => Self::Endpoint(endpoint.clone()),
		}
	}
}

/// A row action resolved for display and invocation
pub struct ActionDescriptor<T, K = serde_json::Value> {
	/// Label, also used as tooltip
	pub label: String,
	/// Visual emphasis
	pub variant: ActionVariant,
	/// Placement
	pub display: ActionDisplay,
	/// Not shown at all
	pub hidden: bool,
	/// Shown but not invocable
	pub disabled: bool,
	/// Show the label next to the icon
	pub show_label: bool,
	/// Confirmation asked before running
	pub confirm: Option<ConfirmOptions>,
	/// Behaviour
	pub kind: ActionKind<T, K>,
}

impl<T, K> ActionDescriptor<T, K> {
	fn with_kind(label: impl Into<String>, kind: ActionKind<T, K>) -> Self {
		Self {
			label: label.into(),
			variant: ActionVariant::Default,
			display: ActionDisplay::Button,
			hidden: false,
			disabled: false,
			show_label: false,
			confirm: None,
			kind,
		}
	}

	/// Action running `on_click` with the row
	pub fn click(label: impl Into<String>, on_click: impl Fn(&T) + 'static) -> Self {
		Self::with_kind(label, ActionKind::Click(Rc::new(on_click)))
	}

	/// Same-tab link
	pub fn link(label: impl Into<String>, href: impl Fn(&T) -> String + 'static) -> Self {
		Self::with_kind(
			label,
			ActionKind::Link {
				href: Rc::new(href),
				external: false,
			},
		)
	}

	/// Link opened in a new tab
	pub fn external_link(label: impl Into<String>, href: impl Fn(&T) -> String + 'static) -> Self {
		Self::with_kind(
			label,
			ActionKind::Link {
				href: Rc::new(href),
				external: true,
			},
		)
	}

	/// Remote call
	pub fn endpoint(label: impl Into<String>, endpoint: EndpointAction<T, K>) -> Self {
		Self::with_kind(label, ActionKind::Endpoint(endpoint))
	}

	/// Sets the variant
	pub fn variant(mut self, variant: ActionVariant) -> Self {
		self.variant = variant;
		self
	}

	/// Sets the placement
	pub fn display(mut self, display: ActionDisplay) -> Self {
		self.display = display;
		self
	}

	/// Sets whether the action is hidden
	pub fn hidden(mut self, hidden: bool) -> Self {
		self.hidden = hidden;
		self
	}

	/// Sets whether the action is disabled
	pub fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;
		self
	}

	/// Sets whether the label is shown
	pub fn show_label(mut self, show: bool) -> Self {
		self.show_label = show;
		self
	}

	/// Requires confirmation before running
	pub fn confirm(mut self, options: ConfirmOptions) -> Self {
		self.confirm = Some(options);
		self
	}
}

impl<T, K> Clone for ActionDescriptor<T, K> {
	fn clone(&self) -> Self {
		Self {
			label: self.label.clone(),
			variant: self.variant,
			display: self.display,
			hidden: self.hidden,
			disabled: self.disabled,
			show_label: self.show_label,
			confirm: self.confirm.clone(),
			kind: self.kind.clone(),
		}
	}
}

impl<T, K> fmt::Debug for ActionDescriptor<T, K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match &self.kind {
			ActionKind::Click(_) => "click",
			ActionKind::Link { .. } => "link",
			ActionKind::Endpoint(_) => "endpoint",
		};
		f.debug_struct("ActionDescriptor")
			.field("label", &self.label)
			.field("kind", &kind)
			.field("variant", &self.variant)
			.field("display", &self.display)
			.field("hidden", &self.hidden)
			.field("disabled", &self.disabled)
			.finish_non_exhaustive()
	}
}

/// A row action, fixed or computed from the row
pub enum TableAction<T, K = serde_json::Value> {
	/// Same descriptor for every row
	Static(ActionDescriptor<T, K>),
	/// Descriptor computed per row
	Dynamic(Rc<dyn Fn(&T) -> ActionDescriptor<T, K>>),
}

impl<T, K> TableAction<T, K> {
	/// Action computed per row
	pub fn dynamic(f: impl Fn(&T) -> ActionDescriptor<T, K> + 'static) -> Self {
		Self::Dynamic(Rc::new(f))
	}

	/// Descriptor for `item`
	pub fn resolve(&self, item: &T) -> ActionDescriptor<T, K> {
		match self {
			Self::Static(descriptor) => descriptor.clone(),
			Self::Dynamic(f) => f(item),
		}
	}
}

impl<T, K> From<ActionDescriptor<T, K>> for TableAction<T, K> {
	fn from(descriptor: ActionDescriptor<T, K>) -> Self {
		Self::Static(descriptor)
	}
}

impl<T, K> Clone for TableAction<T, K> {
	fn clone(&self) -> Self {
		match self {
			Self::Static(descriptor) => Self::Static(descriptor.clone()),
			Self::Dynamic(f) => Self::Dynamic(f.clone()),
		}
	}
}

/// Anchor attributes for a link action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
	/// Resolved URL
	pub href: String,
	/// `_blank` for external links
	pub target: Option<&'static str>,
	/// `noopener noreferrer` for external links
	pub rel: Option<&'static str>,
}

/// One action placed in a cell
#[derive(Debug, Clone)]
pub struct CellAction<T, K> {
	/// Resolved descriptor
	pub descriptor: ActionDescriptor<T, K>,
	/// Anchor attributes when this is a link
	pub link: Option<LinkTarget>,
}

/// Layout of one row's actions
#[derive(Debug, Clone)]
pub struct ActionCell<T, K = serde_json::Value> {
	/// Inline buttons, in declaration order
	pub buttons: Vec<CellAction<T, K>>,
	/// Overflow menu entries, in declaration order
	pub dropdown: Vec<CellAction<T, K>>,
}

impl<T, K> ActionCell<T, K> {
	/// Resolves each action once for `item`, drops hidden ones and splits
	/// the rest by placement
	pub fn build(item: &T, actions: &[TableAction<T, K>], ctx: &TableContext) -> Self {
		let mut cell = Self {
			buttons: Vec::new(),
			dropdown: Vec::new(),
		};

		for action in actions {
			let descriptor = action.resolve(item);
			if descriptor.hidden {
				continue;
			}
			let link = match &descriptor.kind {
				ActionKind::Link { href, external } => Some(LinkTarget {
					href: ctx.resolve_link(&href(item)),
					target: external.then_some("_blank"),
					rel: external.then_some("noopener noreferrer"),
				}),
				_ => None,
			};
			let placed = CellAction { descriptor, link };
			match placed.descriptor.display {
				ActionDisplay::Button => cell.buttons.push(placed),
				ActionDisplay::Dropdown => cell.dropdown.push(placed),
			}
		}

		cell
	}

	/// Whether the overflow menu has entries
	pub fn has_dropdown(&self) -> bool {
		!self.dropdown.is_empty()
	}

	/// Whether the cell shows nothing
	pub fn is_empty(&self) -> bool {
		self.buttons.is_empty() && self.dropdown.is_empty()
	}
}

//! Action invocation through `ActionHandler`

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::FutureExt;
use rstest::*;
use serde_json::{Value, json};
use serial_test::serial;
use snow_table_grid::{
	ActionDescriptor, ActionHandler, ActionOutcome, Confirm, ConfirmOptions, EndpointAction,
	ErrorResponse, MutationStatus, TableAction, TableContext,
};

#[derive(Debug, Clone)]
struct Travel {
	id: u32,
	name: &'static str,
}

#[fixture]
fn travel() -> Travel {
	Travel { id: 7, name: "Lisbon" }
}

/// Confirmation dialog answering a fixed value and recording what it showed
#[derive(Clone, Default)]
struct ScriptedConfirm {
	answer: bool,
	shown: Rc<RefCell<Vec<ConfirmOptions>>>,
}

#[async_trait(?Send)]
impl Confirm for ScriptedConfirm {
	async fn confirm(&self, options: ConfirmOptions) -> bool {
		self.shown.borrow_mut().push(options);
		self.answer
	}
}

fn handler(answer: bool) -> (ActionHandler, ScriptedConfirm) {
	let confirm = ScriptedConfirm {
		answer,
		..ScriptedConfirm::default()
	};
	(
		ActionHandler::new(TableContext::new().with_confirm(confirm.clone())),
		confirm,
	)
}

type Log = Rc<RefCell<Vec<String>>>;

fn delete_action(log: &Log, fail: bool) -> TableAction<Travel> {
	let (success_log, error_log) = (log.clone(), log.clone());
	ActionDescriptor::endpoint(
		"Delete",
		EndpointAction::new(move |t: &Travel| {
			let id = t.id;
			async move {
				if fail {
					Err(ErrorResponse::new("Forbidden", 403))
				} else {
					Ok(json!({ "deleted": id }))
				}
			}
			.boxed_local()
		})
		.on_success(move |data: &Value, t: &Travel| {
			success_log
				.borrow_mut()
				.push(format!("success {} {}", t.name, data["deleted"]));
		})
		.on_error(move |err: &ErrorResponse, t: &Travel| {
			error_log
				.borrow_mut()
				.push(format!("error {} {}", t.name, err.status));
		}),
	)
	.into()
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_click_runs_immediately(travel: Travel) {
	let (handler, confirm) = handler(false);
	let clicked = Rc::new(RefCell::new(None));
	let sink = clicked.clone();
	let action: TableAction<Travel> =
		ActionDescriptor::click("Edit", move |t: &Travel| *sink.borrow_mut() = Some(t.id)).into();

	let outcome = handler.handle(&action, &travel).await;

	assert_eq!(outcome, ActionOutcome::Clicked);
	assert_eq!(*clicked.borrow(), Some(7));
	assert!(confirm.shown.borrow().is_empty());
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_click_with_confirm_descriptor_can_be_declined(travel: Travel) {
	let (handler, confirm) = handler(false);
	let clicked = Rc::new(RefCell::new(false));
	let sink = clicked.clone();
	let action: TableAction<Travel> =
		ActionDescriptor::click("Archive", move |_: &Travel| *sink.borrow_mut() = true)
			.confirm(ConfirmOptions::new("Archive this travel?"))
			.into();

	let outcome = handler.handle(&action, &travel).await;

	assert_eq!(outcome, ActionOutcome::Cancelled);
	assert!(!*clicked.borrow());
	assert_eq!(confirm.shown.borrow()[0].title, "Archive this travel?");
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_link_reports_navigation(travel: Travel) {
	let (handler, _) = handler(true);
	let action: TableAction<Travel> =
		ActionDescriptor::external_link("Open", |t: &Travel| format!("https://travels.test/{}", t.id)).into();

	let outcome = handler.handle(&action, &travel).await;

	assert_eq!(
		outcome,
		ActionOutcome::Navigated {
			href: "https://travels.test/7".into(),
			external: true,
		}
	);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_endpoint_success(travel: Travel) {
	let (handler, confirm) = handler(true);
	let log = Log::default();

	let outcome = handler.handle(&delete_action(&log, false), &travel).await;

	assert_eq!(outcome, ActionOutcome::Completed);
	assert_eq!(*log.borrow(), ["success Lisbon 7"]);
	assert_eq!(confirm.shown.borrow()[0].title, "Delete");
	assert_eq!(handler.mutation().status(), MutationStatus::Success);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_endpoint_failure_routes_to_on_error(travel: Travel) {
	let (handler, _) = handler(true);
	let log = Log::default();

	let outcome = handler.handle(&delete_action(&log, true), &travel).await;

	assert_eq!(outcome, ActionOutcome::Failed(ErrorResponse::new("Forbidden", 403)));
	assert_eq!(*log.borrow(), ["error Lisbon 403"]);
	assert!(matches!(handler.mutation().status(), MutationStatus::Error(_)));
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_endpoint_declined_runs_nothing(travel: Travel) {
	let (handler, _) = handler(false);
	let log = Log::default();

	let outcome = handler.handle(&delete_action(&log, false), &travel).await;

	assert_eq!(outcome, ActionOutcome::Cancelled);
	assert!(log.borrow().is_empty());
	assert_eq!(handler.mutation().status(), MutationStatus::Idle);
}

#[rstest]
#[case(true, ActionOutcome::Completed)]
#[case(false, ActionOutcome::Cancelled)]
#[serial]
#[tokio::test]
async fn test_with_confirm_predicate_replaces_dialog(
	travel: Travel,
	#[case] answer: bool,
	#[case] expected: ActionOutcome,
) {
	let (handler, confirm) = handler(!answer);
	let action: TableAction<Travel> = ActionDescriptor::endpoint(
		"Refund",
		EndpointAction::new(|_: &Travel| async { Ok(Value::Null) }.boxed_local())
			.with_confirm(move |_: &Travel| async move { answer }.boxed_local()),
	)
	.into();

	let outcome = handler.handle(&action, &travel).await;

	assert_eq!(outcome, expected);
	assert!(confirm.shown.borrow().is_empty());
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_disabled_action_is_ignored(travel: Travel) {
	let (handler, _) = handler(true);
	let log = Log::default();
	let action = match delete_action(&log, false) {
		TableAction::Static(descriptor) => descriptor.disabled(true),
		TableAction::Dynamic(_) => unreachable!(),
	};

	let outcome = handler.run(&action, &travel).await;

	assert_eq!(outcome, ActionOutcome::Ignored);
	assert!(log.borrow().is_empty());
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_dynamic_action_resolved_before_running() {
	let (handler, _) = handler(true);
	let action: TableAction<Travel> = TableAction::dynamic(|t: &Travel| {
		ActionDescriptor::link("Open", |t: &Travel| format!("/travels/{}", t.id)).disabled(t.id == 1)
	});

	let locked = handler.handle(&action, &Travel { id: 1, name: "Oslo" }).await;
	let open = handler.handle(&action, &Travel { id: 2, name: "Rome" }).await;

	assert_eq!(locked, ActionOutcome::Ignored);
	assert_eq!(
		open,
		ActionOutcome::Navigated {
			href: "/travels/2".into(),
			external: false,
		}
	);
}

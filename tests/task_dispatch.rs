// tests/task_dispatch.rs

use std::error::Error;
use std::sync::{Arc, Mutex};

use shipwright::config::{LayoutSection, ProjectKind};
use shipwright::errors::ShipwrightError;
use shipwright::exec::Invocation;
use shipwright::layout::Layout;
use shipwright::tasks::TaskRunner;
use shipwright_test_utils::builders::ProjectConfigBuilder;
use shipwright_test_utils::fake_invoker::FakeInvoker;

type TestResult = Result<(), Box<dyn Error>>;

fn test_layout(root: &std::path::Path) -> Layout {
    Layout::from_config(root, &LayoutSection::default()).expect("layout from tempdir")
}

fn executed_commands(executed: &Arc<Mutex<Vec<Invocation>>>) -> Vec<String> {
    executed
        .lock()
        .unwrap()
        .iter()
        .map(|inv| inv.command_line())
        .collect()
}

#[tokio::test]
async fn unknown_target_executes_nothing() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    let project = ProjectConfigBuilder::cargo("daemon").build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed));
    let runner = TaskRunner::new(&project, &layout, &invoker);

    let result = runner.run_targets(&["bogus".to_string()]).await;

    match result {
        Err(ShipwrightError::UnknownTarget { project, target }) => {
            assert_eq!(project, "daemon");
            assert_eq!(target, "bogus");
        }
        other => panic!("Expected UnknownTarget, got: {:?}", other.err()),
    }
    assert!(executed.lock().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn resolution_error_aborts_before_any_valid_target_runs() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    let project = ProjectConfigBuilder::cargo("daemon").build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed));
    let runner = TaskRunner::new(&project, &layout, &invoker);

    let result = runner
        .run_targets(&["build".to_string(), "bogus".to_string()])
        .await;

    assert!(result.is_err());
    assert!(
        executed.lock().unwrap().is_empty(),
        "no target may run when any requested name fails to resolve"
    );

    Ok(())
}

#[tokio::test]
async fn supported_but_inapplicable_target_is_rejected_per_kind() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    // init-dev exists in the vocabulary but cargo projects don't implement it.
    let project = ProjectConfigBuilder::cargo("daemon").build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed));
    let runner = TaskRunner::new(&project, &layout, &invoker);

    let result = runner.run_targets(&["init-dev".to_string()]).await;

    match result {
        Err(ShipwrightError::UnsupportedTarget { project, target }) => {
            assert_eq!(project, "daemon");
            assert_eq!(target, "init-dev");
        }
        other => panic!("Expected UnsupportedTarget, got: {:?}", other.err()),
    }
    assert!(executed.lock().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn empty_request_defaults_to_build() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    let project = ProjectConfigBuilder::cargo("daemon").build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed));
    TaskRunner::new(&project, &layout, &invoker)
        .run_targets(&[])
        .await?;

    assert_eq!(
        executed_commands(&executed),
        vec!["cargo build --release".to_string()]
    );

    Ok(())
}

#[tokio::test]
async fn targets_run_in_requested_order() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    let project = ProjectConfigBuilder::cargo("daemon").build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed));
    TaskRunner::new(&project, &layout, &invoker)
        .run_targets(&["clean".to_string(), "test".to_string()])
        .await?;

    assert_eq!(
        executed_commands(&executed),
        vec![
            "cargo clean".to_string(),
            "cargo test --release".to_string()
        ]
    );

    Ok(())
}

#[tokio::test]
async fn cargo_features_are_forwarded() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    let project = ProjectConfigBuilder::with_kind(
        "daemon",
        ProjectKind::Cargo {
            features: vec!["libcamera".to_string()],
            static_assets: None,
        },
    )
    .build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed));
    TaskRunner::new(&project, &layout, &invoker)
        .run_targets(&["build".to_string()])
        .await?;

    assert_eq!(
        executed_commands(&executed),
        vec!["cargo build --release --features libcamera".to_string()]
    );

    Ok(())
}

#[tokio::test]
async fn project_env_reaches_child_invocations() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    let project = ProjectConfigBuilder::cargo("capture")
        .env("NATIVE_LIB_ROOT", "/opt/native")
        .build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed));
    TaskRunner::new(&project, &layout, &invoker)
        .run_targets(&["build".to_string()])
        .await?;

    let invocations = executed.lock().unwrap();
    assert_eq!(invocations.len(), 1);
    assert!(
        invocations[0]
            .envs
            .contains(&("NATIVE_LIB_ROOT".to_string(), "/opt/native".to_string()))
    );

    Ok(())
}

#[tokio::test]
async fn failing_target_aborts_remaining_targets() -> TestResult {
    let root = tempfile::tempdir()?;
    let layout = test_layout(root.path());
    let project = ProjectConfigBuilder::cargo("daemon").build();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let invoker = FakeInvoker::new(Arc::clone(&executed)).with_failure("cargo clean", 101);
    let result = TaskRunner::new(&project, &layout, &invoker)
        .run_targets(&["clean".to_string(), "build".to_string()])
        .await;

    match result {
        Err(ShipwrightError::ToolFailed { code, .. }) => assert_eq!(code, 101),
        other => panic!("Expected ToolFailed, got: {:?}", other.err()),
    }
    // clean ran (and failed); build was never attempted.
    assert_eq!(
        executed_commands(&executed),
        vec!["cargo clean".to_string()]
    );

    Ok(())
}

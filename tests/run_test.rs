//! Tests for handler dispatch and error provenance

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use argtree::application::{run, ResolveError, RunError, RunOutcome};
use argtree::domain::{ArgumentDef, Bindings, CommandTree, OptionDef, ScalarKind};

#[test]
fn given_matching_argv_when_running_then_handler_invoked_once_with_bindings() {
    // Arrange
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::new(RefCell::new(None::<Bindings>));
    let mut tree = CommandTree::new("git");
    {
        let calls = Rc::clone(&calls);
        let seen = Rc::clone(&seen);
        tree.root_mut()
            .subcommand("remote")
            .unwrap()
            .subcommand("add")
            .unwrap()
            .argument("name", ArgumentDef::new(ScalarKind::String))
            .unwrap()
            .argument("url", ArgumentDef::new(ScalarKind::String))
            .unwrap()
            .handler(move |bindings| {
                calls.set(calls.get() + 1);
                *seen.borrow_mut() = Some(bindings.clone());
                Ok(())
            })
            .unwrap();
    }

    // Act
    let outcome = run(&tree, &["remote", "add", "origin", "https://example.com"]).unwrap();

    // Assert
    assert!(matches!(outcome, RunOutcome::Executed { .. }));
    assert_eq!(calls.get(), 1);
    let bindings = seen.borrow().clone().expect("handler saw bindings");
    assert_eq!(
        bindings.argument("url").and_then(|v| v.as_str()),
        Some("https://example.com")
    );
}

#[test]
fn given_failing_handler_when_running_then_handler_error_keeps_source() {
    let mut tree = CommandTree::new("deploy");
    tree.root_mut()
        .handler(|_| Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no access").into()))
        .unwrap();

    let err = run(&tree, &[] as &[&str]).unwrap_err();

    assert!(!err.is_engine());
    assert!(err.diagnostic().is_none());
    match err {
        RunError::Handler { command, source } => {
            assert_eq!(command, "deploy");
            let io = source
                .downcast_ref::<std::io::Error>()
                .expect("original error type preserved");
            assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected handler error, got {other:?}"),
    }
}

#[test]
fn given_resolution_failure_when_running_then_engine_error_and_handler_not_called() {
    let calls = Rc::new(Cell::new(0));
    let mut tree = CommandTree::new("build");
    {
        let calls = Rc::clone(&calls);
        tree.root_mut()
            .option("target", OptionDef::new(ScalarKind::Number))
            .unwrap()
            .handler(move |_| {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .unwrap();
    }

    let err = run(&tree, &["--target"]).unwrap_err();

    assert!(err.is_engine());
    assert!(matches!(
        err.diagnostic().map(|d| &d.error),
        Some(ResolveError::MissingOptionValue { .. })
    ));
    assert_eq!(calls.get(), 0);
}

#[test]
fn given_help_or_version_when_running_then_no_handler_call() {
    let calls = Rc::new(Cell::new(0));
    let mut tree = CommandTree::new("tool").with_version("1.2.3");
    {
        let calls = Rc::clone(&calls);
        tree.root_mut()
            .handler(move |_| {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .unwrap();
    }
    let root = tree.root();

    assert_eq!(
        run(&tree, &["--help"]).unwrap(),
        RunOutcome::Help { command: root }
    );
    assert_eq!(
        run(&tree, &["-v"]).unwrap(),
        RunOutcome::Version(Some("1.2.3".to_string()))
    );
    assert_eq!(calls.get(), 0);
}

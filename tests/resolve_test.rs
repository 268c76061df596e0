//! Tests for argv resolution against a declared command tree

use rstest::rstest;

use argtree::application::{resolve, HintPolicy, Outcome, ResolveError, Slot};
use argtree::domain::{
    ArgumentDef, Bindings, CommandId, CommandTree, HandlerError, OptionDef, ScalarKind, Value,
};
use argtree::util::testing;

fn noop(_: &Bindings) -> Result<(), HandlerError> {
    Ok(())
}

fn matched(outcome: Outcome) -> (CommandId, Bindings) {
    match outcome {
        Outcome::Matched { command, bindings } => (command, bindings),
        other => panic!("expected a match, got {other:?}"),
    }
}

fn resolve_err(tree: &CommandTree, argv: &[&str]) -> ResolveError {
    resolve(tree, argv).expect_err("resolution should fail").error
}

/// `app <name:string>` with a handler and no options
fn required_positional() -> CommandTree {
    let mut tree = CommandTree::new("app");
    tree.root_mut()
        .argument("name", ArgumentDef::new(ScalarKind::String))
        .unwrap()
        .handler(noop)
        .unwrap();
    tree
}

/// `git remote add <name> <url>`
fn git() -> CommandTree {
    let mut tree = CommandTree::new("git").with_version("2.0.0");
    tree.root_mut()
        .subcommand("remote")
        .unwrap()
        .subcommand("add")
        .unwrap()
        .argument("name", ArgumentDef::new(ScalarKind::String))
        .unwrap()
        .argument("url", ArgumentDef::new(ScalarKind::String))
        .unwrap()
        .handler(noop)
        .unwrap();
    tree
}

/// `tool build [--minify|-m] [--target <n>] [--tag <a,b>] [--mode <choice>]`
fn build() -> CommandTree {
    let mut tree = CommandTree::new("tool");
    tree.root_mut()
        .subcommand("build")
        .unwrap()
        .option("minify", OptionDef::flag().alias("m"))
        .unwrap()
        .option("target", OptionDef::new(ScalarKind::Number).optional())
        .unwrap()
        .option("tag", OptionDef::new(ScalarKind::String.array()).optional())
        .unwrap()
        .option(
            "mode",
            OptionDef::new(ScalarKind::Choice)
                .choices(["debug", "release"])
                .default_value("debug"),
        )
        .unwrap()
        .handler(noop)
        .unwrap();
    tree
}

// ============================================================
// Positional vs option ambiguity
// ============================================================

#[test]
fn given_required_positional_and_no_options_when_flag_given_then_unexpected_option() {
    testing::init_test_setup();
    let tree = required_positional();

    let err = resolve_err(&tree, &["--x"]);

    assert_eq!(
        err,
        ResolveError::UnexpectedOption {
            command: "app".to_string(),
            token: "--x".to_string(),
            pending: Some("name".to_string()),
        }
    );
}

#[test]
fn given_defaulted_positional_and_no_options_when_flag_given_then_unknown_option() {
    let mut tree = CommandTree::new("app");
    tree.root_mut()
        .argument(
            "name",
            ArgumentDef::new(ScalarKind::String).default_value("world"),
        )
        .unwrap()
        .handler(noop)
        .unwrap();

    let err = resolve_err(&tree, &["--x"]);

    assert!(matches!(err, ResolveError::UnknownOption { ref token, .. } if token == "--x"));
    // Without the flag the default is bound
    let (_, bindings) = matched(resolve(&tree, &[] as &[&str]).unwrap());
    assert_eq!(bindings.argument("name"), Some(&Value::String("world".into())));
}

#[test]
fn given_optional_positional_when_flag_precedes_value_then_flag_binds_and_value_fills_slot() {
    let mut tree = CommandTree::new("app");
    tree.root_mut()
        .argument("file", ArgumentDef::new(ScalarKind::Path).optional())
        .unwrap()
        .option("force", OptionDef::flag())
        .unwrap()
        .handler(noop)
        .unwrap();

    let (_, bindings) = matched(resolve(&tree, &["--force", "out.txt"]).unwrap());

    assert!(bindings.flag("force"));
    assert_eq!(
        bindings.argument("file").and_then(Value::as_path).map(|p| p.raw()),
        Some("out.txt")
    );
}

#[test]
fn given_no_pending_positional_and_no_options_when_flag_given_then_unexpected_option() {
    let tree = git();
    let err = resolve_err(&tree, &["remote", "add", "origin", "url", "--force"]);
    assert!(matches!(err, ResolveError::UnexpectedOption { pending: None, .. }));
}

#[test]
fn given_undeclared_flag_when_options_exist_then_unknown_option_lists_known() {
    let tree = build();
    let err = resolve_err(&tree, &["build", "--fast"]);
    match err {
        ResolveError::UnknownOption { command, known, .. } => {
            assert_eq!(command, "tool build");
            assert_eq!(known, vec!["minify", "mode", "tag", "target"]);
        }
        other => panic!("expected UnknownOption, got {other:?}"),
    }
}

// ============================================================
// End-to-end scenarios
// ============================================================

#[test]
fn given_remote_add_when_resolving_then_binds_both_positionals() {
    let tree = git();

    let (command, bindings) =
        matched(resolve(&tree, &["remote", "add", "origin", "https://example.com"]).unwrap());

    assert_eq!(tree.display_path(command), "git remote add");
    assert_eq!(bindings.argument("name").and_then(Value::as_str), Some("origin"));
    assert_eq!(
        bindings.argument("url").and_then(Value::as_str),
        Some("https://example.com")
    );
    assert!(bindings.options.is_empty());
}

#[rstest]
#[case(&["build", "-m"], true)]
#[case(&["build", "--minify"], true)]
#[case(&["build", "--no-minify"], false)]
#[case(&["build", "--minify=off"], false)]
#[case(&["build", "-m=yes"], true)]
#[case(&["build"], false)]
fn given_boolean_option_forms_when_resolving_then_binds_flag(
    #[case] argv: &[&str],
    #[case] expected: bool,
) {
    let tree = build();
    let (_, bindings) = matched(resolve(&tree, argv).unwrap());
    assert_eq!(bindings.option("minify"), Some(&Value::Bool(expected)));
}

#[test]
fn given_boolean_option_when_followed_by_token_then_token_not_consumed() {
    let tree = build();
    let err = resolve_err(&tree, &["build", "-m", "true"]);
    assert!(matches!(err, ResolveError::UnexpectedArgument { declared: 0, .. }));
}

#[test]
fn given_value_option_without_following_token_then_missing_option_value() {
    let tree = build();
    let err = resolve_err(&tree, &["build", "--target"]);
    assert_eq!(
        err,
        ResolveError::MissingOptionValue {
            command: "tool build".to_string(),
            option: "target".to_string(),
        }
    );
}

#[rstest]
#[case(&["build", "--target", "3"])]
#[case(&["build", "--target=3"])]
fn given_value_option_when_resolving_then_binds_next_or_inline(#[case] argv: &[&str]) {
    let tree = build();
    let (_, bindings) = matched(resolve(&tree, argv).unwrap());
    assert_eq!(bindings.option("target").and_then(Value::as_f64), Some(3.0));
}

#[test]
fn given_value_option_when_next_token_is_flag_shaped_then_consumed_as_value() {
    let mut tree = CommandTree::new("calc");
    tree.root_mut()
        .option("offset", OptionDef::new(ScalarKind::Number))
        .unwrap()
        .handler(noop)
        .unwrap();

    let (_, bindings) = matched(resolve(&tree, &["--offset", "-5"]).unwrap());
    assert_eq!(bindings.option("offset").and_then(Value::as_f64), Some(-5.0));
}

#[test]
fn given_number_array_option_when_resolving_then_both_list_forms_agree() {
    let mut tree = CommandTree::new("stats");
    tree.root_mut()
        .option("values", OptionDef::new(ScalarKind::Number.array()))
        .unwrap()
        .handler(noop)
        .unwrap();
    let expected = Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);

    let (_, bare) = matched(resolve(&tree, &["--values", "1,2,3"]).unwrap());
    let (_, bracketed) = matched(resolve(&tree, &["--values", "[1, 2, 3]"]).unwrap());

    assert_eq!(bare.option("values"), Some(&expected));
    assert_eq!(bracketed.option("values"), Some(&expected));
}

#[test]
fn given_repeated_array_option_when_resolving_then_elements_accumulate() {
    let tree = build();
    let (_, bindings) =
        matched(resolve(&tree, &["build", "--tag", "a", "--tag=b,c"]).unwrap());
    assert_eq!(bindings.option("tag").unwrap().to_string(), "[a,b,c]");
}

#[test]
fn given_repeated_scalar_option_when_resolving_then_last_wins() {
    let tree = build();
    let (_, bindings) =
        matched(resolve(&tree, &["build", "--target", "1", "--target", "2"]).unwrap());
    assert_eq!(bindings.option("target").and_then(Value::as_f64), Some(2.0));
}

// ============================================================
// Defaults and required values
// ============================================================

#[test]
fn given_unset_options_when_resolving_then_defaults_bound_and_optional_absent() {
    let tree = build();
    let (_, bindings) = matched(resolve(&tree, &["build"]).unwrap());

    assert_eq!(bindings.option("mode"), Some(&Value::Choice("debug".into())));
    assert_eq!(bindings.option("target"), None);
    assert_eq!(bindings.option("tag"), None);
}

#[test]
fn given_missing_positional_when_resolving_then_missing_required_argument() {
    let tree = git();
    let err = resolve_err(&tree, &["remote", "add", "origin"]);
    assert_eq!(
        err,
        ResolveError::MissingRequiredArgument {
            command: "git remote add".to_string(),
            slot: Slot::Argument,
            name: "url".to_string(),
        }
    );
}

#[test]
fn given_required_option_unset_when_resolving_then_missing_required_argument() {
    let mut tree = CommandTree::new("deploy");
    tree.root_mut()
        .option("env", OptionDef::new(ScalarKind::String))
        .unwrap()
        .handler(noop)
        .unwrap();

    let err = resolve_err(&tree, &[]);
    assert!(matches!(
        err,
        ResolveError::MissingRequiredArgument { slot: Slot::Option, ref name, .. } if name == "env"
    ));
}

#[test]
fn given_extra_positional_when_resolving_then_unexpected_argument() {
    let tree = git();
    let err = resolve_err(&tree, &["remote", "add", "a", "b", "c"]);
    assert_eq!(
        err,
        ResolveError::UnexpectedArgument {
            command: "git remote add".to_string(),
            token: "c".to_string(),
            declared: 2,
        }
    );
}

#[test]
fn given_uncoercible_value_when_resolving_then_invalid_value_with_examples() {
    let tree = build();
    let diagnostic = resolve(&tree, &["build", "--target", "far"]).unwrap_err();

    assert_eq!(diagnostic.hint, HintPolicy::Examples);
    assert!(!diagnostic.examples().is_empty());
    assert_eq!(diagnostic.usage, "tool build [options]");
    match diagnostic.error {
        ResolveError::InvalidValue { slot, name, source, .. } => {
            assert_eq!(slot, Slot::Option);
            assert_eq!(name, "target");
            assert_eq!(source.raw, "far");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn given_first_of_two_errors_when_resolving_then_first_reported() {
    let tree = build();
    let err = resolve_err(&tree, &["build", "--target", "x", "--unknown"]);
    assert!(matches!(err, ResolveError::InvalidValue { .. }));
}

// ============================================================
// Reserved flags, end of flags, descent
// ============================================================

#[rstest]
#[case(&["--help"])]
#[case(&["remote", "-h"])]
#[case(&["remote", "add", "origin", "--help"])]
fn given_help_flag_at_any_depth_then_help_for_active_command(#[case] argv: &[&str]) {
    let tree = git();
    match resolve(&tree, argv).unwrap() {
        Outcome::Help { command } => {
            let expected: Vec<&str> = std::iter::once("git")
                .chain(argv.iter().copied().take_while(|t| *t == "remote" || *t == "add"))
                .collect();
            assert_eq!(tree.path(command), expected);
        }
        other => panic!("expected help, got {other:?}"),
    }
}

#[rstest]
#[case(&["--version"])]
#[case(&["remote", "add", "-v"])]
fn given_version_flag_then_version_outcome(#[case] argv: &[&str]) {
    let tree = git();
    assert_eq!(
        resolve(&tree, argv).unwrap(),
        Outcome::Version(Some("2.0.0".to_string()))
    );
}

#[test]
fn given_help_after_end_of_flags_then_bound_as_positional() {
    let tree = git();
    let (_, bindings) =
        matched(resolve(&tree, &["remote", "add", "--", "--help", "-v"]).unwrap());
    assert_eq!(bindings.argument("name").and_then(Value::as_str), Some("--help"));
    assert_eq!(bindings.argument("url").and_then(Value::as_str), Some("-v"));
}

#[test]
fn given_flag_shaped_token_after_end_of_flags_then_fills_required_positional() {
    let tree = required_positional();
    let (_, bindings) = matched(resolve(&tree, &["--", "--x"]).unwrap());
    assert_eq!(bindings.argument("name").and_then(Value::as_str), Some("--x"));
}

#[test]
fn given_command_without_handler_when_resolving_then_help() {
    let tree = git();
    let outcome = resolve(&tree, &["remote"]).unwrap();
    let remote = tree.child(tree.root(), "remote").unwrap();
    assert_eq!(outcome, Outcome::Help { command: remote });
}

#[test]
fn given_subcommand_alias_when_resolving_then_not_used_for_descent() {
    let mut tree = git();
    let remote = tree.child(tree.root(), "remote").unwrap();
    tree.add_alias(remote, ["r"]);

    let err = resolve_err(&tree, &["r", "add"]);
    assert!(matches!(err, ResolveError::UnexpectedArgument { ref token, .. } if token == "r"));
}

#[test]
fn given_negated_literal_option_when_resolving_then_binds_literal_name() {
    let mut tree = CommandTree::new("fetch");
    tree.root_mut()
        .option("no-cache", OptionDef::flag())
        .unwrap()
        .handler(noop)
        .unwrap();

    let (_, bindings) = matched(resolve(&tree, &["--no-cache"]).unwrap());
    assert!(bindings.flag("no-cache"));
}

#[test]
fn given_negated_value_option_when_resolving_then_unexpected_option() {
    let tree = build();
    let err = resolve_err(&tree, &["build", "--no-target"]);
    assert!(matches!(err, ResolveError::UnexpectedOption { .. }));
}

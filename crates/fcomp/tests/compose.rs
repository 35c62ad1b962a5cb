//! Resolution tests
//!
//! Each test writes a small tree of feature files into a temporary directory and resolves one of
//! them.
use fcomp::composition::Composition;
use fcomp::emitter::{emit, EmitOptions};
use fcomp::feature_document::FeatureDocument;
use fcomp::resolver::{resolve, resolve_with, ExpansionContext, ResolveError};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("FCOMP_LOG"))
        .with_test_writer()
        .try_init();
}

/// Write `files` (path, content) into a new temporary directory
fn tree(files: &[(&str, &str)]) -> TempDir {
    init_logging();

    let directory = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let path = directory.path().join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    directory
}

fn canonical(directory: &TempDir, path: &str) -> PathBuf {
    directory.path().join(path).canonicalize().unwrap()
}

fn compose(directory: &TempDir, path: &str) -> Result<Composition, ResolveError> {
    Composition::new(&directory.path().join(path), &EmitOptions::default())
}

#[test]
fn nested_inclusion() {
    let directory = tree(&[
        (
            "features/root.feature",
            r#"Feature: root
  Scenario: main
    Given root value "{{ root_var }}"
    {% scenario "middle", feature="../library/middle.feature" %}
    Then root done "{{ shared }}"
"#,
        ),
        (
            "library/middle.feature",
            r#"Feature: middle
  Scenario: middle
    Given middle value "{{ middle_var }}" and "{{ shared }}"
    {% scenario "leaf", feature="leaves/leaf.feature" %}
"#,
        ),
        (
            "library/leaves/leaf.feature",
            r#"Feature: leaf
  Scenario: leaf
      Given a table
        | name | value |
        | {{ leaf_var }} | 1 |
"#,
        ),
    ]);

    let composition = compose(&directory, "features/root.feature").unwrap();

    insta::assert_snapshot!(&composition.text, @r#"
Feature: root
  Scenario: main
    Given root value "{{ root_var }}"
    Given middle value "{{ middle_var }}" and "{{ shared }}"
    Given a table
      | name           | value |
      | {{ leaf_var }} | 1     |
    Then root done "{{ shared }}"
"#);

    assert_eq!(
        composition.variables.to_vec(),
        vec!["root_var", "middle_var", "shared", "leaf_var"]
    );

    // the rendered text yields the same variables
    assert_eq!(
        fcomp::variables::extract(&composition.text)
            .unwrap()
            .to_vec(),
        composition.variables.to_vec()
    );
}

#[test]
fn directives_resolve_in_source_order() {
    let directory = tree(&[
        (
            "root.feature",
            r#"Feature: order
  Scenario: main
    {% scenario "two", feature="lib.feature" %}
    {% scenario "one", feature="lib.feature" %}
    {% scenario "helper", feature="root.feature" %}

  Scenario: helper
    Given helper
"#,
        ),
        (
            "lib.feature",
            r#"Feature: lib
  Scenario: one
    Given one
  Scenario: two
    Given two
"#,
        ),
    ]);

    let mut context = ExpansionContext::default();
    let document = resolve_with(&mut context, &directory.path().join("root.feature")).unwrap();

    assert_eq!(
        emit(&document, &EmitOptions::default()),
        r#"Feature: order
  Scenario: main
    Given two
    Given one
    Given helper

  Scenario: helper
    Given helper
"#
    );

    // each file is read once
    let root = canonical(&directory, "root.feature");
    let lib = canonical(&directory, "lib.feature");
    assert_eq!(
        context.loaded().collect::<Vec<_>>(),
        vec![root.as_path(), lib.as_path()]
    );
    assert!(context.chain().is_empty());
}

#[test]
fn cyclic_inclusion() {
    let directory = tree(&[
        (
            "a.feature",
            "Feature: a\n  Scenario: x\n    {% scenario \"x\", feature=\"b.feature\" %}\n",
        ),
        (
            "b.feature",
            "Feature: b\n  Scenario: x\n    {% scenario \"x\", feature=\"a.feature\" %}\n",
        ),
    ]);

    let error = resolve(&directory.path().join("a.feature")).unwrap_err();
    let ResolveError::CyclicInclusion { chain } = &error else {
        panic!("expected cyclic inclusion, got {error:?}");
    };

    let links: Vec<(&Path, &str)> = chain
        .0
        .iter()
        .map(|link| (link.path.as_path(), link.scenario.as_str()))
        .collect();
    let a = canonical(&directory, "a.feature");
    let b = canonical(&directory, "b.feature");
    assert_eq!(
        links,
        vec![(a.as_path(), "x"), (b.as_path(), "x"), (a.as_path(), "x")]
    );

    let message = error.to_string();
    assert!(message.starts_with("cyclic scenario inclusion: "), "{message}");
    assert!(message.contains(" -> "), "{message}");
}

#[test]
fn scenario_including_itself() {
    let directory = tree(&[(
        "self.feature",
        "Feature: self\n  Scenario: x\n    Given x\n    {% scenario \"x\", feature=\"self.feature\" %}\n",
    )]);

    let error = resolve(&directory.path().join("self.feature")).unwrap_err();
    let ResolveError::CyclicInclusion { chain } = &error else {
        panic!("expected cyclic inclusion, got {error:?}");
    };
    assert_eq!(chain.0.len(), 2);
    assert_eq!(chain.0[0], chain.0[1]);
}

#[test]
fn same_scenario_included_twice_is_not_a_loop() {
    let directory = tree(&[
        (
            "root.feature",
            r#"Feature: twice
  Scenario: main
    {% scenario "step", feature="lib.feature" %}
    {% scenario "step", feature="lib.feature" %}
"#,
        ),
        ("lib.feature", "Feature: lib\n  Scenario: step\n    Given step\n"),
    ]);

    let composition = compose(&directory, "root.feature").unwrap();
    assert_eq!(
        composition.text,
        "Feature: twice\n  Scenario: main\n    Given step\n    Given step\n"
    );
}

#[test]
fn scenario_not_found() {
    let directory = tree(&[
        (
            "root.feature",
            "Feature: root\n  Scenario: main\n    {% scenario \"disabled\", feature=\"lib.feature\" %}\n",
        ),
        (
            "lib.feature",
            "Feature: lib\n  # Scenario: disabled\n  #   Given nothing\n",
        ),
    ]);

    let error = resolve(&directory.path().join("root.feature")).unwrap_err();
    let ResolveError::ScenarioNotFound {
        scenario,
        path,
        referenced_by,
    } = &error
    else {
        panic!("expected scenario not found, got {error:?}");
    };

    assert_eq!(scenario, "disabled");
    assert_eq!(path, &canonical(&directory, "lib.feature"));
    assert_eq!(referenced_by, &canonical(&directory, "root.feature"));
}

#[test]
fn tagged_commented_scenario_is_not_found() {
    let directory = tree(&[
        (
            "root.feature",
            "Feature: root\n  Scenario: main\n    {% scenario \"disabled\", feature=\"lib.feature\" %}\n",
        ),
        (
            "lib.feature",
            "Feature: f\n  @smoke\n  # Scenario: disabled\n  #   Given \"{{ secret }}\"\n",
        ),
    ]);

    let error = resolve(&directory.path().join("root.feature")).unwrap_err();
    assert!(
        matches!(&error, ResolveError::ScenarioNotFound { scenario, .. } if scenario == "disabled"),
        "{error:?}"
    );
}

#[test]
fn ambiguous_scenario() {
    let directory = tree(&[
        (
            "root.feature",
            "Feature: root\n  Scenario: main\n    {% scenario \"twin\", feature=\"lib.feature\" %}\n",
        ),
        (
            "lib.feature",
            "Feature: lib\n  Scenario: twin\n    Given a\n  Scenario: twin\n    Given b\n",
        ),
    ]);

    let error = resolve(&directory.path().join("root.feature")).unwrap_err();
    assert!(
        matches!(&error, ResolveError::AmbiguousScenario { scenario, .. } if scenario == "twin"),
        "{error:?}"
    );
}

#[test]
fn file_not_found() {
    let directory = tree(&[(
        "root.feature",
        "Feature: root\n  Scenario: main\n    {% scenario \"x\", feature=\"missing/lib.feature\" %}\n",
    )]);

    let error = resolve(&directory.path().join("root.feature")).unwrap_err();
    assert!(
        matches!(error, ResolveError::FileNotFound { .. }),
        "{error:?}"
    );

    let message = error.to_string();
    assert!(message.contains("lib.feature"), "{message}");
    assert!(
        message.contains(&format!(
            "referenced by {}",
            canonical(&directory, "root.feature").display()
        )),
        "{message}"
    );
}

#[test]
fn root_file_not_found() {
    let directory = tree(&[]);

    let error = resolve(&directory.path().join("missing.feature")).unwrap_err();
    assert!(error.to_string().contains("root document"), "{error}");
}

#[test]
fn malformed_directive_in_included_file() {
    let directory = tree(&[
        (
            "root.feature",
            "Feature: root\n  Scenario: main\n    {% scenario \"x\", feature=\"lib.feature\" %}\n",
        ),
        (
            "lib.feature",
            "Feature: lib\n\n  Scenario: x\n    {% scenario x, feature=\"other.feature\" %}\n",
        ),
    ]);

    let error = resolve(&directory.path().join("root.feature")).unwrap_err();
    let ResolveError::MalformedDirective { path, line, text } = &error else {
        panic!("expected malformed directive, got {error:?}");
    };

    assert_eq!(path, &canonical(&directory, "lib.feature"));
    assert_eq!(*line, 4);
    assert_eq!(text, r#"{% scenario x, feature="other.feature" %}"#);
}

#[test]
fn inactive_scenarios_are_preserved() {
    let text = r#"Feature: inactive
  Scenario: active
    Given "{{ used }}"

  # Scenario: disabled
  #   Given "{{ unused }}"
  #   {% scenario "nowhere", feature="does/not/exist.feature" %}
  #     |a|b|
"#;
    let directory = tree(&[("root.feature", text)]);

    let composition = compose(&directory, "root.feature").unwrap();

    assert_eq!(composition.text, text);
    assert_eq!(composition.variables.to_vec(), vec!["used"]);
}

#[test]
fn all_inactive_document_is_byte_identical() {
    let text = "Feature: off\n#  Scenario: a\n#      Given   x\n\n   # Scenario: b\n  #|x|y|";
    let directory = tree(&[("root.feature", text)]);

    assert_eq!(compose(&directory, "root.feature").unwrap().text, text);
}

#[test]
fn documents_without_directives_are_only_normalized() {
    let text = r#"Feature: plain
  Background:
      Given   a background

  Scenario: plain
        Given a step
    | a | b |
    |ccc|d|
      """
        content
      """
"#;
    let directory = tree(&[("root.feature", text)]);

    let resolved = compose(&directory, "root.feature").unwrap().text;
    let unresolved = emit(
        &FeatureDocument::parse(text).unwrap(),
        &EmitOptions::default(),
    );

    assert_eq!(resolved, unresolved);
}

#[test]
fn included_doc_strings_keep_their_content() {
    let directory = tree(&[
        (
            "root.feature",
            "Feature: root\n  Scenario: main\n    {% scenario \"payload\", feature=\"lib.feature\" %}\n",
        ),
        (
            "lib.feature",
            "Feature: lib\n        Scenario: payload\n          Given a payload\n            \"\"\"json\n            {\n              \"value\": \"{{ payload_value }}\"\n            }\n            \"\"\"\n",
        ),
    ]);

    let composition = compose(&directory, "root.feature").unwrap();

    assert_eq!(
        composition.text,
        "Feature: root\n  Scenario: main\n    Given a payload\n      \"\"\"json\n      {\n        \"value\": \"{{ payload_value }}\"\n      }\n      \"\"\"\n"
    );
    assert_eq!(composition.variables.to_vec(), vec!["payload_value"]);
}

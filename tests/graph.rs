//! End-to-end graph construction over on-disk fixture trees.

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use modscope::prelude::*;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A package tree exercising absolute, relative, attribute, and submodule
/// imports together:
///
/// ```text
/// app/
///   __init__.py                  from app import utils
///   utils.py
///   fields/
///     __init__.py                (defines BASE)
///     json.py                    from app.fields import BASE
///                                from app.fields.security.password import PasswordField
///     security/
///       __init__.py              from .. import BASE
///       password.py              from app import fields
///                                from app.fields import json
/// ```
fn fixture() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");

    write(&app.join("__init__.py"), "from app import utils\n");
    write(&app.join("utils.py"), "");
    write(&app.join("fields").join("__init__.py"), "BASE = 1\n");
    write(
        &app.join("fields").join("json.py"),
        "from app.fields import BASE\nfrom app.fields.security.password import PasswordField\n",
    );
    write(
        &app.join("fields").join("security").join("__init__.py"),
        "from .. import BASE\n",
    );
    write(
        &app.join("fields").join("security").join("password.py"),
        "from app import fields\nfrom app.fields import json\n",
    );

    root
}

fn build(root: &tempfile::TempDir, workers: usize) -> BuildReport {
    let locator = Arc::new(SearchPathLocator::new(vec![root.path().to_path_buf()]));
    GraphBuilder::new(locator)
        .with_workers(workers)
        .build(&[root.path().join("app")])
        .unwrap()
}

#[test]
fn test_builds_expected_edge_counts() {
    // (imports, imported_by) per module, mirroring the fixture above
    let expected: HashMap<&str, (usize, usize)> = [
        ("app", (1, 0)),
        ("app.utils", (0, 1)),
        ("app.fields", (0, 3)),
        ("app.fields.json", (2, 1)),
        ("app.fields.security", (1, 0)),
        ("app.fields.security.password", (2, 1)),
    ]
    .into();

    let root = fixture();
    let report = build(&root, 4);

    assert_eq!(report.graph.len(), expected.len());
    assert_eq!(report.graph.unmet_count(), 0);
    assert_eq!(report.skipped_files, 0);
    assert_eq!(report.dropped_edges, 0);

    for (name, (imports, imported_by)) in expected {
        let module = report
            .graph
            .get(name)
            .unwrap_or_else(|| panic!("module {name} missing from graph"));

        assert_eq!(
            module.imports().map(|s| s.len()),
            Some(imports),
            "outgoing edge count of {name}"
        );
        assert_eq!(
            module.imported_by().len(),
            imported_by,
            "incoming edge count of {name}"
        );
    }
}

#[test]
fn test_attribute_imports_collapse_onto_owning_module() {
    let root = fixture();
    let report = build(&root, 4);
    let graph = &report.graph;

    // `from app.fields import BASE` resolves to app.fields, not app.fields.BASE
    let json = graph.get("app.fields.json").unwrap();
    let targets: Vec<String> = json
        .imports()
        .unwrap()
        .iter()
        .map(|e| graph.node(e.module).name().to_string())
        .collect();
    assert!(targets.contains(&"app.fields".to_string()));
    assert!(!targets.iter().any(|t| t.ends_with("BASE")));
}

#[test]
fn test_edge_locations_point_at_the_import_statements() {
    let root = fixture();
    let report = build(&root, 1);
    let graph = &report.graph;

    let password = graph.get("app.fields.security.password").unwrap();
    let mut lines: Vec<u32> = password
        .imports()
        .unwrap()
        .iter()
        .map(|e| e.location.line)
        .collect();
    lines.sort_unstable();
    assert_eq!(lines, vec![1, 2]);

    for edge in password.imports().unwrap() {
        assert!(edge.location.file.ends_with("password.py"));
    }
}

#[test]
fn test_same_graph_for_any_worker_count() {
    let root = fixture();
    let single = build(&root, 1);
    let many = build(&root, 8);

    assert_eq!(single.graph.len(), many.graph.len());
    for module in single.graph.modules() {
        let other = many.graph.get_by_name(module.name()).unwrap();
        assert_eq!(
            module.imports().map(|s| s.len()),
            other.imports().map(|s| s.len())
        );
        assert_eq!(module.imported_by().len(), other.imported_by().len());
    }
}

#[test]
fn test_syntax_error_file_is_counted_and_still_referenced() {
    let root = fixture();
    let app = root.path().join("app");
    write(&app.join("broken.py"), "from import nothing\n");
    write(&app.join("caller.py"), "import app.broken\n");

    let report = build(&root, 4);

    assert_eq!(report.skipped_files, 1);
    let broken = report.graph.get("app.broken").unwrap();
    assert!(broken.is_unmet());
    assert_eq!(broken.imported_by().len(), 1);
}

#[test]
fn test_unresolved_imports_are_dropped_and_reported() {
    let root = fixture();
    let app = root.path().join("app");
    write(
        &app.join("optional.py"),
        "import third_party_thing\nfrom app import utils\n",
    );

    let report = build(&root, 4);

    assert_eq!(report.dropped_edges, 1);
    let optional = report.graph.get("app.optional").unwrap();
    assert_eq!(optional.imports().unwrap().len(), 1);
}

#[test]
fn test_docstring_examples_do_not_create_edges() {
    let root = fixture();
    let app = root.path().join("app");
    write(
        &app.join("documented.py"),
        "\"\"\"Helpers.\n\nExample:\n    import app.nowhere\n\"\"\"\nfrom app import utils\n",
    );

    let report = build(&root, 4);

    assert_eq!(report.dropped_edges, 0);
    assert!(report.graph.get("app.nowhere").is_none());
    let documented = report.graph.get("app.documented").unwrap();
    assert_eq!(documented.imports().unwrap().len(), 1);
}

#[test]
fn test_lookup_works_by_name_and_by_path() {
    let root = fixture();
    let report = build(&root, 2);

    let by_name = report.graph.get("app.utils").unwrap();
    let path = by_name.path().unwrap().to_path_buf();
    let by_path = report.graph.get_by_path(&path).unwrap();
    assert_eq!(by_name.name(), by_path.name());
}

#[test]
fn test_external_targets_stay_unmet_with_probed_paths() {
    let root = fixture();
    // a sibling package outside the scanned root but on the search path
    let ext = root.path().join("ext");
    write(&ext.join("__init__.py"), "");
    let app = root.path().join("app");
    write(&app.join("edge.py"), "import ext\n");

    let locator = Arc::new(SearchPathLocator::new(vec![root.path().to_path_buf()]));
    let report = GraphBuilder::new(locator)
        .with_workers(2)
        .build(&[app])
        .unwrap();

    let ext_node = report.graph.get("ext").unwrap();
    assert!(ext_node.is_unmet());
    assert!(ext_node.path().unwrap().ends_with("ext/__init__.py"));
    assert_eq!(ext_node.imported_by().len(), 1);
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use konst_core::lang::names;
use konst_core::lang::operators;
use konst_core::lang::targets;
use konst_core::lang::types::primitives;

#[test]
fn targets_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, targets::TargetId> = HashMap::new();

    for info in targets::TARGETS {
        let item = &info.item;
        assert_eq!(
            targets::from_str(item.canonical),
            Some(item.id),
            "target canonical spelling not resolvable: {}",
            item.canonical
        );
        assert_eq!(
            targets::as_str(item.id),
            item.canonical,
            "target as_str mismatch for {:?}",
            item.id
        );
        assert!(!item.description.is_empty(), "target {:?} has no description", item.id);

        if let Some(prev) = seen.insert(item.canonical, item.id) {
            panic!("duplicate target spelling {:?}: {:?} and {:?}", item.canonical, prev, item.id);
        }
    }
}

#[test]
fn host_element_types_map_to_registered_targets() {
    let mut seen: HashMap<&'static str, ()> = HashMap::new();
    for (host, mapped) in targets::HOST_ELEMENT_TYPES {
        assert!(!mapped.is_empty(), "host element type {host} maps to nothing");
        for id in *mapped {
            assert_eq!(targets::from_str(targets::as_str(*id)), Some(*id));
        }
        if seen.insert(host, ()).is_some() {
            panic!("duplicate host element type {host:?}");
        }
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorToken> = HashMap::new();

    for info in operators::OPERATORS {
        for &spelling in info.spellings {
            assert_eq!(
                operators::from_str(spelling),
                Some(info.token),
                "operator spelling not resolvable: {}",
                spelling
            );
            if let Some(prev) = seen.insert(spelling, info.token) {
                panic!("duplicate operator spelling {:?}: {:?} and {:?}", spelling, prev, info.token);
            }
        }
        if info.spellings.is_empty() {
            assert_eq!(info.token, operators::OperatorToken::Identifier);
        }
    }
}

#[test]
fn primitive_kinds_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, primitives::PrimitiveKind> = HashMap::new();

    for info in primitives::PRIMITIVE_KINDS {
        assert_eq!(
            primitives::from_str(info.canonical),
            Some(info.id),
            "primitive kind canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(info.id.as_str(), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate primitive kind spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Drift guardrails for closed-set vocabulary (string literals).
// -------------------------------------------------------------------------------------------------

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root missing")
        .to_path_buf()
}

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs")
                && path.file_name().and_then(|n| n.to_str()) != Some("tests.rs")
            {
                files.push(path);
            }
        }
    }
    files
}

fn find_string_literals(paths: &[PathBuf], literals: &[&str]) -> Vec<String> {
    fn is_comment_line(line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.starts_with("//") || trimmed.starts_with("///") || trimmed.starts_with("//!")
    }

    let mut hits: Vec<String> = Vec::new();
    for path in paths {
        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        // Unit test modules sit at the bottom of each file.
        let production = content.split("#[cfg(test)]").next().unwrap_or_default();
        for (idx, line) in production.lines().enumerate() {
            if is_comment_line(line) {
                continue;
            }
            for &literal in literals {
                let needle = format!("\"{literal}\"");
                if line.contains(&needle) {
                    hits.push(format!("{}:{}: {}", path.display(), idx + 1, line.trim()));
                }
            }
        }
    }
    hits
}

fn engine_layer_rs_files() -> Vec<PathBuf> {
    let root = repo_root();
    let targets = [root.join("src/constants"), root.join("src/annotations"), root.join("src/frontend")];
    let mut files = Vec::new();
    for dir in &targets {
        files.extend(collect_rs_files(dir));
    }
    files
}

#[test]
fn no_target_string_literals_in_engine_layers() {
    let files = engine_layer_rs_files();

    let mut target_literals: Vec<&str> = targets::TARGETS.iter().map(|t| t.item.canonical).collect();
    target_literals.extend(targets::HOST_ELEMENT_TYPES.iter().map(|(host, _)| *host));

    let hits = find_string_literals(&files, &target_literals);
    assert!(
        hits.is_empty(),
        "target spellings must come from konst_core::lang::targets; found:\n{}",
        hits.join("\n")
    );
}

#[test]
fn no_well_known_name_literals_in_engine_layers() {
    let files = engine_layer_rs_files();

    let name_literals = [
        names::TARGET_ANNOTATION,
        names::ALLOWED_TARGETS_PARAMETER,
        names::ANNOTATION_TARGET_ENUM,
        names::HOST_TARGET_ANNOTATION,
        names::HOST_DEPRECATED_ANNOTATION,
        names::HOST_DEPRECATED_MESSAGE,
        names::ARRAY_OF,
        operators::COMPARE_TO,
        operators::EQUALS,
        operators::DIV,
    ];
    let hits = find_string_literals(&files, &name_literals);
    assert!(
        hits.is_empty(),
        "well-known names must come from konst_core::lang::names; found:\n{}",
        hits.join("\n")
    );
}

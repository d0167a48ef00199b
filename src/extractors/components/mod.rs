//! Component extractor
//!
//! Walks a parsed source unit in document order and turns every function
//! declaration and function-valued variable binding into a standalone artifact
//! named `{stem}_{name}`.
//!
//! - Function declarations are extracted at any depth; anonymous ones use the
//!   configured fallback name
//! - Bindings must bind a plain identifier; destructuring patterns are an error
//! - Artifacts are written in traversal order, so on a name collision the later
//!   declaration's write wins

mod functions;
mod variables;

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::types::{Artifact, Declaration, DeclarationKind};
use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::parser::{self, NodeId, SyntaxTree};
use crate::sink::ArtifactSink;
use crate::source::SourceUnit;
use crate::utils::paths;

/// Artifact extension when neither the config nor the source path provides one
const DEFAULT_EXTENSION: &str = "js";

/// Result of running the extractor over one source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub source_unit: String,
    pub declarations: Vec<Declaration>,
    pub artifacts: Vec<Artifact>,
    /// Paths written, in write order (may repeat on name collisions)
    pub written: Vec<PathBuf>,
}

pub struct ComponentExtractor {
    config: ExtractorConfig,
}

impl Default for ComponentExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl ComponentExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Find every eligible declaration in document order
    pub fn find_declarations(&self, tree: &SyntaxTree) -> Result<Vec<Declaration>, ExtractError> {
        let mut declarations = Vec::new();
        for id in tree.preorder() {
            if let Some(declaration) = self.visit_node(tree, id)? {
                declarations.push(declaration);
            }
        }

        debug!(
            "Found {} declarations in {}",
            declarations.len(),
            tree.path().display()
        );
        Ok(declarations)
    }

    /// Derive one artifact per declaration, in document order
    pub fn extract(&self, tree: &SyntaxTree, stem: &str) -> Result<Vec<Artifact>, ExtractError> {
        let declarations = self.find_declarations(tree)?;
        Ok(self.name_artifacts(tree, stem, &declarations))
    }

    fn name_artifacts(
        &self,
        tree: &SyntaxTree,
        stem: &str,
        declarations: &[Declaration],
    ) -> Vec<Artifact> {
        let extension = self.artifact_extension(tree);
        let mut seen = HashSet::new();

        declarations
            .iter()
            .map(|declaration| {
                let name = format!(
                    "{}_{}",
                    stem,
                    declaration
                        .name
                        .as_deref()
                        .unwrap_or(&self.config.fallback_name)
                );
                if !seen.insert(name.clone()) {
                    warn!(
                        "⚠️  Artifact name '{}' repeats in {} - the later declaration (line {}) overwrites the earlier one",
                        name, declaration.source_unit, declaration.start_line
                    );
                }
                Artifact {
                    name,
                    extension: extension.clone(),
                    content: declaration.text.clone(),
                }
            })
            .collect()
    }

    /// Write artifacts to the configured output directory, in order
    pub fn write_artifacts(
        &self,
        artifacts: &[Artifact],
        sink: &mut dyn ArtifactSink,
    ) -> Result<Vec<PathBuf>, ExtractError> {
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            sink.ensure_directory(&self.config.output_dir)?;
            let path = paths::artifact_path(
                &self.config.output_dir,
                &artifact.name,
                &artifact.extension,
            );
            sink.write_file(&path, &artifact.content)?;
            info!("Extracted {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Parse, extract and write one source unit
    ///
    /// Nothing is written unless parsing and extraction both succeed. A storage
    /// failure part-way leaves earlier artifacts in place.
    pub fn run(
        &self,
        unit: &SourceUnit,
        sink: &mut dyn ArtifactSink,
    ) -> Result<ExtractionReport, ExtractError> {
        let tree = parser::parse_unlinked(unit.path(), unit.text())?;
        let declarations = self.find_declarations(&tree)?;
        let artifacts = self.name_artifacts(&tree, &unit.stem(), &declarations);
        let written = self.write_artifacts(&artifacts, sink)?;

        Ok(ExtractionReport {
            source_unit: unit.identifier(),
            declarations,
            artifacts,
            written,
        })
    }

    /// Side-effecting transform step: writes artifacts and hands the source
    /// text back unmodified
    pub fn transform<'u>(
        &self,
        unit: &'u SourceUnit,
        sink: &mut dyn ArtifactSink,
    ) -> Result<&'u str, ExtractError> {
        self.run(unit, sink)?;
        Ok(unit.text())
    }

    fn artifact_extension(&self, tree: &SyntaxTree) -> String {
        self.config
            .extension_override
            .clone()
            .or_else(|| paths::source_extension(tree.path()))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }

    /// Dispatch on the closed set of declaration shapes
    fn visit_node(&self, tree: &SyntaxTree, id: NodeId) -> Result<Option<Declaration>, ExtractError> {
        let Some(kind) = DeclarationKind::classify(tree, id) else {
            return Ok(None);
        };

        let declaration = match kind {
            DeclarationKind::FunctionDeclaration => self.extract_function(tree, id),
            DeclarationKind::FunctionExpressionBinding | DeclarationKind::ArrowFunctionBinding => {
                self.extract_binding(tree, id, kind)?
            }
        };
        Ok(Some(declaration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::sink::{DirectorySink, MemorySink};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"import React, { useState } from 'react';

function Dashboard({ initialUsers, title }) {
  const [users, setUsers] = useState(initialUsers || []);

  function handleSearch(e) {
    setFilter(e.target.value);
  }

  const filteredUsers = users.filter(user => user.active);

  return (
    <div className="dashboard">
      <h1>{title}</h1>
      <input onChange={handleSearch} />
    </div>
  );
}

const UserSummaryCard = ({ user }) => {
  return (
    <div className="user-summary-card">
      <strong>{user.name}</strong>
    </div>
  );
};

export default Dashboard;
"#;

    fn extractor() -> ComponentExtractor {
        ComponentExtractor::new(ExtractorConfig::default().with_output_dir("out"))
    }

    fn names(artifacts: &[Artifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_function_and_arrow_binding() {
        let unit = SourceUnit::new("sample.js", "function Foo(){}\nconst Bar = () => {};\n");
        let mut sink = MemorySink::new();

        let report = extractor().run(&unit, &mut sink).unwrap();

        assert_eq!(names(&report.artifacts), vec!["sample_Foo", "sample_Bar"]);
        assert_eq!(sink.get(Path::new("out/sample_Foo.js")), Some("function Foo(){}"));
        assert_eq!(sink.get(Path::new("out/sample_Bar.js")), Some("Bar = () => {}"));
    }

    #[test]
    fn test_document_order_includes_nested_declarations() {
        let unit = SourceUnit::new("input-src/sample.js", SAMPLE);
        let mut sink = MemorySink::new();

        let report = extractor().run(&unit, &mut sink).unwrap();

        assert_eq!(
            names(&report.artifacts),
            vec!["sample_Dashboard", "sample_handleSearch", "sample_UserSummaryCard"]
        );
        assert!(report.artifacts[0].content.starts_with("function Dashboard("));
        assert!(report.artifacts[0].content.ends_with('}'));
        assert!(report.artifacts[2]
            .content
            .starts_with("UserSummaryCard = ({ user }) => {"));
    }

    #[test]
    fn test_counts_declarations_and_bindings() {
        let code = "function a() {}\nfunction b() {}\nconst c = function () {};\nlet d = async () => 1;\nvar e = 5;\n";
        let unit = SourceUnit::new("counts.js", code);

        let tree = parser::parse(unit.path(), unit.text()).unwrap();
        let artifacts = extractor().extract(&tree, &unit.stem()).unwrap();

        assert_eq!(
            names(&artifacts),
            vec!["counts_a", "counts_b", "counts_c", "counts_d"]
        );
    }

    #[test]
    fn test_later_binding_wins_on_collision() {
        let code = "const X = function () { return 1; };\nfunction other() {\n  const X = function () { return 2; };\n}\n";
        let unit = SourceUnit::new("sample.js", code);
        let mut sink = MemorySink::new();

        let report = extractor().run(&unit, &mut sink).unwrap();

        assert_eq!(
            report.written,
            vec![
                PathBuf::from("out/sample_X.js"),
                PathBuf::from("out/sample_other.js"),
                PathBuf::from("out/sample_X.js"),
            ]
        );
        assert_eq!(sink.files().len(), 2);
        assert_eq!(
            sink.get(Path::new("out/sample_X.js")),
            Some("X = function () { return 2; }")
        );
    }

    #[test]
    fn test_destructuring_binding_is_an_error() {
        let code = "function ok() {}\nconst { handler } = () => {};\n";
        let unit = SourceUnit::new("sample.js", code);
        let mut sink = MemorySink::new();

        let err = extractor().run(&unit, &mut sink).unwrap_err();

        match err {
            ExtractError::UnresolvedName {
                source_unit,
                line,
                pattern,
                ..
            } => {
                assert_eq!(source_unit, "sample.js");
                assert_eq!(line, 2);
                assert_eq!(pattern, "object_pattern");
            }
            other => panic!("expected UnresolvedName, got {other}"),
        }
        assert!(sink.write_log().is_empty(), "nothing may be written");
    }

    #[test]
    fn test_parse_error_writes_nothing() {
        let unit = SourceUnit::new("sample.js", "function Foo() {\n  return 1;\n");
        let mut sink = MemorySink::new();

        let err = extractor().run(&unit, &mut sink).unwrap_err();

        assert!(matches!(err, ExtractError::Parse(_)));
        assert!(sink.write_log().is_empty());
        assert!(sink.directories().is_empty());
    }

    #[test]
    fn test_transform_returns_source_unchanged() {
        let unit = SourceUnit::new("sample.js", SAMPLE);
        let mut sink = MemorySink::new();

        let returned = extractor().transform(&unit, &mut sink).unwrap();

        assert_eq!(returned, SAMPLE);
    }

    #[test]
    fn test_extension_follows_source_or_override() {
        let unit = SourceUnit::new("Card.tsx", "export function Card(): JSX.Element { return <i />; }\n");
        let mut sink = MemorySink::new();
        extractor().run(&unit, &mut sink).unwrap();
        assert!(sink.get(Path::new("out/Card_Card.tsx")).is_some());

        let overridden = ComponentExtractor::new(
            ExtractorConfig::default()
                .with_output_dir("out")
                .with_extension("js"),
        );
        let mut sink = MemorySink::new();
        overridden.run(&unit, &mut sink).unwrap();
        assert!(sink.get(Path::new("out/Card_Card.js")).is_some());
    }

    #[test]
    fn test_rerun_is_idempotent_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("extracted");
        let extractor = ComponentExtractor::new(ExtractorConfig::default().with_output_dir(&out));
        let unit = SourceUnit::new("sample.jsx", SAMPLE);

        let first = extractor.run(&unit, &mut DirectorySink::new()).unwrap();
        let snapshot: Vec<String> = first
            .written
            .iter()
            .map(|p| fs::read_to_string(p).unwrap())
            .collect();

        let second = extractor.run(&unit, &mut DirectorySink::new()).unwrap();
        let again: Vec<String> = second
            .written
            .iter()
            .map(|p| fs::read_to_string(p).unwrap())
            .collect();

        assert_eq!(first.written, second.written);
        assert_eq!(snapshot, again);
        assert!(out.join("sample_Dashboard.jsx").is_file());
    }

    /// Accepts writes until `fail_at`, then reports a full disk
    struct FailingSink {
        inner: MemorySink,
        writes: usize,
        fail_at: usize,
    }

    impl ArtifactSink for FailingSink {
        fn ensure_directory(&mut self, path: &Path) -> Result<(), StorageError> {
            self.inner.ensure_directory(path)
        }

        fn write_file(&mut self, path: &Path, content: &str) -> Result<(), StorageError> {
            self.writes += 1;
            if self.writes == self.fail_at {
                return Err(StorageError::new(path, std::io::Error::other("disk full")));
            }
            self.inner.write_file(path, content)
        }
    }

    #[test]
    fn test_storage_failure_keeps_earlier_artifacts() {
        let unit = SourceUnit::new(
            "s.js",
            "function A() {}\nfunction B() {}\nfunction C() {}\n",
        );
        let mut sink = FailingSink {
            inner: MemorySink::new(),
            writes: 0,
            fail_at: 2,
        };

        let err = extractor().run(&unit, &mut sink).unwrap_err();

        match err {
            ExtractError::Storage(storage) => {
                assert_eq!(storage.path, PathBuf::from("out/s_B.js"));
                assert_eq!(storage.source.to_string(), "disk full");
            }
            other => panic!("expected Storage, got {other}"),
        }
        assert_eq!(sink.inner.write_log(), &[PathBuf::from("out/s_A.js")]);
        assert_eq!(sink.inner.get(Path::new("out/s_A.js")), Some("function A() {}"));
    }

    #[test]
    fn test_deeply_nested_body_extracts() {
        let mut code = String::from("function total(a) {\n  return 1");
        for _ in 0..20_000 {
            code.push_str(" + a");
        }
        code.push_str(";\n}\n");
        let unit = SourceUnit::new("deep.js", code.clone());
        let mut sink = MemorySink::new();

        let report = extractor().run(&unit, &mut sink).unwrap();

        assert_eq!(names(&report.artifacts), vec!["deep_total"]);
        assert_eq!(report.artifacts[0].content, code.trim_end());
    }

    #[test]
    fn test_report_serializes_declarations_and_writes() {
        let unit = SourceUnit::new("src/sample.js", "function Foo(){}\nconst Bar = () => {};\n");
        let mut sink = MemorySink::new();

        let report = extractor().run(&unit, &mut sink).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["source_unit"], "src/sample.js");
        assert_eq!(json["declarations"][0]["kind"], "FunctionDeclaration");
        assert_eq!(json["declarations"][1]["kind"], "ArrowFunctionBinding");
        assert_eq!(json["declarations"][1]["name"], "Bar");
        assert_eq!(json["declarations"][1]["start_line"], 2);
        assert_eq!(json["artifacts"][1]["name"], "sample_Bar");
        assert_eq!(json["written"][0], "out/sample_Foo.js");
    }
}


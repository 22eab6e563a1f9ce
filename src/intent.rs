use regex::Regex;

/// How the generated command should be produced for a request
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionMode {
    /// One-shot shell command (touch, echo, mkdir, ...)
    SingleAction,
    /// Bulk multi-file action handled through a generated helper script
    MultiStep,
    /// User-described folder/file hierarchy, carried verbatim into the prompt
    ExplicitHierarchy(String),
}

impl ExecutionMode {
    /// Build an explicit-hierarchy mode from a user-supplied spec.
    ///
    /// An empty or whitespace-only spec is invalid and degrades to
    /// `SingleAction` so the hierarchy template is never selected without a
    /// structure to describe.
    pub fn explicit_hierarchy(spec: &str) -> Self {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            ExecutionMode::SingleAction
        } else {
            ExecutionMode::ExplicitHierarchy(trimmed.to_string())
        }
    }
}

/// Detects requests that describe bulk multi-file operations.
///
/// These requests must always be answered through the multi-step helper-script
/// template, so a match here overrides whatever mode the user picked.
pub struct MultiFileDetector {
    patterns: Vec<Regex>,
}

impl MultiFileDetector {
    pub fn new() -> Self {
        let patterns = vec![
            // "create 10 files"
            Regex::new(r"create\s+\d+\s+files").unwrap(),
            // "named hi1 to 10"
            Regex::new(r"named\s+\w+1\s+to\s+\d+").unwrap(),
            // "delete files new1.txt to new10.txt"
            Regex::new(r"delete\s+files\s+\w+1\S*\s+to\s+\w+\d+").unwrap(),
            // "modify 5 files"
            Regex::new(r"modify\s+\d+\s+files").unwrap(),
        ];

        Self { patterns }
    }

    /// Check whether the request involves creating, deleting, or modifying
    /// multiple files at once.
    pub fn detect(&self, request: &str) -> bool {
        let normalized = request.to_lowercase();
        self.patterns.iter().any(|p| p.is_match(&normalized))
    }

    /// Resolve the final execution mode for a request.
    ///
    /// A bulk-pattern match forces `MultiStep` no matter what the surrounding
    /// collaborator chose; otherwise the chosen mode stands.
    pub fn resolve_mode(&self, request: &str, chosen: ExecutionMode) -> ExecutionMode {
        if self.detect(request) {
            ExecutionMode::MultiStep
        } else {
            chosen
        }
    }
}

impl Default for MultiFileDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_creation_detected() {
        let detector = MultiFileDetector::new();

        let bulk_requests = vec![
            "create 10 files named hi1 to 10",
            "Create 5 files for the report",
            "please create 3 files in this folder",
            "delete files new1.txt to new10.txt",
            "modify 5 files to add a header",
            "files named log1 to 20 should be created",
        ];

        for request in bulk_requests {
            assert!(
                detector.detect(request),
                "Request '{}' should be detected as multi-file",
                request
            );
        }
    }

    #[test]
    fn test_single_requests_not_detected() {
        let detector = MultiFileDetector::new();

        let single_requests = vec![
            "create a file named test.txt",
            "write hello world to notes.txt",
            "delete old.log",
            "install vim",
            "cd /tmp",
            "make a directory called projects",
        ];

        for request in single_requests {
            assert!(
                !detector.detect(request),
                "Request '{}' should not be detected as multi-file",
                request
            );
        }
    }

    #[test]
    fn test_bulk_pattern_overrides_user_choice() {
        let detector = MultiFileDetector::new();
        let request = "create 10 files named hi1 to 10";

        // Whatever the user picked, the bulk pattern wins.
        assert_eq!(
            detector.resolve_mode(request, ExecutionMode::SingleAction),
            ExecutionMode::MultiStep
        );
        assert_eq!(
            detector.resolve_mode(request, ExecutionMode::explicit_hierarchy("A > b.txt")),
            ExecutionMode::MultiStep
        );
    }

    #[test]
    fn test_resolve_mode_keeps_choice_for_non_bulk() {
        let detector = MultiFileDetector::new();

        assert_eq!(
            detector.resolve_mode("create a file named test.txt", ExecutionMode::SingleAction),
            ExecutionMode::SingleAction
        );

        let hierarchy = ExecutionMode::explicit_hierarchy("Folder1 > Subfolder > file2.txt");
        assert_eq!(
            detector.resolve_mode("set up my project layout", hierarchy.clone()),
            hierarchy
        );
    }

    #[test]
    fn test_empty_hierarchy_degrades_to_single_action() {
        assert_eq!(
            ExecutionMode::explicit_hierarchy(""),
            ExecutionMode::SingleAction
        );
        assert_eq!(
            ExecutionMode::explicit_hierarchy("   \t"),
            ExecutionMode::SingleAction
        );
        assert_eq!(
            ExecutionMode::explicit_hierarchy(" Folder1 > file1.txt "),
            ExecutionMode::ExplicitHierarchy("Folder1 > file1.txt".to_string())
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let detector = MultiFileDetector::new();
        let request = "create 10 files named hi1 to 10";

        let first = detector.detect(request);
        let second = detector.detect(request);
        assert_eq!(first, second);

        let first = detector.resolve_mode(request, ExecutionMode::SingleAction);
        let second = detector.resolve_mode(request, ExecutionMode::SingleAction);
        assert_eq!(first, second);
    }
}

// PII audit: static analysis tests that scan all Rust source files for
// tracing:: calls carrying contention text. Free text may contain names,
// SSNs, and dates; only the stats sink may emit (filtered) text.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    /// Patterns that MUST NOT appear in tracing macro arguments.
    const PII_PATTERNS: &[&str] = &[
        // Request fields
        "contention_text",
        "claim.contentions",
        // Interpolations of raw or partially processed text
        "%text",
        "?text",
        "text =",
        "%raw",
        "?raw",
        "%phrase",
        "?phrase",
        "phrase =",
        "%cell",
        "?cell",
        "%label",
        "?label",
        "label =",
        "normalized_key",
        "normalized_tokens",
        "processed_contention_text",
    ];

    /// Files that reference the patterns outside tracing calls on purpose.
    const ALLOWLIST: &[&str] = &["pii_audit.rs"];

    /// Scan all .rs files under src/ for tracing calls containing PII.
    #[test]
    fn no_pii_in_tracing_calls() {
        let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        assert!(src_dir.exists(), "Source directory not found: {}", src_dir.display());

        let mut violations = Vec::new();
        scan_directory(&src_dir, &mut violations);

        if !violations.is_empty() {
            let report = violations
                .iter()
                .map(|(file, line_num, line, pattern)| {
                    format!("  {}:{}: found '{}' in: {}", file, line_num, pattern, line.trim())
                })
                .collect::<Vec<_>>()
                .join("\n");
            panic!(
                "PII AUDIT FAILED: {} violation(s) found in tracing calls:\n{}\n\n\
                 Fix: log counts, codes, and ids. Route text through pipeline::stats.",
                violations.len(),
                report
            );
        }
    }

    #[test]
    fn scanner_detects_known_violation() {
        let test_line = r#"tracing::info!(text = %contention.contention_text, "classified");"#;
        assert!(violations_in(test_line).next().is_some());
    }

    #[test]
    fn scanner_passes_clean_tracing() {
        let clean_line = r#"tracing::debug!(claim_id = claim.claim_id, classified = 3, "claim classified");"#;
        assert!(violations_in(clean_line).next().is_none());
    }

    #[test]
    fn scanner_follows_multiline_calls() {
        let source = "fn f() {\n    tracing::warn!(\n        classifier = %name,\n        phrase = %p,\n        \"x\"\n    );\n}\n";
        let found = scan_source(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 2);
    }

    fn violations_in(call: &str) -> impl Iterator<Item = &'static str> + '_ {
        PII_PATTERNS.iter().copied().filter(move |p| call.contains(p))
    }

    fn scan_directory(dir: &Path, violations: &mut Vec<(String, usize, String, String)>) {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                scan_directory(&path, violations);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                scan_file(&path, violations);
            }
        }
    }

    fn scan_file(path: &Path, violations: &mut Vec<(String, usize, String, String)>) {
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        if ALLOWLIST.iter().any(|a| filename.contains(a)) {
            return;
        }

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };

        let relative_path = path
            .strip_prefix(Path::new(env!("CARGO_MANIFEST_DIR")).join("src"))
            .unwrap_or(path)
            .display()
            .to_string();

        for (line, call, pattern) in scan_source(&content) {
            violations.push((relative_path.clone(), line, call, pattern.to_string()));
        }
    }

    /// (1-indexed start line, full call, pattern) for each violation.
    fn scan_source(content: &str) -> Vec<(usize, String, &'static str)> {
        let mut found = Vec::new();
        let lines: Vec<&str> = content.lines().collect();
        let mut i = 0;
        while i < lines.len() {
            let trimmed = lines[i].trim();
            let Some(start) = trimmed.find("tracing::") else {
                i += 1;
                continue;
            };
            let macro_call = &trimmed[start..];
            let is_macro = ["info!", "warn!", "error!", "debug!", "trace!"]
                .iter()
                .any(|m| macro_call["tracing::".len()..].starts_with(m));
            if !is_macro {
                i += 1;
                continue;
            }

            // Collect the full macro call (may span multiple lines)
            let mut call = String::from(macro_call);
            let mut depth = paren_balance(macro_call);
            let mut j = i + 1;
            while depth > 0 && j < lines.len() {
                let next = lines[j].trim();
                call.push(' ');
                call.push_str(next);
                depth += paren_balance(next);
                j += 1;
            }

            for pattern in violations_in(&call) {
                found.push((i + 1, call.clone(), pattern));
            }
            i = j;
        }
        found
    }

    fn paren_balance(s: &str) -> i32 {
        s.chars().fold(0, |depth, ch| match ch {
            '(' => depth + 1,
            ')' => depth - 1,
            _ => depth,
        })
    }
}

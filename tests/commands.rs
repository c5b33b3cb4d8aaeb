#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Writes `data` as `name` inside a fresh temp dir
    fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, data).expect("Failed to write test file");
        path
    }

    fn guard(config_dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("upload-guard").expect("binary is built");
        // Keep a developer's own config file out of the way.
        cmd.env("XDG_CONFIG_HOME", config_dir).env("HOME", config_dir);
        cmd
    }

    const PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";

    #[test]
    fn test_validate_accepts_clean_pdf() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "report.pdf", PDF);

        guard(dir.path())
            .arg("validate")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("report.pdf: accepted as report_"))
            .stdout(predicate::str::contains("OK: 1 file(s) accepted"));
    }

    #[test]
    fn test_validate_rejects_disguised_executable() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "invoice.pdf", b"MZ\x90\x00\x03\x00\x00\x00\x04\x00");

        guard(dir.path())
            .arg("validate")
            .arg(&path)
            .assert()
            .failure()
            .stdout(predicate::str::contains("rejected: File signature does not match declared type"))
            .stdout(predicate::str::contains("REJECTED: One or more files failed security validation"));
    }

    #[test]
    fn test_validate_prints_warnings() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "form.pdf", b"%PDF-1.4\n<< /AcroForm 2 0 R >>\n%%EOF\n");

        guard(dir.path())
            .args(["validate", "--verbose"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("warning: PDF contains forms"));
    }

    #[test]
    fn test_validate_json_output() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "report.pdf", PDF);

        let output = guard(dir.path())
            .args(["validate", "--json"])
            .arg(&path)
            .output()
            .unwrap();
        assert!(output.status.success());

        let verdict: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(verdict["is_valid"], true);
        assert_eq!(verdict["results"][0]["metadata"]["extension"], "pdf");
        assert_eq!(verdict["results"][0]["metadata"]["mime_type"], "application/pdf");
    }

    #[test]
    fn test_validate_applies_role_limits() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "chart.webp", b"RIFF\x24\x00\x00\x00WEBPVP8 \x10\x10\x10\x10");

        guard(dir.path())
            .args(["validate", "--role", "student"])
            .arg(&path)
            .assert()
            .failure()
            .stdout(predicate::str::contains("File type image/webp is not allowed for student accounts"));

        guard(dir.path())
            .args(["validate", "--role", "cfi"])
            .arg(&path)
            .assert()
            .success();
    }

    #[test]
    fn test_validate_uses_config_file() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "guard.json", br#"{ "validation": { "max_files": 1 } }"#);
        let a = write_file(&dir, "a.pdf", PDF);
        let b = write_file(&dir, "b.pdf", PDF);

        guard(dir.path())
            .arg("--config")
            .arg(&config)
            .arg("validate")
            .args([&a, &b])
            .assert()
            .failure()
            .stdout(predicate::str::contains("REJECTED: Maximum 1 files allowed"));
    }

    #[test]
    fn test_validate_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();

        guard(dir.path())
            .arg("validate")
            .arg(dir.path().join("nope.pdf"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot open"));
    }

    #[test]
    fn test_check_name() {
        let dir = TempDir::new().unwrap();

        guard(dir.path())
            .args(["check-name", "Quarterly Report.pdf"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("safe\n"))
            .stdout(predicate::str::contains("sanitized: Quarterly_Report_"));

        guard(dir.path())
            .args(["check-name", "../../etc/passwd"])
            .assert()
            .failure()
            .stdout(predicate::str::contains(
                "unsafe: Filename contains path traversal sequence (PATH_TRAVERSAL)",
            ));
    }

    #[test]
    fn test_hash_command() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "abc.txt", b"abc");

        guard(dir.path())
            .arg("hash")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            ));

        guard(dir.path())
            .args(["hash", "--algorithm", "blake3"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::starts_with(blake3::hash(b"abc").to_hex().as_str()));
    }
}

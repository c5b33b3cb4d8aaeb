#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use upload_guard::validation::ScanOutcome;
    use upload_guard::*;

    fn is_safe(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
    }

    proptest! {
        #[test]
        fn sanitized_names_use_safe_characters(name in "\\PC{0,120}", ts in 1_000_000_000_000i64..9_999_999_999_999) {
            let sanitized = FilenameSanitizer::sanitize_at(&name, ts);

            prop_assert!(sanitized.chars().all(is_safe), "unsafe output {:?}", sanitized);
            prop_assert!(!sanitized.starts_with('.'));
            prop_assert!(!sanitized.contains(".."));
            let ts_marker = format!("_{}.", ts);
            prop_assert!(sanitized.contains(&ts_marker));
        }

        #[test]
        fn sanitizing_twice_only_changes_timestamp(
            name in "\\PC{0,120}",
            first in 1_000_000_000_000i64..9_999_999_999_999,
            second in 1_000_000_000_000i64..9_999_999_999_999,
        ) {
            let once = FilenameSanitizer::sanitize_at(&name, first);
            let twice = FilenameSanitizer::sanitize_at(&once, second);
            prop_assert_eq!(twice, FilenameSanitizer::sanitize_at(&name, second));
        }

        #[test]
        fn safety_checker_flags_any_null_byte(prefix in "[a-z]{0,20}", suffix in "[a-z.]{0,20}") {
            let name = format!("{}\0{}", prefix, suffix);
            prop_assert!(!FilenameSafetyChecker::check(&name).safe);
        }

        #[test]
        fn hash_ignores_everything_but_content(data in proptest::collection::vec(any::<u8>(), 0..512), extra in any::<u8>()) {
            let generator = FileMetadataGenerator::default();
            let a = FileCandidate::new("a.pdf", "application/pdf", data.clone());
            let b = FileCandidate::new("other.png", "image/png", data.clone());
            let now = chrono::Utc::now();

            let meta_a = generator.generate_from_bytes(&a, &data, now);
            let meta_b = generator.generate_from_bytes(&b, &data, now);
            prop_assert_eq!(&meta_a.hash, &meta_b.hash);

            let mut changed = data.clone();
            changed.push(extra);
            prop_assert_ne!(meta_a.hash, generator.hash(&changed));
        }

        #[test]
        fn random_binary_is_never_flagged_as_text_threat(data in proptest::collection::vec(0x80u8..=0xBF, 1..256)) {
            // Lone continuation bytes are never valid UTF-8.
            prop_assert_eq!(ContentThreatScanner::scan(&data), ScanOutcome::Binary);
        }
    }
}

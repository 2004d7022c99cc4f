/// Integration tests for the editing flow
/// Upload, merge, edit, check and export through the public modules

#[cfg(test)]
mod tests {
    use crate::archive::{build_bundle, read_bundle, Compression};
    use crate::formats::properties::parse;
    use crate::quality::{review, suggest_translation, CheckOutcome, QualityLimits};
    use crate::samples::sample_files;
    use crate::table::{Table, TableError};
    use crate::upload::from_contents;

    fn upload(files: &[(&str, &str)]) -> Table {
        let batch = from_contents(
            files
                .iter()
                .map(|(name, content)| (*name, content.as_bytes().to_vec())),
        );
        Table::merge(&batch.files)
    }

    // ============================================
    // Parse + Merge
    // ============================================

    #[test]
    fn test_merge_aligns_keys_across_languages() {
        let table = upload(&[
            ("en.properties", "greeting=Hello\nfarewell=Bye\n"),
            ("de.properties", "greeting=Hallo\nextra=Mehr\n"),
        ]);

        assert_eq!(table.languages(), ["en", "de"]);
        assert_eq!(
            table.keys().collect::<Vec<_>>(),
            ["extra", "farewell", "greeting"]
        );
        assert_eq!(table.value("farewell", "de").unwrap(), "");
        assert_eq!(table.value("extra", "en").unwrap(), "");
        assert_eq!(table.value("greeting", "de").unwrap(), "Hallo");
    }

    #[test]
    fn test_malformed_lines_do_not_block_upload() {
        let table = upload(&[(
            "en.properties",
            "# header\njust text\n=no key\nok=fine\n\n",
        )]);

        assert_eq!(table.keys().collect::<Vec<_>>(), ["ok"]);
    }

    #[test]
    fn test_sample_files_merge_without_gaps() {
        let table = Table::merge(&sample_files());
        assert_eq!(table.languages(), ["en", "de", "fr"]);
        assert_eq!(table.len(), 20);
        assert!(table.missing_cells().is_empty());
    }

    // ============================================
    // Edit + Serialize
    // ============================================

    #[test]
    fn test_edits_are_visible_in_serialized_output() {
        let mut table = upload(&[
            ("en.properties", "b=B\na=A\n"),
            ("fr.properties", "a=Ah\n"),
        ]);

        table.edit_cell("b", "fr", "Bé").unwrap();
        table.rename_key("a", "z").unwrap();
        let added = table.add_row();
        table.edit_cell(&added, "en", "new").unwrap();

        assert_eq!(
            table.serialize("fr").unwrap(),
            format!("z=Ah\nb=Bé\n{added}=\n")
        );

        table.sort_by_key();
        assert_eq!(
            table.serialize("en").unwrap(),
            format!("b=B\n{added}=new\nz=A\n")
        );
    }

    #[test]
    fn test_serialize_then_parse_restores_column() {
        let mut table = Table::merge(&sample_files());
        table.edit_cell("app.title", "de", "Neuer Titel").unwrap();
        assert!(table.delete_row("app.description"));

        for language in table.languages() {
            let text = table.serialize(language).unwrap();
            let reparsed = parse(&text, language);
            assert_eq!(reparsed.properties, table.column(language).unwrap());
        }
    }

    #[test]
    fn test_rename_collision_leaves_table_untouched() {
        let mut table = upload(&[("en.properties", "a=1\nb=2\n")]);
        let before = table.clone();

        assert_eq!(
            table.rename_key("a", "b"),
            Err(TableError::DuplicateKey("b".into()))
        );
        assert_eq!(table, before);
    }

    // ============================================
    // Quality heuristics
    // ============================================

    #[test]
    fn test_review_flags_missing_and_suggests_from_source() {
        let mut table = upload(&[
            ("en.properties", "save=Save\nquit=Quit\n"),
            ("de.properties", "save=Speichern\n"),
        ]);

        let issues = review(&table, &QualityLimits::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "quit");
        assert_eq!(issues[0].outcome, CheckOutcome::Missing);

        let suggestion = suggest_translation(&table, "quit", "en").unwrap().unwrap();
        table.edit_cell("quit", "de", suggestion).unwrap();
        assert!(review(&table, &QualityLimits::default()).is_empty());
    }

    // ============================================
    // Bundles
    // ============================================

    #[test]
    fn test_bundle_reupload_matches_table() {
        let mut table = Table::merge(&sample_files());
        table.add_row();

        let bytes = build_bundle(&table, Compression::Stored).unwrap();
        let entries = read_bundle(&bytes).unwrap();
        let reloaded = Table::merge(
            &from_contents(entries.into_iter().map(|e| (e.file_name, e.contents))).files,
        );

        assert_eq!(reloaded.languages(), table.languages());
        let mut sorted = table.clone();
        sorted.sort_by_key();
        assert_eq!(reloaded, sorted);
    }
}

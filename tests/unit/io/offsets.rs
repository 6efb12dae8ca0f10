//! Tests for the offset mapping

#[cfg(test)]
mod tests {
    use std::path::Path;
    use surfalign::io::error::AlignError;
    use surfalign::io::offsets::{Offset, OffsetTable};

    fn parse(text: &str) -> Result<OffsetTable, AlignError> {
        OffsetTable::from_json_str(text, Path::new("offsets.json"))
    }

    #[test]
    fn test_parse_mapping() {
        let table = parse(r#"{ "scan_0.8": [0, 0], "scan_1": [20, 50.5], "scan_8": [-30, -30, 12.5] }"#)
            .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("scan_0.8"), Some(&Offset::new(0.0, 0.0)));
        assert_eq!(table.get("scan_1"), Some(&Offset::new(20.0, 50.5)));
        assert_eq!(table.get("scan_8"), Some(&Offset::rotated(-30.0, -30.0, 12.5)));
        assert_eq!(table.get("scan_8").unwrap().position(), [-30.0, -30.0]);
        assert!(table.get("scan_2").is_none());
    }

    // Tests keys are matched exactly, extension and case included
    #[test]
    fn test_keys_are_exact() {
        let table = parse(r#"{ "Scan_1": [1, 2] }"#).unwrap();

        assert!(table.get("scan_1").is_none());
        assert!(table.get("Scan_1.png").is_none());
        assert!(table.get("Scan_1").is_some());
    }

    #[test]
    fn test_invalid_mappings() {
        for text in [
            r#"{ "a_1": [1] }"#,
            r#"{ "a_1": [1, 2, 3, 4] }"#,
            r#"{ "a_1": ["1", 2] }"#,
            r#"{ "a_1": { "y": 1, "x": 2 } }"#,
            "[[1, 2]]",
            "not json",
        ] {
            let result = parse(text);
            assert!(
                matches!(result, Err(AlignError::InvalidOffsets { .. })),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_mapping() {
        let table = parse("{}").unwrap();
        assert!(table.is_empty());
        assert_eq!(table, OffsetTable::new());
    }

    #[test]
    fn test_non_finite_components() {
        assert!(Offset::try_from(vec![f64::NAN, 0.0]).is_err());
        assert!(Offset::try_from(vec![0.0, 0.0, f64::INFINITY]).is_err());
        assert_eq!(
            Offset::try_from(vec![1.0, 2.0, 3.0]),
            Ok(Offset::rotated(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offsets.json");
        std::fs::write(&path, r#"{ "a_1": [3, 4] }"#).unwrap();

        let table = OffsetTable::from_json_file(&path).unwrap();
        assert_eq!(table.get("a_1"), Some(&Offset::new(3.0, 4.0)));

        let missing = OffsetTable::from_json_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(AlignError::FileSystem { .. })));
    }

    #[test]
    fn test_build_in_code() {
        let mut table: OffsetTable = [("a_1", Offset::new(0.0, 0.0))].into_iter().collect();
        table.insert("b_2", Offset::new(1.0, 1.0));
        table.insert("a_1", Offset::new(5.0, 5.0));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a_1"), Some(&Offset::new(5.0, 5.0)));
    }
}

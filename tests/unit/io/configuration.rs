//! Tests for option defaults and constants

#[cfg(test)]
mod tests {
    use clap::ValueEnum;
    use surfalign::io::configuration::{
        BOUNDS_EPSILON, ColumnShift, ComposeOptions, LoadOptions, ShapePolicy, TableLayout,
        WEIGHT_EPSILON,
    };

    #[test]
    fn test_defaults() {
        let load = LoadOptions::default();
        assert_eq!(load.table_layout, TableLayout::Triples);
        assert_eq!(load.shape_policy, ShapePolicy::DistinctValues);
        assert_eq!(ComposeOptions::default().column_shift, ColumnShift::Corrected);
    }

    // Tests the command-line spellings of the option values
    #[test]
    fn test_value_names() {
        let names = |variants: &[TableLayout]| -> Vec<String> {
            variants
                .iter()
                .filter_map(ValueEnum::to_possible_value)
                .map(|value| value.get_name().to_string())
                .collect()
        };
        assert_eq!(names(TableLayout::value_variants()), vec!["triples", "dense"]);

        assert_eq!(
            ShapePolicy::from_str("index-span", false),
            Ok(ShapePolicy::IndexSpan)
        );
        assert_eq!(
            ShapePolicy::from_str("distinct-values", false),
            Ok(ShapePolicy::DistinctValues)
        );
    }

    #[test]
    fn test_tolerances_ordered() {
        assert!(WEIGHT_EPSILON > 0.0);
        assert!(WEIGHT_EPSILON < BOUNDS_EPSILON);
    }
}

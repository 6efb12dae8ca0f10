//! Tests for canvas planning and per-channel placement

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use surfalign::algorithm::compositor::{Compositor, SourceRecord};
    use surfalign::io::configuration::{ColumnShift, ComposeOptions};
    use surfalign::io::error::AlignError;
    use surfalign::io::offsets::Offset;
    use surfalign::spatial::grid::SampleKind;

    fn source(name: &str, size: usize, resolution: f64, offset: Offset, value: f32) -> SourceRecord {
        SourceRecord {
            name: name.to_string(),
            grid: Array2::from_elem((size, size), Some(value)),
            resolution,
            offset,
            kind: SampleKind::Intensity,
        }
    }

    fn three_sources() -> Vec<SourceRecord> {
        vec![
            source("a_1", 10, 1.0, Offset::new(0.0, 0.0), 100.0),
            source("b_2", 10, 2.0, Offset::new(10.0, 10.0), 100.0),
            source("c_4", 10, 4.0, Offset::new(-5.0, -5.0), 100.0),
        ]
    }

    fn legacy() -> Compositor {
        Compositor::new(ComposeOptions {
            column_shift: ColumnShift::Legacy,
        })
    }

    // Tests mixed resolutions are scaled to the finest and shifted non-negative
    #[test]
    fn test_three_resolutions() {
        let sources = three_sources();
        let canvas = Compositor::default().compose(&sources).unwrap();

        assert_eq!(canvas.dim(), (60, 60, 3));
        assert_eq!(canvas.kind(), SampleKind::Intensity);
        assert_eq!(canvas.names(), ["a_1", "b_2", "c_4"]);

        // a covers rows and columns 20..30
        assert_eq!(canvas.sample(20, 20, 0), Some(100.0));
        assert_eq!(canvas.sample(29, 29, 0), Some(100.0));
        assert_eq!(canvas.sample(30, 30, 0), None);
        assert_eq!(canvas.sample(19, 25, 0), None);

        // b covers 40..60
        assert_eq!(canvas.sample(40, 40, 1), Some(100.0));
        assert_eq!(canvas.sample(59, 59, 1), Some(100.0));
        assert_eq!(canvas.sample(39, 45, 1), None);

        // c covers 0..40
        assert_eq!(canvas.sample(0, 0, 2), Some(100.0));
        assert_eq!(canvas.sample(39, 39, 2), Some(100.0));
        assert_eq!(canvas.sample(40, 40, 2), None);
    }

    // Tests each channel is defined exactly on its footprint
    #[test]
    fn test_channel_coverage() {
        let canvas = Compositor::default().compose(&three_sources()).unwrap();

        let counts: Vec<usize> = (0..canvas.channels())
            .map(|channel| {
                canvas
                    .channel(channel)
                    .unwrap()
                    .iter()
                    .filter(|sample| sample.is_some())
                    .count()
            })
            .collect();
        assert_eq!(counts, vec![100, 400, 1600]);
        assert!(canvas.channel(3).is_none());
        assert_eq!(canvas.sample(0, 0, 7), None);
        assert_eq!(canvas.samples_at(25, 25), vec![Some(100.0), None, Some(100.0)]);
    }

    #[test]
    fn test_plan() {
        let layout = Compositor::default()
            .plan(&three_sources())
            .unwrap()
            .unwrap();

        assert_eq!(layout.scales, vec![1.0, 2.0, 4.0]);
        assert_eq!(layout.shift, [20, 20]);
        assert_eq!((layout.height(), layout.width()), (60, 60));

        assert!(Compositor::default().plan(&[]).unwrap().is_none());
    }

    #[test]
    fn test_single_source_is_unchanged() {
        let mut only = source("only_0.5", 4, 0.5, Offset::new(0.0, 0.0), 0.0);
        only.grid = Array2::from_shape_fn((4, 4), |(row, col)| Some((row * 4 + col) as f32));

        let canvas = Compositor::default().compose(std::slice::from_ref(&only)).unwrap();

        assert_eq!(canvas.dim(), (4, 4, 1));
        assert_eq!(canvas.channel(0).unwrap(), only.grid);
    }

    // Tests intensity samples are rounded and clamped to 8 bits
    #[test]
    fn test_intensity_quantized() {
        let mut bright = source("bright_1", 2, 1.0, Offset::new(0.0, 0.0), 0.0);
        bright.grid = ndarray::array![[Some(12.4), Some(12.6)], [Some(300.0), Some(-3.0)]];

        let canvas = Compositor::default().compose(&[bright.clone()]).unwrap();
        assert_eq!(canvas.channel(0).unwrap(), ndarray::array![
            [Some(12.0), Some(13.0)],
            [Some(255.0), Some(0.0)]
        ]);

        bright.kind = SampleKind::Height;
        let canvas = Compositor::default().compose(&[bright]).unwrap();
        assert_eq!(canvas.kind(), SampleKind::Height);
        assert_eq!(canvas.sample(1, 0, 0), Some(300.0));
    }

    // Tests any height source turns the whole canvas into a height canvas
    #[test]
    fn test_mixed_kinds_merge_to_height() {
        let mut sources = three_sources();
        sources[1].kind = SampleKind::Height;

        let canvas = Compositor::default().compose(&sources).unwrap();
        assert_eq!(canvas.kind(), SampleKind::Height);
    }

    // Tests undefined source cells stay undefined on the canvas
    #[test]
    fn test_undefined_preserved() {
        let mut holed = source("holed_1", 3, 1.0, Offset::new(0.0, 0.0), 5.0);
        holed.grid[(1, 1)] = None;

        let canvas = Compositor::default().compose(&[holed]).unwrap();
        assert_eq!(canvas.sample(1, 1, 0), None);
        assert_eq!(canvas.sample(0, 0, 0), Some(5.0));
    }

    #[test]
    fn test_empty_batch() {
        let result = Compositor::default().compose(&[]);
        assert!(matches!(result, Err(AlignError::NoSources { .. })));
    }

    // Tests an empty grid produces a footprint with no cells
    #[test]
    fn test_degenerate_footprint() {
        let mut empty = source("empty_1", 0, 1.0, Offset::new(0.0, 0.0), 0.0);
        empty.grid = Array2::from_elem((0, 5), None);
        let sources = vec![source("a_1", 4, 1.0, Offset::new(0.0, 0.0), 1.0), empty];

        match Compositor::default().compose(&sources) {
            Err(AlignError::DegenerateFootprint {
                name,
                height,
                width,
            }) => {
                assert_eq!(name, "empty_1");
                assert_eq!((height, width), (0, 5));
            }
            other => panic!("expected degenerate footprint, got {other:?}"),
        }
    }

    // Tests legacy placement matches corrected placement when both shifts agree
    #[test]
    fn test_legacy_equal_shifts() {
        let sources = vec![
            source("a_1", 5, 1.0, Offset::new(0.0, 0.0), 1.0),
            source("b_1", 5, 1.0, Offset::new(-2.0, -2.0), 2.0),
        ];

        let corrected = Compositor::default().compose(&sources).unwrap();
        let legacy = legacy().compose(&sources).unwrap();
        assert_eq!(corrected, legacy);
    }

    // Tests legacy placement reports the column slice it cannot fill
    #[test]
    fn test_legacy_unequal_shifts() {
        let sources = vec![
            source("a_1", 10, 1.0, Offset::new(0.0, 0.0), 1.0),
            source("b_1", 10, 1.0, Offset::new(-3.0, 0.0), 2.0),
        ];

        let corrected = Compositor::default().compose(&sources).unwrap();
        assert_eq!(corrected.dim(), (13, 10, 2));
        assert_eq!(corrected.sample(3, 0, 0), Some(1.0));
        assert_eq!(corrected.sample(0, 0, 1), Some(2.0));

        match legacy().compose(&sources) {
            Err(AlignError::PlacementMismatch {
                name,
                expected,
                actual,
            }) => {
                assert_eq!(name, "a_1");
                assert_eq!((expected, actual), (10, 7));
            }
            other => panic!("expected placement mismatch, got {other:?}"),
        }
    }

    // Tests legacy placement fails rather than clamping a start left of the canvas
    #[test]
    fn test_legacy_start_left_of_canvas() {
        let sources = vec![source("a_1", 10, 1.0, Offset::new(0.0, -5.0), 1.0)];

        let corrected = Compositor::default().compose(&sources).unwrap();
        assert_eq!(corrected.dim(), (10, 10, 1));
        assert_eq!(corrected.sample(0, 0, 0), Some(1.0));

        match legacy().compose(&sources) {
            Err(AlignError::PlacementMismatch {
                name,
                expected,
                actual,
            }) => {
                assert_eq!(name, "a_1");
                assert_eq!((expected, actual), (10, 0));
            }
            other => panic!("expected placement mismatch, got {other:?}"),
        }
    }

    // Tests channels written through a sub-block leave other channels untouched
    #[test]
    fn test_channel_block_placement() {
        let sources = vec![
            source("a_1", 2, 1.0, Offset::new(0.0, 0.0), 1.0),
            source("b_1", 2, 1.0, Offset::new(1.0, 1.0), 2.0),
        ];
        let canvas = Compositor::default().compose(&sources).unwrap();

        assert_eq!(canvas.channel(1).unwrap(), ndarray::array![
            [None, None, None],
            [None, Some(2.0), Some(2.0)],
            [None, Some(2.0), Some(2.0)]
        ]);
        assert_eq!(canvas.samples_at(0, 0), vec![Some(1.0), None]);
        assert_eq!(canvas.samples_at(2, 2), vec![None, Some(2.0)]);
    }

    #[test]
    fn test_progress_callback() {
        let sources = three_sources();
        let mut placed = Vec::new();

        Compositor::default()
            .compose_with(&sources, |channel, source| {
                placed.push((channel, source.name.clone()));
            })
            .unwrap();

        assert_eq!(placed, vec![
            (0, "a_1".to_string()),
            (1, "b_2".to_string()),
            (2, "c_4".to_string())
        ]);
    }

    #[test]
    fn test_source_geometry() {
        let record = source("b_2", 10, 2.0, Offset::rotated(1.0, 2.0, 15.0), 0.0);
        let geometry = record.geometry();

        assert_eq!((geometry.rows, geometry.cols), (10, 10));
        assert_eq!(geometry.resolution, 2.0);
        assert_eq!(geometry.offset, [1.0, 2.0]);
    }
}

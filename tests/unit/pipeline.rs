use std::sync::Mutex;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::oracle::InterpolationRequest;
use crate::oracle::crossfade::CrossfadeOracle;

#[derive(Default)]
struct Recording {
    calls: Mutex<Vec<(f64, Size)>>,
}

impl InterpolationOracle for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    fn interpolate(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image> {
        self.calls.lock().unwrap().push((req.time, req.x0.size()));
        CrossfadeOracle.interpolate(req)
    }
}

fn solid(h: u32, w: u32, v: f32) -> Image {
    Image::filled(h, w, [v; 3]).unwrap()
}

#[test]
fn end_to_end_100x150_single_midpoint() {
    let cfg = InterpolationConfig {
        alignment: 64,
        frame_count: 1,
        ..InterpolationConfig::default()
    };
    let oracle = Recording::default();
    let (seq, report) = run(
        &cfg,
        &oracle,
        &solid(100, 150, 0.0),
        &solid(100, 150, 1.0),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(
        *oracle.calls.lock().unwrap(),
        vec![(0.5, Size::new(192, 128))]
    );
    assert_eq!(report.padded_size, Size::new(192, 128));
    assert_eq!(report.output_size, Size::new(150, 100));
    assert_eq!(report.oracle_calls, 1);
    assert_eq!(seq.len(), 3);
    assert!(seq.frames().iter().all(|f| f.shape() == (100, 150, 3)));
    // Zero padding must not bleed into the cropped midpoint.
    assert_eq!(seq.frames()[1], solid(100, 150, 0.5));

    let mut sink = InMemorySink::new();
    let summary = write_video(&seq, cfg.fps, &mut sink).unwrap();
    assert_eq!(sink.frames().len(), 3);
    assert_eq!(summary.fps, Fps { num: 2, den: 1 });
    assert_eq!(summary.duration_secs, 1.5);
}

#[test]
fn sequence_length_is_two_plus_frame_count() {
    for n in [1usize, 2, 6, 13] {
        let cfg = InterpolationConfig {
            frame_count: n,
            alignment: 8,
            ..InterpolationConfig::default()
        };
        let (seq, report) = run(
            &cfg,
            &CrossfadeOracle,
            &solid(5, 9, 0.2),
            &solid(5, 9, 0.8),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(seq.len(), n + 2);
        assert_eq!(report.fractions.len(), n);
    }
}

#[test]
fn zero_frame_count_is_rejected_before_any_oracle_call() {
    let cfg = InterpolationConfig {
        frame_count: 0,
        ..InterpolationConfig::default()
    };
    let oracle = Recording::default();
    let err = run(
        &cfg,
        &oracle,
        &solid(4, 4, 0.0),
        &solid(4, 4, 1.0),
        &CancelToken::new(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "Validation");
    assert!(oracle.calls.lock().unwrap().is_empty());
}

#[test]
fn differing_endpoint_sizes_are_shape_mismatch() {
    let oracle = Recording::default();
    let err = run(
        &InterpolationConfig::default(),
        &oracle,
        &solid(100, 150, 0.0),
        &solid(110, 140, 1.0),
        &CancelToken::new(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "ShapeMismatch");
    assert!(oracle.calls.lock().unwrap().is_empty());
}

#[test]
fn zero_height_image_is_invalid_dimension() {
    let err = Image::from_raw(0, 10, vec![]).unwrap_err();
    assert_eq!(err.kind(), "InvalidDimension");
}

#[test]
fn cancelled_run_produces_nothing() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let oracle = Recording::default();
    let err = run(
        &InterpolationConfig::default(),
        &oracle,
        &solid(4, 4, 0.0),
        &solid(4, 4, 1.0),
        &cancel,
    )
    .unwrap_err();
    assert_eq!(err.kind(), "Cancelled");
    assert!(oracle.calls.lock().unwrap().is_empty());
}

#[test]
fn presets_match_legacy_scripts() {
    let quick = Preset::Quick.config();
    assert_eq!(quick.target_size, Some(Size::new(256, 256)));
    assert_eq!(quick.frame_count, 1);
    assert_eq!(quick.fps, Fps { num: 2, den: 1 });

    let smooth = Preset::Smooth.config();
    assert_eq!(smooth.target_size, Some(Size::new(512, 512)));
    assert_eq!(smooth.frame_count, 65);
    assert_eq!(smooth.fps, Fps { num: 20, den: 1 });
    assert_eq!(smooth.alignment, 64);
}

#[test]
fn validate_rejects_bad_values() {
    let bad = [
        InterpolationConfig {
            alignment: 0,
            ..InterpolationConfig::default()
        },
        InterpolationConfig {
            alignment: 1 << 20,
            ..InterpolationConfig::default()
        },
        InterpolationConfig {
            fps: Fps { num: 0, den: 1 },
            ..InterpolationConfig::default()
        },
        InterpolationConfig {
            target_size: Some(Size::new(0, 10)),
            ..InterpolationConfig::default()
        },
        InterpolationConfig {
            mode: ScheduleMode::Recursive,
            frame_count: 6,
            ..InterpolationConfig::default()
        },
    ];
    for cfg in bad {
        assert_eq!(cfg.validate().unwrap_err().kind(), "Validation", "{cfg:?}");
    }
    assert!(InterpolationConfig::default().validate().is_ok());
}

#[test]
fn json_config_fills_missing_fields_with_defaults() {
    let dir = PathBuf::from("target").join("unit_pipeline_cfg");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cfg.json");
    std::fs::write(
        &path,
        r#"{ "frame_count": 7, "mode": "recursive", "fps": { "num": 24, "den": 1 },
             "target_size": { "width": 320, "height": 240 } }"#,
    )
    .unwrap();

    let cfg = InterpolationConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.frame_count, 7);
    assert_eq!(cfg.mode, ScheduleMode::Recursive);
    assert_eq!(cfg.fps, Fps { num: 24, den: 1 });
    assert_eq!(cfg.target_size, Some(Size::new(320, 240)));
    assert_eq!(cfg.alignment, DEFAULT_ALIGNMENT);
    assert_eq!(cfg.retry, RetryPolicy::default());
    cfg.validate().unwrap();

    std::fs::write(&path, "{ not json").unwrap();
    let err = InterpolationConfig::from_json_file(&path).unwrap_err();
    assert_eq!(err.kind(), "Validation");
}

#[test]
fn interpolate_files_dumps_frames_and_encodes() {
    let dir = PathBuf::from("target").join("unit_pipeline_files");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    save_image(&solid(10, 12, 0.0), &a).unwrap();
    save_image(&solid(10, 12, 1.0), &b).unwrap();

    let cfg = InterpolationConfig {
        frame_count: 3,
        alignment: 8,
        ..InterpolationConfig::default()
    };
    let job = FileJob {
        image1: a,
        image2: b,
        dump_frames: Some(dir.join("frames")),
    };
    let mut sink = InMemorySink::new();
    let (report, summary) =
        interpolate_files(&cfg, &CrossfadeOracle, &job, &mut sink, &CancelToken::new()).unwrap();

    assert_eq!(report.frames, 5);
    assert_eq!(summary.frames, 5);
    assert_eq!((summary.width, summary.height), (12, 10));
    assert!(dir.join("frames").join("frame_00004.png").exists());
    assert_eq!(sink.frames()[2].1.data[0], 128);
}

#[test]
fn missing_input_is_io_error_and_sink_untouched() {
    let job = FileJob {
        image1: PathBuf::from("target/definitely/missing_a.png"),
        image2: PathBuf::from("target/definitely/missing_b.png"),
        dump_frames: None,
    };
    let mut sink = InMemorySink::new();
    let err = interpolate_files(
        &InterpolationConfig::default(),
        &CrossfadeOracle,
        &job,
        &mut sink,
        &CancelToken::new(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "IOError");
    assert!(sink.config().is_none());
}

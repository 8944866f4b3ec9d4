use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::error::InterpError;
use crate::raster::frame::Image;

fn seq(values: &[f32]) -> FrameSequence {
    FrameSequence::new(
        values
            .iter()
            .map(|&v| Image::filled(2, 3, [v, 0.0, 1.0]).unwrap())
            .collect(),
    )
    .unwrap()
}

/// Sink that fails on the second frame and records whether it was aborted.
#[derive(Default)]
struct Breaking {
    pushed: usize,
    aborted: bool,
}

impl FrameSink for Breaking {
    fn begin(&mut self, _cfg: SinkConfig) -> InterpResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRgb8) -> InterpResult<()> {
        self.pushed += 1;
        if self.pushed == 2 {
            return Err(InterpError::io("disk full"));
        }
        Ok(())
    }

    fn end(&mut self) -> InterpResult<()> {
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[test]
fn writes_every_frame_in_order_with_quantized_values() {
    let mut sink = InMemorySink::new();
    let summary = write_video(&seq(&[0.0, 0.5, 1.0]), Fps::whole(2).unwrap(), &mut sink).unwrap();

    assert_eq!(summary.frames, 3);
    assert_eq!((summary.width, summary.height), (3, 2));
    assert_eq!(summary.duration_secs, 1.5);
    assert!(sink.is_finished());

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.frame_count), (3, 2, 3));

    let frames = sink.frames();
    assert_eq!(frames.len(), 3);
    let idx: Vec<u64> = frames.iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert_eq!(&frames[1].1.data[0..3], &[128, 0, 255]);
    assert_eq!(frames[2].1.data.len(), 2 * 3 * 3);
}

#[test]
fn out_of_range_samples_are_clamped() {
    // Oracle output is clamped upstream, but the adapter must never emit outside [0, 255].
    let raw = Image::from_raw(1, 1, vec![-0.2, 1.7, 0.25]).unwrap();
    let seq = FrameSequence::new(vec![raw.clone(), raw]).unwrap();
    let mut sink = InMemorySink::new();
    write_video(&seq, Fps::whole(1).unwrap(), &mut sink).unwrap();
    assert_eq!(sink.frames()[0].1.data, vec![0, 255, 64]);
}

#[test]
fn failure_aborts_sink() {
    let mut sink = Breaking::default();
    let err = write_video(&seq(&[0.0, 0.5, 1.0]), Fps::whole(2).unwrap(), &mut sink).unwrap_err();
    assert_eq!(err.kind(), "IOError");
    assert!(sink.aborted);
}

#[test]
fn zero_fps_is_rejected() {
    let mut sink = InMemorySink::new();
    let err = write_video(&seq(&[0.0, 1.0]), Fps { num: 0, den: 1 }, &mut sink).unwrap_err();
    assert_eq!(err.kind(), "Validation");
    assert!(sink.config().is_none());
}

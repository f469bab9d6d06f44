use super::*;

/// Flat frame whose red channel encodes the frame time in tenths of a second.
struct Clock(Canvas);

impl FrameSource for Clock {
    fn canvas(&self) -> Canvas {
        self.0
    }

    fn render_at(&self, t: f64) -> ReelResult<FrameRgb8> {
        let mut f = FrameRgb8::black(self.0)?;
        let v = (t * 10.0).round() as u8;
        for px in f.data.chunks_exact_mut(3) {
            px[0] = v;
        }
        Ok(f)
    }
}

struct FailsAfter(Canvas, f64);

impl FrameSource for FailsAfter {
    fn canvas(&self) -> Canvas {
        self.0
    }

    fn render_at(&self, t: f64) -> ReelResult<FrameRgb8> {
        if t >= self.1 {
            return Err(ReelError::computation("boom"));
        }
        FrameRgb8::black(self.0)
    }
}

struct PanicsAt(Canvas, f64);

impl FrameSource for PanicsAt {
    fn canvas(&self) -> Canvas {
        self.0
    }

    fn render_at(&self, t: f64) -> ReelResult<FrameRgb8> {
        if t >= self.1 {
            panic!("synthesis blew up at {t}");
        }
        FrameRgb8::black(self.0)
    }
}

fn canvas() -> Canvas {
    Canvas::new(4, 4).unwrap()
}

#[test]
fn frame_count_and_times() {
    let seq = FrameSequence::new(30, 30.0, canvas()).unwrap();
    assert_eq!(seq.frame_count(), 900);
    assert_eq!(seq.time_of(45), 1.5);

    let seq = FrameSequence::new(10, 0.25, canvas()).unwrap();
    let times: Vec<f64> = seq.frame_times().collect();
    assert_eq!(times, vec![0.0, 0.1, 0.2]);
}

#[test]
fn invalid_sequences_are_rejected() {
    assert!(FrameSequence::new(0, 1.0, canvas()).is_err());
    assert!(FrameSequence::new(30, 0.0, canvas()).is_err());
}

#[test]
fn parallel_matches_sequential_order() {
    let seq = FrameSequence::new(10, 2.0, canvas()).unwrap();
    let src = Clock(canvas());
    let a = render_frames(&src, &seq, &RenderThreading::default()).unwrap();
    let threading = RenderThreading {
        parallel: true,
        chunk_size: 3,
        threads: Some(2),
    };
    let b = render_frames(&src, &seq, &threading).unwrap();
    assert_eq!(a.len(), 20);
    assert_eq!(a, b);
    for (i, f) in b.iter().enumerate() {
        assert_eq!(f.pixel(0, 0).unwrap()[0], i as u8);
    }
}

#[test]
fn sink_sees_indices_in_order() {
    let seq = FrameSequence::new(5, 2.0, canvas()).unwrap();
    let mut seen = Vec::new();
    let stats = render_frames_with(
        &Clock(canvas()),
        &seq,
        &RenderThreading {
            parallel: true,
            chunk_size: 4,
            threads: Some(3),
        },
        |i, _| {
            seen.push(i);
            Ok(())
        },
    )
    .unwrap();
    assert_eq!(seen, (0..10).collect::<Vec<_>>());
    assert_eq!(stats.frames_total, 10);
    assert_eq!(stats.chunks, 3);
}

#[test]
fn errors_propagate_from_workers() {
    let seq = FrameSequence::new(10, 1.0, canvas()).unwrap();
    let src = FailsAfter(canvas(), 0.5);
    assert!(render_frames(&src, &seq, &RenderThreading::parallel(Some(2))).is_err());
    assert!(render_frames(&src, &seq, &RenderThreading::default()).is_err());
}

#[test]
fn zero_threads_and_canvas_mismatch_fail() {
    let seq = FrameSequence::new(10, 1.0, canvas()).unwrap();
    let src = Clock(canvas());
    assert!(render_frames(&src, &seq, &RenderThreading::parallel(Some(0))).is_err());
    let other = FrameSequence::new(10, 1.0, Canvas::new(8, 8).unwrap()).unwrap();
    assert!(render_frames(&src, &other, &RenderThreading::default()).is_err());
}

#[test]
fn panicking_source_becomes_computation_error() {
    let seq = FrameSequence::new(10, 1.0, canvas()).unwrap();
    let source = PanicsAt(canvas(), 0.5);
    for threading in [RenderThreading::default(), RenderThreading::parallel(Some(2))] {
        let mut seen = 0;
        let err = render_frames_with(&source, &seq, &threading, |_, _| {
            seen += 1;
            Ok(())
        })
        .unwrap_err();
        match err {
            ReelError::Computation(msg) => assert!(msg.contains("blew up"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(seen <= 5);
    }
}

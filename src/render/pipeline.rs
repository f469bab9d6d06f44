use std::panic::{AssertUnwindSafe, catch_unwind};

use rayon::prelude::*;

use crate::{
    foundation::core::{Canvas, ensure_positive_secs},
    foundation::error::{ReelError, ReelResult},
    render::frame::FrameRgb8,
};

/// Anything that can produce a frame for a timestamp.
///
/// Implementations must be pure in `t` so frames can be rendered on any worker in any order.
pub trait FrameSource: Sync {
    fn canvas(&self) -> Canvas;
    fn render_at(&self, t: f64) -> ReelResult<FrameRgb8>;
}

/// Fixed-rate sampling of a clip: frame `i` is taken at `i / fps` for every `i / fps < duration`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSequence {
    pub fps: u32,
    pub duration: f64,
    pub canvas: Canvas,
}

impl FrameSequence {
    pub fn new(fps: u32, duration: f64, canvas: Canvas) -> ReelResult<Self> {
        let seq = Self {
            fps,
            duration,
            canvas,
        };
        seq.validate()?;
        Ok(seq)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.fps == 0 {
            return Err(ReelError::invalid_parameter("fps must be > 0"));
        }
        ensure_positive_secs(self.duration, "sequence duration")?;
        self.canvas.validate()
    }

    pub fn frame_count(&self) -> u64 {
        // Tolerance keeps 30 s at 30 fps at exactly 900 frames.
        (self.duration * f64::from(self.fps) - 1e-9).ceil().max(1.0) as u64
    }

    pub fn time_of(&self, index: u64) -> f64 {
        index as f64 / f64::from(self.fps)
    }

    pub fn frame_times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.frame_count()).map(|i| self.time_of(i))
    }
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

impl RenderThreading {
    pub fn parallel(threads: Option<usize>) -> Self {
        Self {
            parallel: true,
            threads,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    pub chunks: u64,
}

/// Render every frame of `seq` into memory, in timestamp order.
pub fn render_frames(
    source: &dyn FrameSource,
    seq: &FrameSequence,
    threading: &RenderThreading,
) -> ReelResult<Vec<FrameRgb8>> {
    let mut out = Vec::with_capacity(seq.frame_count().min(4096) as usize);
    render_frames_with(source, seq, threading, |_, frame| {
        out.push(frame);
        Ok(())
    })?;
    Ok(out)
}

/// Render every frame of `seq`, handing each to `sink` in timestamp order.
///
/// Parallel mode renders `chunk_size` frames at a time on a dedicated pool, so at most one
/// chunk is held in memory. A panicking source surfaces as [`ReelError::Computation`].
#[tracing::instrument(skip(source, sink), fields(frames = seq.frame_count()))]
pub fn render_frames_with(
    source: &dyn FrameSource,
    seq: &FrameSequence,
    threading: &RenderThreading,
    mut sink: impl FnMut(u64, FrameRgb8) -> ReelResult<()>,
) -> ReelResult<RenderStats> {
    seq.validate()?;
    if source.canvas() != seq.canvas {
        return Err(ReelError::invalid_parameter(format!(
            "sequence canvas {} does not match source canvas {}",
            seq.canvas,
            source.canvas()
        )));
    }

    let total = seq.frame_count();
    let mut stats = RenderStats::default();

    if !threading.parallel {
        for i in 0..total {
            sink(i, render_guarded(source, seq.time_of(i))?)?;
        }
        stats.frames_total = total;
        stats.chunks = 1;
        return Ok(stats);
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let mut chunk_start = 0u64;
    while chunk_start < total {
        let chunk_end = (chunk_start + chunk_size).min(total);
        let rendered = pool.install(|| {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|i| render_guarded(source, seq.time_of(i)))
                .collect::<Vec<_>>()
        });
        for (offset, frame) in rendered.into_iter().enumerate() {
            sink(chunk_start + offset as u64, frame?)?;
        }
        tracing::debug!(chunk_start, chunk_end, "chunk rendered");
        stats.chunks += 1;
        chunk_start = chunk_end;
    }
    stats.frames_total = total;
    Ok(stats)
}

fn render_guarded(source: &dyn FrameSource, t: f64) -> ReelResult<FrameRgb8> {
    catch_unwind(AssertUnwindSafe(|| source.render_at(t)))
        .unwrap_or_else(|payload| Err(ReelError::from_panic("frame synthesis", payload)))
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::invalid_parameter(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::computation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;

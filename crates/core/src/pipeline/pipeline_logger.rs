use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for per-frame pipeline events.
///
/// Keeps the use case free of any particular output mechanism so the
/// desktop shell and tests can observe stage timings the same way.
pub trait PipelineLogger {
    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces per frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Mark the end of one frame.
    fn frame_done(&mut self) {}

    /// Emit a summary of everything recorded since the last reset. Default: no-op.
    fn summary(&self) {}

    /// Forget everything recorded so far. Default: no-op.
    fn reset(&mut self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

/// Running sum and count for one named series.
#[derive(Debug, Default, Clone, Copy)]
struct Stat {
    sum: f64,
    count: usize,
}

impl Stat {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Logger backed by the `log` facade.
///
/// Per-frame values go out at debug level; `summary` reports averages and
/// throughput at info level. Only running totals are kept.
pub struct LogPipelineLogger {
    timings: HashMap<String, Stat>,
    metrics: HashMap<String, Stat>,
    start_time: Instant,
    frames: usize,
}

impl LogPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if no frame was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Session summary ({} frames, {elapsed_s:.1}s):",
            self.frames
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            lines.push(format!("  {stage:10}: avg {:6.1}ms", self.timings[stage].average()));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            lines.push(format!("  {name}: avg {:.1}", self.metrics[name].average()));
        }

        if elapsed_s > 0.0 {
            lines.push(format!("  Throughput: {:.1} fps", self.frames as f64 / elapsed_s));
        }

        Some(lines.join("\n"))
    }

    /// Average and sample count for a stage.
    pub fn timing_stats(&self, stage: &str) -> Option<(f64, usize)> {
        self.timings.get(stage).map(|s| (s.average(), s.count))
    }

    pub fn metric_stats(&self, name: &str) -> Option<(f64, usize)> {
        self.metrics.get(name).map(|s| (s.average(), s.count))
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        log::debug!("{stage}: {duration_ms:.1}ms");
        self.timings
            .entry(stage.to_string())
            .or_default()
            .add(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        log::debug!("{name} = {value}");
        self.metrics.entry(name.to_string()).or_default().add(value);
    }

    fn frame_done(&mut self) {
        self.frames += 1;
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }

    fn reset(&mut self) {
        self.timings.clear();
        self.metrics.clear();
        self.frames = 0;
        self.start_time = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.timing("locate", 5.0);
        logger.metric("faces", 3.0);
        logger.frame_done();
        logger.summary();
        logger.reset();
    }

    #[test]
    fn test_timing_accumulates_per_stage() {
        let mut logger = LogPipelineLogger::new();
        logger.timing("locate", 20.0);
        logger.timing("locate", 30.0);
        logger.timing("classify", 5.0);

        let (avg, count) = logger.timing_stats("locate").unwrap();
        assert_eq!(count, 2);
        assert_relative_eq!(avg, 25.0);
        assert_eq!(logger.timing_stats("classify").unwrap().1, 1);
        assert!(logger.timing_stats("render").is_none());
    }

    #[test]
    fn test_metric_accumulates() {
        let mut logger = LogPipelineLogger::new();
        logger.metric("faces", 2.0);
        logger.metric("faces", 0.0);
        let (avg, count) = logger.metric_stats("faces").unwrap();
        assert_eq!(count, 2);
        assert_relative_eq!(avg, 1.0);
    }

    #[test]
    fn test_summary_none_without_frames() {
        let mut logger = LogPipelineLogger::new();
        logger.timing("locate", 1.0);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = LogPipelineLogger::new();
        logger.timing("locate", 10.0);
        logger.timing("locate", 20.0);
        logger.metric("faces", 1.0);
        logger.frame_done();
        logger.frame_done();

        let text = logger.summary_string().unwrap();
        assert!(text.contains("2 frames"));
        assert!(text.contains("locate"));
        assert!(text.contains("avg   15.0ms"));
        assert!(text.contains("faces: avg 1.0"));
    }

    #[test]
    fn test_reset_scopes_summary_to_one_session() {
        let mut logger = LogPipelineLogger::new();
        for _ in 0..1000 {
            logger.timing("locate", 40.0);
            logger.metric("faces", 3.0);
            logger.frame_done();
        }
        logger.summary();

        logger.reset();
        assert!(logger.summary_string().is_none());
        assert!(logger.timing_stats("locate").is_none());

        for _ in 0..5 {
            logger.timing("locate", 10.0);
            logger.frame_done();
        }
        assert_eq!(logger.frames(), 5);
        let (avg, count) = logger.timing_stats("locate").unwrap();
        assert_eq!(count, 5);
        assert_relative_eq!(avg, 10.0);
        assert!(logger.summary_string().unwrap().contains("5 frames"));
    }

    #[test]
    fn test_empty_stat_average_is_zero() {
        assert_relative_eq!(Stat::default().average(), 0.0);
    }
}

/// Averages frame rate over a reporting interval.
///
/// Feed it every frame's `dt`; it yields an average once per `interval`
/// seconds, which is what the demos print.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: f32,
    elapsed: f32,
    frames: u32,
    last: Option<f32>,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self { interval: interval.max(f32::EPSILON), elapsed: 0.0, frames: 0, last: None }
    }

    /// Records one frame. Returns the average FPS when an interval completes.
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.elapsed += dt.max(0.0);
        self.frames += 1;

        if self.elapsed < self.interval {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed;
        self.elapsed = 0.0;
        self.frames = 0;
        self.last = Some(fps);
        Some(fps)
    }

    /// Most recent completed average, if any.
    pub fn last(&self) -> Option<f32> {
        self.last
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let mut fps = FpsCounter::new(1.0);
        let reports: Vec<f32> = (0..130).filter_map(|_| fps.record(1.0 / 60.0)).collect();
        assert_eq!(reports.len(), 2);
        assert!((reports[0] - 60.0).abs() < 0.5);
        assert_eq!(fps.last(), reports.last().copied());
    }

    #[test]
    fn nothing_before_first_interval() {
        let mut fps = FpsCounter::new(1.0);
        assert_eq!(fps.record(0.5), None);
        assert_eq!(fps.last(), None);
        assert_eq!(fps.record(0.5), Some(2.0));
    }
}

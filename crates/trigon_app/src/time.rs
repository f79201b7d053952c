use std::time::Instant;

pub struct FrameTimer {
    start: Instant,
    last_time: f32,
    accumulator: f32,
    frame_count: u32,
    /// Time in seconds since the last frame
    pub delta: f32,
    /// Frames per second, updated once per second
    pub fps: u32,
    /// Total number of frames rendered since start
    pub frame: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            last_time: 0.0,
            accumulator: 0.0,
            frame_count: 0,
            delta: 0.0,
            fps: 0,
            frame: 0,
        }
    }
}

impl FrameTimer {
    /// Seconds since the timer was created
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Updates delta time & calculates FPS
    pub(crate) fn update(&mut self) {
        self.advance_to(self.elapsed());
    }

    fn advance_to(&mut self, cur_time: f32) {
        self.delta = cur_time - self.last_time;
        self.last_time = cur_time;

        self.accumulator += self.delta;
        self.frame_count += 1;
        self.frame += 1;

        if self.accumulator >= 1.0 {
            self.fps = self.frame_count;
            log::trace!("{} fps", self.fps);
            self.frame_count = 0;
            self.accumulator = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_and_frame_count_follow_updates() {
        let mut timer = FrameTimer::default();
        timer.advance_to(0.25);
        timer.advance_to(0.75);

        assert_eq!(timer.frame, 2);
        assert_eq!(timer.delta, 0.5);
        assert_eq!(timer.fps, 0);
    }

    #[test]
    fn fps_is_published_once_a_second() {
        let mut timer = FrameTimer::default();
        for i in 1..=4 {
            timer.advance_to(i as f32 * 0.25);
        }

        assert_eq!(timer.fps, 4);
        assert_eq!(timer.frame, 4);
    }
}

// Per-session request statistics

/// Counts successful requests and their total latency
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    total_requests: u64,
    total_response_time_ms: f64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, response_time_ms: f64) {
        self.total_requests += 1;
        self.total_response_time_ms += response_time_ms;
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Mean latency in milliseconds, `None` before the first request
    pub fn average_response_time_ms(&self) -> Option<f64> {
        if self.total_requests == 0 {
            None
        } else {
            Some(self.total_response_time_ms / self.total_requests as f64)
        }
    }

    /// Summary printed at exit; empty when nothing was recorded
    pub fn summary(&self) -> Option<String> {
        self.average_response_time_ms().map(|avg| {
            format!(
                "Session Statistics:\n  Total Requests: {}\n  Average Response Time: {:.2}ms",
                self.total_requests, avg
            )
        })
    }
}

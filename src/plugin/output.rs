/// Step-based progress reporting for installers.
#[derive(Debug, Default)]
pub struct InstallOutput {
    step: usize,
    total_steps: usize,
}

impl InstallOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total_steps(&mut self, total: usize) {
        self.total_steps = total;
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn step(&mut self, message: &str) {
        self.step += 1;
        if self.total_steps < self.step {
            self.total_steps = self.step;
        }
        tracing::info!("[{}/{}] {message}", self.step, self.total_steps);
    }
}

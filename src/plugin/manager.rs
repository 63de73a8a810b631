use crate::error::InstallError;
use crate::plugin::{InstallContext, Installer};

/// Installers of a run, executed in the order they were added.
#[derive(Default)]
pub struct InstallerCollection {
    installers: Vec<Box<dyn Installer>>,
}

impl InstallerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, installer: Box<dyn Installer>) {
        self.installers.push(installer);
    }

    pub fn total_step_count(&self) -> usize {
        self.installers
            .iter()
            .map(|installer| installer.step_count())
            .sum()
    }

    /// Runs every installer against `ctx`, stopping at the first failure.
    pub fn run(&mut self, ctx: &mut InstallContext) -> Result<(), InstallError> {
        ctx.output.set_total_steps(self.total_step_count());

        for installer in &mut self.installers {
            installer.install(ctx)?;
        }

        tracing::info!(
            "{} installers finished in {} steps",
            self.installers.len(),
            ctx.output.current_step()
        );
        Ok(())
    }
}

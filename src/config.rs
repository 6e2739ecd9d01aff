// Solver configuration

use crate::interpreter::constants::DEFAULT_TARGET;
use crate::interpreter::errors::AnalysisError;
use crate::parser::ast::Register;

/// Options for a full solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Register that must end at zero
    pub target: Register,

    /// Split the candidate scan across a rayon pool
    pub parallel: bool,

    /// Worker count for the parallel scan (`None` lets rayon decide)
    pub threads: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            target: DEFAULT_TARGET,
            parallel: false,
            threads: None,
        }
    }
}

impl SolverConfig {
    pub fn parallel(mut self, threads: Option<usize>) -> Self {
        self.parallel = true;
        self.threads = threads;
        self
    }

    pub fn with_target(mut self, target: Register) -> Self {
        self.target = target;
        self
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.threads == Some(0) {
            return Err(AnalysisError::config("'threads' must be >= 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential_on_z() {
        let config = SolverConfig::default();
        assert_eq!(config.target, Register::Z);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = SolverConfig::default().parallel(Some(0));
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig { .. })
        ));
        assert!(SolverConfig::default().parallel(Some(4)).validate().is_ok());
    }
}

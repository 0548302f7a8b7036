use crate::utils::error::SegPadError;

/// Execution settings for a [`ComputeManager`](super::compute_manager::ComputeManager).
///
/// The grain values are the minimum amount of work handed to a single parallel task:
/// segments per task on the outer level, elements per task on the inner level, and
/// lengths per chunk in the prefix sum.
#[derive(Clone, Debug)]
pub struct ComputeConfig {
    pub num_threads: Option<usize>,
    pub segment_grain: usize,
    pub element_grain: usize,
    pub scan_grain: usize,
    pub scratch_limit_bytes: Option<u64>,
}

/// Grain sizes handed to the kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grain {
    pub segments: usize,
    pub elements: usize,
}

impl ComputeConfig {
    pub fn validate(&self) -> Result<(), SegPadError> {
        if self.num_threads == Some(0) {
            return Err(SegPadError::Config(
                "num_threads must be at least 1 when set".to_string(),
            ));
        }

        let grains = [
            ("segment_grain", self.segment_grain),
            ("element_grain", self.element_grain),
            ("scan_grain", self.scan_grain),
        ];
        if let Some((name, _)) = grains.iter().find(|(_, g)| *g == 0) {
            return Err(SegPadError::Config(format!("{} must be at least 1", name)));
        }

        Ok(())
    }

    pub fn grain(&self) -> Grain {
        Grain {
            segments: self.segment_grain,
            elements: self.element_grain,
        }
    }

    pub fn scratch_limit(&self) -> u64 {
        self.scratch_limit_bytes.unwrap_or(u64::MAX)
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            num_threads: None, // rayon picks one per core
            segment_grain: 1,
            element_grain: 4096,
            scan_grain: 8192,
            scratch_limit_bytes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ComputeConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_grain_is_rejected() {
        let config = ComputeConfig {
            element_grain: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SegPadError::Config(msg) if msg.contains("element_grain")));
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = ComputeConfig {
            num_threads: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Benchmark configuration.

/// Workload sizes and host pacing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Math calls in the single-core math stage.
    pub math_calls_single: u64,

    /// Rounds of the digest-chain stage.
    pub hash_rounds: u32,

    /// Rounds of the encode/decode stage.
    pub encode_rounds: u32,

    /// Size of the buffer fed to the encode/decode stage, in bytes.
    pub encode_buffer_len: usize,

    /// Worker count for the parallel run.
    pub worker_count: usize,

    /// Math calls each parallel worker performs.
    pub math_calls_per_worker: u64,

    /// Number of GPU passes to dispatch.
    pub gpu_passes: u32,

    /// GPU output width in pixels.
    pub gpu_width: u32,

    /// GPU output height in pixels.
    pub gpu_height: u32,

    /// Host tick interval in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            math_calls_single: 20_000_000,
            hash_rounds: 3_000,
            encode_rounds: 1_000,
            encode_buffer_len: 256 * 1024,
            worker_count: 200,
            math_calls_per_worker: 2_000_000,
            gpu_passes: 1_200,
            gpu_width: 1024,
            gpu_height: 1024,
            tick_interval_ms: 4,
        }
    }
}

impl Config {
    /// Heavily reduced sizes for smoke runs.
    pub fn quick() -> Self {
        Self {
            math_calls_single: 200_000,
            hash_rounds: 50,
            encode_rounds: 20,
            encode_buffer_len: 16 * 1024,
            worker_count: 8,
            math_calls_per_worker: 50_000,
            gpu_passes: 30,
            gpu_width: 256,
            gpu_height: 256,
            tick_interval_ms: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_is_smaller_than_default() {
        let full = Config::default();
        let quick = Config::quick();
        assert!(quick.math_calls_single < full.math_calls_single);
        assert!(quick.worker_count < full.worker_count);
        assert!(quick.gpu_passes < full.gpu_passes);
    }
}

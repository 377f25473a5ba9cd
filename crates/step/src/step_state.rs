use nodekit_cache::cache_item;
use nodekit_gate::Fingerprint;

cache_item!(
    /// Persisted after each run of a step.
    pub struct StepState {
        pub exit_code: i32,
        /// Only present when the last run succeeded.
        pub fingerprint: Option<Fingerprint>,
        pub last_run_time: u64,
    }
);

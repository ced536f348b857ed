use std::sync::OnceLock;

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Assert that a netlist invariant holds
#[macro_export]
macro_rules! assert_invariant {
    ($cond:expr, $invariant_name:expr) => {
        if !$cond {
            panic!(
                "Invariant violated: {}\nCondition: {}",
                $invariant_name,
                stringify!($cond)
            );
        }
    };
}

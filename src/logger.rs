use std::sync::Once;

use log::info;

const LOG_ENV: &str = "object_pointer=debug";

static INIT: Once = Once::new();

/// Initializes the global logger once; repeated calls are no-ops.
pub fn init_logger() {
    INIT.call_once(|| {
        flexi_logger::Logger::try_with_env_or_str(LOG_ENV)
            .expect("Failed to initialize logger")
            .start()
            .expect("Failed to start logger");
        info!("Logger initialized! {LOG_ENV}");
    });
}

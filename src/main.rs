use pubqueue::app::startup::startup;
use pubqueue::core::error_handling::log_error_with_context;

fn main() {
    if let Err(e) = startup() {
        log_error_with_context(&e, "pubqueue demo failed");
        std::process::exit(1);
    }
}

pub mod capture_loop;
pub mod detect_and_annotate_use_case;
pub mod infrastructure;
pub mod session_logger;
pub mod stop_signal;

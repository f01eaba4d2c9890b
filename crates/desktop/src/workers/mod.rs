pub mod capture_worker;
pub mod classifier_loader;

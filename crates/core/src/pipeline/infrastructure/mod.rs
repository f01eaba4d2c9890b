pub mod use_case_factory;

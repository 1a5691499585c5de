pub mod json_processor;

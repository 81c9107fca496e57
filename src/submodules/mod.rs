pub mod chart;
pub mod configurations;
pub mod curve;
pub mod errors;
pub mod export;
pub mod func_lib;
pub mod input_params;
pub mod output;
pub mod response_functions;
pub mod type_lib;

pub mod dashboard;
pub mod issues;
pub mod officers;
pub mod reports;
pub mod transfers;
pub mod utils;

pub mod check;
pub mod completion;
pub mod contract_file;
pub mod schema;

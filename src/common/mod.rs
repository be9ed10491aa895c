pub mod error;
pub mod response;
pub mod scratch;
pub mod upload;

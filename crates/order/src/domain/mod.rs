pub mod policy;
pub mod requests;
pub mod response;

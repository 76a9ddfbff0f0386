pub mod detail_response;
pub mod responses;

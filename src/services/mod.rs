/// HTTP client for the statistics backend.
pub mod api_client;

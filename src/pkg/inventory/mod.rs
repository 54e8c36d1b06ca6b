pub mod drink;
pub mod http_inventory;
pub mod retry_client;
pub mod source;

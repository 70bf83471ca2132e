pub mod product_service;
pub mod upload;

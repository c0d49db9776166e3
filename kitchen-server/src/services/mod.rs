//! 服务层
//!
//! # 服务列表
//!
//! - [`CatalogService`] - 制作目录 (foodId → 批次参数，含内存缓存与 JSON 持久化)

pub mod catalog_service;

pub use catalog_service::CatalogService;

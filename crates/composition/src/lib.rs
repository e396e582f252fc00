//! # Syringa Composition
//!
//! 这个 crate 是 Syringa 依赖注入容器的组合层，负责校验构建参数、
//! 连接注入器层级并注册初始提供者。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use syringa_abstractions::{CustomProvider, InjectorExt, ProviderType};
//! use syringa_composition::CreateInjectorOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let injector = CreateInjectorOptions::new()
//!     .with_name("AppInjector")
//!     .with_provider(ProviderType::Custom(CustomProvider::value(
//!         "API_URL",
//!         "https://api.example.com".to_string(),
//!     )))
//!     .build()?;
//!
//! let url = injector.require_as::<String>(&"API_URL".into())?;
//! println!("API 地址: {url}");
//! # Ok(())
//! # }
//! ```

pub mod builder;

pub use builder::{create_injector, CreateInjectorOptions};

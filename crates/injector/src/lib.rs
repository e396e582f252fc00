//! # Syringa Injector
//!
//! 解析引擎实现：提供者注册表、作用域感知的缓存、父注入器委托、
//! 多值提供者聚合、循环依赖检测以及根注入器单例。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use syringa_abstractions::{CustomProvider, Injector, InjectorExt, ProviderType};
//! use syringa_injector::{root_injector, InjectorImpl};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let injector = InjectorImpl::new(Some(root_injector() as Arc<dyn Injector>), None);
//! injector.register_provider(ProviderType::Custom(CustomProvider::value(
//!     "GREETING",
//!     "你好".to_string(),
//! )))?;
//!
//! let greeting = injector.require_as::<String>(&"GREETING".into())?;
//! assert_eq!(greeting.as_str(), "你好");
//! # Ok(())
//! # }
//! ```

pub mod injector;
pub mod root;

pub use injector::InjectorImpl;
pub use root::root_injector;

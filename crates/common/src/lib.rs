//! # Syringa Common
//!
//! 这个 crate 提供 Syringa 依赖注入容器的公共类型与进程级注册表。
//!
//! ## 核心组件
//!
//! - [`Token`] / [`InjectionToken`] - 令牌模型
//! - [`Injectable`] - 可注入类型的显式依赖清单
//! - [`Scope`] - 作用域与生命周期策略
//! - [`InjectionConfig`] - 进程级配置
//! - 错误分类：[`ComponentError`]（注册期）与 [`DependencyError`]（解析期）
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全，不依赖运行时反射
//! - 令牌按身份比较，而非按结构比较
//! - 注册期错误在注册时同步抛出，不推迟到解析期

pub mod config;
pub mod errors;
pub mod injectable;
pub mod metadata;
pub mod scope;
pub mod token;

pub use config::*;
pub use errors::*;
pub use injectable::*;
pub use metadata::*;
pub use scope::*;
pub use token::*;

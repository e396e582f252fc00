//! 作用域模型
//!
//! 定义解析值的生命周期与共享策略

use crate::config;
use crate::injectable;
use serde::{Deserialize, Serialize};
use std::any::TypeId;

/// 提供者作用域
///
/// 决定实例的创建时机以及在注入器层级间的共享方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// 全局作用域 - 整个进程内只创建一个实例，由根注入器持有，所有注入器共享
    Global,
    /// 注入器作用域 - 每个注入器一个实例，未重新注册该令牌的子注入器共享父实例
    Injector,
    /// 瞬时作用域 - 每次解析都创建新实例，永不缓存
    Transient,
}

impl Scope {
    /// 是否为瞬时作用域
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Transient)
    }

    /// 是否为全局作用域
    pub fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Injector => write!(f, "injector"),
            Self::Transient => write!(f, "transient"),
        }
    }
}

/// 查询类型的作用域
///
/// 未通过 [`crate::injectable::register_injectable`] 声明作用域的类型
/// 返回进程级默认作用域，查询永不失败
pub fn scope_of_type(type_id: TypeId) -> Scope {
    injectable::declared_scope(type_id).unwrap_or_else(config::default_scope)
}

/// 类型是否声明为全局作用域
///
/// 仅检查声明时显式标注的作用域，不回退到默认值
pub fn is_global_type(type_id: TypeId) -> bool {
    injectable::declared_scope(type_id).is_some_and(Scope::is_global)
}

/// 类型是否为瞬时作用域（含默认回退）
pub fn is_transient_type(type_id: TypeId) -> bool {
    scope_of_type(type_id).is_transient()
}

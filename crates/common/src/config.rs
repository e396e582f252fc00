//! 进程级注入配置
//!
//! 配置项在进程内全局生效，应在首次解析前设置完毕

use crate::errors::ComponentResult;
use crate::scope::Scope;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// 根注入器的保留名称
pub const ROOT_INJECTOR_NAME: &str = "RootInjector";

/// 注入系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// 严格模式 - 拒绝向非根注入器注册全局作用域提供者
    pub strict_mode: bool,
    /// 是否在注册时校验自定义提供者
    pub validate_providers: bool,
    /// 是否启用构造参数注入
    pub enable_constructor_injection: bool,
    /// 未声明作用域时使用的默认作用域
    pub default_scope: Scope,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            validate_providers: true,
            enable_constructor_injection: true,
            default_scope: Scope::Injector,
        }
    }
}

impl InjectionConfig {
    /// 从 JSON 字符串加载配置
    pub fn from_json(content: &str) -> ComponentResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// 全局配置实例
static CONFIG: Lazy<RwLock<InjectionConfig>> = Lazy::new(|| RwLock::new(InjectionConfig::default()));

/// 替换全局配置，返回之前的配置
pub fn configure(config: InjectionConfig) -> InjectionConfig {
    tracing::debug!("更新注入配置: {:?}", config);
    std::mem::replace(&mut *CONFIG.write(), config)
}

/// 获取当前配置的快照
pub fn current_config() -> InjectionConfig {
    CONFIG.read().clone()
}

/// 获取当前默认作用域
pub fn default_scope() -> Scope {
    CONFIG.read().default_scope
}

//! 错误类型定义

use thiserror::Error;

/// 注册阶段错误类型
///
/// 所有注册阶段的校验都在注册时同步失败，不会推迟到解析阶段
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("无效的自定义提供者 '{token}': {message}")]
    InvalidProvider { token: String, message: String },

    #[error("提供者 '{token}' 的 useExisting 不能指向自身")]
    SelfAlias { token: String },

    #[error("无法重复注册提供者 '{token}'")]
    DuplicateRegistration { token: String },

    #[error("注入器名称 '{name}' 已被根注入器保留")]
    ReservedName { name: String },

    #[error("严格模式下禁止向非根注入器注册全局作用域提供者 '{token}'")]
    GlobalProviderInChild { token: String },

    #[error("配置解析失败: {source}")]
    ConfigParseError {
        #[from]
        source: serde_json::Error,
    },
}

impl ComponentError {
    /// 创建无效提供者错误
    pub fn invalid_provider(token: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidProvider {
            token: token.to_string(),
            message: message.into(),
        }
    }

    /// 创建重复注册错误
    pub fn duplicate_registration(token: impl ToString) -> Self {
        Self::DuplicateRegistration {
            token: token.to_string(),
        }
    }
}

/// 依赖解析错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("无法找到令牌 '{token}'")]
    TokenNotFound { token: String },

    #[error("无法解析 '{token}' 的构造参数, 未解析位置: {positions:?}")]
    UnresolvedParameters { token: String, positions: Vec<usize> },

    #[error("当前不在注入上下文中")]
    OutsideInjectionContext,

    #[error("检测到循环依赖: {chain}")]
    CircularDependency { chain: String },

    #[error("令牌 '{token}' 的解析结果类型不匹配, 期望 {expected}")]
    TypeMismatch { token: String, expected: String },

    #[error("创建 '{token}' 实例失败: {message}")]
    CreationFailed { token: String, message: String },
}

impl DependencyError {
    /// 创建令牌未找到错误
    pub fn token_not_found(token: impl ToString) -> Self {
        Self::TokenNotFound {
            token: token.to_string(),
        }
    }

    /// 创建参数未解析错误
    pub fn unresolved_parameters(token: impl ToString, positions: Vec<usize>) -> Self {
        Self::UnresolvedParameters {
            token: token.to_string(),
            positions,
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch(token: impl ToString, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            token: token.to_string(),
            expected: expected.into(),
        }
    }

    /// 创建实例化失败错误
    pub fn creation_failed(token: impl ToString, message: impl Into<String>) -> Self {
        Self::CreationFailed {
            token: token.to_string(),
            message: message.into(),
        }
    }
}

/// 注入系统统一错误类型
#[derive(Error, Debug)]
pub enum InjectionError {
    #[error("注册错误: {source}")]
    Component {
        #[from]
        source: ComponentError,
    },

    #[error("依赖解析错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },
}

/// 结果类型别名
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InjectionResult<T> = Result<T, InjectionError>;

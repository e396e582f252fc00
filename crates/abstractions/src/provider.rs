//! 提供者模型
//!
//! 描述如何为一个令牌生产值：类型提供者直接实例化类型本身，
//! 自定义提供者通过值、替代类型、工厂或别名四种策略之一生产

use std::sync::Arc;
use syringa_common::{
    config, scope_of_type, ComponentError, ComponentResult, DependencyResult, Injectable,
    InjectableHandle, Resolution, ResolvedParams, Scope, Token,
};

/// 工厂函数类型
pub type FactoryFn = Arc<dyn Fn(ResolvedParams) -> DependencyResult<Resolution> + Send + Sync>;

/// 自定义提供者
///
/// 必须且只能设置 `use_value` / `use_class` / `use_factory` / `use_existing`
/// 中的一种生产策略，违反约束在注册时同步报错
#[derive(Clone)]
pub struct CustomProvider {
    /// 注册使用的令牌
    pub token: Token,
    /// 预先计算好的值
    pub use_value: Option<Resolution>,
    /// 为该令牌实例化的替代类型
    pub use_class: Option<InjectableHandle>,
    /// 工厂函数
    pub use_factory: Option<FactoryFn>,
    /// 工厂函数的依赖令牌清单，按参数顺序解析后传入
    pub deps: Option<Vec<Token>>,
    /// 别名目标令牌，解析时转发到该令牌
    pub use_existing: Option<Token>,
    /// 注册时标注的作用域
    pub scope: Option<Scope>,
    /// 多值标志，同一令牌的多次 multi 注册按顺序追加而不是冲突
    pub multi: bool,
}

impl CustomProvider {
    /// 创建未设置生产策略的提供者
    pub fn new(token: impl Into<Token>) -> Self {
        Self {
            token: token.into(),
            use_value: None,
            use_class: None,
            use_factory: None,
            deps: None,
            use_existing: None,
            scope: None,
            multi: false,
        }
    }

    /// 创建值提供者
    pub fn value<V: Send + Sync + 'static>(token: impl Into<Token>, value: V) -> Self {
        Self::new(token).with_value(value)
    }

    /// 创建类型替代提供者
    pub fn class<T: Injectable>(token: impl Into<Token>) -> Self {
        Self::new(token).with_class::<T>()
    }

    /// 创建别名提供者
    pub fn existing(token: impl Into<Token>, target: impl Into<Token>) -> Self {
        Self::new(token).with_existing(target)
    }

    /// 创建工厂提供者
    pub fn factory<V, F>(token: impl Into<Token>, factory: F) -> Self
    where
        V: Send + Sync + 'static,
        F: Fn(ResolvedParams) -> DependencyResult<V> + Send + Sync + 'static,
    {
        Self::new(token).with_factory(factory)
    }

    /// 设置预计算值
    pub fn with_value<V: Send + Sync + 'static>(mut self, value: V) -> Self {
        self.use_value = Some(Arc::new(value) as Resolution);
        self
    }

    /// 设置替代类型
    pub fn with_class<T: Injectable>(mut self) -> Self {
        self.use_class = Some(InjectableHandle::of::<T>());
        self
    }

    /// 设置工厂函数
    pub fn with_factory<V, F>(mut self, factory: F) -> Self
    where
        V: Send + Sync + 'static,
        F: Fn(ResolvedParams) -> DependencyResult<V> + Send + Sync + 'static,
    {
        self.use_factory = Some(Arc::new(move |params| {
            factory(params).map(|value| Arc::new(value) as Resolution)
        }));
        self
    }

    /// 设置别名目标
    pub fn with_existing(mut self, target: impl Into<Token>) -> Self {
        self.use_existing = Some(target.into());
        self
    }

    /// 设置工厂依赖清单
    pub fn with_deps(mut self, deps: impl IntoIterator<Item = Token>) -> Self {
        self.deps = Some(deps.into_iter().collect());
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// 标记为多值提供者
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// 校验提供者配置
    ///
    /// 在注册时调用，违反约束立即报错而不是推迟到解析期
    pub fn validate(&self) -> ComponentResult<()> {
        let strategies = usize::from(self.use_value.is_some())
            + usize::from(self.use_class.is_some())
            + usize::from(self.use_factory.is_some())
            + usize::from(self.use_existing.is_some());

        if strategies != 1 {
            return Err(ComponentError::invalid_provider(
                &self.token,
                "必须且只能设置 useValue/useClass/factory/useExisting 中的一种生产策略",
            ));
        }

        if let Some(target) = &self.use_existing {
            if *target == self.token {
                return Err(ComponentError::SelfAlias {
                    token: self.token.to_string(),
                });
            }
        }

        if self.deps.is_some() && self.use_factory.is_none() {
            return Err(ComponentError::invalid_provider(
                &self.token,
                "deps 只能与 factory 一起使用",
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for CustomProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomProvider")
            .field("token", &self.token)
            .field("has_value", &self.use_value.is_some())
            .field("has_class", &self.use_class.is_some())
            .field("has_factory", &self.use_factory.is_some())
            .field("use_existing", &self.use_existing)
            .field("scope", &self.scope)
            .field("multi", &self.multi)
            .finish()
    }
}

/// 提供者
#[derive(Debug, Clone)]
pub enum ProviderType {
    /// 类型提供者：令牌与生产者是同一个类型
    Type(InjectableHandle),
    /// 自定义提供者
    Custom(CustomProvider),
}

impl ProviderType {
    /// 创建指定类型的类型提供者
    pub fn of<T: Injectable>() -> Self {
        Self::Type(InjectableHandle::of::<T>())
    }

    /// 提取提供者的令牌
    pub fn token(&self) -> Token {
        match self {
            Self::Type(handle) => handle.token(),
            Self::Custom(provider) => provider.token.clone(),
        }
    }

    /// 提供者的作用域
    ///
    /// 自定义提供者优先取注册时标注的作用域，类型令牌回退到声明作用域，
    /// 最终回退到进程默认作用域，查询永不失败
    pub fn scope(&self) -> Scope {
        match self {
            Self::Type(handle) => scope_of_type(handle.type_info().id),
            Self::Custom(provider) => provider.scope.unwrap_or_else(|| match &provider.token {
                Token::Type(info) => scope_of_type(info.id),
                _ => config::default_scope(),
            }),
        }
    }

    /// 是否为多值提供者
    pub fn is_multi(&self) -> bool {
        match self {
            Self::Type(_) => false,
            Self::Custom(provider) => provider.multi,
        }
    }

    /// 是否为全局作用域
    pub fn is_global(&self) -> bool {
        self.scope().is_global()
    }

    /// 是否为瞬时作用域
    pub fn is_transient(&self) -> bool {
        self.scope().is_transient()
    }

    /// 校验提供者
    pub fn validate(&self) -> ComponentResult<()> {
        match self {
            Self::Type(_) => Ok(()),
            Self::Custom(provider) => provider.validate(),
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(handle) => write!(f, "{}", handle.type_info()),
            Self::Custom(provider) => write!(f, "{}", provider.token),
        }
    }
}

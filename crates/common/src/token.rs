//! 令牌模型
//!
//! 令牌是向注入器请求值时使用的身份标识，按身份比较而非按结构比较：
//! 类型令牌比较 `TypeId`，名称令牌比较字符串，注入令牌比较内部指针

use crate::errors::{DependencyError, DependencyResult};
use crate::metadata::TypeInfo;
use std::any::Any;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// 解析结果的统一载体
pub type Resolution = Arc<dyn Any + Send + Sync>;

/// 注入令牌的默认值
#[derive(Clone)]
pub enum TokenDefault {
    /// 预先计算好的默认值
    Value(Resolution),
    /// 惰性求值的默认值工厂，在持有注入上下文的情况下调用
    Factory(Arc<dyn Fn() -> Resolution + Send + Sync>),
}

impl std::fmt::Debug for TokenDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(_) => f.write_str("TokenDefault::Value"),
            Self::Factory(_) => f.write_str("TokenDefault::Factory"),
        }
    }
}

/// 注入令牌的共享内部数据
///
/// 令牌身份即该结构的指针身份，克隆 [`InjectionToken`] 不会改变身份
#[derive(Debug, Clone)]
pub struct InjectionTokenInner {
    /// 调试用名称
    pub name: String,
    /// 未找到提供者时是否视为错误
    pub required: bool,
    /// 未找到提供者时使用的默认值
    pub default_value: Option<TokenDefault>,
}

/// 令牌
#[derive(Debug, Clone)]
pub enum Token {
    /// 类型令牌，以 `TypeId` 为身份
    Type(TypeInfo),
    /// 名称令牌，以字符串内容为身份
    Name(Cow<'static, str>),
    /// 注入令牌，以内部指针为身份
    Injection(Arc<InjectionTokenInner>),
}

impl Token {
    /// 创建指定类型的类型令牌
    pub fn of<T: 'static>() -> Self {
        Self::Type(TypeInfo::of::<T>())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Type(a), Self::Type(b)) => a.id == b.id,
            (Self::Name(a), Self::Name(b)) => a == b,
            (Self::Injection(a), Self::Injection(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Type(info) => {
                0u8.hash(state);
                info.id.hash(state);
            }
            Self::Name(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Self::Injection(inner) => {
                2u8.hash(state);
                (Arc::as_ptr(inner) as usize).hash(state);
            }
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(info) => write!(f, "{}", info.name),
            Self::Name(name) => write!(f, "{name}"),
            Self::Injection(inner) => write!(f, "InjectionToken[{}]", inner.name),
        }
    }
}

impl From<&'static str> for Token {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl From<TypeInfo> for Token {
    fn from(info: TypeInfo) -> Self {
        Self::Type(info)
    }
}

impl<T: ?Sized> From<&InjectionToken<T>> for Token {
    fn from(token: &InjectionToken<T>) -> Self {
        token.token()
    }
}

/// 类型化注入令牌
///
/// 在没有类型身份可用时（接口、原始值、第三方类型）作为令牌使用，
/// 携带调试名称、可选默认值与 required 标志
pub struct InjectionToken<T: ?Sized> {
    inner: Arc<InjectionTokenInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ?Sized> Clone for InjectionToken<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> InjectionToken<T> {
    /// 创建新的注入令牌
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(InjectionTokenInner {
                name: name.into(),
                required: false,
                default_value: None,
            }),
            _marker: PhantomData,
        }
    }

    /// 标记为必需令牌，解析不到时报错而不是返回空
    ///
    /// 构建期方法，应在令牌被注册或共享之前调用
    pub fn required(self) -> Self {
        self.update(|inner| inner.required = true)
    }

    /// 获取令牌名称
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 转换为通用令牌，保持身份不变
    pub fn token(&self) -> Token {
        Token::Injection(Arc::clone(&self.inner))
    }

    fn update(self, apply: impl FnOnce(&mut InjectionTokenInner)) -> Self {
        let mut inner = (*self.inner).clone();
        apply(&mut inner);
        Self {
            inner: Arc::new(inner),
            _marker: PhantomData,
        }
    }
}

impl<T: Send + Sync + 'static> InjectionToken<T> {
    /// 设置默认值，未注册提供者时返回该值
    ///
    /// 构建期方法，应在令牌被注册或共享之前调用
    pub fn with_default(self, value: T) -> Self {
        let resolution: Resolution = Arc::new(value);
        self.update(|inner| inner.default_value = Some(TokenDefault::Value(resolution)))
    }

    /// 设置默认值工厂，未注册提供者时在当前注入器的上下文内求值
    ///
    /// 构建期方法，应在令牌被注册或共享之前调用
    pub fn with_default_factory(self, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        let erased: Arc<dyn Fn() -> Resolution + Send + Sync> =
            Arc::new(move || Arc::new(factory()) as Resolution);
        self.update(|inner| inner.default_value = Some(TokenDefault::Factory(erased)))
    }
}

impl<T: ?Sized> std::fmt::Display for InjectionToken<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InjectionToken[{}]", self.inner.name)
    }
}

impl<T: ?Sized> std::fmt::Debug for InjectionToken<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionToken")
            .field("name", &self.inner.name)
            .field("required", &self.inner.required)
            .finish()
    }
}

/// 将解析结果向下转换为具体类型
pub fn downcast_resolution<T: Send + Sync + 'static>(
    token: &Token,
    resolution: Resolution,
) -> DependencyResult<Arc<T>> {
    resolution
        .downcast::<T>()
        .map_err(|_| DependencyError::type_mismatch(token, std::any::type_name::<T>()))
}

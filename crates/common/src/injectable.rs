//! 可注入类型的声明与注册
//!
//! 不依赖语言反射：类型通过实现 [`Injectable`] 显式声明构造依赖清单，
//! 并通过 [`register_injectable`] 在声明期登记到进程级注册表

use crate::errors::{DependencyError, DependencyResult};
use crate::metadata::TypeInfo;
use crate::scope::Scope;
use crate::token::{Resolution, Token};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::sync::Arc;

/// 按位置传入的已解析构造参数
///
/// 参数顺序与 [`Injectable::dependencies`] 声明的令牌顺序一致
pub struct ResolvedParams {
    values: Vec<Option<Resolution>>,
}

impl ResolvedParams {
    /// 从已解析值列表创建
    pub fn new(values: Vec<Resolution>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// 创建空参数列表
    pub fn empty() -> Self {
        Self { values: Vec::new() }
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 取出指定位置的参数并转换为具体类型
    ///
    /// 每个位置只能取出一次
    pub fn take<T: Send + Sync + 'static>(&mut self, index: usize) -> DependencyResult<Arc<T>> {
        let value = self
            .values
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| {
                DependencyError::creation_failed(
                    format!("参数 #{index}"),
                    "参数不存在或已被取出",
                )
            })?;

        value.downcast::<T>().map_err(|_| {
            DependencyError::type_mismatch(format!("参数 #{index}"), std::any::type_name::<T>())
        })
    }
}

/// 可注入类型 trait
///
/// `dependencies` 返回构造所需的令牌清单（默认无参构造），
/// `construct` 接收按清单顺序解析出的参数并构建实例。
/// 构造体内也可以使用环境注入入口按需请求依赖
pub trait Injectable: Send + Sync + 'static {
    /// 构造依赖的令牌清单，按构造参数顺序排列
    fn dependencies() -> Vec<Token> {
        Vec::new()
    }

    /// 用已解析的参数构建实例
    fn construct(params: ResolvedParams) -> DependencyResult<Self>
    where
        Self: Sized;
}

/// 类型擦除后的可注入类型句柄
///
/// 携带类型信息、依赖清单函数和构造函数，供注册表与提供者传递
#[derive(Clone)]
pub struct InjectableHandle {
    type_info: TypeInfo,
    dependencies: Arc<dyn Fn() -> Vec<Token> + Send + Sync>,
    construct: Arc<dyn Fn(ResolvedParams) -> DependencyResult<Resolution> + Send + Sync>,
}

impl InjectableHandle {
    /// 从具体类型创建句柄
    pub fn of<T: Injectable>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            dependencies: Arc::new(T::dependencies),
            construct: Arc::new(|params| {
                T::construct(params).map(|instance| Arc::new(instance) as Resolution)
            }),
        }
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 对应的类型令牌
    pub fn token(&self) -> Token {
        Token::Type(self.type_info.clone())
    }

    /// 构造依赖的令牌清单
    pub fn dependencies(&self) -> Vec<Token> {
        (self.dependencies.as_ref())()
    }

    /// 用已解析参数构建实例
    pub fn construct(&self, params: ResolvedParams) -> DependencyResult<Resolution> {
        (self.construct.as_ref())(params)
    }
}

impl std::fmt::Debug for InjectableHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectableHandle")
            .field("type_info", &self.type_info)
            .finish()
    }
}

/// 可注入类型的声明选项
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectableOptions {
    /// 声明时标注的作用域，缺省则在查询时回退到进程默认作用域
    pub scope: Option<Scope>,
}

impl InjectableOptions {
    /// 指定作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// 可注入类型的注册记录
#[derive(Debug, Clone)]
pub struct InjectableRecord {
    /// 类型句柄
    pub handle: InjectableHandle,
    /// 声明选项
    pub options: InjectableOptions,
}

/// 进程级可注入类型注册表
static INJECTABLES: Lazy<DashMap<TypeId, InjectableRecord>> = Lazy::new(DashMap::new);

/// 注册可注入类型
///
/// 每个类型在声明期调用一次，重复注册以最后一次为准（幂等覆盖）
pub fn register_injectable<T: Injectable>(options: InjectableOptions) {
    let handle = InjectableHandle::of::<T>();
    tracing::debug!(
        "注册可注入类型: {} (作用域: {:?})",
        handle.type_info(),
        options.scope
    );
    INJECTABLES.insert(TypeId::of::<T>(), InjectableRecord { handle, options });
}

/// 为类型声明作用域的便捷形式
pub fn register_scope<T: Injectable>(scope: Scope) {
    register_injectable::<T>(InjectableOptions::default().with_scope(scope));
}

/// 查询类型的注册记录
pub fn injectable_record(type_id: TypeId) -> Option<InjectableRecord> {
    INJECTABLES.get(&type_id).map(|record| record.value().clone())
}

/// 查询类型声明时标注的作用域
pub fn declared_scope(type_id: TypeId) -> Option<Scope> {
    INJECTABLES
        .get(&type_id)
        .and_then(|record| record.options.scope)
}

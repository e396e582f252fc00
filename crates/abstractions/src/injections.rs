//! 自由函数注入入口
//!
//! 仅在注入器作用域内（`run` / `run_async` 或构造过程中）可用，
//! 否则返回 [`DependencyError::OutsideInjectionContext`]

use crate::context::require_current;
use std::sync::Arc;
use syringa_common::{
    downcast_resolution, DependencyResult, InjectionToken, Resolution, Token,
};

/// 向当前注入器请求依赖，未找到时报错
pub fn inject(token: impl Into<Token>) -> DependencyResult<Resolution> {
    let injector = require_current()?;
    injector.require(&token.into())
}

/// 向当前注入器请求依赖，未找到时返回 `Ok(None)`
pub fn inject_optional(token: impl Into<Token>) -> DependencyResult<Option<Resolution>> {
    let injector = require_current()?;
    injector.get(&token.into())
}

/// 向当前注入器请求依赖并向下转换为具体类型
pub fn inject_as<T: Send + Sync + 'static>(token: impl Into<Token>) -> DependencyResult<Arc<T>> {
    let token = token.into();
    let injector = require_current()?;
    let resolution = injector.require(&token)?;
    downcast_resolution(&token, resolution)
}

/// 按类型化注入令牌请求依赖
pub fn inject_token<T: Send + Sync + 'static>(
    token: &InjectionToken<T>,
) -> DependencyResult<Arc<T>> {
    inject_as::<T>(token.token())
}

/// 以类型本身为令牌请求依赖
pub fn inject_type<T: Send + Sync + 'static>() -> DependencyResult<Arc<T>> {
    inject_as::<T>(Token::of::<T>())
}

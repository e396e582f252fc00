//! 注入器抽象接口

use crate::provider::ProviderType;
use std::sync::Arc;
use syringa_common::{
    downcast_resolution, ComponentResult, DependencyError, DependencyResult, InjectionToken,
    Resolution, Token,
};

/// 注入器 trait
///
/// 注入器持有令牌到提供者条目的映射，解析时可以委托给父注入器
pub trait Injector: Send + Sync {
    /// 注入器名称，用于调试输出
    fn name(&self) -> &str;

    /// 父注入器，仅用于解析委托
    fn parent(&self) -> Option<Arc<dyn Injector>>;

    /// 注册提供者
    ///
    /// 同一令牌在同一注入器内只能注册一次（multi 追加除外），
    /// 父注入器的注册不阻止子注入器注册同名令牌（允许遮蔽）
    fn register_provider(&self, provider: ProviderType) -> ComponentResult<()>;

    /// 解析令牌，可选择跳过父注入器委托
    ///
    /// 返回 `Ok(None)` 表示未找到；解析过程本身的失败以 `Err` 返回
    fn get_with(&self, token: &Token, ignore_parent: bool) -> DependencyResult<Option<Resolution>>;

    /// 解析令牌，未找到时返回 `Ok(None)`
    fn get(&self, token: &Token) -> DependencyResult<Option<Resolution>> {
        self.get_with(token, false)
    }

    /// 解析令牌，未找到时报错
    fn require(&self, token: &Token) -> DependencyResult<Resolution> {
        self.get(token)?
            .ok_or_else(|| DependencyError::token_not_found(token))
    }

    /// 立即解析所有已注册的令牌
    ///
    /// `allow_unresolved` 为 false 时首个失败中止整个操作并传播错误，
    /// 为 true 时跳过无法解析的条目，返回成功解析的令牌列表
    fn resolve_all(&self, allow_unresolved: bool) -> DependencyResult<Vec<Token>>;

    /// 输出注入器内容的调试信息
    fn print_debug(&self);
}

/// 注入器的类型化访问扩展
pub trait InjectorExt: Injector {
    /// 解析并向下转换为具体类型
    fn get_as<T: Send + Sync + 'static>(&self, token: &Token) -> DependencyResult<Option<Arc<T>>> {
        match self.get(token)? {
            Some(resolution) => Ok(Some(downcast_resolution(token, resolution)?)),
            None => Ok(None),
        }
    }

    /// 解析并向下转换为具体类型，未找到时报错
    fn require_as<T: Send + Sync + 'static>(&self, token: &Token) -> DependencyResult<Arc<T>> {
        let resolution = self.require(token)?;
        downcast_resolution(token, resolution)
    }

    /// 按类型化注入令牌解析
    fn get_token<T: Send + Sync + 'static>(
        &self,
        token: &InjectionToken<T>,
    ) -> DependencyResult<Option<Arc<T>>> {
        self.get_as::<T>(&token.token())
    }

    /// 按类型化注入令牌解析，未找到时报错
    fn require_token<T: Send + Sync + 'static>(
        &self,
        token: &InjectionToken<T>,
    ) -> DependencyResult<Arc<T>> {
        self.require_as::<T>(&token.token())
    }

    /// 解析多值令牌并向下转换每个元素
    fn get_multi_as<T: Send + Sync + 'static>(
        &self,
        token: &Token,
    ) -> DependencyResult<Option<Vec<Arc<T>>>> {
        match self.get(token)? {
            Some(resolution) => {
                let values = downcast_resolution::<Vec<Resolution>>(token, resolution)?;
                let mut typed = Vec::with_capacity(values.len());
                for value in values.iter() {
                    typed.push(downcast_resolution::<T>(token, Arc::clone(value))?);
                }
                Ok(Some(typed))
            }
            None => Ok(None),
        }
    }
}

impl<I: Injector + ?Sized> InjectorExt for I {}

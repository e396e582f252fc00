//! 环境注入上下文
//!
//! 让远离调用点的代码（例如构造体内部）无需显式持有注入器句柄即可请求依赖。
//! "当前注入器" 绑定到逻辑任务而不是单一的全局可变量：
//! 同步代码通过 `sync_scope` 建立嵌套作用域，异步代码通过 `scope` 让绑定
//! 跨越挂起点并与并发的兄弟任务相互隔离

use crate::injector::Injector;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use syringa_common::{DependencyError, DependencyResult};
use tokio::task::futures::TaskLocalFuture;

tokio::task_local! {
    /// 当前逻辑任务绑定的注入器
    static CURRENT_INJECTOR: Arc<dyn Injector>;
}

/// 进程级当前注入器
///
/// 仅作为任务级绑定缺失时的回退，通过 [`set_current`] 显式换入换出
static GLOBAL_INJECTOR: Lazy<RwLock<Option<Arc<dyn Injector>>>> = Lazy::new(|| RwLock::new(None));

/// 替换进程级当前注入器，返回之前的值以便恢复
pub fn set_current(injector: Option<Arc<dyn Injector>>) -> Option<Arc<dyn Injector>> {
    tracing::trace!(
        "替换进程级当前注入器: {:?}",
        injector.as_ref().map(|injector| injector.name())
    );
    std::mem::replace(&mut *GLOBAL_INJECTOR.write(), injector)
}

/// 获取当前注入器
///
/// 优先取当前任务作用域内的绑定，其次回退到进程级设置
pub fn current() -> Option<Arc<dyn Injector>> {
    CURRENT_INJECTOR
        .try_with(|injector| Arc::clone(injector))
        .ok()
        .or_else(|| GLOBAL_INJECTOR.read().clone())
}

/// 获取当前注入器，不在注入上下文中时报错
pub fn require_current() -> DependencyResult<Arc<dyn Injector>> {
    current().ok_or(DependencyError::OutsideInjectionContext)
}

/// 以指定注入器为当前注入器同步执行 `body`
///
/// 作用域可以嵌套，最内层绑定生效；`body` panic 时之前的绑定同样会恢复
pub fn run_with<R>(injector: Arc<dyn Injector>, body: impl FnOnce() -> R) -> R {
    CURRENT_INJECTOR.sync_scope(injector, body)
}

/// 以指定注入器为当前注入器执行异步体
///
/// 绑定跟随逻辑任务跨越挂起点，不受其他并发任务的影响
pub fn run_with_async<F: Future>(
    injector: Arc<dyn Injector>,
    future: F,
) -> TaskLocalFuture<Arc<dyn Injector>, F> {
    CURRENT_INJECTOR.scope(injector, future)
}

/// 注入器作用域执行的便捷扩展
pub trait InjectorContext {
    /// 转换为动态注入器引用
    fn as_injector(&self) -> Arc<dyn Injector>;

    /// 以自身为当前注入器同步执行 `body`
    fn run<R>(&self, body: impl FnOnce() -> R) -> R {
        run_with(self.as_injector(), body)
    }

    /// 以自身为当前注入器执行异步体
    fn run_async<F: Future>(&self, future: F) -> TaskLocalFuture<Arc<dyn Injector>, F> {
        run_with_async(self.as_injector(), future)
    }
}

impl InjectorContext for Arc<dyn Injector> {
    fn as_injector(&self) -> Arc<dyn Injector> {
        Arc::clone(self)
    }
}

impl<I: Injector + 'static> InjectorContext for Arc<I> {
    fn as_injector(&self) -> Arc<dyn Injector> {
        Arc::clone(self) as Arc<dyn Injector>
    }
}

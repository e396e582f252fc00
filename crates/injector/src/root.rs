//! 根注入器
//!
//! 进程内唯一的无父注入器，是所有注入器的隐式祖先。
//! 对声明为全局作用域的类型在首次请求时按需自注册，
//! 使全局类型无需显式注册即可在任何注入器中解析到同一实例

use crate::injector::InjectorImpl;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// 根注入器单例
static ROOT_INJECTOR: Lazy<Arc<InjectorImpl>> = Lazy::new(InjectorImpl::new_root);

/// 获取根注入器
pub fn root_injector() -> Arc<InjectorImpl> {
    Arc::clone(&ROOT_INJECTOR)
}

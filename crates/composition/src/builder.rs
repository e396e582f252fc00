//! 注入器工厂
//!
//! 校验构建参数、连接父注入器（默认为根注入器）、注册初始提供者，
//! 并可选地在构建时立即解析全部提供者

use std::sync::Arc;
use syringa_abstractions::{Injector, ProviderType};
use syringa_common::{config, ComponentError, InjectionResult, ROOT_INJECTOR_NAME};
use syringa_injector::{root_injector, InjectorImpl};
use tracing::{debug, info};

/// 注入器创建选项
///
/// 使用建造者模式配置后通过 [`CreateInjectorOptions::build`] 或
/// [`create_injector`] 构建注入器
#[derive(Default)]
pub struct CreateInjectorOptions {
    /// 初始注册的提供者列表
    providers: Vec<ProviderType>,
    /// 调试用名称
    name: Option<String>,
    /// 父注入器，缺省为根注入器
    parent: Option<Arc<dyn Injector>>,
    /// 是否在构建时立即解析全部提供者
    instantiate_immediately: bool,
    /// 立即解析时是否允许跳过无法解析的条目
    allow_unresolved: bool,
}

impl CreateInjectorOptions {
    /// 创建默认选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加提供者
    pub fn with_provider(mut self, provider: ProviderType) -> Self {
        self.providers.push(provider);
        self
    }

    /// 批量添加提供者
    pub fn with_providers(mut self, providers: impl IntoIterator<Item = ProviderType>) -> Self {
        self.providers.extend(providers);
        self
    }

    /// 设置调试名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置父注入器
    pub fn with_parent(mut self, parent: Arc<dyn Injector>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// 构建时立即解析全部提供者，解析失败作为构建错误上报
    pub fn instantiate_immediately(mut self, enabled: bool) -> Self {
        self.instantiate_immediately = enabled;
        self
    }

    /// 立即解析时跳过无法解析的条目
    pub fn allow_unresolved(mut self, enabled: bool) -> Self {
        self.allow_unresolved = enabled;
        self
    }

    /// 构建注入器
    pub fn build(self) -> InjectionResult<Arc<InjectorImpl>> {
        create_injector(self)
    }
}

/// 创建新的注入器
///
/// - 拒绝使用根注入器的保留名称
/// - 严格模式下拒绝任何全局作用域提供者；非严格模式下全局作用域提供者
///   被静默重定向到根注入器，其余提供者注册到新注入器
/// - `instantiate_immediately` 时立即调用 `resolve_all`，
///   解析失败作为工厂错误上报而不是推迟到首次使用
pub fn create_injector(options: CreateInjectorOptions) -> InjectionResult<Arc<InjectorImpl>> {
    if options.name.as_deref() == Some(ROOT_INJECTOR_NAME) {
        return Err(ComponentError::ReservedName {
            name: ROOT_INJECTOR_NAME.to_string(),
        }
        .into());
    }

    let settings = config::current_config();

    if settings.strict_mode {
        for provider in &options.providers {
            if provider.is_global() {
                return Err(ComponentError::GlobalProviderInChild {
                    token: provider.token().to_string(),
                }
                .into());
            }
        }
    }

    let parent = options
        .parent
        .unwrap_or_else(|| root_injector() as Arc<dyn Injector>);
    let injector = InjectorImpl::new(Some(parent), options.name);

    for provider in options.providers {
        if provider.is_global() {
            debug!("全局作用域提供者 '{}' 重定向至根注入器", provider);
            root_injector().register_provider(provider)?;
        } else {
            injector.register_provider(provider)?;
        }
    }

    if options.instantiate_immediately {
        let resolved = injector.resolve_all(options.allow_unresolved)?;
        info!(
            "注入器 '{}' 构建完成，预解析 {} 个提供者",
            injector.name(),
            resolved.len()
        );
    }

    Ok(injector)
}

//! 注入器实现
//!
//! 解析引擎本身完全同步：注册表仅由 `register_provider` 修改，
//! 解析过程不持锁递归，跨注入器委托与构造期环境作用域都在当前调用栈内完成

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use syringa_abstractions::{run_with, CustomProvider, Injector, ProviderType};
use syringa_common::{
    config, injectable_record, ComponentError, ComponentResult, DependencyError, DependencyResult,
    InjectableHandle, Resolution, ResolvedParams, Scope, Token, TokenDefault, ROOT_INJECTOR_NAME,
};
use uuid::Uuid;

/// 注入器内部的注册条目
///
/// 条目在注册时创建，之后不会被移除；`resolution` 在首次成功解析后
/// 惰性填充，瞬时作用域的条目永不缓存
struct InjectorEntry {
    token: Token,
    multi: bool,
    producers: Vec<ProviderType>,
    resolution: Option<Resolution>,
}

/// 条目快照，解析期间不持有注册表锁
struct EntrySnapshot {
    multi: bool,
    producers: Vec<ProviderType>,
    resolution: Option<Resolution>,
}

/// 注入器实现
///
/// 持有令牌到条目的映射，解析失败时按 父委托 -> 令牌默认值 的顺序回退。
/// 根注入器是带按需注册标志的特殊实例，见 [`crate::root`]
pub struct InjectorImpl {
    id: Uuid,
    name: Option<String>,
    parent: Option<Arc<dyn Injector>>,
    auto_register_globals: bool,
    entries: RwLock<HashMap<Token, InjectorEntry>>,
    resolving: Mutex<Vec<Token>>,
    created_at: DateTime<Utc>,
    self_ref: Weak<InjectorImpl>,
}

impl InjectorImpl {
    /// 创建新的注入器
    pub fn new(parent: Option<Arc<dyn Injector>>, name: Option<String>) -> Arc<Self> {
        Self::build(parent, name, false)
    }

    /// 创建根注入器实例，仅供 [`crate::root`] 使用
    pub(crate) fn new_root() -> Arc<Self> {
        Self::build(None, Some(ROOT_INJECTOR_NAME.to_string()), true)
    }

    fn build(
        parent: Option<Arc<dyn Injector>>,
        name: Option<String>,
        auto_register_globals: bool,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            id: Uuid::new_v4(),
            name,
            parent,
            auto_register_globals,
            entries: RwLock::new(HashMap::new()),
            resolving: Mutex::new(Vec::new()),
            created_at: Utc::now(),
            self_ref: weak.clone(),
        })
    }

    /// 注入器实例ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 创建时间
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 注册类型提供者的便捷形式
    pub fn register_type<T: syringa_common::Injectable>(&self) -> ComponentResult<()> {
        self.register_provider(ProviderType::of::<T>())
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Injector")
    }

    fn as_dyn(&self) -> DependencyResult<Arc<dyn Injector>> {
        self.self_ref
            .upgrade()
            .map(|injector| injector as Arc<dyn Injector>)
            .ok_or_else(|| {
                DependencyError::creation_failed(self.display_name(), "注入器已被释放")
            })
    }

    /// 进入令牌解析，同一令牌在解析链上重复出现视为循环依赖
    fn enter_resolution(&self, token: &Token) -> DependencyResult<ResolutionGuard<'_>> {
        let mut chain = self.resolving.lock();
        if chain.contains(token) {
            let rendered = chain
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CircularDependency {
                chain: format!("{rendered} -> {token}"),
            });
        }
        chain.push(token.clone());
        Ok(ResolutionGuard { injector: self })
    }

    /// 本地没有条目时的回退路径
    fn resolve_missing(
        &self,
        token: &Token,
        ignore_parent: bool,
    ) -> DependencyResult<Option<Resolution>> {
        // 根注入器对声明为全局作用域的类型按需注册后重试
        if self.auto_register_globals {
            if let Token::Type(info) = token {
                if let Some(record) = injectable_record(info.id) {
                    if record.options.scope.is_some_and(Scope::is_global) {
                        tracing::debug!("根注入器按需注册全局类型: {}", info);
                        match self.register_provider(ProviderType::Type(record.handle)) {
                            Ok(()) => return self.get_with(token, ignore_parent),
                            Err(error) => {
                                tracing::warn!("按需注册全局类型 {} 失败: {}", info, error);
                            }
                        }
                    }
                }
            }
        }

        if !ignore_parent {
            if let Some(parent) = &self.parent {
                if let Some(value) = parent.get(token)? {
                    return Ok(Some(value));
                }
            }
        }

        // 父注入器也找不到时尝试注入令牌自带的默认值
        if let Token::Injection(inner) = token {
            if let Some(default) = &inner.default_value {
                return Ok(Some(self.resolve_token_default(default)?));
            }
            if inner.required {
                return Err(DependencyError::token_not_found(token));
            }
        }

        Ok(None)
    }

    /// 注入令牌默认值：工厂形式在本注入器的环境作用域内求值
    fn resolve_token_default(&self, default: &TokenDefault) -> DependencyResult<Resolution> {
        match default {
            TokenDefault::Value(value) => Ok(Arc::clone(value)),
            TokenDefault::Factory(factory) => {
                let injector = self.as_dyn()?;
                let produce = factory.as_ref();
                Ok(run_with(injector, || produce()))
            }
        }
    }

    fn resolve_provider(&self, provider: &ProviderType) -> DependencyResult<Resolution> {
        match provider {
            ProviderType::Type(handle) => self.resolve_type_provider(handle),
            ProviderType::Custom(custom) => self.resolve_custom_provider(custom),
        }
    }

    fn resolve_custom_provider(&self, provider: &CustomProvider) -> DependencyResult<Resolution> {
        if let Some(value) = &provider.use_value {
            return Ok(Arc::clone(value));
        }
        if let Some(handle) = &provider.use_class {
            return self.resolve_type_provider(handle);
        }
        if let Some(target) = &provider.use_existing {
            return self.require(target);
        }
        if let Some(factory) = &provider.use_factory {
            let params = match &provider.deps {
                Some(deps) if !deps.is_empty() => {
                    ResolvedParams::new(self.resolve_dependencies(&provider.token, deps)?)
                }
                _ => ResolvedParams::empty(),
            };
            return (factory.as_ref())(params);
        }
        Err(DependencyError::creation_failed(
            &provider.token,
            "无法识别的提供者配置",
        ))
    }

    /// 类型提供者解析：按清单解析构造参数，在本注入器的环境作用域内构造，
    /// 使构造体内的 inject 调用解析到正在构造的注入器
    fn resolve_type_provider(&self, handle: &InjectableHandle) -> DependencyResult<Resolution> {
        let deps = handle.dependencies();
        let token = handle.token();

        let params = if deps.is_empty() {
            ResolvedParams::empty()
        } else {
            if !config::current_config().enable_constructor_injection {
                return Err(DependencyError::creation_failed(
                    &token,
                    "构造参数注入已被禁用",
                ));
            }
            ResolvedParams::new(self.resolve_dependencies(&token, &deps)?)
        };

        let injector = self.as_dyn()?;
        run_with(injector, || handle.construct(params))
    }

    /// 按顺序解析依赖清单，收集所有无法解析的位置后统一报错
    fn resolve_dependencies(
        &self,
        owner: &Token,
        deps: &[Token],
    ) -> DependencyResult<Vec<Resolution>> {
        let mut values = Vec::with_capacity(deps.len());
        let mut missing = Vec::new();

        for (index, dep) in deps.iter().enumerate() {
            match self.get(dep)? {
                Some(value) => values.push(value),
                None => missing.push(index),
            }
        }

        if !missing.is_empty() {
            return Err(DependencyError::unresolved_parameters(owner, missing));
        }

        Ok(values)
    }
}

impl Injector for InjectorImpl {
    fn name(&self) -> &str {
        self.display_name()
    }

    fn parent(&self) -> Option<Arc<dyn Injector>> {
        self.parent.clone()
    }

    fn register_provider(&self, provider: ProviderType) -> ComponentResult<()> {
        if config::current_config().validate_providers {
            provider.validate()?;
        }

        let token = provider.token();
        let mut entries = self.entries.write();

        match entries.get_mut(&token) {
            Some(entry) => {
                // 只有双方都带 multi 标志才按顺序追加，混用视为重复注册
                if provider.is_multi() && entry.multi {
                    tracing::debug!("追加多值提供者: {} ({})", token, self.display_name());
                    entry.producers.push(provider);
                    Ok(())
                } else {
                    Err(ComponentError::duplicate_registration(&token))
                }
            }
            None => {
                tracing::debug!("注册提供者: {} ({})", token, self.display_name());
                let multi = provider.is_multi();
                entries.insert(
                    token.clone(),
                    InjectorEntry {
                        token,
                        multi,
                        producers: vec![provider],
                        resolution: None,
                    },
                );
                Ok(())
            }
        }
    }

    fn get_with(&self, token: &Token, ignore_parent: bool) -> DependencyResult<Option<Resolution>> {
        let snapshot = {
            let entries = self.entries.read();
            entries.get(token).map(|entry| EntrySnapshot {
                multi: entry.multi,
                producers: entry.producers.clone(),
                resolution: entry.resolution.clone(),
            })
        };

        let Some(snapshot) = snapshot else {
            return self.resolve_missing(token, ignore_parent);
        };

        if let Some(resolution) = snapshot.resolution {
            return Ok(Some(resolution));
        }

        let _guard = self.enter_resolution(token)?;

        let resolution = if snapshot.multi {
            let mut values = Vec::with_capacity(snapshot.producers.len());
            for provider in &snapshot.producers {
                values.push(self.resolve_provider(provider)?);
            }
            Arc::new(values) as Resolution
        } else if let Some(provider) = snapshot.producers.first() {
            self.resolve_provider(provider)?
        } else {
            return Err(DependencyError::creation_failed(token, "条目没有生产者"));
        };

        // 非瞬时作用域缓存解析结果，后续解析返回同一个实例
        let transient = snapshot.producers.iter().any(ProviderType::is_transient);
        if !transient {
            let mut entries = self.entries.write();
            if let Some(entry) = entries.get_mut(token) {
                if let Some(existing) = &entry.resolution {
                    return Ok(Some(Arc::clone(existing)));
                }
                entry.resolution = Some(Arc::clone(&resolution));
            }
        }

        Ok(Some(resolution))
    }

    fn resolve_all(&self, allow_unresolved: bool) -> DependencyResult<Vec<Token>> {
        let tokens: Vec<Token> = self.entries.read().keys().cloned().collect();
        let mut resolved = Vec::with_capacity(tokens.len());

        for token in tokens {
            match self.require(&token) {
                Ok(_) => resolved.push(token),
                Err(error) => {
                    if allow_unresolved {
                        tracing::debug!("跳过无法解析的令牌 {}: {}", token, error);
                    } else {
                        return Err(error);
                    }
                }
            }
        }

        Ok(resolved)
    }

    fn print_debug(&self) {
        let entries = self.entries.read();
        tracing::info!(
            "注入器 '{}' (id: {}, 创建于 {}) 包含 {} 个注册项",
            self.display_name(),
            self.id,
            self.created_at,
            entries.len()
        );
        for entry in entries.values() {
            let state = if entry.resolution.is_some() {
                "已解析"
            } else {
                "未解析"
            };
            let scope = entry
                .producers
                .first()
                .map_or_else(|| "?".to_string(), |provider| provider.scope().to_string());
            tracing::info!("  {} [{}] {}", entry.token, scope, state);
        }
    }
}

impl std::fmt::Debug for InjectorImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectorImpl")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

/// 解析链守卫，离开作用域时弹出当前令牌
struct ResolutionGuard<'a> {
    injector: &'a InjectorImpl,
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        self.injector.resolving.lock().pop();
    }
}

//! 作用域与缓存策略的集成测试

use std::sync::Arc;
use syringa_abstractions::{CustomProvider, Injector, ProviderType};
use syringa_common::{register_scope, DependencyResult, ResolvedParams, Scope, Token};
use syringa_injector::{root_injector, InjectorImpl};

/// 注入器作用域的测试组件
#[derive(Debug)]
struct ScopedService;

impl syringa_common::Injectable for ScopedService {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        Ok(Self)
    }
}

/// 瞬时作用域的测试组件
#[derive(Debug)]
struct TransientService;

impl syringa_common::Injectable for TransientService {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        Ok(Self)
    }
}

/// 全局作用域的测试组件
#[derive(Debug)]
struct GlobalService;

impl syringa_common::Injectable for GlobalService {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        Ok(Self)
    }
}

#[test]
fn test_injector_scope_is_idempotent_within_one_injector() {
    register_scope::<ScopedService>(Scope::Injector);

    let injector = InjectorImpl::new(None, None);
    injector.register_type::<ScopedService>().unwrap();
    let token = Token::of::<ScopedService>();

    let first = injector.require(&token).unwrap();
    let second = injector.require(&token).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_injector_scope_shared_with_children_but_not_siblings() {
    register_scope::<ScopedService>(Scope::Injector);

    let declaring = InjectorImpl::new(None, Some("Declaring".to_string()));
    declaring.register_type::<ScopedService>().unwrap();
    let token = Token::of::<ScopedService>();

    let child = InjectorImpl::new(Some(declaring.clone() as Arc<dyn Injector>), None);
    assert!(Arc::ptr_eq(
        &declaring.require(&token).unwrap(),
        &child.require(&token).unwrap()
    ));

    // 与声明注入器无层级关系的注入器解析不到该令牌
    let sibling = InjectorImpl::new(None, Some("Sibling".to_string()));
    assert!(sibling.get(&token).unwrap().is_none());
}

#[test]
fn test_transient_scope_creates_new_instance_each_time() {
    register_scope::<TransientService>(Scope::Transient);

    let injector = InjectorImpl::new(None, None);
    injector.register_type::<TransientService>().unwrap();
    let token = Token::of::<TransientService>();

    let first = injector.require(&token).unwrap();
    let second = injector.require(&token).unwrap();
    let third = injector.require(&token).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&second, &third));
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn test_global_scope_shared_process_wide() {
    register_scope::<GlobalService>(Scope::Global);
    let token = Token::of::<GlobalService>();

    // 两个相互独立的注入器都以根注入器为父
    let injector_a = InjectorImpl::new(Some(root_injector() as Arc<dyn Injector>), None);
    let injector_b = InjectorImpl::new(Some(root_injector() as Arc<dyn Injector>), None);

    let from_a = injector_a.require(&token).unwrap();
    let from_b = injector_b.require(&token).unwrap();
    let from_root = root_injector().require(&token).unwrap();

    assert!(Arc::ptr_eq(&from_a, &from_b));
    assert!(Arc::ptr_eq(&from_a, &from_root));

    // 全局类型未在子注入器本地注册
    assert!(injector_a.get_with(&token, true).unwrap().is_none());
}

#[test]
fn test_custom_provider_scope_overrides_default() {
    let injector = InjectorImpl::new(None, None);
    injector
        .register_provider(ProviderType::Custom(
            CustomProvider::class::<ScopedService>("OVERRIDE").with_scope(Scope::Transient),
        ))
        .unwrap();

    let first = injector.require(&"OVERRIDE".into()).unwrap();
    let second = injector.require(&"OVERRIDE".into()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_value_provider_cached_by_default() {
    let injector = InjectorImpl::new(None, None);
    injector
        .register_provider(ProviderType::Custom(CustomProvider::value(
            "CACHED",
            "shared".to_string(),
        )))
        .unwrap();

    let first = injector.require(&"CACHED".into()).unwrap();
    let second = injector.require(&"CACHED".into()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

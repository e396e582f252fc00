//! 环境注入上下文的集成测试
//!
//! 覆盖同步/异步作用域、跨挂起点的上下文保持、并发任务隔离、
//! 构造期注入以及循环依赖检测

use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use syringa_abstractions::{
    context, inject, inject_as, CustomProvider, Injector, InjectorContext, InjectorExt,
    ProviderType,
};
use syringa_common::{DependencyError, DependencyResult, ResolvedParams, Token};
use syringa_injector::InjectorImpl;

fn value_provider(token: &'static str, value: &str) -> ProviderType {
    ProviderType::Custom(CustomProvider::value(token, value.to_string()))
}

#[test]
#[serial]
fn test_inject_outside_context_errors() {
    let error = inject("ANY_TOKEN").unwrap_err();
    assert!(matches!(error, DependencyError::OutsideInjectionContext));
}

#[test]
#[serial]
fn test_set_current_swaps_and_returns_previous() {
    let injector = InjectorImpl::new(None, None);
    injector.register_provider(value_provider("T", "global")).unwrap();

    let previous = context::set_current(Some(injector.clone() as Arc<dyn Injector>));
    assert!(previous.is_none());

    // 进程级设置作为任务级绑定缺失时的回退
    let value = inject_as::<String>("T").unwrap();
    assert_eq!(value.as_str(), "global");

    let restored = context::set_current(previous);
    assert!(restored.is_some());
    assert!(context::current().is_none());
}

#[test]
#[serial]
fn test_run_scopes_and_restores_current_injector() {
    let outer = InjectorImpl::new(None, Some("Outer".to_string()));
    outer.register_provider(value_provider("T", "outer")).unwrap();
    let inner = InjectorImpl::new(None, Some("Inner".to_string()));
    inner.register_provider(value_provider("T", "inner")).unwrap();

    outer.run(|| {
        assert_eq!(inject_as::<String>("T").unwrap().as_str(), "outer");

        // 作用域可以嵌套，最内层绑定生效
        inner.run(|| {
            assert_eq!(inject_as::<String>("T").unwrap().as_str(), "inner");
        });

        assert_eq!(inject_as::<String>("T").unwrap().as_str(), "outer");
    });

    assert!(context::current().is_none());
}

#[tokio::test]
#[serial]
async fn test_run_async_survives_suspension_points() {
    let injector = InjectorImpl::new(None, None);
    injector.register_provider(value_provider("TOKEN", "resolved")).unwrap();

    injector
        .run_async(async {
            assert_eq!(inject_as::<String>("TOKEN").unwrap().as_str(), "resolved");

            tokio::time::sleep(Duration::from_millis(10)).await;

            // 挂起恢复后上下文仍然指向同一个注入器
            assert_eq!(inject_as::<String>("TOKEN").unwrap().as_str(), "resolved");
        })
        .await;
}

#[tokio::test]
#[serial]
async fn test_overlapping_async_contexts_are_isolated() {
    let injector1 = InjectorImpl::new(None, Some("Injector1".to_string()));
    injector1.register_provider(value_provider("T", "V1")).unwrap();
    let injector2 = InjectorImpl::new(None, Some("Injector2".to_string()));
    injector2.register_provider(value_provider("T", "V2")).unwrap();

    // 两个异步上下文交错挂起，各自的绑定互不干扰
    let (first, second) = tokio::join!(
        injector1.run_async(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            inject_as::<String>("T").unwrap().as_str().to_string()
        }),
        injector2.run_async(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            inject_as::<String>("T").unwrap().as_str().to_string()
        }),
    );

    assert_eq!(first, "V1");
    assert_eq!(second, "V2");
}

/// 构造体内通过环境注入获取依赖的测试组件
#[derive(Debug)]
struct Greeter {
    greeting: Arc<String>,
}

impl syringa_common::Injectable for Greeter {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        // 构造过程运行在正在构造的注入器的上下文内
        Ok(Self {
            greeting: inject_as::<String>("GREETING")?,
        })
    }
}

#[test]
#[serial]
fn test_inject_during_construction_resolves_against_constructing_injector() {
    let injector = InjectorImpl::new(None, None);
    injector.register_provider(value_provider("GREETING", "你好")).unwrap();
    injector.register_type::<Greeter>().unwrap();

    let greeter = injector
        .require_as::<Greeter>(&Token::of::<Greeter>())
        .unwrap();
    assert_eq!(greeter.greeting.as_str(), "你好");
}

/// 相互依赖的测试组件
#[derive(Debug)]
struct ServiceX;

impl syringa_common::Injectable for ServiceX {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        let _y = inject(Token::of::<ServiceY>())?;
        Ok(Self)
    }
}

#[derive(Debug)]
struct ServiceY;

impl syringa_common::Injectable for ServiceY {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        let _x = inject(Token::of::<ServiceX>())?;
        Ok(Self)
    }
}

#[test]
#[serial]
fn test_circular_dependency_detected_instead_of_stack_overflow() {
    let injector = InjectorImpl::new(None, None);
    injector.register_type::<ServiceX>().unwrap();
    injector.register_type::<ServiceY>().unwrap();

    let error = injector.require(&Token::of::<ServiceX>()).unwrap_err();
    assert!(matches!(error, DependencyError::CircularDependency { .. }));
    let error = injector.require(&Token::of::<ServiceY>()).unwrap_err();
    assert!(matches!(error, DependencyError::CircularDependency { .. }));
}

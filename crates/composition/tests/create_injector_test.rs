//! 注入器工厂的集成测试

use serial_test::serial;
use std::sync::Arc;
use std::sync::Once;
use syringa_abstractions::{CustomProvider, Injector, InjectorExt, ProviderType};
use syringa_common::{
    config, register_scope, ComponentError, DependencyResult, InjectionConfig, InjectionError,
    ResolvedParams, Scope, Token, ROOT_INJECTOR_NAME,
};
use syringa_composition::{create_injector, CreateInjectorOptions};
use syringa_injector::root_injector;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok(); // 忽略初始化失败的错误
    });
}

/// 测试结束后恢复配置的守卫
struct ConfigGuard(InjectionConfig);

impl ConfigGuard {
    fn set(config: InjectionConfig) -> Self {
        Self(config::configure(config))
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        config::configure(self.0.clone());
    }
}

#[test]
#[serial]
fn test_reserved_root_name_rejected() {
    init_test_logger();

    let error = CreateInjectorOptions::new()
        .with_name(ROOT_INJECTOR_NAME)
        .build()
        .unwrap_err();

    assert!(matches!(
        error,
        InjectionError::Component {
            source: ComponentError::ReservedName { .. }
        }
    ));
}

#[test]
#[serial]
fn test_parent_defaults_to_root_injector() {
    init_test_logger();

    let injector = CreateInjectorOptions::new().build().unwrap();
    let parent = injector.parent().unwrap();
    assert_eq!(parent.name(), ROOT_INJECTOR_NAME);
}

#[test]
#[serial]
fn test_explicit_parent_is_used() {
    init_test_logger();

    let parent = CreateInjectorOptions::new()
        .with_name("ParentInjector")
        .with_provider(ProviderType::Custom(CustomProvider::value(
            "SHARED",
            "from-parent".to_string(),
        )))
        .build()
        .unwrap();

    let child = CreateInjectorOptions::new()
        .with_parent(parent as Arc<dyn Injector>)
        .build()
        .unwrap();

    assert_eq!(
        child
            .require_as::<String>(&"SHARED".into())
            .unwrap()
            .as_str(),
        "from-parent"
    );
}

/// 全局作用域的测试组件，用于验证重定向
#[derive(Debug)]
struct RedirectedService;

impl syringa_common::Injectable for RedirectedService {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        Ok(Self)
    }
}

#[test]
#[serial]
fn test_global_provider_redirected_to_root() {
    init_test_logger();
    register_scope::<RedirectedService>(Scope::Global);
    let token = Token::of::<RedirectedService>();

    let injector = CreateInjectorOptions::new()
        .with_provider(ProviderType::of::<RedirectedService>())
        .build()
        .unwrap();

    // 提供者没有注册到新注入器本地，而是被重定向到根注入器
    assert!(injector.get_with(&token, true).unwrap().is_none());
    let from_root = root_injector().require(&token).unwrap();
    let from_injector = injector.require(&token).unwrap();
    assert!(Arc::ptr_eq(&from_root, &from_injector));
}

/// 严格模式测试专用的全局组件
#[derive(Debug)]
struct StrictModeService;

impl syringa_common::Injectable for StrictModeService {
    fn construct(_params: ResolvedParams) -> DependencyResult<Self> {
        Ok(Self)
    }
}

#[test]
#[serial]
fn test_strict_mode_rejects_global_provider_outright() {
    init_test_logger();
    register_scope::<StrictModeService>(Scope::Global);

    let _guard = ConfigGuard::set(InjectionConfig {
        strict_mode: true,
        ..InjectionConfig::default()
    });

    let error = CreateInjectorOptions::new()
        .with_provider(ProviderType::of::<StrictModeService>())
        .build()
        .unwrap_err();

    assert!(matches!(
        error,
        InjectionError::Component {
            source: ComponentError::GlobalProviderInChild { .. }
        }
    ));
}

#[test]
#[serial]
fn test_instantiate_immediately_surfaces_resolution_failures() {
    init_test_logger();

    let error = CreateInjectorOptions::new()
        .with_provider(ProviderType::Custom(
            CustomProvider::factory("NEEDS_DEP", |mut params: ResolvedParams| {
                let dep = params.take::<String>(0)?;
                Ok(dep.as_str().to_string())
            })
            .with_deps(["ABSENT".into()]),
        ))
        .instantiate_immediately(true)
        .build()
        .unwrap_err();

    assert!(matches!(error, InjectionError::Dependency { .. }));
}

#[test]
#[serial]
fn test_instantiate_immediately_with_allow_unresolved() {
    init_test_logger();

    let injector = CreateInjectorOptions::new()
        .with_providers([
            ProviderType::Custom(CustomProvider::value("READY", 42u32)),
            ProviderType::Custom(
                CustomProvider::factory("NEEDS_DEP", |mut params: ResolvedParams| {
                    let dep = params.take::<String>(0)?;
                    Ok(dep.as_str().to_string())
                })
                .with_deps(["ABSENT".into()]),
            ),
        ])
        .instantiate_immediately(true)
        .allow_unresolved(true)
        .build()
        .unwrap();

    // 可解析的条目已经实例化，不可解析的条目被跳过但保留注册
    assert_eq!(*injector.require_as::<u32>(&"READY".into()).unwrap(), 42);
    assert!(injector.require(&"NEEDS_DEP".into()).is_err());
}

#[test]
#[serial]
fn test_create_injector_function_registers_providers() {
    init_test_logger();

    let injector = create_injector(
        CreateInjectorOptions::new()
            .with_name("FunctionBuilt")
            .with_provider(ProviderType::Custom(CustomProvider::value(
                "GREETING",
                "欢迎".to_string(),
            ))),
    )
    .unwrap();

    assert_eq!(injector.name(), "FunctionBuilt");
    assert_eq!(
        injector
            .require_as::<String>(&"GREETING".into())
            .unwrap()
            .as_str(),
        "欢迎"
    );
}

//! Integration tests for complete plugin lifecycle workflows.
//!
//! These scenarios follow plugins through registration, idempotent restarts,
//! identity-based collapsing of equal instances, cross-repository moves, and
//! repository-driven teardown.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Tests are allowed to panic on setup failures

use logchain::plugin::{Plugin, PluginRegistry, PluginState};
use logchain::repository::LoggerRepository;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Test plugin counting how often its lifecycle contracts are invoked.
struct PluginTester1 {
    state: PluginState,
    id: u32,
    activations: AtomicUsize,
    shutdowns: AtomicUsize,
}

/// A second concrete type with the same shape, for unequal-type scenarios.
struct PluginTester2 {
    state: PluginState,
    id: u32,
    activations: AtomicUsize,
    shutdowns: AtomicUsize,
}

macro_rules! impl_tester {
    ($tester:ident) => {
        impl $tester {
            fn new(name: &str, id: u32) -> Arc<Self> {
                Arc::new(Self {
                    state: PluginState::new(name),
                    id,
                    activations: AtomicUsize::new(0),
                    shutdowns: AtomicUsize::new(0),
                })
            }
        }

        impl Plugin for $tester {
            fn name(&self) -> String {
                self.state.name()
            }
            fn set_name(&self, name: &str) {
                self.state.set_name(name);
            }
            fn repository(&self) -> Option<LoggerRepository> {
                self.state.repository()
            }
            fn set_repository(&self, repository: Option<LoggerRepository>) {
                self.state.set_repository(repository);
            }
            fn is_active(&self) -> bool {
                self.state.is_active()
            }
            fn activate(&self) -> Result<bool, String> {
                self.activations.fetch_add(1, Ordering::SeqCst);
                Ok(self.state.try_activate())
            }
            fn shutdown(&self) -> Result<bool, String> {
                self.shutdowns.fetch_add(1, Ordering::SeqCst);
                Ok(self.state.try_shutdown())
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

impl_tester!(PluginTester1);
impl_tester!(PluginTester2);

/// The numeric identifier of whichever tester type is behind the handle.
fn tester_id(plugin: &Arc<dyn Plugin>) -> u32 {
    plugin
        .as_any()
        .downcast_ref::<PluginTester1>()
        .map(|tester| tester.id)
        .or_else(|| {
            plugin
                .as_any()
                .downcast_ref::<PluginTester2>()
                .map(|tester| tester.id)
        })
        .expect("plugin is not a tester type")
}

fn setup() -> (PluginRegistry, LoggerRepository) {
    let repository = LoggerRepository::new("default");
    (PluginRegistry::new(repository.clone()), repository)
}

#[test]
fn test_basic_starting_and_stopping() {
    let (registry, repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let handle: Arc<dyn Plugin> = plugin1.clone();

    let returned = registry.start_plugin(handle.clone()).unwrap();
    assert_eq!(tester_id(&returned), 1);
    assert!(plugin1.is_active());
    assert_eq!(registry.plugin_count_in(&repository), 1);

    let stopped = registry.stop_plugin(&handle).unwrap();
    assert_eq!(tester_id(&stopped.unwrap()), 1);
    assert!(!plugin1.is_active());
    assert_eq!(registry.plugin_count_in(&repository), 0);
}

#[test]
fn test_restarting_when_already_started() {
    let (registry, _repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let handle: Arc<dyn Plugin> = plugin1.clone();

    registry.start_plugin(handle.clone()).unwrap();
    let returned = registry.start_plugin(handle.clone()).unwrap();

    assert_eq!(tester_id(&returned), 1);
    assert!(plugin1.is_active());
    // The second start short-circuits without touching the activation
    // contract again.
    assert_eq!(plugin1.activations.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stopping_when_already_stopped() {
    let (registry, _repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let handle: Arc<dyn Plugin> = plugin1.clone();

    registry.start_plugin(handle.clone()).unwrap();
    assert!(registry.stop_plugin(&handle).unwrap().is_some());
    // Stopping again is a benign no-op, not an error.
    assert!(registry.stop_plugin(&handle).unwrap().is_none());
    assert_eq!(plugin1.shutdowns.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stopping_by_plugin_name() {
    let (registry, repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);

    registry.start_plugin(plugin1.clone()).unwrap();
    let stopped = registry.stop_plugin_by_name("plugin1").unwrap();
    assert_eq!(tester_id(&stopped.unwrap()), 1);
    assert!(!plugin1.is_active());
    assert_eq!(registry.plugin_count_in(&repository), 0);
}

#[test]
fn test_starting_an_equal_plugin_returns_running_instance() {
    let (registry, _repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin2 = PluginTester1::new("plugin1", 2);

    let returned = registry.start_plugin(plugin1.clone()).unwrap();
    assert_eq!(tester_id(&returned), 1);

    // plugin2 is "the same" plugin: same type, same name, same repository.
    let returned = registry.start_plugin(plugin2.clone()).unwrap();
    assert_eq!(tester_id(&returned), 1);
    assert!(!plugin2.is_active());
    assert_eq!(plugin2.activations.load(Ordering::SeqCst), 0);
    assert!(plugin2.repository().is_none());
}

#[test]
fn test_starting_an_equal_plugin_after_original_stopped() {
    let (registry, _repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin2 = PluginTester1::new("plugin1", 2);

    let running: Arc<dyn Plugin> = registry.start_plugin(plugin1.clone()).unwrap();
    registry.stop_plugin(&running).unwrap();

    let returned = registry.start_plugin(plugin2.clone()).unwrap();
    assert_eq!(tester_id(&returned), 2);
    assert!(plugin2.is_active());
    assert!(!plugin1.is_active());
}

#[test]
fn test_starting_an_unequal_plugin_with_same_name() {
    let (registry, repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin3 = PluginTester2::new("plugin1", 3);

    let returned = registry.start_plugin(plugin1.clone()).unwrap();
    assert_eq!(tester_id(&returned), 1);

    // Different concrete type: not "the same" plugin despite the name, so it
    // activates independently.
    let returned = registry.start_plugin(plugin3.clone()).unwrap();
    assert_eq!(tester_id(&returned), 3);
    assert!(plugin1.is_active());
    assert!(plugin3.is_active());
    assert_eq!(registry.plugin_count_in(&repository), 2);
}

#[test]
fn test_stop_all_plugins() {
    let (registry, repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin4 = PluginTester2::new("plugin2", 4);

    registry.start_plugin(plugin1.clone()).unwrap();
    registry.start_plugin(plugin4.clone()).unwrap();
    assert_eq!(registry.plugin_count_in(&repository), 2);

    assert_eq!(registry.stop_all(), 2);
    assert!(!plugin1.is_active());
    assert!(!plugin4.is_active());
    assert_eq!(registry.plugin_count_in(&repository), 0);

    // Stopping everything again sweeps nothing.
    assert_eq!(registry.stop_all(), 0);
}

#[test]
fn test_stop_one_then_stop_all() {
    let (registry, _repository) = setup();
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin4 = PluginTester2::new("plugin2", 4);
    let handle1: Arc<dyn Plugin> = plugin1.clone();

    registry.start_plugin(handle1.clone()).unwrap();
    registry.start_plugin(plugin4.clone()).unwrap();
    registry.stop_plugin(&handle1).unwrap();

    assert_eq!(registry.stop_all(), 1);
    assert_eq!(plugin1.shutdowns.load(Ordering::SeqCst), 1);
    assert_eq!(plugin4.shutdowns.load(Ordering::SeqCst), 1);
}

#[test]
fn test_plugins_in_multiple_repositories() {
    let (registry, _default) = setup();
    let repo1 = LoggerRepository::new("repository1");
    let repo2 = LoggerRepository::new("repository2");
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin2 = PluginTester1::new("plugin2", 2);
    let handle1: Arc<dyn Plugin> = plugin1.clone();
    let handle2: Arc<dyn Plugin> = plugin2.clone();

    registry.start_plugin_in(handle1.clone(), &repo1).unwrap();
    registry.start_plugin_in(handle2.clone(), &repo2).unwrap();
    assert_eq!(plugin1.repository(), Some(repo1.clone()));
    assert_eq!(plugin2.repository(), Some(repo2.clone()));
    assert_eq!(registry.plugin_count_in(&repo1), 1);
    assert_eq!(registry.plugin_count_in(&repo2), 1);

    // Stop-by-instance resolves each plugin's own repository.
    assert!(registry.stop_plugin(&handle1).unwrap().is_some());
    assert!(registry.stop_plugin(&handle2).unwrap().is_some());
    assert_eq!(registry.plugin_count_in(&repo1), 0);
    assert_eq!(registry.plugin_count_in(&repo2), 0);
}

#[test]
fn test_restarting_plugin_in_different_repository() {
    let (registry, _default) = setup();
    let repo1 = LoggerRepository::new("repository1");
    let repo2 = LoggerRepository::new("repository2");
    let plugin1 = PluginTester1::new("plugin1", 1);

    registry.start_plugin_in(plugin1.clone(), &repo1).unwrap();
    assert_eq!(plugin1.repository(), Some(repo1.clone()));

    // Moving to another repository stops the plugin in its old home first.
    let returned = registry.start_plugin_in(plugin1.clone(), &repo2).unwrap();
    assert_eq!(tester_id(&returned), 1);
    assert!(plugin1.is_active());
    assert_eq!(plugin1.repository(), Some(repo2.clone()));
    assert_eq!(registry.plugin_count_in(&repo1), 0);
    assert_eq!(registry.plugin_count_in(&repo2), 1);
    assert_eq!(plugin1.shutdowns.load(Ordering::SeqCst), 1);
    assert_eq!(plugin1.activations.load(Ordering::SeqCst), 2);
}

#[test]
fn test_stop_all_is_repository_scoped() {
    let (registry, _default) = setup();
    let repo1 = LoggerRepository::new("repository1");
    let repo2 = LoggerRepository::new("repository2");
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin2 = PluginTester1::new("plugin2", 2);

    registry.start_plugin_in(plugin1.clone(), &repo1).unwrap();
    registry.start_plugin_in(plugin2.clone(), &repo2).unwrap();

    assert_eq!(registry.stop_all_in(&repo1), 1);
    assert!(!plugin1.is_active());
    assert!(plugin2.is_active());
    assert_eq!(registry.plugin_count_in(&repo2), 1);

    assert_eq!(registry.stop_all_in(&repo2), 1);
    assert!(!plugin2.is_active());
}

#[test]
fn test_repository_reset_stops_its_plugins() {
    let (registry, _default) = setup();
    let repo1 = LoggerRepository::new("repository1");
    let repo2 = LoggerRepository::new("repository2");
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin2 = PluginTester1::new("plugin2", 2);

    registry.start_plugin_in(plugin1.clone(), &repo1).unwrap();
    registry.start_plugin_in(plugin2.clone(), &repo2).unwrap();

    repo1.reset_configuration();
    assert!(!plugin1.is_active());
    assert!(plugin1.repository().is_none());
    assert_eq!(registry.plugin_count_in(&repo1), 0);
    // The other repository is untouched.
    assert!(plugin2.is_active());
    assert_eq!(registry.plugin_count_in(&repo2), 1);
}

#[test]
fn test_repository_shutdown_stops_its_plugins() {
    let (registry, _default) = setup();
    let repo1 = LoggerRepository::new("repository1");
    let repo2 = LoggerRepository::new("repository2");
    let plugin1 = PluginTester1::new("plugin1", 1);
    let plugin2 = PluginTester1::new("plugin2", 2);

    registry.start_plugin_in(plugin1.clone(), &repo1).unwrap();
    registry.start_plugin_in(plugin2.clone(), &repo2).unwrap();

    repo1.shutdown();
    repo2.shutdown();
    assert!(!plugin1.is_active());
    assert!(!plugin2.is_active());
    assert_eq!(plugin1.shutdowns.load(Ordering::SeqCst), 1);
    assert_eq!(plugin2.shutdowns.load(Ordering::SeqCst), 1);
}

#[test]
fn test_plugin_active_in_one_repository_at_a_time() {
    let (registry, _default) = setup();
    let repo1 = LoggerRepository::new("repository1");
    let repo2 = LoggerRepository::new("repository2");
    let plugin1 = PluginTester1::new("plugin1", 1);

    registry.start_plugin_in(plugin1.clone(), &repo1).unwrap();
    registry.start_plugin_in(plugin1.clone(), &repo2).unwrap();
    registry.start_plugin_in(plugin1.clone(), &repo1).unwrap();

    let registered = registry.plugin_count_in(&repo1) + registry.plugin_count_in(&repo2);
    assert_eq!(registered, 1);
    assert_eq!(plugin1.repository(), Some(repo1));
}

#[test]
fn test_concurrent_equal_starts_activate_once() {
    let (registry, repository) = setup();
    let mut handles = Vec::new();
    let mut testers = Vec::new();
    for id in 0..8 {
        let tester = PluginTester1::new("plugin1", id);
        testers.push(tester.clone());
        let registry = registry.clone();
        handles.push(std::thread::spawn(move || {
            registry.start_plugin(tester).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // All equal instances collapsed onto a single running plugin.
    assert_eq!(registry.plugin_count_in(&repository), 1);
    let active = testers.iter().filter(|tester| tester.is_active()).count();
    assert_eq!(active, 1);
}

//! Integration tests for the network configuration plugin

use guest_init_rs::GuestInitError;
use guest_init_rs::metadata::mock::MockMetadataService;
use guest_init_rs::osutils::mock::{MockOsUtils, OsCall};
use guest_init_rs::plugins::network_config::NetworkConfigPlugin;
use guest_init_rs::plugins::{ExecutionStatus, Plugin};
use guest_init_rs::run_plugins;

const TWO_ADAPTER_CONF: &str = "\
iface eth0 inet static
    address 10.11.12.13 netmask 255.255.255.0 broadcast 10.11.12.255 gateway 10.11.12.1
    dns-nameservers 8.8.8.8 8.8.4.4

iface eth1 inet static
    address 172.16.0.2 netmask 255.255.0.0 broadcast 172.16.255.255
    up route add -net 192.168.0.0 netmask 255.255.0.0 gw 172.16.0.1
";

fn service_with_conf(conf: &str) -> MockMetadataService {
    MockMetadataService::new()
        .with_meta_data_json(r#"{"network_config": {"content_path": "/content/0000"}}"#)
        .with_content("0000", conf)
}

// ==================== No-op Outcomes ====================

/// Metadata without a network_config entry is a successful no-op
#[tokio::test]
async fn test_missing_network_config_is_noop() {
    let service = MockMetadataService::new()
        .with_meta_data_json(r#"{"uuid": "u-1", "hostname": "test-host"}"#);
    let osutils = MockOsUtils::new().with_adapters(&["eth0", "eth1"]);
    let plugin = NetworkConfigPlugin::default();

    let outcome = plugin.execute(&service, &osutils).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Done);
    assert!(!outcome.reboot_required);
    assert!(osutils.calls().is_empty());
}

/// network_config without a content_path is the same no-op
#[tokio::test]
async fn test_missing_content_path_is_noop() {
    let service =
        MockMetadataService::new().with_meta_data_json(r#"{"network_config": {"debug": true}}"#);
    let osutils = MockOsUtils::new().with_adapters(&["eth0", "eth1"]);
    let plugin = NetworkConfigPlugin::default();

    let outcome = plugin.execute(&service, &osutils).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Done);
    assert!(!outcome.reboot_required);
    assert!(osutils.calls().is_empty());
}

// ==================== Two-adapter Configuration ====================

/// Both stanzas applied: two static-config calls and one route call
#[tokio::test]
async fn test_two_adapters_full_configuration() {
    let service = service_with_conf(TWO_ADAPTER_CONF);
    let osutils = MockOsUtils::new().with_adapters(&["Ethernet0", "Ethernet1"]);
    let plugin = NetworkConfigPlugin::default();

    let outcome = plugin.execute(&service, &osutils).await.unwrap();
    assert_eq!(outcome.status, ExecutionStatus::Done);

    let static_calls = osutils.static_config_calls();
    assert_eq!(static_calls.len(), 2);

    assert_eq!(
        static_calls[0],
        OsCall::SetStaticNetworkConfig {
            adapter_name: "Ethernet0".to_string(),
            address: "10.11.12.13".to_string(),
            netmask: "255.255.255.0".to_string(),
            broadcast: "10.11.12.255".to_string(),
            gateway: "10.11.12.1".to_string(),
            dns_servers: vec!["8.8.8.8".to_string(), "8.8.4.4".to_string()],
        }
    );

    // The second adapter is configured with the ROUTE gateway, not a
    // gateway of its own, and reuses the first adapter's DNS list.
    assert_eq!(
        static_calls[1],
        OsCall::SetStaticNetworkConfig {
            adapter_name: "Ethernet1".to_string(),
            address: "172.16.0.2".to_string(),
            netmask: "255.255.0.0".to_string(),
            broadcast: "172.16.255.255".to_string(),
            gateway: "172.16.0.1".to_string(),
            dns_servers: vec!["8.8.8.8".to_string(), "8.8.4.4".to_string()],
        }
    );

    let route_calls = osutils.route_calls();
    assert_eq!(route_calls.len(), 1);
    assert_eq!(
        route_calls[0],
        OsCall::AddStaticRoute {
            destination: "192.168.0.0".to_string(),
            netmask: "255.255.0.0".to_string(),
            gateway: "172.16.0.1".to_string(),
            metric: 1,
            interface_index: 1,
        }
    );
}

/// Reboot-required is the OR of both static-config results
#[tokio::test]
async fn test_reboot_required_is_or_of_results() {
    let service = service_with_conf(TWO_ADAPTER_CONF);
    let osutils = MockOsUtils::new()
        .with_adapters(&["eth0", "eth1"])
        .with_reboot_results(&[false, true]);
    let plugin = NetworkConfigPlugin::default();

    let outcome = plugin.execute(&service, &osutils).await.unwrap();
    assert!(outcome.reboot_required);
}

#[tokio::test]
async fn test_reboot_not_required_when_both_false() {
    let service = service_with_conf(TWO_ADAPTER_CONF);
    let osutils = MockOsUtils::new()
        .with_adapters(&["eth0", "eth1"])
        .with_reboot_results(&[false, false]);
    let plugin = NetworkConfigPlugin::default();

    let outcome = plugin.execute(&service, &osutils).await.unwrap();
    assert!(!outcome.reboot_required);
}

// ==================== Single-adapter Configuration ====================

/// With one available adapter only the first stanza is applied
#[tokio::test]
async fn test_single_adapter_skips_second_stanza() {
    let service = service_with_conf(TWO_ADAPTER_CONF);
    let osutils = MockOsUtils::new().with_adapters(&["eth0"]);
    let plugin = NetworkConfigPlugin::default();

    let outcome = plugin.execute(&service, &osutils).await.unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Done);
    assert_eq!(osutils.static_config_calls().len(), 1);
    assert!(osutils.route_calls().is_empty());
}

/// The adapter override replaces the available list with one entry
#[tokio::test]
async fn test_adapter_override_uses_named_adapter() {
    let service = service_with_conf(TWO_ADAPTER_CONF);
    let osutils = MockOsUtils::new().with_adapters(&["eth0", "eth1"]);
    let plugin = NetworkConfigPlugin::new(Some("Management0".to_string()));

    plugin.execute(&service, &osutils).await.unwrap();

    let static_calls = osutils.static_config_calls();
    assert_eq!(static_calls.len(), 1);
    match &static_calls[0] {
        OsCall::SetStaticNetworkConfig { adapter_name, .. } => {
            assert_eq!(adapter_name, "Management0");
        }
        other => panic!("Expected a static config call, got {:?}", other),
    }
    assert!(osutils.route_calls().is_empty());
}

// ==================== Fatal Conditions ====================

/// No adapters at all fails before any parsing or OS configuration
#[tokio::test]
async fn test_no_adapter_available_is_fatal() {
    let service = service_with_conf(TWO_ADAPTER_CONF);
    let osutils = MockOsUtils::new();
    let plugin = NetworkConfigPlugin::default();

    let err = plugin.execute(&service, &osutils).await.unwrap_err();

    assert!(matches!(err, GuestInitError::NoAdapterAvailable));
    assert!(osutils.calls().is_empty());
}

/// A malformed first stanza is a fatal format error with no OS calls
#[tokio::test]
async fn test_malformed_first_stanza_is_fatal() {
    let conf = "\
iface eth0 inet static
    address 10.11.12.13 netmask 255.255.255.0 broadcast 10.11.12.255 gateway 10.11.12.1
";
    // dns-nameservers line missing
    let service = service_with_conf(conf);
    let osutils = MockOsUtils::new().with_adapters(&["eth0", "eth1"]);
    let plugin = NetworkConfigPlugin::default();

    let err = plugin.execute(&service, &osutils).await.unwrap_err();

    assert!(matches!(
        err,
        GuestInitError::FirstAdapterFormatUnrecognized
    ));
    assert!(osutils.calls().is_empty());
}

/// A malformed second stanza is fatal only when a second adapter exists
#[tokio::test]
async fn test_malformed_second_stanza_is_fatal_with_two_adapters() {
    let conf = "\
iface eth0 inet static
    address 10.11.12.13 netmask 255.255.255.0 broadcast 10.11.12.255 gateway 10.11.12.1
    dns-nameservers 8.8.8.8

iface eth1 inet static
    address 172.16.0.2 netmask 255.255.0.0 broadcast 172.16.255.255
";
    // route clause missing
    let service = service_with_conf(conf);
    let osutils = MockOsUtils::new().with_adapters(&["eth0", "eth1"]);
    let plugin = NetworkConfigPlugin::default();

    let err = plugin.execute(&service, &osutils).await.unwrap_err();

    assert!(matches!(
        err,
        GuestInitError::SecondAdapterFormatUnrecognized
    ));
    // The first adapter was already configured when the failure surfaced
    assert_eq!(osutils.static_config_calls().len(), 1);
    assert!(osutils.route_calls().is_empty());
}

#[tokio::test]
async fn test_malformed_second_stanza_ignored_with_one_adapter() {
    let conf = "\
iface eth0 inet static
    address 10.11.12.13 netmask 255.255.255.0 broadcast 10.11.12.255 gateway 10.11.12.1
    dns-nameservers 8.8.8.8
";
    let service = service_with_conf(conf);
    let osutils = MockOsUtils::new().with_adapters(&["eth0"]);
    let plugin = NetworkConfigPlugin::default();

    let outcome = plugin.execute(&service, &osutils).await.unwrap();
    assert_eq!(outcome.status, ExecutionStatus::Done);
}

/// Metadata service failures propagate unmodified
#[tokio::test]
async fn test_metadata_error_propagates() {
    let service = MockMetadataService::new().with_meta_data_error("service unavailable");
    let osutils = MockOsUtils::new().with_adapters(&["eth0"]);
    let plugin = NetworkConfigPlugin::default();

    let err = plugin.execute(&service, &osutils).await.unwrap_err();

    assert!(matches!(err, GuestInitError::Metadata(_)));
    assert!(err.to_string().contains("service unavailable"));
}

// ==================== Pipeline Driver ====================

/// run_plugins surfaces the aggregated reboot flag
#[tokio::test]
async fn test_run_plugins_aggregates_reboot() {
    let service = service_with_conf(TWO_ADAPTER_CONF);
    let osutils = MockOsUtils::new()
        .with_adapters(&["eth0", "eth1"])
        .with_reboot_results(&[true, false]);

    let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(NetworkConfigPlugin::default())];
    let reboot_required = run_plugins(&plugins, &service, &osutils).await.unwrap();

    assert!(reboot_required);
}

#[tokio::test]
async fn test_run_plugins_propagates_errors() {
    let service = service_with_conf("not an interfaces file");
    let osutils = MockOsUtils::new().with_adapters(&["eth0"]);

    let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(NetworkConfigPlugin::default())];
    let result = run_plugins(&plugins, &service, &osutils).await;

    assert!(matches!(
        result,
        Err(GuestInitError::FirstAdapterFormatUnrecognized)
    ));
}

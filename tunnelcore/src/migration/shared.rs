//! Transforms shared by host and provider documents.

use url::Url;

use super::legacy::{LegacyMap, LegacyMapExt};
use crate::profile::{DnsProtocol, NetworkChoice, NetworkSettings, OnDemand, OnDemandPolicy};

const MANUAL_CHOICE: &str = "manual";
const GATEWAY_IPV4: &str = "IPv4";
const GATEWAY_IPV6: &str = "IPv6";

/// On-demand rules from `trustedNetworks`. Migrated profiles always have on-demand enabled.
#[must_use]
pub fn migrated_on_demand(document: &LegacyMap) -> OnDemand {
    let mut on_demand = OnDemand {
        is_enabled: true,
        ..OnDemand::default()
    };

    if let Some(trusted) = document.map("trustedNetworks") {
        on_demand.with_mobile_network = trusted.bool("includesMobile").unwrap_or(false);
        on_demand.with_ethernet_network = trusted.bool("includesEthernet").unwrap_or(false);
        on_demand.with_ssids = trusted.bool_map("includedWiFis").unwrap_or_default();
        if let Some(policy) = trusted
            .string("policy")
            .and_then(|raw| raw.parse::<OnDemandPolicy>().ok())
        {
            on_demand.policy = policy;
        }
    }

    on_demand
}

/// Network overrides from `networkChoices` and `manualNetworkSettings`.
#[must_use]
pub fn migrated_network_settings(document: &LegacyMap) -> NetworkSettings {
    let mut settings = NetworkSettings::default();

    if let Some(choices) = document.map("networkChoices") {
        settings.gateway.choice = migrated_choice(choices, "gateway");
        settings.dns.choice = migrated_choice(choices, "dns");
        settings.proxy.choice = migrated_choice(choices, "proxy");
        settings.mtu.choice = migrated_choice(choices, "mtu");
    }

    if let Some(manual) = document.map("manualNetworkSettings") {
        let gateway_policies = manual.string_list("gatewayPolicies").unwrap_or_default();
        settings.gateway.is_default_ipv4 = gateway_policies.iter().any(|p| p == GATEWAY_IPV4);
        settings.gateway.is_default_ipv6 = gateway_policies.iter().any(|p| p == GATEWAY_IPV6);

        // unknown protocols fall back to plain DNS
        if let Some(raw) = manual.string("dnsProtocol") {
            settings.dns.configuration_type = raw.parse::<DnsProtocol>().unwrap_or_default();
        }
        settings.dns.dns_servers = manual.string_list("dnsServers").unwrap_or_default();
        settings.dns.dns_search_domains =
            manual.string_list("dnsSearchDomains").unwrap_or_default();
        settings.dns.dns_https_url = manual.string("dnsHTTPSURL").and_then(parse_url);
        settings.dns.dns_tls_server_name = manual
            .string("dnsTLSServerName")
            .unwrap_or_default()
            .to_string();

        settings.proxy.proxy_address = manual
            .string("proxyAddress")
            .unwrap_or_default()
            .to_string();
        settings.proxy.proxy_port = manual.u16("proxyPort");
        settings.proxy.proxy_auto_configuration_url = manual
            .string("proxyAutoConfigurationURL")
            .and_then(parse_url);
        settings.proxy.proxy_bypass_domains =
            manual.string_list("proxyBypassDomains").unwrap_or_default();

        settings.mtu.mtu_bytes = manual
            .int("mtuBytes")
            .and_then(|bytes| u32::try_from(bytes).ok())
            .unwrap_or(0);
    }

    settings
}

fn migrated_choice(choices: &LegacyMap, key: &str) -> NetworkChoice {
    if choices.string(key) == Some(MANUAL_CHOICE) {
        NetworkChoice::Manual
    } else {
        NetworkChoice::Automatic
    }
}

fn parse_url(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            crate::debug!("profile_migration.url_dropped url={raw} error={e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DnsSettings, ProxySettings};
    use serde_json::{json, Value};

    fn legacy(value: Value) -> LegacyMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_on_demand_without_trusted_networks_is_enabled_default() {
        let on_demand = migrated_on_demand(&LegacyMap::new());
        assert_eq!(
            on_demand,
            OnDemand {
                is_enabled: true,
                ..OnDemand::default()
            }
        );
    }

    #[test]
    fn test_on_demand_from_trusted_networks() {
        let document = legacy(json!({
            "trustedNetworks": {
                "includesMobile": true,
                "includedWiFis": { "Home": true, "Cafe": false },
                "policy": "including"
            }
        }));
        let on_demand = migrated_on_demand(&document);

        assert!(on_demand.is_enabled);
        assert!(on_demand.with_mobile_network);
        assert!(!on_demand.with_ethernet_network);
        assert_eq!(on_demand.with_ssids.len(), 2);
        assert_eq!(on_demand.policy, OnDemandPolicy::Including);
    }

    #[test]
    fn test_on_demand_ignores_unknown_policy_and_mistyped_wifis() {
        let document = legacy(json!({
            "trustedNetworks": {
                "includedWiFis": { "Home": true, "Cafe": 1 },
                "policy": "disconnect"
            }
        }));
        let on_demand = migrated_on_demand(&document);

        assert!(on_demand.with_ssids.is_empty());
        assert_eq!(on_demand.policy, OnDemandPolicy::Excluding);
    }

    #[test]
    fn test_only_literal_manual_is_manual() {
        let document = legacy(json!({
            "networkChoices": { "gateway": "Manual", "dns": "manual", "proxy": 1 }
        }));
        let settings = migrated_network_settings(&document);

        assert_eq!(settings.gateway.choice, NetworkChoice::Automatic);
        assert_eq!(settings.dns.choice, NetworkChoice::Manual);
        assert_eq!(settings.proxy.choice, NetworkChoice::Automatic);
        assert_eq!(settings.mtu.choice, NetworkChoice::Automatic);
    }

    #[test]
    fn test_manual_dns_choice_alone_keeps_default_overrides() {
        let document = legacy(json!({ "networkChoices": { "dns": "manual" } }));
        let settings = migrated_network_settings(&document);

        assert_eq!(
            settings.dns,
            DnsSettings {
                choice: NetworkChoice::Manual,
                ..DnsSettings::default()
            }
        );
        assert_eq!(settings.proxy, ProxySettings::default());
    }

    #[test]
    fn test_manual_network_settings() {
        let document = legacy(json!({
            "manualNetworkSettings": {
                "gatewayPolicies": ["IPv4"],
                "dnsProtocol": "https",
                "dnsServers": ["1.1.1.1", "1.0.0.1"],
                "dnsSearchDomains": ["corp.example.com"],
                "dnsHTTPSURL": "https://dns.example.com/dns-query",
                "dnsTLSServerName": "dns.example.com",
                "proxyAddress": "10.0.0.1",
                "proxyPort": 8080,
                "proxyAutoConfigurationURL": "not a url",
                "proxyBypassDomains": ["intranet"],
                "mtuBytes": 1400
            }
        }));
        let settings = migrated_network_settings(&document);

        assert!(settings.gateway.is_default_ipv4);
        assert!(!settings.gateway.is_default_ipv6);
        assert_eq!(settings.dns.configuration_type, DnsProtocol::Https);
        assert_eq!(settings.dns.dns_servers, vec!["1.1.1.1", "1.0.0.1"]);
        assert_eq!(settings.dns.dns_search_domains, vec!["corp.example.com"]);
        assert_eq!(
            settings.dns.dns_https_url.as_ref().map(Url::as_str),
            Some("https://dns.example.com/dns-query")
        );
        assert_eq!(settings.dns.dns_tls_server_name, "dns.example.com");
        assert_eq!(settings.proxy.proxy_address, "10.0.0.1");
        assert_eq!(settings.proxy.proxy_port, Some(8080));
        assert!(settings.proxy.proxy_auto_configuration_url.is_none());
        assert_eq!(settings.proxy.proxy_bypass_domains, vec!["intranet"]);
        assert_eq!(settings.mtu.mtu_bytes, 1400);
    }

    #[test]
    fn test_unknown_dns_protocol_is_plain() {
        let document = legacy(json!({
            "manualNetworkSettings": { "dnsProtocol": "quic", "mtuBytes": -5 }
        }));
        let settings = migrated_network_settings(&document);

        assert_eq!(settings.dns.configuration_type, DnsProtocol::Plain);
        assert_eq!(settings.mtu.mtu_bytes, 0);
    }
}

//! Demo provisioning policy used by the mock action responders.
//!
//! The ledger never consults these rules; they only shape what the simulated
//! provisioning actions report back.

use serde_json::{Value, json};
use uuid::Uuid;

const BASE_ACCESSES: [&str; 3] = ["Email", "Calendar", "SSO"];

/// Failure reason reported when the hardware vendor does not answer.
pub const HARDWARE_VENDOR_TIMEOUT: &str = "Hardware vendor API timeout";

/// Returns a fresh action reference such as `hw_3f2a9c1d7b40`.
#[must_use]
pub fn action_reference(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &id[..12])
}

/// Returns the hardware bundle ordered for an employment country.
#[must_use]
pub fn hardware_bundle(country: &str) -> &'static str {
    match country.trim() {
        "FR" => "MacBook Pro + YubiKey",
        "BE" => "MacBook Air + YubiKey",
        "ES" => "MacBook Air",
        "CA" => "MacBook Pro",
        _ => "Standard Laptop Bundle",
    }
}

/// Returns the access grants for a department.
#[must_use]
pub fn access_policy(department: &str) -> Vec<&'static str> {
    let extra: &[&'static str] = match department.trim() {
        "Engineering" => &["GitHub", "CI", "Cloud Console"],
        "People" => &["HRIS", "Payroll"],
        "Sales" => &["CRM", "Dialer"],
        _ => &[],
    };

    BASE_ACCESSES.iter().chain(extra).copied().collect()
}

/// Returns the work account username derived from an email address.
#[must_use]
pub fn account_username(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Result of a work account creation.
#[must_use]
pub fn account_provisioned(email: &str, action_id: &str) -> Value {
    json!({
        "status": "SUCCESS",
        "account": {
            "username": account_username(email),
            "email": email.trim(),
        },
        "action_id": action_id,
    })
}

/// Result of a hardware order.
#[must_use]
pub fn hardware_ordered(country: &str, ticket_id: &str) -> Value {
    json!({
        "status": "SUCCESS",
        "bundle": hardware_bundle(country),
        "ticket_id": ticket_id,
    })
}

/// Result of a hardware order the vendor never answered.
#[must_use]
pub fn hardware_order_failed() -> Value {
    json!({
        "status": "FAILED",
        "reason": HARDWARE_VENDOR_TIMEOUT,
    })
}

/// Result of an access rights configuration.
#[must_use]
pub fn access_configured(department: &str) -> Value {
    json!({
        "status": "SUCCESS",
        "accesses": access_policy(department),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        access_configured, access_policy, account_provisioned, account_username,
        action_reference, hardware_bundle,
    };

    #[test]
    fn action_reference_is_prefixed_and_unique() {
        let first = action_reference("hw");
        let second = action_reference("hw");

        let suffix = first.strip_prefix("hw_").unwrap_or_default();
        assert_eq!(suffix.len(), 12);
        assert!(suffix.chars().all(|character| character.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn unknown_country_gets_standard_bundle() {
        assert_eq!(hardware_bundle("FR"), "MacBook Pro + YubiKey");
        assert_eq!(hardware_bundle("DE"), "Standard Laptop Bundle");
    }

    #[test]
    fn engineering_gets_developer_tooling() {
        assert_eq!(
            access_policy("Engineering"),
            vec!["Email", "Calendar", "SSO", "GitHub", "CI", "Cloud Console"]
        );
        assert_eq!(access_policy("Legal"), vec!["Email", "Calendar", "SSO"]);
    }

    #[test]
    fn username_is_lowercased_local_part() {
        assert_eq!(account_username("Ana.Lopez@Example.com"), "ana.lopez");
    }

    #[test]
    fn account_result_carries_username_and_reference() {
        assert_eq!(
            account_provisioned("Ana.Lopez@Example.com", "acct_1"),
            json!({
                "status": "SUCCESS",
                "account": {"username": "ana.lopez", "email": "Ana.Lopez@Example.com"},
                "action_id": "acct_1"
            })
        );
        assert_eq!(
            access_configured("Sales")["accesses"],
            json!(["Email", "Calendar", "SSO", "CRM", "Dialer"])
        );
    }
}

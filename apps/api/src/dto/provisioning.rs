use serde::Deserialize;
use serde_json::Value;
use ts_rs::TS;

/// Demo account provisioning request.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/provision-accounts-request.ts"
)]
pub struct ProvisionAccountsRequest {
    pub run_id: Option<String>,
    pub email: Option<String>,
}

/// Demo hardware order request.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/provision-hardware-request.ts"
)]
pub struct ProvisionHardwareRequest {
    pub run_id: Option<String>,
    pub country: Option<String>,
    #[ts(type = "Record<string, unknown> | null")]
    pub scenario: Option<Value>,
}

impl ProvisionHardwareRequest {
    /// Whether the caller asked for the vendor outage scenario.
    #[must_use]
    pub fn simulate_it_failure(&self) -> bool {
        self.scenario
            .as_ref()
            .and_then(|scenario| scenario.get("simulate_it_failure"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Demo access configuration request.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/provision-access-request.ts"
)]
pub struct ProvisionAccessRequest {
    pub run_id: Option<String>,
    pub department: Option<String>,
}

mod common;
mod events;
mod internal;
mod provisioning;
mod runs;

pub use common::HealthResponse;
pub use events::SubmitEventResponse;
pub use internal::{FinishRunRequest, FinishRunResponse, RecordStepRequest, RecordStepResponse};
pub use provisioning::{
    ProvisionAccessRequest, ProvisionAccountsRequest, ProvisionHardwareRequest,
};
pub use runs::{
    RunDetailResponse, RunEvidenceResponse, RunListQueryRequest, RunResponse, RunStepResponse,
};

#[cfg(test)]
mod tests {
    use ts_rs::TS;

    use super::*;
    use crate::error::ErrorResponse;

    fn export_path<T: TS>() -> String {
        T::output_path()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[test]
    fn bindings_are_exported_next_to_the_error_type() {
        let error_path = export_path::<ErrorResponse>();
        let generated_dir = error_path
            .strip_suffix("error-response.ts")
            .unwrap_or_else(|| panic!("unexpected error binding path '{error_path}'"));
        assert_eq!(generated_dir, "../../../packages/api-types/src/generated/");

        let exported = [
            export_path::<HealthResponse>(),
            export_path::<SubmitEventResponse>(),
            export_path::<RecordStepRequest>(),
            export_path::<RecordStepResponse>(),
            export_path::<FinishRunRequest>(),
            export_path::<FinishRunResponse>(),
            export_path::<ProvisionAccountsRequest>(),
            export_path::<ProvisionHardwareRequest>(),
            export_path::<ProvisionAccessRequest>(),
            export_path::<RunResponse>(),
            export_path::<RunStepResponse>(),
            export_path::<RunDetailResponse>(),
            export_path::<runs::RunEvidenceItemsResponse>(),
            export_path::<runs::RunOutcomeResponse>(),
            export_path::<RunEvidenceResponse>(),
        ];

        for path in exported {
            let file_name = path
                .strip_prefix(generated_dir)
                .unwrap_or_else(|| panic!("binding '{path}' is exported outside {generated_dir}"));
            assert!(file_name.ends_with(".ts") && !file_name.contains('/'));
        }
    }
}

use hello_webgpu::{
    diagnostics::{reported, Diagnostics},
    error::{InitError, PassError},
    gpu::{self, AdapterReport},
};

fn output_of(diagnostics: Diagnostics<Vec<u8>>) -> String {
    String::from_utf8(diagnostics.into_inner()).unwrap()
}

#[test]
fn test_unsupported_reports_fixed_message() {
    let mut diagnostics = Diagnostics::new(Vec::new());

    let result = reported(&mut diagnostics, gpu::create_instance(wgpu::Backends::empty()));

    assert!(matches!(result, Err(InitError::Unsupported)));
    assert_eq!(output_of(diagnostics), "WebGPU not supported.\n");
}

#[test]
fn test_missing_adapter_reports_fixed_message() {
    let mut diagnostics = Diagnostics::new(Vec::new());

    let result = reported(&mut diagnostics, gpu::require_adapter::<wgpu::Adapter>(None));

    assert!(matches!(result, Err(InitError::NoAdapter)));
    assert_eq!(output_of(diagnostics), "Couldn't request WebGPU adapter.\n");
}

#[test]
fn test_success_writes_nothing() {
    let mut diagnostics = Diagnostics::new(Vec::new());
    let value = reported(&mut diagnostics, Ok::<_, InitError>(3)).unwrap();
    assert_eq!(value, 3);
    assert!(output_of(diagnostics).is_empty());
}

#[test]
fn test_adapter_report_has_exactly_four_keys() {
    let report = AdapterReport {
        architecture: "IntegratedGpu".to_string(),
        description: "Test Adapter".to_string(),
        device: "0x0001".to_string(),
        vendor: "0x8086".to_string(),
    };
    let mut diagnostics = Diagnostics::new(Vec::new());
    diagnostics.adapter(&report).unwrap();

    let text = output_of(diagnostics);
    let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
    let object = value.as_object().expect("report should be a JSON object");

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["architecture", "description", "device", "vendor"]);
    assert_eq!(object["vendor"], "0x8086");
    assert_eq!(object["description"], "Test Adapter");
}

#[test]
fn test_pass_failure_is_reported() {
    let mut diagnostics = Diagnostics::new(Vec::new());

    let result: Result<(), PassError> = reported(
        &mut diagnostics,
        Err(PassError::InvalidTargetSize {
            width: 70_000,
            height: 600,
            max: 16_384,
        }),
    );

    assert!(result.is_err());
    assert_eq!(
        output_of(diagnostics),
        "Render target 70000x600 is outside the supported range 1..=16384\n"
    );
}

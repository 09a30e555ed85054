//! Public-API tests against a scripted provider. No OpenCL runtime needed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use capinspect::inspector::{Decoding, PropertyValue, decode_bit_flags};
use capinspect::report::{ErrorPolicy, ReportConfig, write_report};
use capinspect::{
    CapabilityProvider, DeviceClass, InspectError, Inspector, PlatformInfo, PropertyKey,
    QueryStage, Status,
};

const CL_INVALID_PLATFORM: Status = -32;

/// Answers queries from a table and records every call it receives.
#[derive(Default)]
struct ScriptedProvider {
    values: HashMap<(u8, PropertyKey), Vec<u8>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedProvider {
    fn set(&mut self, handle: u8, key: PropertyKey, bytes: Vec<u8>) {
        self.values.insert((handle, key), bytes);
    }

    fn set_text(&mut self, handle: u8, key: PropertyKey, text: &str) {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.set(handle, key, bytes);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CapabilityProvider for ScriptedProvider {
    type Handle = u8;

    fn platforms(&self) -> Result<Vec<u8>, Status> {
        Ok(vec![0])
    }

    fn devices(&self, _platform: u8, _class: DeviceClass) -> Result<Vec<u8>, Status> {
        Ok(vec![1])
    }

    fn query_size(&self, handle: u8, key: PropertyKey) -> Result<usize, Status> {
        self.calls.borrow_mut().push(format!("size {}", key));
        self.values
            .get(&(handle, key))
            .map(Vec::len)
            .ok_or(CL_INVALID_PLATFORM)
    }

    fn query_fill(&self, handle: u8, key: PropertyKey, buf: &mut [u8]) -> Result<(), Status> {
        self.calls.borrow_mut().push(format!("fill {}", key));
        let bytes = self.values.get(&(handle, key)).ok_or(CL_INVALID_PLATFORM)?;
        buf.copy_from_slice(bytes);
        Ok(())
    }
}

fn gpu_device() -> ScriptedProvider {
    let mut provider = ScriptedProvider::default();
    provider.set_text(0, PropertyKey::PlatformName, "Intel(R) OpenCL");
    provider.set_text(0, PropertyKey::PlatformProfile, "FULL_PROFILE");
    provider.set_text(0, PropertyKey::PlatformVersion, "OpenCL 3.0");
    provider.set_text(0, PropertyKey::PlatformVendor, "Intel(R) Corporation");
    provider.set_text(1, PropertyKey::DeviceName, "Intel(R) UHD Graphics 630");
    provider.set(1, PropertyKey::DeviceType, (1u64 << 2).to_ne_bytes().to_vec());
    provider.set(1, PropertyKey::DeviceMaxClockFrequency, 1150u32.to_ne_bytes().to_vec());
    provider.set(1, PropertyKey::DeviceMaxMemAllocSize, (4u64 << 30).to_ne_bytes().to_vec());
    provider.set(1, PropertyKey::DeviceMaxWorkItemDimensions, 3u32.to_ne_bytes().to_vec());
    provider.set(
        1,
        PropertyKey::DeviceMaxWorkItemSizes,
        [256usize, 256, 256].iter().flat_map(|v| v.to_ne_bytes()).collect(),
    );
    provider.set(
        1,
        PropertyKey::DeviceSingleFpConfig,
        0b0011_1111u64.to_ne_bytes().to_vec(),
    );
    provider
}

#[test]
fn platform_name_strips_terminator() {
    let inspector = Inspector::new(gpu_device());
    let value = inspector.query(0, PropertyKey::PlatformName).unwrap();
    assert_eq!(value, PropertyValue::Text("Intel(R) OpenCL".to_string()));
}

#[test]
fn size_failure_stops_before_fill() {
    let inspector = Inspector::new(gpu_device());
    let err = inspector.query_raw(9, PropertyKey::PlatformName).unwrap_err();
    assert!(matches!(
        err,
        InspectError::ProviderQuery {
            stage: QueryStage::Size,
            status: CL_INVALID_PLATFORM,
            ..
        }
    ));
    assert_eq!(inspector.provider().calls(), vec!["size CL_PLATFORM_NAME"]);
}

#[test]
fn work_item_sizes_query_dimensions_first() {
    let inspector = Inspector::new(gpu_device());
    let value = inspector.query(1, PropertyKey::DeviceMaxWorkItemSizes).unwrap();
    assert_eq!(value, PropertyValue::Sequence(vec![256, 256, 256]));
    assert_eq!(value.to_string(), "256 256 256");
    assert_eq!(
        inspector.provider().calls(),
        vec![
            "size CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS",
            "fill CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS",
            "size CL_DEVICE_MAX_WORK_ITEM_SIZES",
            "fill CL_DEVICE_MAX_WORK_ITEM_SIZES",
        ]
    );
}

#[test]
fn scalar_lines() {
    let inspector = Inspector::new(gpu_device());
    assert_eq!(
        inspector.display_line(1, PropertyKey::DeviceMaxClockFrequency).unwrap(),
        "\tCL_DEVICE_MAX_CLOCK_FREQUENCY\t1150"
    );
    assert_eq!(
        inspector.display_line(1, PropertyKey::DeviceMaxMemAllocSize).unwrap(),
        "\tCL_DEVICE_MAX_MEM_ALLOC_SIZE\t4294967296"
    );
}

#[test]
fn fp_config_renders_in_table_order() {
    let inspector = Inspector::new(gpu_device());
    assert_eq!(
        inspector.format(1, PropertyKey::DeviceSingleFpConfig).unwrap(),
        "CL_FP_DENORM | CL_FP_INF_NAN | CL_FP_ROUND_TO_NEAREST | CL_FP_ROUND_TO_ZERO \
         | CL_FP_ROUND_TO_INF | CL_FP_FMA"
    );
}

#[test]
fn every_flag_key_only_yields_table_names() {
    for key in PropertyKey::KNOWN {
        let Decoding::Flags(table) = key.decoding() else {
            continue;
        };
        let bytes = match table.width.bytes() {
            4 => u32::MAX.to_ne_bytes().to_vec(),
            _ => u64::MAX.to_ne_bytes().to_vec(),
        };
        let set = decode_bit_flags(&bytes, table).unwrap();
        for name in set.names() {
            assert!(table.flags.iter().any(|(_, n)| n == name), "{key}: {name}");
        }

        let zero = vec![0u8; table.width.bytes()];
        assert_eq!(decode_bit_flags(&zero, table).unwrap().to_string(), "", "{key}");
    }
}

#[test]
fn platform_info_through_shared_provider() {
    let inspector = Inspector::new(Arc::new(gpu_device()));
    let mut info = PlatformInfo::new(0u8);
    info.refresh(&inspector).unwrap();
    assert_eq!(info.get(PropertyKey::PlatformVendor).unwrap(), Some("Intel(R) Corporation"));
}

#[test]
fn report_with_borrowed_provider() {
    let provider = gpu_device();
    let inspector = Inspector::new(&provider);
    let config = ReportConfig {
        policy: ErrorPolicy::Skip,
        device_keys: vec![
            PropertyKey::DeviceName,
            PropertyKey::DeviceVendorId,
            PropertyKey::DeviceType,
        ],
        ..ReportConfig::default()
    };
    let mut out = Vec::new();
    write_report(&inspector, &config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Number of platforms: 1\n"));
    assert!(text.contains("\tCL_PLATFORM_NAME\tIntel(R) OpenCL\n"));
    assert!(text.contains("\tCL_DEVICE_NAME\tIntel(R) UHD Graphics 630\n"));
    assert!(text.contains("\tCL_DEVICE_TYPE\tCL_DEVICE_TYPE_GPU\n"));
    assert!(!text.contains("CL_DEVICE_VENDOR_ID"));
    assert!(text.ends_with("-------------------- END OF PLATFORM 0 --------------------\n"));
}

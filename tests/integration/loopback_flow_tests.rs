//! Full JSON-lines sessions through the loopback platform.

use crate::mock_hw::MockSensor;
use doorsensor::adapters::loopback::LoopbackPlatform;
use doorsensor::app::ports::{Interface, Policies, ResourceHandle};
use doorsensor::app::service::ResourceService;
use doorsensor::config::DeviceConfig;
use doorsensor::drivers::gpio::{SimGpio, sim_set_level};
use doorsensor::sensors::InfraredObstacleSensor;
use serde_json::Value;

fn start<S: doorsensor::app::ports::SensorPort>(
    sensor: S,
) -> (ResourceService<S>, LoopbackPlatform<Vec<u8>>) {
    let mut platform = LoopbackPlatform::new(Vec::new());
    let mut service = ResourceService::new(DeviceConfig::default(), sensor);
    service
        .init(&mut platform, "iotcon-test-basic-server")
        .unwrap();
    service.publish(&mut platform).unwrap();
    (service, platform)
}

fn output(platform: &LoopbackPlatform<Vec<u8>>) -> Vec<Value> {
    String::from_utf8(platform.output().clone())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn serve(
    service: &mut ResourceService<MockSensor>,
    platform: &mut LoopbackPlatform<Vec<u8>>,
    lines: &[&str],
) {
    for line in lines {
        platform.serve_line(line, service).unwrap();
    }
}

#[test]
fn bring_up_registers_the_primary_door() {
    let (service, platform) = start(MockSensor::new(true));
    assert!(platform.is_initialized());
    assert_eq!(platform.device_name(), Some("iotcon-test-basic-server"));
    assert_eq!(platform.presence_interval_secs(), Some(10));

    let handle = service.primary().unwrap().handle().unwrap();
    let live = platform.live_resource(handle).unwrap();
    assert_eq!(live.uri_path, "/door/1");
    assert_eq!(live.resource_type, "org.tizen.door");
    assert_eq!(live.interfaces, vec![Interface::Default, Interface::Batch]);
    assert!(live.policies.contains(Policies::OBSERVABLE));
}

#[test]
fn observe_put_session() {
    let (mut service, mut platform) = start(MockSensor::new(false));
    serve(
        &mut service,
        &mut platform,
        &[
            r#"{"id":1,"resource":1,"host":"10.0.0.7","method":"GET","observe":{"type":"register","id":5}}"#,
            r#"{"id":2,"resource":1,"host":"10.0.0.8","method":"PUT","body":{"attributes":{"opened":true}}}"#,
        ],
    );

    let out = output(&platform);
    assert_eq!(out.len(), 3);

    assert_eq!(out[0]["kind"], "response");
    assert_eq!(out[0]["id"], 1);
    assert_eq!(out[0]["result"], "ok");
    assert_eq!(out[0]["representation"]["uri_path"], "/door/1");
    assert_eq!(out[0]["representation"]["attributes"]["opened"], false);

    assert_eq!(out[1]["id"], 2);
    assert_eq!(out[1]["representation"]["attributes"]["opened"], true);

    assert_eq!(out[2]["kind"], "notification");
    assert_eq!(out[2]["observers"], serde_json::json!([5]));
    assert_eq!(out[2]["qos"], "high");
    assert_eq!(out[2]["representation"]["attributes"]["opened"], true);
}

#[test]
fn post_delete_session() {
    let (mut service, mut platform) = start(MockSensor::new(true));
    serve(
        &mut service,
        &mut platform,
        &[
            r#"{"id":1,"resource":1,"host":"h","method":"POST"}"#,
            r#"{"id":2,"resource":1,"host":"h","method":"POST"}"#,
            r#"{"id":3,"resource":2,"host":"h","method":"DELETE"}"#,
            r#"{"id":4,"resource":2,"host":"h","method":"GET"}"#,
        ],
    );

    let out = output(&platform);
    let results: Vec<&str> = out.iter().map(|v| v["result"].as_str().unwrap()).collect();
    assert_eq!(
        results,
        ["resource_created", "error", "resource_deleted", "error"]
    );
    assert_eq!(
        out[0]["representation"]["attributes"]["createduripath"],
        "/door/2"
    );
    assert!(out[2].get("representation").is_none());
    assert!(platform.live_resource(ResourceHandle(2)).is_none());
    assert_eq!(platform.live_resources(), 1);
}

#[test]
fn malformed_lines_get_one_error_each() {
    let (mut service, mut platform) = start(MockSensor::new(true));
    serve(
        &mut service,
        &mut platform,
        &[
            "{oops",
            r#"{"id":1,"resource":1,"method":"GET"}"#,
            r#"{"id":2,"resource":1,"host":"h","method":"PATCH"}"#,
            "",
        ],
    );

    let out = output(&platform);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|v| v["result"] == "error"));
}

#[test]
fn teardown_releases_every_handle() {
    let (mut service, mut platform) = start(MockSensor::new(true));
    serve(
        &mut service,
        &mut platform,
        &[r#"{"resource":1,"host":"h","method":"POST"}"#],
    );
    assert_eq!(platform.live_resources(), 2);

    service.fini(&mut platform);
    assert_eq!(platform.live_resources(), 0);
    assert!(!platform.is_initialized());
    assert!(service.primary().is_none() && service.secondary().is_none());
}

#[test]
fn infrared_sensor_level_reaches_get_response() {
    let mut sensor = InfraredObstacleSensor::new(SimGpio, 4);
    sensor.init().unwrap();
    let (mut service, mut platform) = start(sensor);

    sim_set_level(false);
    platform
        .serve_line(r#"{"resource":1,"host":"h","method":"GET"}"#, &mut service)
        .unwrap();
    sim_set_level(true);
    platform
        .serve_line(r#"{"resource":1,"host":"h","method":"GET"}"#, &mut service)
        .unwrap();

    let out = output(&platform);
    assert_eq!(out[0]["representation"]["attributes"]["opened"], false);
    assert_eq!(out[1]["representation"]["attributes"]["opened"], true);
}

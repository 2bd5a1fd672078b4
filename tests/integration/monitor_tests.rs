//! DoorMonitor: sensor level changes become observer notifications.

use crate::mock_hw::{MockPlatform, MockSensor, Step};
use doorsensor::app::monitor::DoorMonitor;
use doorsensor::app::ports::RequestHandler;
use doorsensor::app::request::{ObserveType, Request, RequestType};
use doorsensor::app::service::ResourceService;
use doorsensor::config::DeviceConfig;
use doorsensor::error::{Error, SensorError};

fn service_with_observer(opened: bool) -> (ResourceService<MockSensor>, MockPlatform) {
    let mut platform = MockPlatform::new();
    let mut service = ResourceService::new(DeviceConfig::default(), MockSensor::new(opened));
    service.init(&mut platform, "test-door").unwrap();
    let h = service.publish(&mut platform).unwrap();
    service.on_request(
        &mut platform,
        &Request::new(h, RequestType::Get).with_observe(ObserveType::Register, 42),
    );
    platform.calls.clear();
    (service, platform)
}

#[test]
fn first_poll_only_seeds() {
    let (mut service, mut platform) = service_with_observer(true);
    let mut monitor = DoorMonitor::new();

    assert_eq!(monitor.poll(&mut service, &mut platform), Ok(false));
    assert_eq!(monitor.last(), Some(true));
    assert_eq!(platform.count(Step::Notify), 0);
}

#[test]
fn steady_level_sends_nothing() {
    let (mut service, mut platform) = service_with_observer(false);
    let mut monitor = DoorMonitor::new();
    for _ in 0..3 {
        assert_eq!(monitor.poll(&mut service, &mut platform), Ok(false));
    }
    assert_eq!(platform.count(Step::Notify), 0);
}

#[test]
fn change_notifies_observers() {
    let (mut service, mut platform) = service_with_observer(false);
    let mut monitor = DoorMonitor::new();
    monitor.poll(&mut service, &mut platform).unwrap();

    service.sensor_mut().opened = true;
    assert_eq!(monitor.poll(&mut service, &mut platform), Ok(true));
    service.sensor_mut().opened = false;
    assert_eq!(monitor.poll(&mut service, &mut platform), Ok(true));

    assert_eq!(
        platform.notifications(),
        vec![(true, vec![42]), (false, vec![42])]
    );
}

#[test]
fn change_without_observers_is_still_recorded() {
    let mut platform = MockPlatform::new();
    let mut service = ResourceService::new(DeviceConfig::default(), MockSensor::new(false));
    service.init(&mut platform, "test-door").unwrap();
    service.publish(&mut platform).unwrap();
    let mut monitor = DoorMonitor::new();
    monitor.poll(&mut service, &mut platform).unwrap();

    service.sensor_mut().opened = true;
    assert_eq!(monitor.poll(&mut service, &mut platform), Ok(true));
    assert_eq!(monitor.last(), Some(true));
    assert_eq!(platform.count(Step::Notify), 0);
}

#[test]
fn sensor_failure_keeps_last_level() {
    let (mut service, mut platform) = service_with_observer(true);
    let mut monitor = DoorMonitor::new();
    monitor.poll(&mut service, &mut platform).unwrap();

    service.sensor_mut().fail = true;
    assert_eq!(
        monitor.poll(&mut service, &mut platform),
        Err(Error::Sensor(SensorError::GpioReadFailed))
    );
    assert_eq!(monitor.last(), Some(true));
}

#[test]
fn notify_failure_is_reported() {
    let (mut service, mut platform) = service_with_observer(false);
    let mut monitor = DoorMonitor::new();
    monitor.poll(&mut service, &mut platform).unwrap();

    platform.fail_on = Some(Step::Notify);
    service.sensor_mut().opened = true;
    assert!(matches!(
        monitor.poll(&mut service, &mut platform),
        Err(Error::Platform(_))
    ));
}

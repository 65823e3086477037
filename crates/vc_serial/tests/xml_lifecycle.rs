//! The XML engine lifecycle, in a process of its own.
//!
//! Everything happens in a single test because the engine state is
//! process-wide and ordering matters.

use std::thread;

use vc_serial::xml::{self, XmlEngineError};
use vc_serial::{SerialError, XmlSerializer};

#[test]
fn lifecycle_ordering() {
    assert!(!xml::is_running());
    assert!(matches!(
        XmlSerializer::new(),
        Err(SerialError::XmlEngine(XmlEngineError::NotStarted))
    ));
    assert_eq!(xml::shutdown(), Err(XmlEngineError::NotStarted));

    xml::startup().unwrap();
    assert!(xml::is_running());
    assert_eq!(xml::startup(), Err(XmlEngineError::AlreadyStarted));

    let first = XmlSerializer::new().unwrap();
    let second = XmlSerializer::new().unwrap();
    assert_eq!(xml::live_instances(), 2);
    assert_eq!(xml::shutdown(), Err(XmlEngineError::InstancesAlive(2)));

    // Serializers may be created on other threads; shutdown may not.
    let from_other = thread::spawn(|| {
        let text = vc_serial::to_xml(&vec![1_u8, 2]).unwrap();
        (text, xml::shutdown())
    })
    .join()
    .unwrap();
    assert!(from_other.0.contains("<___containerEntry___ type=\"uint\">2</___containerEntry___>"));
    assert_eq!(from_other.1, Err(XmlEngineError::WrongThread));

    drop(first);
    drop(second);
    assert_eq!(xml::live_instances(), 0);
    xml::shutdown().unwrap();
    assert!(!xml::is_running());

    assert_eq!(xml::shutdown(), Err(XmlEngineError::AlreadyShutDown));
    assert_eq!(xml::startup(), Err(XmlEngineError::AlreadyShutDown));
    assert!(matches!(
        XmlSerializer::new(),
        Err(SerialError::XmlEngine(XmlEngineError::AlreadyShutDown))
    ));
}

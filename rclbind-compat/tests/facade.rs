pub mod common;

use common::{Int64, Missing, StringMsg, create_compat};
use rclbind::{EntityKind, Error, Operation};
use std::{
    sync::{Arc, Mutex, mpsc},
    thread,
    time::{Duration, Instant},
};

#[test]
fn test_deferred_subscriber() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();

    let subscriber = compat.subscriber::<StringMsg, _>("topic2", |_| {}, 10)?;
    assert!(!subscriber.is_created());
    assert_eq!(compat.pending_len(), 1);

    compat.init_node("n1", false)?;
    assert!(subscriber.is_created());
    assert_eq!(compat.pending_len(), 0);
    assert_eq!(compat.with_node(|node| node.subscriptions().len())?, 1);
    Ok(())
}

#[test]
fn test_deferred_creation_order() -> rclbind::Result<()> {
    let (middleware, compat) = create_compat();

    let sub_a = compat.subscriber::<Int64, _>("a", |_| {}, 1)?;
    let pub_b = compat.publisher::<Int64>("b", 1)?;
    let sub_c = compat.subscriber::<Int64, _>("c", |_| {}, 1)?;
    let pub_d = compat.publisher::<StringMsg>("d", 1)?;

    compat.init_node("ordered", false)?;

    let created: Vec<(EntityKind, String)> = middleware
        .operations()
        .into_iter()
        .filter_map(|op| match op {
            Operation::CreateEntity { kind, name, .. } => Some((kind, name)),
            _ => None,
        })
        .collect();
    assert_eq!(
        created,
        vec![
            (EntityKind::Subscription, "/a".to_string()),
            (EntityKind::Publisher, "/b".to_string()),
            (EntityKind::Subscription, "/c".to_string()),
            (EntityKind::Publisher, "/d".to_string()),
        ]
    );
    assert!(sub_a.is_created() && pub_b.is_created());
    assert!(sub_c.is_created() && pub_d.is_created());

    // After init, endpoints are created immediately and never queued.
    let late = compat.publisher::<Int64>("late", 1)?;
    assert!(late.is_created());
    assert_eq!(compat.pending_len(), 0);
    Ok(())
}

#[test]
fn test_each_deferred_endpoint_is_created_once() -> rclbind::Result<()> {
    let (middleware, compat) = create_compat();
    let publisher = compat.publisher::<Int64>("once", 5)?;
    compat.init_node("once_node", false)?;

    let creates = middleware
        .operations()
        .iter()
        .filter(|op| matches!(op, Operation::CreateEntity { .. }))
        .count();
    assert_eq!(creates, 1);

    let result = compat.with_node(|node| publisher.realize(node))?;
    assert!(matches!(result, Err(Error::AlreadyCreated(_))));
    assert_eq!(compat.with_node(|node| node.publishers().len())?, 1);
    Ok(())
}

#[test]
fn test_publish_before_init_fails() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();
    let publisher = compat.publisher::<Int64>("early", 1)?;

    assert!(matches!(
        publisher.publish(&Int64 { data: 1 }),
        Err(Error::EndpointNotCreated(_))
    ));

    compat.init_node("early_node", false)?;
    publisher.publish(&Int64 { data: 1 })?;
    Ok(())
}

#[test]
fn test_init_node_twice() -> rclbind::Result<()> {
    let (middleware, compat) = create_compat();
    compat.init_node("first", false)?;
    let node = compat.with_node(|node| node.handle())?;
    let operations = middleware.operations().len();

    assert!(matches!(
        compat.init_node("second", false),
        Err(Error::AlreadyInitialized(_))
    ));
    assert_eq!(compat.with_node(|node| node.handle())?, node);
    assert_eq!(compat.get_caller_id(), "/first");
    assert_eq!(middleware.operations().len(), operations);
    Ok(())
}

#[test]
fn test_failed_init_can_be_retried() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();
    assert!(matches!(
        compat.init_node("bad-name", false),
        Err(Error::InvalidName { .. })
    ));
    assert!(!compat.is_initialized());

    compat.init_node("good_name", false)?;
    assert!(compat.is_initialized());
    Ok(())
}

#[test]
fn test_failed_deferred_endpoint_keeps_error() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();
    let missing = compat.publisher::<Missing>("missing", 1)?;
    let missing_sub = compat.subscriber::<Missing, _>("missing", |_| {}, 1)?;
    let present = compat.publisher::<Int64>("present", 1)?;

    compat.init_node("skipping", false)?;
    assert!(!missing.is_created());
    assert!(!missing_sub.is_created());
    assert!(present.is_created());
    assert!(matches!(
        missing.publish(&Missing),
        Err(Error::NoTypeSupportImported { ref type_name }) if type_name == "missing_msgs/msg/Missing"
    ));
    assert!(matches!(
        missing_sub.creation_error(),
        Some(Error::NoTypeSupportImported { .. })
    ));
    assert!(present.creation_error().is_none());
    Ok(())
}

#[test]
fn test_spin_before_init() {
    let (_middleware, compat) = create_compat();
    assert!(compat.is_shutdown());
    assert!(matches!(compat.spin(), Err(Error::NotInitialized(_))));
    assert_eq!(compat.get_caller_id(), "");
}

#[test]
fn test_anonymous_node() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();
    compat.init_node("listener", true)?;
    let caller_id = compat.get_caller_id();
    assert!(caller_id.starts_with(&format!("/listener_{}_", std::process::id())));
    Ok(())
}

#[test]
fn test_get_time() {
    let (_middleware, compat) = create_compat();
    let first = compat.get_time();
    let second = compat.get_time();
    assert!(first > 1_600_000_000.0);
    assert!(second >= first);
}

#[test]
fn test_spin_dispatches_until_shutdown() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();
    let compat = Arc::new(compat);

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    compat.subscriber::<Int64, _>("count", move |msg| sink.lock().unwrap().push(msg.data), 10)?;
    let publisher = compat.publisher::<Int64>("count", 10)?;
    compat.init_node("spinner", false)?;
    assert!(!compat.is_shutdown());

    publisher.publish(&Int64 { data: 7 })?;

    let stopper = compat.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        stopper.shutdown()
    });
    compat.spin()?;
    handle.join().unwrap()?;

    assert!(compat.is_shutdown());
    assert_eq!(*received.lock().unwrap(), vec![7]);
    assert!(matches!(
        compat.with_node(|_| ()),
        Err(Error::NodeDestroyed)
    ));
    assert!(matches!(
        compat.init_node("again", false),
        Err(Error::AlreadyInitialized(_))
    ));
    compat.spin()?;
    Ok(())
}

#[test]
fn test_callback_calls_back_into_facade() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();
    let compat = Arc::new(compat);

    let (tx, rx) = mpsc::channel();
    let weak = Arc::downgrade(&compat);
    compat.subscriber::<StringMsg, _>(
        "chatter",
        move |msg| {
            if let Some(compat) = weak.upgrade() {
                let heard = format!("{} I heard {}", compat.get_caller_id(), msg.data);
                tx.send((heard, compat.is_shutdown())).unwrap();
                compat.shutdown().unwrap();
            }
        },
        10,
    )?;
    let publisher = compat.publisher::<StringMsg>("chatter", 10)?;
    compat.init_node("listener", false)?;
    publisher.publish(&StringMsg {
        data: "hello".into(),
    })?;

    let spinner = compat.clone();
    let handle = thread::spawn(move || spinner.spin());
    let (heard, was_shutdown) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    handle.join().unwrap()?;

    assert_eq!(heard, "/listener I heard hello");
    assert!(!was_shutdown);
    assert!(compat.is_shutdown());
    assert!(matches!(
        compat.with_node(|_| ()),
        Err(Error::NodeDestroyed)
    ));
    Ok(())
}

#[test]
fn test_publisher_created_from_callback() -> rclbind::Result<()> {
    let (_middleware, compat) = create_compat();
    let compat = Arc::new(compat);

    let (tx, rx) = mpsc::channel();
    let weak = Arc::downgrade(&compat);
    compat.subscriber::<Int64, _>(
        "trigger",
        move |_| {
            if let Some(compat) = weak.upgrade() {
                tx.send(compat.publisher::<Int64>("echo", 1)).unwrap();
            }
        },
        10,
    )?;
    let trigger = compat.publisher::<Int64>("trigger", 10)?;
    compat.init_node("echoer", false)?;
    trigger.publish(&Int64 { data: 1 })?;

    let spinner = compat.clone();
    let handle = thread::spawn(move || spinner.spin());
    let echo = rx.recv_timeout(Duration::from_secs(5)).unwrap()?;
    assert!(matches!(compat.with_node(|_| ()), Err(Error::Busy(_))));

    let deadline = Instant::now() + Duration::from_secs(5);
    while !echo.is_created() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(echo.is_created());
    echo.publish(&Int64 { data: 2 })?;

    compat.shutdown()?;
    handle.join().unwrap()?;
    assert!(compat.is_shutdown());
    Ok(())
}

pub mod common;

use common::{AddTwoInts, AddTwoIntsRequest, AddTwoIntsResponse, create_context};
use rclbind::{Error, spin_once, spin_until_response};
use std::time::Duration;

const SERVICE_NAME1: &str = "test_service1";

#[test]
fn test_service() -> rclbind::Result<()> {
    let (_middleware, ctx) = create_context();

    let mut node_server = ctx.create_node("test_service_server_node", None)?;
    let mut node_client = ctx.create_node("test_service_client_node", None)?;

    node_server.create_service::<AddTwoInts, _>(
        SERVICE_NAME1,
        |request| AddTwoIntsResponse {
            sum: request.a + request.b,
        },
        None,
    )?;
    let client = node_client.create_client::<AddTwoInts>(SERVICE_NAME1, None)?;

    let id = client.send_request(&AddTwoIntsRequest { a: 1, b: 7 })?;
    assert_eq!(id.writer, client.handle());

    assert_eq!(spin_once(&mut node_server, Some(Duration::from_millis(50)))?, 1);

    let response = spin_until_response(
        &mut node_client,
        &client,
        id,
        Some(Duration::from_secs(1)),
    )?;
    assert_eq!(response, AddTwoIntsResponse { sum: 8 });
    assert_eq!(client.pending_responses(), 0);
    Ok(())
}

#[test]
fn test_responses_are_matched_by_sequence() -> rclbind::Result<()> {
    let (_middleware, ctx) = create_context();
    let mut node = ctx.create_node("test_sequence_node", None)?;

    node.create_service::<AddTwoInts, _>(
        "add",
        |request| AddTwoIntsResponse {
            sum: request.a + request.b,
        },
        None,
    )?;
    let client = node.create_client::<AddTwoInts>("add", None)?;

    let first = client.send_request(&AddTwoIntsRequest { a: 1, b: 1 })?;
    let second = client.send_request(&AddTwoIntsRequest { a: 2, b: 2 })?;
    assert_ne!(first.sequence, second.sequence);

    let response = spin_until_response(&mut node, &client, second, Some(Duration::from_secs(1)))?;
    assert_eq!(response.sum, 4);

    let response = spin_until_response(&mut node, &client, first, Some(Duration::from_secs(1)))?;
    assert_eq!(response.sum, 2);
    Ok(())
}

#[test]
fn test_no_server_times_out() -> rclbind::Result<()> {
    let (_middleware, ctx) = create_context();
    let mut node = ctx.create_node("test_no_server_node", None)?;
    let client = node.create_client::<AddTwoInts>("nobody", None)?;

    let id = client.send_request(&AddTwoIntsRequest { a: 1, b: 2 })?;
    let result = spin_until_response(&mut node, &client, id, Some(Duration::from_millis(30)));
    assert!(matches!(result, Err(Error::Timeout)));
    Ok(())
}

#[test]
fn test_response_to_destroyed_client_is_dropped() -> rclbind::Result<()> {
    let (_middleware, ctx) = create_context();
    let mut node = ctx.create_node("test_destroyed_client_node", None)?;

    node.create_service::<AddTwoInts, _>("add", |_| AddTwoIntsResponse { sum: 0 }, None)?;
    let client = node.create_client::<AddTwoInts>("add", None)?;
    client.send_request(&AddTwoIntsRequest { a: 0, b: 0 })?;

    assert!(node.destroy_client(&client));
    assert_eq!(spin_once(&mut node, Some(Duration::from_millis(50)))?, 1);
    assert_eq!(spin_once(&mut node, Some(Duration::ZERO))?, 0);
    assert_eq!(client.pending_responses(), 0);
    Ok(())
}

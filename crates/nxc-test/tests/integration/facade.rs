//! Composition, dispatch and session lifecycle of the facade.

use std::sync::Arc;

use nxc_client::FacadeBuilder;
use nxc_client::api::{Capabilities, Users, WebDav};
use nxc_client::api::webdav::WEBDAV_MODULE;
use nxc_client::capability::builtin_registry;
use nxc_test::session_over;
use serde_json::json;

use super::helpers::*;

#[test_log::test]
fn registering_a_module_twice_is_a_clash() {
    let err = FacadeBuilder::from_registry(builtin_registry())
        .register(WEBDAV_MODULE)
        .compose()
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::DuplicateOperation { ref first, ref second, .. }
            if first == "WebDav" && second == "WebDav"
    ));
}

#[test_log::test]
fn partial_facade_knows_only_its_operations() {
    let transport = MockTransport::new();
    let client = FacadeBuilder::new()
        .register(WEBDAV_MODULE)
        .json_output(false)
        .compose()
        .unwrap()
        .bind(session_over(&transport));

    assert_eq!(client.operations().count(), 13);
    assert!(client.capability::<WebDav>().is_some());
    assert!(client.capability::<Users>().is_none());
    assert!(matches!(
        client.call("get_user", &OperationArgs::new()),
        Err(ClientError::UnknownOperation(name)) if name == "get_user"
    ));
    assert!(transport.requests().is_empty());
}

#[test_log::test]
fn missing_arguments_are_reported() {
    let (transport, client) = dav_client();
    let err = client.call("create_folder", &OperationArgs::new()).unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert!(transport.requests().is_empty());
}

#[test_log::test]
fn logout_closes_every_sibling_client() {
    let (transport, client) = ocs_client();
    let xml = client.with_attr("json_output", &json!(false)).unwrap();
    assert!(Arc::ptr_eq(client.session(), xml.session()));
    assert_eq!(xml.user(), USER);
    assert_eq!(xml.url(), SERVER);

    transport.respond(200, ocs("ok", 100, json!({})));
    xml.capability::<Capabilities>()
        .expect("Capabilities is composed")
        .get_capabilities()
        .unwrap();
    assert_eq!(
        transport.last_request().unwrap().url,
        url("/ocs/v1.php/cloud/capabilities")
    );

    assert!(client.logout());
    for facade in [&client, &xml] {
        let err = facade.call("get_capabilities", &OperationArgs::new()).unwrap_err();
        assert!(matches!(err, ClientError::SessionClosed));
    }
    let typed = xml
        .capability::<Capabilities>()
        .expect("Capabilities is composed")
        .get_capabilities()
        .unwrap_err();
    assert!(matches!(typed, ClientError::SessionClosed));
    assert_eq!(transport.requests().len(), 1);

    client.login();
    transport.respond(200, ocs("ok", 100, json!({})));
    assert!(xml.call("get_capabilities", &OperationArgs::new()).unwrap().is_ok());
}

#[test_log::test]
fn transport_failures_surface_as_errors() {
    let (_transport, client) = dav_client();
    let err = client.call("empty_trashbin", &OperationArgs::new()).unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

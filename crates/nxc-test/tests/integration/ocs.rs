//! OCS endpoints: apps, capabilities, users and sharees.

use nxc_client::api::{Apps, Sharee, ShareeQuery};
use serde_json::json;

use super::helpers::*;

#[test_log::test]
fn capabilities_in_json() {
    let (transport, client) = ocs_client();
    transport.respond(200, ocs("ok", 100, json!({"version": {"major": 28}})));

    let outcome = client.call("get_capabilities", &OperationArgs::new()).unwrap();
    assert!(outcome.is_ok());
    let response = outcome.into_response().unwrap();
    assert_eq!(response.json_payload(), Some(&json!({"version": {"major": 28}})));
    assert_eq!(response.to_string(), "<OcsResponse: Status: OK>");

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, url("/ocs/v1.php/cloud/capabilities?format=json"));
    assert_eq!(request.header_value("OCS-APIRequest"), Some("true"));
}

#[test_log::test]
fn ocs_status_code_decides() {
    let (transport, client) = ocs_client();
    transport.respond(200, ocs("failure", 998, json!([])));
    transport.respond(200, "<html>maintenance</html>");

    let missing = client
        .call("get_app", &OperationArgs::new().with("app_id", "nope"))
        .unwrap();
    assert!(!missing.is_ok());
    assert_eq!(missing.response().unwrap().status_code(), 998);

    let garbled = client.call("get_apps", &OperationArgs::new()).unwrap();
    assert!(!garbled.is_ok());
    assert_eq!(garbled.response().unwrap().status_code(), -1);
}

#[test_log::test]
fn app_toggles_use_write_methods() {
    let (transport, client) = ocs_client();
    transport.respond(200, ocs("ok", 100, json!([])));
    transport.respond(200, ocs("ok", 100, json!([])));
    transport.respond(200, ocs("ok", 100, json!({"apps": ["files"]})));

    let apps = client.capability::<Apps>().expect("Apps is composed");
    assert!(apps.enable_app("notes").unwrap().is_ok());
    assert!(apps.disable_app("notes").unwrap().is_ok());
    assert!(apps.get_apps(Some("enabled")).unwrap().is_ok());

    let requests = transport.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, url("/ocs/v1.php/cloud/apps/notes?format=json"));
    assert_eq!(
        requests[0].header_value("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(requests[2].url, url("/ocs/v1.php/cloud/apps?format=json&filter=enabled"));
}

#[test_log::test]
fn current_user_is_the_default() {
    let (transport, client) = dav_client();
    transport.respond(200, ocs("ok", 100, json!({"id": USER})));

    assert!(client.call("get_user", &OperationArgs::new()).unwrap().is_ok());
    assert_eq!(
        transport.last_request().unwrap().url,
        url("/ocs/v1.php/cloud/users/alice")
    );
}

#[test_log::test]
fn sharee_search_parameters() {
    let (transport, client) = ocs_client();
    transport.respond(200, ocs("ok", 100, json!({"exact": {"users": []}})));
    transport.respond(200, ocs("ok", 100, json!({"exact": {"users": []}})));

    let query = ShareeQuery {
        lookup: true,
        per_page: Some(10),
        ..ShareeQuery::new("bob")
    };
    let sharee = client.capability::<Sharee>().expect("Sharee is composed");
    assert!(sharee.search_sharees(&query).unwrap().is_ok());
    let args = OperationArgs::new().with("search", "carol").with("item_type", "folder");
    assert!(client.call("search_sharees", &args).unwrap().is_ok());

    let requests = transport.requests();
    assert_eq!(
        requests[0].url,
        url("/ocs/v1.php/apps/files_sharing/api/v1/sharees?format=json&search=bob&itemType=file&lookup=true&perPage=10")
    );
    assert_eq!(
        requests[1].url,
        url("/ocs/v1.php/apps/files_sharing/api/v1/sharees?format=json&search=carol&itemType=folder")
    );
}

//! Files and folders through the composed client.

use nxc_client::api::{File, ListOptions, WebDav};
use nxc_client::capability::Outcome;
use serde_json::json;

use super::helpers::*;

fn webdav(client: &NextCloud) -> &WebDav {
    client.capability::<WebDav>().expect("WebDav is composed")
}

fn report_entry() -> DavEntry {
    DavEntry::new(&file_href("docs/report.pdf"))
        .prop("d:resourcetype", "")
        .prop("d:getlastmodified", "Wed, 20 Jul 2022 05:12:23 GMT")
        .prop("oc:fileid", "12")
}

#[test_log::test]
fn list_folders_decodes_files() {
    let (transport, client) = dav_client();
    transport.respond(
        207,
        multistatus(&[
            DavEntry::new(&file_href("docs/")).collection().prop("oc:fileid", "10"),
            report_entry().missing("oc:favorite"),
        ]),
    );

    let listing = webdav(&client)
        .list_folders("docs", &ListOptions::default())
        .unwrap();
    assert!(listing.is_ok());
    assert_eq!(listing.len(), 2);

    let folder = File::new(&listing.items()[0]);
    assert!(folder.is_dir());
    assert_eq!(folder.remote_path().unwrap(), "docs/");

    let report = File::new(&listing.items()[1]);
    assert!(report.is_file());
    assert_eq!(report.remote_path().unwrap(), "docs/report.pdf");
    assert_eq!(report.last_modified_epoch(), Some(1_658_293_943));
    assert_eq!(report.entity().get_str("file_id"), Some("12"));
    assert!(!report.entity().has("favorite"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "PROPFIND");
    assert_eq!(request.url, url("/remote.php/dav/files/alice/docs"));
    assert_eq!(request.header_value("Depth"), Some("1"));
    assert!(request.body.is_none());
}

#[test_log::test]
fn list_folders_with_selected_fields() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[]));

    let args = OperationArgs::new()
        .with("path", "docs")
        .with("depth", 0)
        .with("fields", json!(["file_id", "d:getetag"]));
    let listing = client.call("list_folders", &args).unwrap().into_list().unwrap();
    assert!(listing.is_empty());

    let request = transport.last_request().unwrap();
    assert_eq!(request.header_value("Depth"), Some("0"));
    let body = body_text(&request);
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<d:propfind"));
    assert!(body.contains("<oc:fileid/>"));
    assert!(body.contains("<d:getetag/>"));
    assert!(!body.contains("<oc:favorite/>"));
}

#[test_log::test]
fn failed_listing_has_no_entities() {
    let (transport, client) = dav_client();
    transport.respond(404, "Not Found");

    let listing = webdav(&client)
        .list_folders("missing", &ListOptions::default())
        .unwrap();
    assert!(!listing.is_ok());
    assert!(listing.is_empty());
}

#[test_log::test]
fn download_returns_bytes() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[report_entry()]));
    transport.respond(200, "%PDF-1.7");

    let download = webdav(&client).download_file("docs/report.pdf").unwrap();
    assert_eq!(download.bytes(), b"%PDF-1.7");
    assert_eq!(download.last_modified(), Some(1_658_293_943));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header_value("Depth"), Some("0"));
    assert_eq!(requests[1].method, "GET");
    assert_eq!(requests[1].url, url("/remote.php/dav/files/alice/docs/report.pdf"));
}

#[test_log::test]
fn download_rejects_folders_and_missing_paths() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[DavEntry::new(&file_href("docs/")).collection()]));
    transport.respond(207, multistatus(&[]));

    let folder = webdav(&client).download_file("docs").unwrap_err();
    assert!(matches!(folder, ClientError::InvalidArgument(_)));
    let missing = webdav(&client).download_file("nope.txt").unwrap_err();
    assert!(matches!(missing, ClientError::InvalidArgument(_)));

    assert!(transport.requests().iter().all(|r| r.method == "PROPFIND"));
}

#[test_log::test]
fn upload_sets_modification_time() {
    let (transport, client) = dav_client();
    transport.respond(201, "");

    let response = webdav(&client)
        .upload_file_contents(b"hello".to_vec(), "docs/a.txt", Some(1_658_293_943))
        .unwrap();
    assert!(response.is_ok());

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.url, url("/remote.php/dav/files/alice/docs/a.txt"));
    assert_eq!(request.header_value("X-OC-MTIME"), Some("1658293943"));
    assert_eq!(request.body.as_deref(), Some(&b"hello"[..]));
}

#[test_log::test]
fn tree_is_created_outermost_first() {
    let (transport, client) = dav_client();
    transport.respond(405, "");
    transport.respond(201, "");

    let outcome = client
        .call("assure_tree_exists", &OperationArgs::new().with("tree_path", "docs/2024"))
        .unwrap();
    assert!(matches!(outcome, Outcome::Flag(true)));

    let urls: Vec<_> = transport
        .requests()
        .into_iter()
        .map(|request| (request.method, request.url))
        .collect();
    assert_eq!(
        urls,
        [
            ("MKCOL".to_owned(), url("/remote.php/dav/files/alice/docs")),
            ("MKCOL".to_owned(), url("/remote.php/dav/files/alice/docs/2024")),
        ]
    );
}

#[test_log::test]
fn move_and_copy_carry_destination() {
    let (transport, client) = dav_client();
    transport.respond(201, "");
    transport.respond(204, "");

    let moved = webdav(&client).move_path("a.txt", "docs/a.txt", false).unwrap();
    assert!(moved.is_ok());
    let copied = webdav(&client).copy_path("docs/a.txt", "b.txt", true).unwrap();
    assert!(copied.is_ok());

    let requests = transport.requests();
    assert_eq!(requests[0].method, "MOVE");
    assert_eq!(
        requests[0].header_value("Destination"),
        Some(url("/remote.php/dav/files/alice/docs/a.txt").as_str())
    );
    assert_eq!(requests[0].header_value("Overwrite"), Some("F"));
    assert_eq!(requests[1].method, "COPY");
    assert_eq!(requests[1].header_value("Overwrite"), Some("T"));
}

#[test_log::test]
fn delete_classification_follows_method_table() {
    let (transport, client) = dav_client();
    transport.respond(204, "");
    transport.respond(200, "");

    assert!(webdav(&client).delete_path("a.txt").unwrap().is_ok());
    assert!(!webdav(&client).delete_path("b.txt").unwrap().is_ok());
}

#[test_log::test]
fn favorites() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[]));
    transport.respond(207, multistatus(&[report_entry().prop("oc:favorite", "1")]));

    assert!(webdav(&client).set_favorites("docs/report.pdf").unwrap().is_ok());
    let favorites = webdav(&client).list_favorites("").unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites.items()[0].get_str("favorite"), Some("1"));

    let requests = transport.requests();
    assert_eq!(requests[0].method, "PROPPATCH");
    assert!(body_text(&requests[0]).contains("<d:set><d:prop><oc:favorite>1</oc:favorite></d:prop></d:set>"));

    assert_eq!(requests[1].method, "REPORT");
    assert_eq!(requests[1].url, url("/remote.php/dav/files/alice"));
    let body = body_text(&requests[1]);
    assert!(body.contains("<oc:filter-files"));
    assert!(body.contains("<oc:filter-rules><oc:favorite>1</oc:favorite></oc:filter-rules>"));
    assert!(!body.contains("<d:prop>"));
}

#[test_log::test]
fn file_property_lookup() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[report_entry()]));

    let property = webdav(&client)
        .get_file_property("docs/report.pdf", "fileid")
        .unwrap();
    assert!(property.is_ok());
    assert_eq!(property.data().map(String::as_str), Some("12"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.header_value("Depth"), Some("0"));
    assert!(body_text(&request).contains("<oc:fileid/>"));

    let err = webdav(&client)
        .get_file_property("docs/report.pdf", "xx:colour")
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert_eq!(transport.requests().len(), 1);
}

#[test_log::test]
fn entities_outliving_the_client_are_detached() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[report_entry()]));

    let listing = webdav(&client)
        .list_folders("docs/report.pdf", &ListOptions::default())
        .unwrap();
    drop(client);

    let err = File::new(&listing.items()[0]).remote_path().unwrap_err();
    assert!(matches!(err, ClientError::Detached));
}

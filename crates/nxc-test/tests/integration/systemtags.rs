//! System tags and their assignment to files.

use nxc_client::api::{File, ListOptions, SystemTags, Tag, TagRef, WebDav};
use nxc_core::constants::JSON_CONTENT_TYPE;
use serde_json::{Value, json};

use super::helpers::*;

const TAGS_ROOT: &str = "/remote.php/dav/systemtags/";

fn tag_entry(id: i64, name: &str) -> DavEntry {
    DavEntry::new(&format!("{TAGS_ROOT}{id}"))
        .prop("oc:id", &id.to_string())
        .prop("oc:display-name", name)
        .prop("oc:user-visible", "true")
}

fn tags(entries: &[(i64, &str)]) -> String {
    let mut all = vec![DavEntry::new(TAGS_ROOT)];
    all.extend(entries.iter().map(|(id, name)| tag_entry(*id, name)));
    multistatus(&all)
}

fn system_tags(client: &NextCloud) -> &SystemTags {
    client.capability::<SystemTags>().expect("SystemTags is composed")
}

#[test_log::test]
fn listing_skips_the_tag_root() {
    let (transport, client) = dav_client();
    transport.respond(207, tags(&[(1, "urgent"), (2, "later")]));

    let listing = system_tags(&client).fetch_systemtags().unwrap();
    let names: Vec<_> = listing
        .items()
        .iter()
        .map(|tag| (Tag::new(tag).id(), Tag::new(tag).display_name()))
        .collect();
    assert_eq!(names, [(Some(1), Some("urgent")), (Some(2), Some("later"))]);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "PROPFIND");
    assert_eq!(request.url, url("/remote.php/dav/systemtags"));
    assert_eq!(request.header_value("Depth"), None);
    assert!(body_text(&request).contains("<oc:display-name/>"));
}

#[test_log::test]
fn fetch_by_name() {
    let (transport, client) = dav_client();
    transport.respond(207, tags(&[(1, "urgent"), (2, "later")]));
    transport.respond(207, tags(&[(1, "urgent")]));

    let found = system_tags(&client).fetch_systemtag("later", &[]).unwrap();
    let tag = found.item().expect("tag found");
    assert_eq!(Tag::new(tag).id(), Some(2));
    assert_eq!(tag.get("can_assign"), Some(&Value::Bool(true)));

    let absent = system_tags(&client).fetch_systemtag("later", &["id"]).unwrap();
    assert!(absent.is_ok());
    assert!(absent.item().is_none());
}

#[test_log::test]
fn create_reads_id_from_location() {
    let (transport, client) = dav_client();
    transport.push(Scripted::new(201, "").header("Content-Location", "/remote.php/dav/systemtags/17"));

    let created = system_tags(&client).create_systemtag("urgent").unwrap();
    assert!(created.is_ok());
    assert_eq!(created.data(), Some(&17));

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.header_value("Content-Type"), Some(JSON_CONTENT_TYPE));
    let payload: Value = serde_json::from_str(&body_text(&request)).unwrap();
    assert_eq!(
        payload,
        json!({"name": "urgent", "userVisible": true, "canAssign": true, "userAssignable": true})
    );
}

#[test_log::test]
fn create_through_facade_returns_data() {
    let (transport, client) = dav_client();
    transport.push(Scripted::new(409, ""));

    let outcome = client
        .call("create_systemtag", &OperationArgs::new().with("name", "urgent"))
        .unwrap();
    assert!(!outcome.is_ok());
    assert_eq!(outcome.data(), Some(&Value::Null));
}

#[test_log::test]
fn delete_by_unknown_name_is_rejected() {
    let (transport, client) = dav_client();
    transport.respond(207, tags(&[(1, "urgent")]));

    let err = client
        .call("delete_systemtag", &OperationArgs::new().with("name", "later"))
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert_eq!(transport.requests().len(), 1);
}

#[test_log::test]
fn assign_existing_tag_by_path_and_name() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[DavEntry::new(&file_href("a.txt")).prop("oc:fileid", "12")]));
    transport.respond(207, tags(&[(5, "urgent")]));
    transport.respond(201, "");

    let args = OperationArgs::new().with("path", "a.txt").with("tag_name", "urgent");
    assert!(client.call("add_systemtags_relation", &args).unwrap().is_ok());

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.url, url("/remote.php/dav/systemtags-relations/files/12/5"));
}

#[test_log::test]
fn assign_unknown_tag_creates_it() {
    let (transport, client) = dav_client();
    transport.respond(207, tags(&[(5, "urgent")]));
    transport.respond(201, "");

    let args = OperationArgs::new().with("file_id", 12).with("tag_name", "fresh");
    assert!(client.call("add_systemtags_relation", &args).unwrap().is_ok());

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, url("/remote.php/dav/systemtags-relations/files/12"));
    let payload: Value = serde_json::from_str(&body_text(&request)).unwrap();
    assert_eq!(payload["name"], "fresh");
}

#[test_log::test]
fn unassign_unknown_tag_is_rejected() {
    let (transport, client) = dav_client();
    transport.respond(207, tags(&[]));

    let args = OperationArgs::new().with("file_id", 12).with("tag_name", "later");
    let err = client.call("remove_systemtags_relation", &args).unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));

    let missing = client
        .call("remove_systemtags_relation", &OperationArgs::new().with("tag_id", 3))
        .unwrap_err();
    assert!(matches!(missing, ClientError::InvalidArgument(_)));
}

#[test_log::test]
fn file_view_follows_up_on_tags() {
    let (transport, client) = dav_client();
    transport.respond(207, multistatus(&[DavEntry::new(&file_href("a.txt")).prop("oc:fileid", "12")]));
    transport.respond(
        207,
        multistatus(&[
            DavEntry::new("/remote.php/dav/systemtags-relations/files/12/"),
            tag_entry(3, "later"),
        ]),
    );
    transport.respond(204, "");

    let listing = client
        .capability::<WebDav>()
        .expect("WebDav is composed")
        .list_folders("a.txt", &ListOptions::default())
        .unwrap();
    let file = File::new(&listing.items()[0]);

    let assigned = file.tags().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(Tag::new(&assigned.items()[0]).display_name(), Some("later"));

    assert!(file.remove_tag(TagRef::Id(3)).unwrap());

    let requests = transport.requests();
    assert_eq!(requests[1].url, url("/remote.php/dav/systemtags-relations/files/12"));
    assert_eq!(requests[2].method, "DELETE");
    assert_eq!(requests[2].url, url("/remote.php/dav/systemtags-relations/files/12/3"));
}

#[test_log::test]
fn tag_view_finds_files_and_deletes_itself() {
    let (transport, client) = dav_client();
    transport.respond(207, tags(&[(3, "later")]));
    transport.respond(207, multistatus(&[DavEntry::new(&file_href("a.txt")).prop("oc:fileid", "12")]));
    transport.respond(204, "");

    let listing = system_tags(&client).fetch_systemtags().unwrap();
    let tag = Tag::new(&listing.items()[0]);

    let files = tag.related_files("").unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(File::new(&files.items()[0]).remote_path().unwrap(), "a.txt");
    assert!(tag.delete().unwrap());

    let requests = transport.requests();
    assert_eq!(requests[1].method, "REPORT");
    assert!(body_text(&requests[1]).contains("<oc:systemtag>3</oc:systemtag>"));
    assert_eq!(requests[2].method, "DELETE");
    assert_eq!(requests[2].url, url("/remote.php/dav/systemtags/3"));
}

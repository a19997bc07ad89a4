//! Trash bin listing, restore and purge.

use nxc_client::api::{TrashFile, WebDavTrash};
use nxc_dav::dav::core::FieldSelection;

use super::helpers::*;

const TRASH_ROOT: &str = "/remote.php/dav/trashbin/alice/trash/";

fn trash(client: &NextCloud) -> &WebDavTrash {
    client.capability::<WebDavTrash>().expect("WebDavTrash is composed")
}

#[test_log::test]
fn restore_listed_entry() {
    let (transport, client) = dav_client();
    transport.respond(
        207,
        multistatus(&[
            DavEntry::new(TRASH_ROOT).collection(),
            DavEntry::new(&format!("{TRASH_ROOT}a.txt.d1658293943"))
                .prop("nc:trashbin-filename", "a.txt")
                .prop("nc:trashbin-original-location", "docs/a.txt"),
        ]),
    );
    transport.respond(201, "");

    let listing = trash(&client)
        .list_trashbin_files(true, FieldSelection::new())
        .unwrap();
    assert_eq!(listing.len(), 2);
    let entry = TrashFile::new(&listing.items()[1]);
    assert_eq!(entry.original_location(), Some("docs/a.txt"));
    assert!(entry.restore().unwrap());

    let requests = transport.requests();
    assert_eq!(requests[0].method, "PROPFIND");
    assert_eq!(requests[0].url, url("/remote.php/dav/trashbin/alice/trash"));
    assert!(body_text(&requests[0]).contains("<nc:trashbin-original-location/>"));

    assert_eq!(requests[1].method, "MOVE");
    assert_eq!(requests[1].url, url("/remote.php/dav/trashbin/alice/trash/a.txt.d1658293943"));
    assert_eq!(
        requests[1].header_value("Destination"),
        Some(url("/remote.php/dav/trashbin/alice/restore").as_str())
    );
    assert_eq!(requests[1].header_value("Overwrite"), Some("F"));
}

#[test_log::test]
fn delete_and_empty() {
    let (transport, client) = dav_client();
    transport.respond(204, "");
    transport.respond(204, "");

    let args = OperationArgs::new().with("path", "trash/a.txt.d1658293943");
    assert!(client.call("delete_trashbin_file", &args).unwrap().is_ok());
    assert!(client.call("empty_trashbin", &OperationArgs::new()).unwrap().is_ok());

    let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        [
            url("/remote.php/dav/trashbin/alice/trash/a.txt.d1658293943"),
            url("/remote.php/dav/trashbin/alice/trash"),
        ]
    );
}

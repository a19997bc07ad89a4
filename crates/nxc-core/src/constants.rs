//! Route components of the server-side APIs, shared across crates.

pub const OCS_V1_ROUTE_PREFIX: &str = "/ocs/v1.php";
pub const OCS_V2_ROUTE_PREFIX: &str = "/ocs/v2.php";

pub const CLOUD_ROUTE_COMPONENT: &str = "cloud";
pub const CLOUD_ROUTE_PREFIX: &str =
    const_str::concat!(OCS_V1_ROUTE_PREFIX, "/", CLOUD_ROUTE_COMPONENT);

pub const APPS_API_URL: &str = const_str::concat!(CLOUD_ROUTE_PREFIX, "/apps");
pub const CAPABILITIES_API_URL: &str = const_str::concat!(CLOUD_ROUTE_PREFIX, "/capabilities");
pub const USERS_API_URL: &str = const_str::concat!(CLOUD_ROUTE_PREFIX, "/users");
pub const SHARING_API_URL: &str =
    const_str::concat!(OCS_V1_ROUTE_PREFIX, "/apps/files_sharing/api/v1");

pub const DAV_ROUTE_PREFIX: &str = "/remote.php/dav";

pub const FILES_DAV_URL: &str = const_str::concat!(DAV_ROUTE_PREFIX, "/files");
pub const TRASHBIN_DAV_URL: &str = const_str::concat!(DAV_ROUTE_PREFIX, "/trashbin");
pub const SYSTEMTAGS_DAV_URL: &str = const_str::concat!(DAV_ROUTE_PREFIX, "/systemtags");
pub const SYSTEMTAGS_RELATIONS_DAV_URL: &str =
    const_str::concat!(DAV_ROUTE_PREFIX, "/systemtags-relations/files");

/// Header every OCS call must carry, or the server answers with a CSRF error.
pub const OCS_API_REQUEST_HEADER: &str = "OCS-APIRequest";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

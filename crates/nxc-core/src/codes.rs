//! Status codes and enumerations defined by the Nextcloud / ownCloud APIs.
//!
//! OCS codes live in the `meta.statuscode` field of the JSON envelope, not in
//! the HTTP status line. `WebDAV` codes are plain HTTP statuses.

/// Status code used when an OCS body carries no envelope (or no JSON at all).
pub const UNSTRUCTURED_STATUS: i64 = -1;

/// Quota value the server reports for "no limit".
pub const QUOTA_UNLIMITED: i64 = -3;

/// Provisioning API (`/ocs/v1.php/cloud/...`) codes.
pub mod provisioning {
    pub const SUCCESS: i64 = 100;
    pub const INVALID_INPUT_DATA: i64 = 101;
    pub const FAILED: i64 = 102;
    pub const CREATION_FAILED: i64 = 103;
    pub const INSUFFICIENT_PRIVILEGES: i64 = 104;
    pub const CHANGE_FAILED: i64 = 105;
}

/// OCS API codes.
pub mod ocs {
    pub const SUCCESS_V1: i64 = 100;
    pub const SUCCESS_V2: i64 = 200;
    pub const FAILURE: i64 = 400;
    pub const NOT_FOUND: i64 = 404;
    pub const SYNC_CONFLICT: i64 = 409;
}

/// External API codes.
pub mod external {
    pub const SUCCESS: i64 = 100;
    pub const UNAUTHORIZED: i64 = 401;
    pub const SERVER_ERROR: i64 = 996;
    pub const NOT_AUTHORIZED: i64 = 997;
    pub const NOT_FOUND: i64 = 998;
    pub const UNKNOWN_ERROR: i64 = 999;
}

/// `WebDAV` HTTP statuses.
pub mod webdav {
    pub const CREATED: i64 = 201;
    pub const NO_CONTENT: i64 = 204;
    pub const MULTISTATUS: i64 = 207;
    pub const NOT_AUTHENTICATED: i64 = 401;
    pub const ALREADY_EXISTS: i64 = 405;
    pub const CONFLICT: i64 = 409;
    pub const PRECONDITION_FAILED: i64 = 412;
}

/// Share types understood by the `files_sharing` app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareType {
    User,
    Group,
    PublicLink,
    FederatedCloudShare,
}

impl ShareType {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Group => 1,
            Self::PublicLink => 3,
            Self::FederatedCloudShare => 6,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::User),
            1 => Some(Self::Group),
            3 => Some(Self::PublicLink),
            6 => Some(Self::FederatedCloudShare),
            _ => None,
        }
    }
}

/// Share permission bits; a share carries the sum of its permissions.
pub mod permission {
    pub const READ: u8 = 1;
    pub const UPDATE: u8 = 2;
    pub const CREATE: u8 = 4;
    pub const DELETE: u8 = 8;
    pub const SHARE: u8 = 16;
    pub const ALL: u8 = READ | UPDATE | CREATE | DELETE | SHARE;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_type_codes_round_trip() {
        for share_type in [
            ShareType::User,
            ShareType::Group,
            ShareType::PublicLink,
            ShareType::FederatedCloudShare,
        ] {
            assert_eq!(ShareType::from_code(share_type.code()), Some(share_type));
        }
        assert_eq!(ShareType::from_code(2), None);
    }

    #[test]
    fn permission_all_is_sum() {
        assert_eq!(permission::ALL, 31);
    }
}
